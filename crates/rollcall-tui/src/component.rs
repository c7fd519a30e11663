//! Component trait implemented by every screen and overlay.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use rollcall_core::BoardState;

use crate::action::Action;

/// A UI element that reads the shared [`BoardState`] but never mutates it.
/// State changes go back to the app loop as [`Action`]s.
///
/// Lifecycle: (`handle_key_event` | `update` | `render`)*
pub trait Component: Send {
    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent, _board: &BoardState) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action after the board has been updated.
    fn update(&mut self, _action: &Action, _board: &BoardState) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, board: &BoardState);
}
