//! Connection and presence indicators: ●/○/◐ with color mapping.

use ratatui::style::Style;
use ratatui::text::Span;
use rollcall_core::{ConnectionState, Presence};

use crate::theme;

/// Styled dot and label for the feed connection.
pub fn connection_span(state: &ConnectionState) -> Span<'static> {
    let (text, color) = match state {
        ConnectionState::Open => ("● live".to_owned(), theme::PRESENT),
        ConnectionState::Idle | ConnectionState::Connecting => {
            ("◐ connecting".to_owned(), theme::WARNING)
        }
        ConnectionState::Reconnecting { attempt, delay } => (
            format!("◐ reconnecting #{attempt} in {}s", delay.as_secs_f32()),
            theme::WARNING,
        ),
        ConnectionState::Failed => ("○ unable to connect".to_owned(), theme::ABSENT),
        ConnectionState::Closed => ("○ closed".to_owned(), theme::MUTED),
    };
    Span::styled(text, Style::default().fg(color))
}

/// Glyph shown in front of an employee name.
pub fn presence_char(presence: Presence) -> &'static str {
    match presence {
        Presence::Present => "●",
        Presence::Absent => "○",
        Presence::Unknown => rollcall_core::layout::PLACEHOLDER,
    }
}

pub fn presence_style(presence: Presence) -> Style {
    match presence {
        Presence::Present => theme::present(),
        Presence::Absent => theme::absent(),
        Presence::Unknown => theme::placeholder(),
    }
}
