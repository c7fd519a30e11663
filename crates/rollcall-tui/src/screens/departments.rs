//! Department picker overlay.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};

use rollcall_core::BoardState;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Checkbox list over every known department. Only the cursor lives here;
/// the selection itself is part of the board.
#[derive(Debug, Default)]
pub struct DepartmentsModal {
    cursor: usize,
}

impl DepartmentsModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor clamped to the current department list.
    fn cursor(&self, board: &BoardState) -> usize {
        self.cursor.min(board.departments().len().saturating_sub(1))
    }
}

/// Centered rect of at most `width` × `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

impl Component for DepartmentsModal {
    fn handle_key_event(&mut self, key: KeyEvent, board: &BoardState) -> Result<Option<Action>> {
        let count = board.departments().len();
        self.cursor = self.cursor(board);

        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => board
                .departments()
                .get(self.cursor)
                .map(|d| Action::ToggleDepartment(d.department_name.clone())),
            KeyCode::Char('a') => Some(Action::SelectAllDepartments),
            KeyCode::Char('r') => Some(Action::ResetDepartments),
            KeyCode::Esc | KeyCode::Char('s') => Some(Action::CloseDepartments),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, board: &BoardState) {
        let departments = board.departments();
        let rows = u16::try_from(departments.len()).unwrap_or(u16::MAX);
        let modal = centered(area, 48, rows.saturating_add(5).max(7));

        frame.render_widget(Clear, modal);

        let title = if board.is_all_selected() {
            " Departments (all) "
        } else {
            " Departments "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let [list_area, hint_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        if departments.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" No departments yet", theme::key_hint())),
                list_area,
            );
        } else {
            let items: Vec<ListItem> = departments
                .iter()
                .map(|d| {
                    let mark = if board.selection().contains(&d.department_name) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    let tally = d.tally();
                    ListItem::new(Line::from(vec![
                        Span::styled(format!(" {mark} "), theme::key_hint_key()),
                        Span::styled(d.department_name.clone(), theme::text()),
                        Span::styled(
                            format!("  {}/{}", tally.present, tally.total()),
                            theme::key_hint(),
                        ),
                    ]))
                })
                .collect();

            let list = List::new(items).highlight_style(theme::table_selected());
            let mut state = ListState::default().with_selected(Some(self.cursor(board)));
            frame.render_stateful_widget(list, list_area, &mut state);
        }

        let hints = Line::from(vec![
            Span::styled(" ␣ ", theme::key_hint_key()),
            Span::styled("toggle ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("all ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("reset ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("close", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hint_area);
    }
}
