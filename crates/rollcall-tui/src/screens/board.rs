//! Attendance board: one page of department columns at a time.

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};
use throbber_widgets_tui::{Throbber, ThrobberState};

use rollcall_core::layout::PLACEHOLDER;
use rollcall_core::{BoardState, BoardView, BodyCell, FeedIssue, HeaderCell, PageGrid};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator::{presence_char, presence_style};

pub struct BoardScreen {
    throbber_state: ThrobberState,
}

impl BoardScreen {
    pub fn new() -> Self {
        Self {
            throbber_state: ThrobberState::default(),
        }
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let [_, middle, _] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        let throbber = Throbber::default()
            .label("  Waiting for attendance data...")
            .style(theme::text())
            .throbber_style(ratatui::style::Style::default().fg(theme::FOCUS));

        frame.render_stateful_widget(throbber, middle, &mut self.throbber_state.clone());
    }

    fn render_message(frame: &mut Frame, area: Rect, line: Line<'static>) {
        let [_, middle, _] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), middle);
    }

    fn render_grid(frame: &mut Frame, area: Rect, grid: &PageGrid) {
        let width = grid.width().max(1);
        let widths = vec![Constraint::Fill(1); width];

        let header = Row::new(grid.header.iter().map(header_cell)).style(theme::table_header());
        let rows = grid
            .rows
            .iter()
            .map(|row| Row::new(row.iter().map(body_cell)));

        let table = Table::new(rows, widths).header(header).column_spacing(1);
        frame.render_widget(table, area);
    }
}

impl Default for BoardScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn header_cell(cell: &HeaderCell) -> Cell<'static> {
    match cell {
        HeaderCell::Department { name, tally } => Cell::from(Line::from(vec![
            Span::raw(name.clone()),
            Span::styled(
                format!(" {}/{}", tally.present, tally.total()),
                theme::key_hint(),
            ),
        ])),
        HeaderCell::Placeholder => Cell::from(Span::styled(PLACEHOLDER, theme::placeholder())),
    }
}

fn body_cell(cell: &BodyCell) -> Cell<'static> {
    match cell {
        BodyCell::Employee { name, presence } => Cell::from(Line::from(vec![
            Span::styled(presence_char(*presence), presence_style(*presence)),
            Span::raw(" "),
            Span::styled(name.clone(), theme::text()),
        ])),
        BodyCell::Placeholder => Cell::from(Span::styled(PLACEHOLDER, theme::placeholder())),
    }
}

/// Hint appended to issues the feed will not recover from on its own.
const RESTART_HINT: &str = "restart rollcall to reconnect";

fn issue_text(issue: FeedIssue) -> String {
    if issue.is_terminal() {
        format!("{issue} · {RESTART_HINT}")
    } else {
        issue.to_string()
    }
}

fn issue_line(issue: FeedIssue) -> Line<'static> {
    Line::from(Span::styled(issue_text(issue), theme::error_text()))
}

impl Component for BoardScreen {
    fn update(&mut self, action: &Action, board: &BoardState) -> Result<Option<Action>> {
        if matches!(action, Action::Tick) && board.is_loading() && !board.has_data() {
            self.throbber_state.calc_next();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, board: &BoardState) {
        let block = Block::default()
            .title(" Attendance ")
            .title_style(theme::title_style())
            .title_bottom(Line::from(format!(" {} ", board.page_label())).right_aligned())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Problems after the first snapshot never hide the last good board.
        let body = match board.error().filter(|_| board.has_data()) {
            Some(issue) => {
                let [banner, body] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
                frame.render_widget(
                    Paragraph::new(format!(" ⚠ {}", issue_text(issue))).style(theme::banner()),
                    banner,
                );
                body
            }
            None => inner,
        };

        match board.view() {
            BoardView::Loading => self.render_loading(frame, body),
            BoardView::Error(issue) => Self::render_message(frame, body, issue_line(issue)),
            BoardView::Empty => Self::render_message(
                frame,
                body,
                Line::from(Span::styled(
                    "No departments to show. Press s to choose departments.",
                    theme::key_hint(),
                )),
            ),
            BoardView::Page { grid, .. } => Self::render_grid(frame, body, &grid),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use rollcall_core::{DepartmentSnapshot, EmployeeRecord, FeedEvent, LayoutConfig};

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(board: &BoardState) -> String {
        let screen = BoardScreen::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                screen.render(frame, area, board);
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn department(name: &str, present: &[Option<bool>]) -> DepartmentSnapshot {
        DepartmentSnapshot {
            department_name: name.into(),
            display_order: 0,
            employees: present
                .iter()
                .enumerate()
                .map(|(i, p)| EmployeeRecord {
                    id: i64::try_from(i).unwrap(),
                    employee_code: format!("{name}{i}"),
                    department_id: 1,
                    last_name: Some(format!("{name}{i}")),
                    nick_name: None,
                    present: *p,
                })
                .collect(),
        }
    }

    fn board() -> BoardState {
        BoardState::new(LayoutConfig::new(3, 4).unwrap())
    }

    #[test]
    fn shows_throbber_before_first_snapshot() {
        let text = draw(&board());
        assert!(text.contains("Waiting for attendance data"));
        assert!(text.contains("0 / 0"));
    }

    #[test]
    fn shows_error_in_place_of_board_without_data() {
        let mut board = board();
        board.apply(FeedEvent::Failed { attempts: 5 });
        let text = draw(&board);
        assert!(text.contains("maximum reconnect attempts exceeded"));
    }

    #[test]
    fn renders_page_with_tallies_glyphs_and_placeholders() {
        let mut board = board();
        board.replace_snapshot(vec![department("Ops", &[Some(true), Some(false), None])]);
        let text = draw(&board);

        assert!(text.contains("Ops 1/3"));
        assert!(text.contains("● Ops0"));
        assert!(text.contains("○ Ops1"));
        assert!(text.contains("- Ops2"));
        assert!(text.contains("1 / 1"));
        // Two padding columns on the last page.
        let header = text.lines().nth(1).unwrap();
        assert_eq!(header.matches(" - ").count(), 2);
    }

    #[test]
    fn keeps_board_and_shows_banner_after_data() {
        let mut board = board();
        board.replace_snapshot(vec![department("Ops", &[Some(true)])]);
        board.apply(FeedEvent::TransportError("reset".into()));
        let text = draw(&board);

        assert!(text.contains("connection error"));
        assert!(text.contains("● Ops0"));
    }

    #[test]
    fn exhausted_reconnects_ask_for_a_restart() {
        let mut board = board();
        board.replace_snapshot(vec![department("Ops", &[Some(true)])]);
        board.apply(FeedEvent::Failed { attempts: 5 });
        let text = draw(&board);
        assert!(text.contains("maximum reconnect attempts exceeded · restart rollcall to reconnect"));
        assert!(text.contains("● Ops0"));

        let mut board = self::board();
        board.replace_snapshot(vec![department("Ops", &[Some(true)])]);
        board.apply(FeedEvent::TransportError("reset".into()));
        assert!(!draw(&board).contains(RESTART_HINT));
    }

    #[test]
    fn empty_selection_has_a_hint() {
        let mut board = board();
        board.replace_snapshot(vec![department("Ops", &[Some(true)])]);
        board.select_all();
        let text = draw(&board);
        assert!(text.contains("No departments to show"));
    }
}
