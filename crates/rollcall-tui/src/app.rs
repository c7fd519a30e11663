//! Application core: event loop, key routing, action dispatch.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use rollcall_core::{BoardState, ConnectionState, FeedConfig, FeedEvent, LayoutConfig, LiveFeedClient};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Cadence, Event, EventReader};
use crate::screens::board::BoardScreen;
use crate::screens::departments::DepartmentsModal;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::status_indicator::connection_span;

/// Top-level application state and event loop.
pub struct App {
    /// Everything the board shows. Mutated only in `process_action`.
    board: BoardState,
    board_screen: BoardScreen,
    departments: DepartmentsModal,
    departments_open: bool,
    connection: ConnectionState,
    running: bool,
    /// Handed to the data bridge when the loop starts.
    feed: Option<(LiveFeedClient, mpsc::UnboundedReceiver<FeedEvent>)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(feed: FeedConfig, layout: LayoutConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            board: BoardState::new(layout),
            board_screen: BoardScreen::new(),
            departments: DepartmentsModal::new(),
            departments_open: false,
            connection: ConnectionState::Idle,
            running: true,
            feed: Some(LiveFeedClient::new(feed)),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::start()?;

        let cancel = CancellationToken::new();
        if let Some((client, events)) = self.feed.take() {
            tokio::spawn(spawn_data_bridge(
                client,
                events,
                self.action_tx.clone(),
                cancel.child_token(),
            ));
        }

        let mut events = EventReader::spawn(Cadence::default());

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        drop(events);
        tui.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. The department picker captures every
    /// key except Ctrl+C while it is open.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.departments_open {
            return self.departments.handle_key_event(key, &self.board);
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousPage),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextPage),
            KeyCode::Char('s') => Some(Action::OpenDepartments),
            _ => return self.board_screen.handle_key_event(key, &self.board),
        };
        Ok(action)
    }

    /// Apply one action to the board, then let components react.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Feed(event) => self.board.apply(event.clone()),
            Action::ConnectionChanged(state) => {
                debug!(?state, "connection state changed");
                self.connection = state.clone();
            }

            Action::PreviousPage => self.board.go_to_previous_page(),
            Action::NextPage => self.board.go_to_next_page(),

            Action::OpenDepartments => self.departments_open = true,
            Action::CloseDepartments => self.departments_open = false,
            Action::ToggleDepartment(name) => self.board.toggle_department(name),
            Action::SelectAllDepartments => self.board.select_all(),
            Action::ResetDepartments => self.board.reset_selection(),

            Action::Tick | Action::Render | Action::Resize(..) => {}
        }

        if let Some(follow_up) = self.board_screen.update(action, &self.board)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [title_area, content_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_title_bar(frame, title_area);
        self.board_screen.render(frame, content_area, &self.board);
        self.render_status_bar(frame, status_area);

        if self.departments_open {
            self.departments.render(frame, content_area, &self.board);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" rollcall ", theme::title_style()),
            Span::styled("│ ", theme::key_hint()),
            connection_span(&self.connection),
            Span::styled(" │ page ", theme::key_hint()),
            Span::styled(self.board.page_label(), theme::text()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" ←/→ ", theme::key_hint_key()),
            Span::styled("page  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("departments  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use rollcall_core::{DepartmentPayload, EmployeePayload};

    use super::*;
    use pretty_assertions::assert_eq;

    fn app(columns: usize, rows: usize) -> App {
        let feed = FeedConfig::new("ws://127.0.0.1:9/ws".parse().unwrap()).unwrap();
        App::new(feed, LayoutConfig::new(columns, rows).unwrap())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        if let Some(action) = app.handle_key_event(key(code)).unwrap() {
            app.process_action(&action).unwrap();
        }
    }

    fn snapshot(departments: &[(&str, usize)]) -> Action {
        Action::Feed(FeedEvent::Snapshot(
            departments
                .iter()
                .map(|(name, size)| DepartmentPayload {
                    department_name: (*name).into(),
                    display_number: 0,
                    result: (0..*size)
                        .map(|i| EmployeePayload {
                            id: i64::try_from(i).unwrap(),
                            employee_id: format!("{name}{i}"),
                            department_id: 1,
                            department_name: None,
                            display_number: None,
                            last_name: Some(format!("{name}{i}")),
                            nick_name: None,
                            status: Some(true),
                        })
                        .collect(),
                })
                .collect(),
        ))
    }

    #[test]
    fn arrow_keys_page_through_the_board() {
        let mut app = app(1, 2);
        app.process_action(&snapshot(&[("A", 2), ("B", 2), ("C", 2)]))
            .unwrap();
        assert_eq!(app.board.page_label(), "1 / 3");

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.board.page_label(), "3 / 3");

        press(&mut app, KeyCode::Left);
        assert_eq!(app.board.page_label(), "2 / 3");
    }

    #[test]
    fn picker_captures_keys_until_closed() {
        let mut app = app(10, 20);
        app.process_action(&snapshot(&[("A", 2), ("B", 2)])).unwrap();

        press(&mut app, KeyCode::Char('s'));
        assert!(app.departments_open);

        // Space toggles the first department; q does not quit while open.
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert!(!app.board.selection().contains("A"));

        press(&mut app, KeyCode::Char('a'));
        assert!(app.board.is_all_selected());

        press(&mut app, KeyCode::Esc);
        assert!(!app.departments_open);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app(10, 20);
        app.departments_open = true;
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn title_bar_tracks_connection_and_page() {
        let mut app = app(10, 20);
        app.process_action(&Action::ConnectionChanged(ConnectionState::Open))
            .unwrap();
        app.process_action(&snapshot(&[("Sales", 3)])).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let title: String = (0..80).map(|x| buffer[(x, 0)].symbol()).collect();
        assert!(title.contains("● live"));
        assert!(title.contains("page 1 / 1"));
    }
}
