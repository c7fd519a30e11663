// ── Board state ──
//
// Owns everything the attendance board shows: the latest snapshot, the
// department selection, the derived page sequence, the 1-based page
// cursor, and the loading/error flags driven by feed events. The
// renderer reads it through `view()` and never has to handle errors.

use std::sync::Arc;

use rollcall_api::FeedEvent;
use tracing::debug;

use crate::convert::departments_from_payload;
use crate::error::FeedIssue;
use crate::layout::{LayoutConfig, Page, PageGrid, paginate};
use crate::model::DepartmentSnapshot;
use crate::selection::SelectionState;

/// What the renderer should draw right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardView {
    /// No snapshot yet and nothing has gone wrong.
    Loading,
    /// No snapshot has ever arrived and the feed reported a problem.
    Error(FeedIssue),
    /// Data arrived but nothing is selected (or every selected roster is empty).
    Empty,
    /// One page of the board.
    Page {
        number: usize,
        count: usize,
        grid: PageGrid,
    },
}

#[derive(Debug, Clone)]
pub struct BoardState {
    layout: LayoutConfig,
    departments: Arc<Vec<DepartmentSnapshot>>,
    has_data: bool,
    selection: SelectionState,
    pages: Vec<Page>,
    current_page: usize,
    loading: bool,
    error: Option<FeedIssue>,
}

impl BoardState {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            departments: Arc::new(Vec::new()),
            has_data: false,
            selection: SelectionState::new(),
            pages: Vec::new(),
            current_page: 1,
            loading: true,
            error: None,
        }
    }

    // ── Feed events ──────────────────────────────────────────────────

    /// Fold one feed event into the board.
    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Opened => {
                self.error = None;
                self.loading = true;
            }
            FeedEvent::Snapshot(payload) => {
                self.replace_snapshot(departments_from_payload(payload));
            }
            FeedEvent::NoData => {
                self.error = Some(FeedIssue::NoData);
                self.loading = false;
            }
            FeedEvent::ProcessingError(_) => {
                self.error = Some(FeedIssue::Processing);
            }
            FeedEvent::TransportError(_) => {
                self.error = Some(FeedIssue::Connection);
                self.loading = false;
            }
            FeedEvent::Failed { .. } => {
                self.error = Some(FeedIssue::ReconnectExhausted);
                self.loading = false;
            }
            FeedEvent::Closed { .. } | FeedEvent::Reconnecting { .. } => {}
        }
    }

    /// Replace every department wholesale.
    ///
    /// An empty selection is initialized to all departments; a non-empty
    /// one is kept even if it no longer matches the department list.
    pub fn replace_snapshot(&mut self, departments: Vec<DepartmentSnapshot>) {
        debug!(departments = departments.len(), "Applying attendance snapshot");
        self.departments = Arc::new(departments);
        self.has_data = true;
        self.loading = false;
        self.error = None;
        self.selection.initialize_if_empty(&self.departments);
        self.relayout();
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.departments);
        self.relayout();
    }

    pub fn reset_selection(&mut self) {
        self.selection.reset(&self.departments);
        self.relayout();
    }

    pub fn toggle_department(&mut self, name: &str) {
        self.selection.toggle(name);
        self.relayout();
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.departments)
    }

    /// Recompute pages and go back to page 1.
    fn relayout(&mut self) {
        self.pages = paginate(self.selection.filter(&self.departments), &self.layout);
        self.current_page = 1;
    }

    // ── Pagination ───────────────────────────────────────────────────

    pub fn go_to_previous_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn go_to_next_page(&mut self) {
        if self.current_page < self.page_count() {
            self.current_page += 1;
        }
    }

    /// 1-based index of the page on screen.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// `"current / count"`, or `"0 / 0"` with nothing to show.
    pub fn page_label(&self) -> String {
        if self.pages.is_empty() {
            "0 / 0".to_owned()
        } else {
            format!("{} / {}", self.current_page, self.pages.len())
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn departments(&self) -> &Arc<Vec<DepartmentSnapshot>> {
        &self.departments
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn error(&self) -> Option<FeedIssue> {
        self.error
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether at least one snapshot has ever arrived.
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    // ── View ─────────────────────────────────────────────────────────

    /// Decide what to draw. Errors after the first snapshot never replace
    /// the board; the renderer shows them as a banner instead.
    pub fn view(&self) -> BoardView {
        if !self.has_data {
            return match self.error {
                Some(issue) => BoardView::Error(issue),
                None => BoardView::Loading,
            };
        }

        let count = self.pages.len();
        let Some(page) = self.current_page.checked_sub(1).and_then(|i| self.pages.get(i)) else {
            return BoardView::Empty;
        };

        BoardView::Page {
            number: self.current_page,
            count,
            grid: page.grid(self.current_page == count, &self.layout),
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EmployeeRecord;
    use pretty_assertions::assert_eq;

    fn department(name: &str, size: usize) -> DepartmentSnapshot {
        DepartmentSnapshot {
            department_name: name.to_owned(),
            display_order: 0,
            employees: (0..size)
                .map(|i| EmployeeRecord {
                    id: i64::try_from(i).unwrap(),
                    employee_code: format!("{name}-{i}"),
                    department_id: 1,
                    last_name: Some("Abe".into()),
                    nick_name: None,
                    present: None,
                })
                .collect(),
        }
    }

    fn board(columns: usize, rows: usize) -> BoardState {
        BoardState::new(LayoutConfig::new(columns, rows).unwrap())
    }

    #[test]
    fn starts_loading() {
        let board = BoardState::default();
        assert_eq!(board.view(), BoardView::Loading);
        assert!(board.is_loading());
        assert_eq!(board.page_label(), "0 / 0");
    }

    #[test]
    fn first_snapshot_selects_everything() {
        let mut board = board(10, 20);
        board.replace_snapshot(vec![department("A", 3), department("B", 3)]);
        assert!(board.is_all_selected());
        assert_eq!(board.page_count(), 1);
        assert!(!board.is_loading());
    }

    #[test]
    fn later_snapshots_keep_a_narrowed_selection() {
        let mut board = board(10, 20);
        board.replace_snapshot(vec![department("A", 3), department("B", 3)]);
        board.toggle_department("A");

        board.replace_snapshot(vec![
            department("A", 3),
            department("B", 3),
            department("C", 3),
        ]);
        assert_eq!(board.selection().len(), 1);
        assert!(board.selection().contains("B"));
        assert_eq!(board.pages()[0].columns.len(), 1);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut board = board(1, 5);
        board.replace_snapshot(vec![
            department("A", 5),
            department("B", 5),
            department("C", 5),
        ]);
        assert_eq!(board.page_count(), 3);

        board.go_to_previous_page();
        assert_eq!(board.current_page(), 1);

        board.go_to_next_page();
        board.go_to_next_page();
        assert_eq!(board.page_label(), "3 / 3");
        board.go_to_next_page();
        assert_eq!(board.current_page(), 3);
    }

    #[test]
    fn selection_changes_return_to_first_page() {
        let mut board = board(1, 5);
        board.replace_snapshot(vec![department("A", 5), department("B", 5)]);
        board.go_to_next_page();
        assert_eq!(board.current_page(), 2);

        board.toggle_department("A");
        assert_eq!(board.current_page(), 1);

        board.go_to_next_page();
        board.reset_selection();
        assert_eq!(board.current_page(), 1);
    }

    #[test]
    fn new_snapshot_returns_to_first_page() {
        let mut board = board(1, 5);
        board.replace_snapshot(vec![department("A", 5), department("B", 5)]);
        board.go_to_next_page();
        board.replace_snapshot(vec![department("A", 5), department("B", 5)]);
        assert_eq!(board.current_page(), 1);
    }

    #[test]
    fn deselecting_everything_shows_empty_state() {
        let mut board = board(10, 20);
        board.replace_snapshot(vec![department("A", 3)]);
        board.select_all();
        assert!(board.selection().is_empty());
        assert_eq!(board.view(), BoardView::Empty);
        assert_eq!(board.page_label(), "0 / 0");

        // Navigation on zero pages is a no-op.
        board.go_to_next_page();
        board.go_to_previous_page();
        assert_eq!(board.current_page(), 1);
    }

    #[test]
    fn error_before_data_replaces_the_board() {
        let mut board = BoardState::default();
        board.apply(FeedEvent::TransportError("refused".into()));
        assert_eq!(board.view(), BoardView::Error(FeedIssue::Connection));
        assert!(!board.is_loading());
    }

    #[test]
    fn error_after_data_keeps_the_last_good_board() {
        let mut board = board(10, 20);
        board.replace_snapshot(vec![department("A", 3)]);
        board.apply(FeedEvent::NoData);

        assert_eq!(board.error(), Some(FeedIssue::NoData));
        assert!(matches!(board.view(), BoardView::Page { number: 1, count: 1, .. }));
        assert_eq!(board.departments().len(), 1);
    }

    #[test]
    fn processing_error_leaves_data_untouched() {
        let mut board = board(10, 20);
        board.replace_snapshot(vec![department("A", 3)]);
        board.apply(FeedEvent::ProcessingError("bad json".into()));
        assert_eq!(board.error(), Some(FeedIssue::Processing));
        assert_eq!(board.page_count(), 1);
    }

    #[test]
    fn open_clears_error_and_snapshot_clears_loading() {
        let mut board = BoardState::default();
        board.apply(FeedEvent::TransportError("x".into()));
        board.apply(FeedEvent::Opened);
        assert_eq!(board.error(), None);
        assert!(board.is_loading());
        assert_eq!(board.view(), BoardView::Loading);
    }

    #[test]
    fn exhausted_reconnects_are_reported() {
        let mut board = BoardState::default();
        board.apply(FeedEvent::Failed { attempts: 5 });
        assert_eq!(
            board.view(),
            BoardView::Error(FeedIssue::ReconnectExhausted)
        );
    }

    #[test]
    fn only_last_page_view_is_padded() {
        let mut board = board(3, 2);
        board.replace_snapshot(vec![department("A", 6), department("B", 1)]);
        // A needs 3 columns (full page), B starts page 2.
        let BoardView::Page { grid, .. } = board.view() else {
            panic!("expected page");
        };
        assert_eq!(grid.width(), 3);

        board.go_to_next_page();
        let BoardView::Page { grid, number, count } = board.view() else {
            panic!("expected page");
        };
        assert_eq!((number, count), (2, 2));
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows.len(), 2);
    }
}
