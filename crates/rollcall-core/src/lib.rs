//! Attendance board domain between `rollcall-api` and the terminal UI.
//!
//! - **[`BoardState`]** folds [`FeedEvent`]s into the current board: the
//!   latest department snapshot, the department selection, the page
//!   sequence, and the loading/error flags. [`BoardState::view`] tells the
//!   renderer what to draw.
//!
//! - **[`SelectionState`]** tracks which departments are visible.
//!
//! - **Layout** ([`layout`]) packs selected departments into fixed-size
//!   pages of columns, and builds the padded header/body grid for a page.
//!
//! - **Domain model** ([`model`]) holds the employee and department types the
//!   board works with, converted from wire payloads in [`convert`].

pub mod board;
pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod selection;

// ── Primary re-exports ──────────────────────────────────────────────
pub use board::{BoardState, BoardView};
pub use error::{CoreError, FeedIssue};
pub use layout::{
    BodyCell, HeaderCell, LayoutConfig, Page, PageColumn, PageGrid, format_name, paginate,
};
pub use model::{AttendanceTally, DepartmentSnapshot, EmployeeRecord, Presence};
pub use selection::SelectionState;

// Feed client types, so UI consumers only depend on this crate.
pub use rollcall_api::{
    ConnectionState, DEFAULT_KEEPALIVE, DepartmentPayload, EmployeePayload, FeedConfig, FeedEvent,
    LiveFeedClient, ReconnectConfig,
};
