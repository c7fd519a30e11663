//! All possible UI actions. Actions are the sole mechanism for state mutation.

use rollcall_core::{ConnectionState, FeedEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Feed (from the data bridge) ───────────────────────────────
    Feed(FeedEvent),
    ConnectionChanged(ConnectionState),

    // ── Pages ─────────────────────────────────────────────────────
    PreviousPage,
    NextPage,

    // ── Department selection ──────────────────────────────────────
    OpenDepartments,
    CloseDepartments,
    ToggleDepartment(String),
    SelectAllDepartments,
    ResetDepartments,
}
