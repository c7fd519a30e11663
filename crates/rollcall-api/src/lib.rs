// rollcall-api: live attendance feed client (wire format + WebSocket transport)

pub mod backoff;
pub mod error;
pub mod feed;
pub mod state;
pub mod wire;

pub use backoff::ReconnectConfig;
pub use error::Error;
pub use feed::{DEFAULT_KEEPALIVE, FeedConfig, FeedEvent, LiveFeedClient};
pub use state::{CloseDecision, ConnectionMachine, ConnectionState};
pub use wire::{DepartmentPayload, EmployeePayload, Inbound, Outbound};
