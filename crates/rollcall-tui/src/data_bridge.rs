//! Data bridge: connects the [`LiveFeedClient`] to TUI actions.
//!
//! Runs as a background task that owns the client. Every feed event and
//! connection-state transition is forwarded as an [`Action`] through the
//! TUI's action channel. Cancellation disposes the client, which closes
//! the socket and stops both feed timers.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use rollcall_core::{FeedEvent, LiveFeedClient};

use crate::action::Action;

/// Connect `client` and forward its output until cancelled or until the
/// feed's event channel ends.
pub async fn spawn_data_bridge(
    mut client: LiveFeedClient,
    mut events: mpsc::UnboundedReceiver<FeedEvent>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut conn_state = client.connection_state();
    client.connect();
    info!("data bridge started");

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            event = events.recv() => {
                let Some(event) = event else { break };
                trace!(?event, "Dispatching feed event");
                if action_tx.send(Action::Feed(event)).is_err() {
                    break;
                }
            }

            Ok(()) = conn_state.changed() => {
                let state = conn_state.borrow_and_update().clone();
                if action_tx.send(Action::ConnectionChanged(state)).is_err() {
                    break;
                }
            }
        }
    }

    client.dispose();
    debug!("data bridge shut down");
}
