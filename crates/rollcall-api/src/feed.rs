//! Live attendance feed with auto-reconnect.
//!
//! [`LiveFeedClient`] owns a single WebSocket subscription to the dashboard
//! feed. It subscribes on every successful open, sends a keepalive ping
//! every 30 seconds, and reconnects after abnormal closures with bounded
//! exponential backoff. Everything it observes is delivered in order as a
//! [`FeedEvent`] through an unbounded channel; nothing is ever thrown.
//!
//! # Example
//!
//! ```rust,ignore
//! use rollcall_api::{FeedConfig, FeedEvent, LiveFeedClient};
//! use url::Url;
//!
//! let config = FeedConfig::new(Url::parse("wss://hr.example.com/ws/dashboard")?)?;
//! let (mut client, mut events) = LiveFeedClient::new(config);
//! client.connect();
//!
//! while let Some(event) = events.recv().await {
//!     if let FeedEvent::Snapshot(departments) = event {
//!         println!("{} departments", departments.len());
//!     }
//! }
//!
//! client.dispose();
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder, Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::backoff::ReconnectConfig;
use crate::error::Error;
use crate::state::{CloseDecision, ConnectionMachine, ConnectionState};
use crate::wire::{DepartmentPayload, Inbound, Outbound, parse_inbound};

/// Period between keepalive pings while the socket is open.
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(30);

/// How long a local close frame may take to flush on dispose.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

const MIN_KEEPALIVE: Duration = Duration::from_millis(10);

// ── FeedConfig ───────────────────────────────────────────────────────

/// Endpoint and timing configuration for a [`LiveFeedClient`].
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// WebSocket endpoint (`ws://` or `wss://`).
    pub url: Url,

    /// Bearer token sent on the upgrade request, if any.
    pub token: Option<SecretString>,

    /// Keepalive ping period. Default: 30s.
    pub keepalive: Duration,

    /// Backoff schedule for abnormal closures.
    pub reconnect: ReconnectConfig,
}

impl FeedConfig {
    /// Build a config with default timings. `http(s)` endpoints are
    /// rewritten to `ws(s)`.
    pub fn new(url: Url) -> Result<Self, Error> {
        Ok(Self {
            url: websocket_url(url)?,
            token: None,
            keepalive: DEFAULT_KEEPALIVE,
            reconnect: ReconnectConfig::default(),
        })
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }
}

/// Normalize an endpoint to a WebSocket scheme.
pub fn websocket_url(mut url: Url) -> Result<Url, Error> {
    let scheme = match url.scheme() {
        "ws" | "wss" => return Ok(url),
        "http" => "ws",
        "https" => "wss",
        other => return Err(Error::UnsupportedScheme(other.to_owned())),
    };
    let original = url.scheme().to_owned();
    url.set_scheme(scheme)
        .map_err(|()| Error::UnsupportedScheme(original))?;
    Ok(url)
}

// ── FeedEvent ────────────────────────────────────────────────────────

/// Everything the feed reports to its owner, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Handshake completed; the subscribe frame is being sent.
    Opened,
    /// A complete, non-empty snapshot replacing all prior data.
    Snapshot(Vec<DepartmentPayload>),
    /// A frame arrived whose `data` was empty or missing.
    NoData,
    /// A frame could not be decoded.
    ProcessingError(String),
    /// The transport failed (connect, read, or write).
    TransportError(String),
    /// The socket closed. `clean` means a close handshake was received.
    Closed { clean: bool },
    /// A reconnect attempt is scheduled after `delay`.
    Reconnecting { attempt: u32, delay: Duration },
    /// The reconnect budget is exhausted. No further attempts are made.
    Failed { attempts: u32 },
}

// ── Event sink ───────────────────────────────────────────────────────

/// Sender shared between the client and its task. Closing it on dispose
/// guarantees nothing is delivered afterwards.
#[derive(Clone)]
struct EventSink {
    tx: Arc<Mutex<Option<mpsc::UnboundedSender<FeedEvent>>>>,
}

impl EventSink {
    fn new(tx: mpsc::UnboundedSender<FeedEvent>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    fn emit(&self, event: FeedEvent) {
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = guard.as_ref() {
            // Receiver gone just means nobody is listening any more.
            let _ = tx.send(event);
        }
    }

    fn close(&self) {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

// ── LiveFeedClient ───────────────────────────────────────────────────

/// Owned handle to the live attendance feed.
///
/// Construct with [`new`](Self::new), start with [`connect`](Self::connect),
/// stop with [`dispose`](Self::dispose) (also run on drop). A disposed
/// client never delivers another event and cannot be restarted.
pub struct LiveFeedClient {
    config: FeedConfig,
    sink: EventSink,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl LiveFeedClient {
    /// Create an idle client and the receiver its events are delivered on.
    pub fn new(config: FeedConfig) -> (Self, mpsc::UnboundedReceiver<FeedEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(ConnectionState::Idle);

        let client = Self {
            config,
            sink: EventSink::new(event_tx),
            state_tx: Arc::new(state_tx),
            cancel: CancellationToken::new(),
            task: None,
        };
        (client, event_rx)
    }

    /// Open the feed in a background task.
    ///
    /// No-op while a connection task is already running, and on a disposed
    /// client. Must be called from within a tokio runtime.
    pub fn connect(&mut self) {
        if self.cancel.is_cancelled() {
            debug!("connect() on disposed feed client ignored");
            return;
        }
        if self.is_running() {
            trace!("Feed already connected or connecting");
            return;
        }

        let task = FeedTask {
            config: self.config.clone(),
            sink: self.sink.clone(),
            state_tx: Arc::clone(&self.state_tx),
            cancel: self.cancel.child_token(),
            machine: ConnectionMachine::new(self.config.reconnect.clone()),
        };
        self.task = Some(tokio::spawn(task.run()));
    }

    /// Whether the background task is alive (connecting, open, or waiting
    /// to reconnect).
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Watch the connection state machine.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Tear down: cancel the reconnect and keepalive timers, close the
    /// socket, and stop event delivery. Idempotent.
    pub fn dispose(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        self.sink.close();
        self.state_tx.send_replace(ConnectionState::Closed);
        // The task sees the token, sends a close frame, and exits.
        self.task = None;
        debug!("Feed client disposed");
    }
}

impl Drop for LiveFeedClient {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ── Background connection task ───────────────────────────────────────

enum SessionEnd {
    /// Close handshake received from the server.
    Clean,
    /// Dropped, failed to open, or errored.
    Abnormal,
    /// Disposed locally.
    Cancelled,
}

struct FeedTask {
    config: FeedConfig,
    sink: EventSink,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    cancel: CancellationToken,
    machine: ConnectionMachine,
}

impl FeedTask {
    /// Main loop: connect → read → on abnormal close, backoff → reconnect.
    async fn run(mut self) {
        loop {
            self.machine.on_connecting();
            self.publish();

            match self.session().await {
                SessionEnd::Cancelled => {
                    self.shut_down();
                    break;
                }
                SessionEnd::Clean => {
                    self.machine.on_clean_close();
                    self.publish();
                    self.sink.emit(FeedEvent::Closed { clean: true });
                    break;
                }
                SessionEnd::Abnormal => {
                    self.sink.emit(FeedEvent::Closed { clean: false });

                    match self.machine.on_abnormal_close() {
                        CloseDecision::Reconnect { attempt, delay } => {
                            self.publish();
                            info!(
                                attempt,
                                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                                "Waiting before reconnect"
                            );
                            self.sink.emit(FeedEvent::Reconnecting { attempt, delay });

                            tokio::select! {
                                biased;
                                () = self.cancel.cancelled() => {
                                    self.shut_down();
                                    break;
                                }
                                () = tokio::time::sleep(delay) => {}
                            }
                        }
                        CloseDecision::GiveUp { attempts } => {
                            self.publish();
                            error!(attempts, "Feed reconnection limit reached, giving up");
                            self.sink.emit(FeedEvent::Failed { attempts });
                            break;
                        }
                    }
                }
            }
        }

        debug!("Feed task exiting");
    }

    /// Local teardown. Any pending reconnect budget is forgotten.
    fn shut_down(&mut self) {
        debug!(pending_attempts = self.machine.attempts(), "Feed disposed");
        self.machine.dispose();
    }

    /// Publish the machine's state unless the client was disposed.
    fn publish(&self) {
        if !self.cancel.is_cancelled() {
            self.state_tx.send_replace(self.machine.state().clone());
        }
    }

    fn transport_error(&self, err: &Error) {
        warn!(error = %err, "Feed transport error");
        self.sink.emit(FeedEvent::TransportError(err.to_string()));
    }

    /// One connection lifecycle: handshake, subscribe, read until it drops.
    async fn session(&mut self) -> SessionEnd {
        let request = match build_request(&self.config) {
            Ok(r) => r,
            Err(e) => {
                self.transport_error(&e);
                return SessionEnd::Abnormal;
            }
        };

        info!(url = %self.config.url, "Connecting to attendance feed");

        let cancel = self.cancel.clone();
        let connected = tokio::select! {
            biased;
            () = cancel.cancelled() => return SessionEnd::Cancelled,
            result = tokio_tungstenite::connect_async(request) => result,
        };
        let ws_stream = match connected {
            Ok((ws, _response)) => ws,
            Err(e) => {
                self.transport_error(&Error::WebSocketConnect(e.to_string()));
                return SessionEnd::Abnormal;
            }
        };

        self.machine.on_open();
        self.publish();
        self.sink.emit(FeedEvent::Opened);
        info!("Attendance feed connected");

        let (mut write, mut read) = ws_stream.split();

        let subscribe = Message::text(Outbound::subscribe_dashboard().to_json());
        if let Err(e) = write.send(subscribe).await {
            self.transport_error(&Error::WebSocketSend(e.to_string()));
            return SessionEnd::Abnormal;
        }

        let period = self.config.keepalive.max(MIN_KEEPALIVE);
        let mut keepalive = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    let _ = tokio::time::timeout(CLOSE_TIMEOUT, write.send(Message::Close(None))).await;
                    return SessionEnd::Cancelled;
                }
                _ = keepalive.tick() => {
                    trace!("Sending keepalive ping");
                    let ping = Message::text(Outbound::ping_now().to_json());
                    if let Err(e) = write.send(ping).await {
                        self.transport_error(&Error::WebSocketSend(e.to_string()));
                        return SessionEnd::Abnormal;
                    }
                }
                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => dispatch_text(&text, &self.sink),
                        Some(Ok(Message::Close(frame))) => {
                            if let Some(ref cf) = frame {
                                info!(
                                    code = %cf.code,
                                    reason = %cf.reason,
                                    "Feed close frame received"
                                );
                            } else {
                                info!("Feed close frame received (no payload)");
                            }
                            return SessionEnd::Clean;
                        }
                        Some(Err(e)) => {
                            self.transport_error(&Error::WebSocketConnect(e.to_string()));
                            return SessionEnd::Abnormal;
                        }
                        None => {
                            info!("Feed stream ended without a close frame");
                            return SessionEnd::Abnormal;
                        }
                        Some(Ok(_)) => {
                            // Binary, Ping, Pong, Frame -- tungstenite answers pings itself
                        }
                    }
                }
            }
        }
    }
}

/// Build the upgrade request, injecting the bearer token when configured.
fn build_request(config: &FeedConfig) -> Result<ClientRequestBuilder, Error> {
    let uri: tungstenite::http::Uri = config
        .url
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::WebSocketConnect(e.to_string()))?;

    let mut request = ClientRequestBuilder::new(uri);
    if let Some(ref token) = config.token {
        request = request.with_header("Authorization", format!("Bearer {}", token.expose_secret()));
    }
    Ok(request)
}

// ── Message dispatch ─────────────────────────────────────────────────

/// Decode a text frame and forward what it means.
fn dispatch_text(text: &str, sink: &EventSink) {
    match parse_inbound(text) {
        Ok(Inbound::Pong) => trace!("Keepalive pong received"),
        Ok(Inbound::Snapshot(departments)) => {
            debug!(departments = departments.len(), "Snapshot received");
            sink.emit(FeedEvent::Snapshot(departments));
        }
        Ok(Inbound::Empty) => {
            debug!("Snapshot carried no departments");
            sink.emit(FeedEvent::NoData);
        }
        Err(e) => {
            warn!(error = %e, "Failed to decode feed message");
            sink.emit(FeedEvent::ProcessingError(e.to_string()));
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
