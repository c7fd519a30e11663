// ── Connection state machine ──
//
// Pure transition logic for the live feed. The feed task feeds it
// transport outcomes and executes whatever it decides; nothing here
// touches a socket or a timer, so every transition is unit-testable.

use std::time::Duration;

use crate::backoff::ReconnectConfig;

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Constructed, `connect()` not called yet.
    #[default]
    Idle,
    /// Handshake in flight.
    Connecting,
    /// Socket open and subscribed.
    Open,
    /// Abnormal closure; waiting `delay` before attempt number `attempt`.
    Reconnecting { attempt: u32, delay: Duration },
    /// Reconnect budget exhausted. Terminal until a new `connect()`.
    Failed,
    /// Closed cleanly by the server or disposed locally.
    Closed,
}

/// What to do after an abnormal closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Sleep `delay`, drop the stale handle, connect again.
    Reconnect { attempt: u32, delay: Duration },
    /// Stop retrying and surface a terminal error.
    GiveUp { attempts: u32 },
}

/// Tracks connection state and the consecutive reconnect attempt counter.
#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    attempts: u32,
    policy: ReconnectConfig,
}

impl ConnectionMachine {
    pub fn new(policy: ReconnectConfig) -> Self {
        Self {
            state: ConnectionState::Idle,
            attempts: 0,
            policy,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Reconnect attempts scheduled since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn on_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// A handshake completed. The attempt counter only resets here.
    pub fn on_open(&mut self) {
        self.attempts = 0;
        self.state = ConnectionState::Open;
    }

    /// The server finished a close handshake. No reconnect.
    pub fn on_clean_close(&mut self) {
        self.state = ConnectionState::Closed;
    }

    /// The connection dropped or never opened.
    pub fn on_abnormal_close(&mut self) -> CloseDecision {
        if !self.policy.allows(self.attempts) {
            self.state = ConnectionState::Failed;
            return CloseDecision::GiveUp {
                attempts: self.attempts,
            };
        }

        let delay = self.policy.delay_for(self.attempts);
        self.attempts += 1;
        self.state = ConnectionState::Reconnecting {
            attempt: self.attempts,
            delay,
        };
        CloseDecision::Reconnect {
            attempt: self.attempts,
            delay,
        }
    }

    pub fn dispose(&mut self) {
        self.attempts = 0;
        self.state = ConnectionState::Closed;
    }
}
