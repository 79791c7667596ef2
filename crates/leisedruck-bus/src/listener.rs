// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bus listener — persistent subscription to the print-trigger topic.
//
// Explicit connection state machine. The listener authenticates with one
// fixed identity, subscribes to one fixed topic, and logs every inbound
// message. Acting on a message (e.g. dispatching a print) is a pluggable
// hook, deliberately not wired to the dispatcher: the trigger payloads are
// still being stabilized server-side.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use leisedruck_core::error::{LeisedruckError, Result};

use crate::frame::Frame;
use crate::transport::{BusTransport, TransportConnector};

/// Lifecycle of the bus connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

/// Reconnect behavior after a dropped or failed connection.
///
/// The default is `Disabled`: a drop is logged and the listener stops, which
/// matches the deployed behavior. `Backoff` is the injectable alternative
/// with exponential delay and jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    #[default]
    Disabled,
    Backoff {
        /// Reconnect attempts after the initial connection, before giving up.
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
    },
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt number `attempt` (0-based), or `None`
    /// when no further attempt should be made.
    fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match *self {
            Self::Disabled => None,
            Self::Backoff {
                max_attempts,
                base_delay,
                max_delay,
            } => {
                if attempt >= max_attempts {
                    return None;
                }
                let base_ms = base_delay.as_millis() as u64;
                let exp_ms = base_ms.saturating_mul(1u64 << attempt.min(10));
                let jitter_ms = jitter(base_ms, attempt);
                let capped = exp_ms
                    .saturating_add(jitter_ms)
                    .min(max_delay.as_millis() as u64);
                Some(Duration::from_millis(capped))
            }
        }
    }
}

/// Deterministic jitter spread across [0, base).
fn jitter(base_ms: u64, attempt: u32) -> u64 {
    let hash = (attempt as u64).wrapping_mul(6364136223846793005);
    hash % base_ms.max(1)
}

/// Shared view of the listener state for the rest of the app.
#[derive(Debug, Clone)]
pub struct StateHandle(Arc<Mutex<ConnectionState>>);

impl StateHandle {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(ConnectionState::Disconnected)))
    }

    pub fn current(&self) -> ConnectionState {
        *self.0.lock().expect("bus state lock poisoned")
    }

    fn set(&self, state: ConnectionState) {
        *self.0.lock().expect("bus state lock poisoned") = state;
    }
}

type MessageHook = Box<dyn Fn(&str) + Send + Sync>;

/// Listens on the notification bus for the process lifetime.
pub struct BusListener<C> {
    connector: C,
    endpoint: String,
    user_code: String,
    topic: String,
    reconnect: ReconnectPolicy,
    state: StateHandle,
    on_message: MessageHook,
}

impl<C: TransportConnector> BusListener<C> {
    pub fn new(
        connector: C,
        endpoint: impl Into<String>,
        user_code: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            endpoint: endpoint.into(),
            user_code: user_code.into(),
            topic: topic.into(),
            reconnect: ReconnectPolicy::default(),
            state: StateHandle::new(),
            on_message: Box::new(|_| {}),
        }
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Install the action invoked for each inbound message body. The
    /// listener always logs the message first; the hook is the extension
    /// point for triggering prints.
    pub fn with_message_hook(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_message = Box::new(hook);
        self
    }

    /// Handle for observing the connection state from elsewhere.
    pub fn state_handle(&self) -> StateHandle {
        self.state.clone()
    }

    /// Run until the connection drops and the reconnect policy is exhausted.
    ///
    /// Failures never propagate: they are logged and reflected in the state
    /// handle, and the future resolves.
    pub async fn run(self) {
        let mut attempt: u32 = 0;
        loop {
            // session() only returns on error.
            if let Err(e) = self.session().await {
                // A session that made it to Connected restores the full
                // reconnect budget; only consecutive failed attempts count.
                if self.state.current() == ConnectionState::Connected {
                    attempt = 0;
                }
                self.state.set(ConnectionState::Failed);
                error!(endpoint = %self.endpoint, error = %e, "bus connection lost");
            }

            match self.reconnect.delay_for(attempt) {
                Some(delay) => {
                    attempt += 1;
                    warn!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting to bus");
                    tokio::time::sleep(delay).await;
                }
                None => {
                    info!("bus listener stopped");
                    return;
                }
            }
        }
    }

    /// One connect-authenticate-subscribe-receive cycle. Only returns on
    /// error; a closed connection is an error for state purposes.
    async fn session(&self) -> Result<()> {
        self.state.set(ConnectionState::Connecting);
        let mut transport = self.connector.connect(&self.endpoint).await?;

        let connect = Frame::new("CONNECT")
            .header("accept-version", "1.2")
            .header("userCode", &self.user_code);
        transport.send(&connect).await?;

        match self.next_frame(&mut transport).await? {
            frame if frame.command == "CONNECTED" => {
                debug!(session = ?frame.get_header("session"), "bus handshake complete");
            }
            frame => {
                return Err(LeisedruckError::Bus(format!(
                    "expected CONNECTED, got {}: {}",
                    frame.command, frame.body
                )));
            }
        }

        let subscribe = Frame::new("SUBSCRIBE")
            .header("id", "0")
            .header("destination", &self.topic);
        transport.send(&subscribe).await?;

        self.state.set(ConnectionState::Connected);
        info!(endpoint = %self.endpoint, topic = %self.topic, "subscribed to bus topic");

        loop {
            let frame = self.next_frame(&mut transport).await?;
            match frame.command.as_str() {
                "MESSAGE" => {
                    info!(topic = %self.topic, body = %frame.body, "bus notification");
                    (self.on_message)(&frame.body);
                }
                "ERROR" => {
                    warn!(body = %frame.body, "bus reported an error frame");
                }
                other => {
                    debug!(command = other, "ignoring bus frame");
                }
            }
        }
    }

    /// Next frame; a closed connection becomes an error.
    async fn next_frame<T: BusTransport>(&self, transport: &mut T) -> Result<Frame> {
        transport
            .receive()
            .await?
            .ok_or_else(|| LeisedruckError::Bus("connection closed".into()))
    }
}
