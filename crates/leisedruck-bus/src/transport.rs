// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport seam between the listener and the actual WebSocket client.
//
// The bridge app supplies an implementation that forwards encoded frames as
// WebSocket text messages; tests script one. Builds without a transport get
// the unavailable connector, which fails at connect time and is only logged.

use tracing::warn;

use leisedruck_core::error::{LeisedruckError, Result};

use crate::frame::Frame;

/// One live bus connection.
pub trait BusTransport {
    /// Send a frame. Errors indicate a dropped connection.
    fn send(&mut self, frame: &Frame) -> impl Future<Output = Result<()>> + Send;

    /// Receive the next frame. `None` means the peer closed the connection.
    /// Heartbeats are filtered out by the implementation or via
    /// [`Frame::parse`] returning `None` frames the caller skips.
    fn receive(&mut self) -> impl Future<Output = Result<Option<Frame>>> + Send;
}

/// Opens bus connections.
pub trait TransportConnector {
    type Transport: BusTransport + Send;

    fn connect(&self, endpoint: &str) -> impl Future<Output = Result<Self::Transport>> + Send;
}

/// Connector for builds with no WebSocket client wired in. Connecting fails;
/// the listener logs it and the process carries on without bus notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableConnector;

impl TransportConnector for UnavailableConnector {
    type Transport = UnavailableTransport;

    async fn connect(&self, endpoint: &str) -> Result<Self::Transport> {
        warn!(endpoint, "no bus transport configured on this build");
        Err(LeisedruckError::Bus("no transport configured".into()))
    }
}

/// Never constructed; exists to satisfy the associated type.
#[derive(Debug)]
pub struct UnavailableTransport;

impl BusTransport for UnavailableTransport {
    async fn send(&mut self, _frame: &Frame) -> Result<()> {
        Err(LeisedruckError::Bus("no transport configured".into()))
    }

    async fn receive(&mut self) -> Result<Option<Frame>> {
        Err(LeisedruckError::Bus("no transport configured".into()))
    }
}
