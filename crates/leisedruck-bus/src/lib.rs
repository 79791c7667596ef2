// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leisedruck Bus — listens on a STOMP notification bus for print triggers.
// The WebSocket client itself is an external collaborator; this crate owns
// the frame codec, the connection state machine, and the subscription logic,
// all written against the `BusTransport` seam.

pub mod frame;
pub mod listener;
pub mod transport;

pub use frame::Frame;
pub use listener::{BusListener, ConnectionState, ReconnectPolicy, StateHandle};
pub use transport::{BusTransport, TransportConnector, UnavailableConnector};
