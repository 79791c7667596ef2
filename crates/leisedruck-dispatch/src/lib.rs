// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leisedruck Dispatch — builds minimal markup for QR/barcode labels, loads it
// into a hidden rendering surface, and issues silent print commands. The
// window host itself is an external collaborator; this crate owns the
// dispatch workflow and the surface-lifetime contract.

pub mod dispatcher;
pub mod document;
pub mod params;
pub mod surface;

pub use dispatcher::{DispatchReport, PrintDispatcher};
pub use document::PrintDocument;
pub use params::PageSizeHolder;
pub use surface::{MarginType, PrintOptions, RenderSurface, StubSurfaceHost, SurfaceHost};
