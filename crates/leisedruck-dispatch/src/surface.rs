// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Off-screen rendering surface abstraction.
//
// A surface is created per dispatch, never shown to the user, and must be
// released exactly once whether the print succeeded or failed. The host that
// actually renders (a hidden browser window) implements these traits; builds
// without one get the stub host.

use serde::{Deserialize, Serialize};
use tracing::warn;

use leisedruck_core::error::{LeisedruckError, Result};
use leisedruck_core::types::PageSize;

use crate::document::PrintDocument;

/// Page margin handling for a silent print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginType {
    /// No margins; the label fills the page.
    None,
    /// Host default margins.
    Default,
}

/// Options handed to the host print call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Target device name, already resolved.
    pub device_name: String,
    /// Bypass any user-facing print dialog. Always true for label dispatch.
    pub silent: bool,
    /// Whether page backgrounds are included in the output.
    pub print_background: bool,
    /// Page geometry snapshot for this dispatch.
    pub page_size: PageSize,
    pub margins: MarginType,
}

/// One hidden rendering surface.
///
/// `release` must be idempotent on the implementation side but callers are
/// required to invoke it exactly once.
pub trait RenderSurface {
    /// Load the document into the surface and wait for it to finish.
    fn load(&mut self, document: &PrintDocument) -> impl Future<Output = Result<()>> + Send;

    /// Issue the print command and wait for the host completion callback.
    fn print(&mut self, options: &PrintOptions) -> impl Future<Output = Result<()>> + Send;

    /// Destroy the surface, freeing the hidden window.
    fn release(&mut self);
}

/// Creates hidden rendering surfaces.
pub trait SurfaceHost {
    type Surface: RenderSurface + Send;

    fn create_surface(&self) -> Result<Self::Surface>;
}

/// Host used on builds without a rendering backend; surface creation fails
/// before any window resources are touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSurfaceHost;

impl SurfaceHost for StubSurfaceHost {
    type Surface = StubSurface;

    fn create_surface(&self) -> Result<Self::Surface> {
        warn!("surface requested on stub host");
        Err(LeisedruckError::SurfaceUnavailable)
    }
}

/// Never constructed; exists to satisfy the associated type.
#[derive(Debug)]
pub struct StubSurface;

impl RenderSurface for StubSurface {
    async fn load(&mut self, _document: &PrintDocument) -> Result<()> {
        Err(LeisedruckError::SurfaceUnavailable)
    }

    async fn print(&mut self, _options: &PrintOptions) -> Result<()> {
        Err(LeisedruckError::SurfaceUnavailable)
    }

    fn release(&mut self) {}
}
