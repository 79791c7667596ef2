// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Leisedruck print bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a print dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An installed printer as reported by the OS.
///
/// Created transiently per query and never persisted. `name` is the
/// OS-assigned unique identifier; `display_name` is what the UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterInfo {
    pub name: String,
    pub display_name: String,
    pub is_default: bool,
    /// Raw spooler status code (`PrinterStatus` from `Win32_Printer`).
    pub status: u32,
}

/// A pending or active spooler job, snapshotted at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoolerJob {
    /// Spooler-assigned job id.
    pub id: u32,
    pub document_name: String,
    pub user_name: String,
    /// Raw `JobStatus` flag value from the spooler.
    pub job_status: u32,
    pub total_pages: u32,
    /// Job size in bytes.
    pub size: u64,
    pub printer_name: String,
    /// When this snapshot was taken.
    pub captured_at: DateTime<Utc>,
}

/// Page geometry for a print dispatch, in device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    /// The 60x40 label stock the bridge was built around.
    pub const DEFAULT: Self = Self {
        width: 600,
        height: 400,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What kind of code a print request renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    QrCode,
    Barcode,
}

impl ContentKind {
    /// Bundled template page rendered for this content kind.
    pub fn template_page(&self) -> &'static str {
        match self {
            Self::QrCode => "qrCode.html",
            Self::Barcode => "barCode.html",
        }
    }

    /// Whether the silent print includes page backgrounds by default.
    ///
    /// QR labels need the background for the quiet zone; barcode labels
    /// historically printed without it. Overridable per request.
    pub fn default_print_background(&self) -> bool {
        match self {
            Self::QrCode => true,
            Self::Barcode => false,
        }
    }
}

/// One print dispatch. Constructed per invocation, consumed once, not retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintRequest {
    pub id: RequestId,
    pub kind: ContentKind,
    /// Raw text to encode (order number, tracking code, ...).
    pub content: String,
    /// Pre-rendered image payload (data URL). When present the dispatcher
    /// embeds it directly instead of routing through the template page.
    pub image_payload: Option<String>,
    /// Explicit target printer. `None` resolves the system default.
    pub printer_name: Option<String>,
    /// Override for the background-inclusion flag; `None` uses the
    /// content kind's default.
    pub print_background: Option<bool>,
}

impl PrintRequest {
    pub fn new(kind: ContentKind, content: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            kind,
            content: content.into(),
            image_payload: None,
            printer_name: None,
            print_background: None,
        }
    }

    pub fn with_image_payload(mut self, payload: impl Into<String>) -> Self {
        self.image_payload = Some(payload.into());
        self
    }

    pub fn with_printer(mut self, name: impl Into<String>) -> Self {
        self.printer_name = Some(name.into());
        self
    }

    /// The effective background flag for this request.
    pub fn background(&self) -> bool {
        self.print_background
            .unwrap_or_else(|| self.kind.default_print_background())
    }
}
