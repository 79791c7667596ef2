// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Leisedruck.

use thiserror::Error;

/// Top-level error type for all Leisedruck operations.
#[derive(Debug, Error)]
pub enum LeisedruckError {
    // -- Printer resolution --
    #[error("no default printer could be resolved")]
    NoDefaultPrinter,

    // -- Print dispatch --
    #[error("print dispatch failed: {0}")]
    Dispatch(String),

    #[error("no rendering surface available on this build")]
    SurfaceUnavailable,

    // -- Spooler queries --
    #[error("shell query failed: {0}")]
    ShellQuery(String),

    #[error("malformed query response: {0}")]
    MalformedResponse(String),

    // -- Message bus --
    #[error("bus error: {0}")]
    Bus(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LeisedruckError>;
