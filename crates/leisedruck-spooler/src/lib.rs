// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leisedruck Spooler — queries the Windows print spooler by shelling out to
// PowerShell management commands and reshaping their JSON output into the
// domain types defined in `leisedruck-core`.

pub mod encoding;
pub mod jobs;
pub mod printers;
pub mod runner;
pub mod wire;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use jobs::JobDirectory;
pub use printers::PrinterDirectory;
pub use runner::{PowerShellRunner, QueryRunner};
