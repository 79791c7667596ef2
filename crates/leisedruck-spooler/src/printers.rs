// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer directory — installed-printer listing and default-printer lookup.
//
// Default lookup walks a chain of strategies, each attempted only when the
// previous one produced empty trimmed output: the WMI management-object
// query, the printer-management cmdlet, the lowest-level .NET printing
// settings, and finally the first entry of the full listing. The chain
// exists because each strategy unreliably returns nothing on some Windows
// configurations.

use tracing::{debug, warn};

use leisedruck_core::error::{LeisedruckError, Result};
use leisedruck_core::types::PrinterInfo;

use crate::encoding::repair_printer_name;
use crate::runner::QueryRunner;
use crate::wire::{PrinterRecord, parse_records};

/// Full installed-printer listing as JSON.
const LIST_PRINTERS: &str = "Get-CimInstance -ClassName Win32_Printer \
     | Select-Object Name,Default,PrinterStatus | ConvertTo-Json -Compress";

/// Strategy (a): management-object query filtered on the default flag.
const DEFAULT_VIA_WMI: &str = "Get-CimInstance -ClassName Win32_Printer -Filter 'Default=TRUE' \
     | Select-Object -ExpandProperty Name";

/// Strategy (b): printer-management cmdlet filtered on the default flag.
const DEFAULT_VIA_CMDLET: &str = "Get-Printer | Where-Object { $_.Default } \
     | Select-Object -ExpandProperty Name";

/// Strategy (c): lowest-level printing-settings query.
const DEFAULT_VIA_SETTINGS: &str = "Add-Type -AssemblyName System.Drawing; \
     (New-Object System.Drawing.Printing.PrinterSettings).PrinterName";

/// Directory of installed printers, backed by a [`QueryRunner`].
#[derive(Debug, Clone)]
pub struct PrinterDirectory<R> {
    runner: R,
}

impl<R: QueryRunner> PrinterDirectory<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// List every installed printer.
    ///
    /// Name fields go through encoding repair; the repair is a no-op for the
    /// UTF-8 shell path but fixes names from mis-decoding listings.
    pub async fn list_printers(&self) -> Result<Vec<PrinterInfo>> {
        let raw = self.runner.run_query(LIST_PRINTERS).await?;
        let records: Vec<PrinterRecord> = parse_records(&raw)?;

        let printers = records
            .into_iter()
            .map(|record| {
                let name = repair_printer_name(&record.name);
                PrinterInfo {
                    display_name: name.clone(),
                    name,
                    is_default: record.default,
                    status: record.printer_status,
                }
            })
            .collect::<Vec<_>>();

        debug!(count = printers.len(), "listed installed printers");
        Ok(printers)
    }

    /// Resolve the name of the default printer.
    ///
    /// Tries the strategy chain in order and short-circuits on the first
    /// non-empty trimmed result. A strategy that errors is logged and treated
    /// like an empty result. When the final fallback (first printer of the
    /// full listing) also comes up empty this is `NoDefaultPrinter`.
    pub async fn default_printer_name(&self) -> Result<String> {
        let strategies = [
            ("wmi", DEFAULT_VIA_WMI),
            ("cmdlet", DEFAULT_VIA_CMDLET),
            ("settings", DEFAULT_VIA_SETTINGS),
        ];

        for (label, script) in strategies {
            match self.runner.run_query(script).await {
                Ok(output) => {
                    // Multiple lines can appear when WMI reports duplicates;
                    // the first is authoritative.
                    if let Some(name) = first_line(&output) {
                        debug!(strategy = label, name, "default printer resolved");
                        return Ok(repair_printer_name(name));
                    }
                }
                Err(e) => {
                    warn!(strategy = label, error = %e, "default-printer strategy failed");
                }
            }
        }

        // Final fallback: first entry of the full listing.
        let printers = self.list_printers().await?;
        match printers.into_iter().next() {
            Some(first) => {
                debug!(name = %first.name, "falling back to first installed printer");
                Ok(first.name)
            }
            None => Err(LeisedruckError::NoDefaultPrinter),
        }
    }
}

fn first_line(output: &str) -> Option<&str> {
    output.lines().map(str::trim).find(|line| !line.is_empty())
}
