// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire structs for PowerShell `ConvertTo-Json` output.
//
// `ConvertTo-Json` emits a bare object for a single result and an array for
// several. That ambiguity is normalized here, immediately after parsing:
// every caller sees "always a list". Empty output means "no results".

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use leisedruck_core::error::{LeisedruckError, Result};

/// One `Win32_Printer` row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrinterRecord {
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub printer_status: u32,
}

/// One `Get-PrintJob` row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobRecord {
    pub id: u32,
    #[serde(default)]
    pub document_name: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub job_status: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub printer_name: String,
}

/// Parse command output into a list of records.
///
/// Empty or whitespace-only output yields an empty list. Output that is
/// present but not parseable is a `MalformedResponse`.
pub fn parse_records<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| LeisedruckError::MalformedResponse(format!("not JSON: {e}")))?;

    let items = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(LeisedruckError::MalformedResponse(format!(
                "expected object or array, got {other}"
            )));
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| LeisedruckError::MalformedResponse(format!("bad record: {e}")))
        })
        .collect()
}
