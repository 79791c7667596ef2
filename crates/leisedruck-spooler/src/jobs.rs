// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print job directory — pending/active spooler jobs per printer.
//
// Scoped to one printer when a name is given; otherwise enumerates every
// installed printer and aggregates. Partial results are acceptable: a
// per-printer query failure is logged and skipped, but a failure of the
// printer enumeration itself propagates.

use chrono::Utc;
use tracing::{debug, warn};

use leisedruck_core::error::Result;
use leisedruck_core::types::SpoolerJob;

use crate::printers::PrinterDirectory;
use crate::runner::QueryRunner;
use crate::wire::{JobRecord, parse_records};

/// Directory of spooler jobs, backed by a [`QueryRunner`].
#[derive(Debug, Clone)]
pub struct JobDirectory<R> {
    runner: R,
    printers: PrinterDirectory<R>,
}

impl<R: QueryRunner + Clone> JobDirectory<R> {
    pub fn new(runner: R) -> Self {
        let printers = PrinterDirectory::new(runner.clone());
        Self { runner, printers }
    }

    /// List jobs for one printer, or aggregate across all installed printers
    /// when `printer_name` is `None`.
    pub async fn list_jobs(&self, printer_name: Option<&str>) -> Result<Vec<SpoolerJob>> {
        match printer_name {
            Some(name) => self.jobs_for_printer(name).await,
            None => self.all_jobs().await,
        }
    }

    /// One scoped query. Empty output is an empty list, not an error.
    async fn jobs_for_printer(&self, printer_name: &str) -> Result<Vec<SpoolerJob>> {
        let raw = self.runner.run_query(&jobs_script(printer_name)).await?;
        let records: Vec<JobRecord> = parse_records(&raw)?;

        let captured_at = Utc::now();
        let jobs = records
            .into_iter()
            .map(|record| SpoolerJob {
                id: record.id,
                document_name: record.document_name,
                user_name: record.user_name,
                job_status: record.job_status,
                total_pages: record.total_pages,
                size: record.size,
                printer_name: if record.printer_name.is_empty() {
                    printer_name.to_owned()
                } else {
                    record.printer_name
                },
                captured_at,
            })
            .collect::<Vec<_>>();

        debug!(printer = printer_name, count = jobs.len(), "listed spooler jobs");
        Ok(jobs)
    }

    /// Enumerate all printers (failure propagates), then query each one,
    /// swallowing and logging per-printer failures.
    async fn all_jobs(&self) -> Result<Vec<SpoolerJob>> {
        let printers = self.printers.list_printers().await?;

        let mut jobs = Vec::new();
        for printer in &printers {
            match self.jobs_for_printer(&printer.name).await {
                Ok(mut printer_jobs) => jobs.append(&mut printer_jobs),
                Err(e) => {
                    warn!(printer = %printer.name, error = %e, "skipping printer in job aggregation");
                }
            }
        }

        debug!(
            printers = printers.len(),
            count = jobs.len(),
            "aggregated spooler jobs"
        );
        Ok(jobs)
    }
}

/// Scoped `Get-PrintJob` query emitting JSON.
fn jobs_script(printer_name: &str) -> String {
    // Single-quoted PowerShell string; embedded quotes are doubled.
    let quoted = printer_name.replace('\'', "''");
    format!(
        "Get-PrintJob -PrinterName '{quoted}' \
         | Select-Object Id,DocumentName,UserName,JobStatus,TotalPages,Size,PrinterName \
         | ConvertTo-Json -Compress"
    )
}
