// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell command runner — the one capability everything else depends on.
//
// All spooler queries go through the narrow `QueryRunner` seam so that the
// PowerShell strategies stay swappable (a native-API implementation on other
// platforms implements the same trait). Empty stdout is a valid response
// meaning "no results", not an error.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use leisedruck_core::error::{LeisedruckError, Result};

/// Forces UTF-8 console output so text-mode results need no encoding repair,
/// and silences the progress stream that would otherwise pollute stderr.
const SCRIPT_PRELUDE: &str =
    "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; \
     $ProgressPreference = 'SilentlyContinue'; ";

/// Narrow interface for shell-backed OS queries.
///
/// Implementations run one script and hand back decoded stdout. No timeout is
/// applied; a hung command blocks the calling request (accepted behavior).
pub trait QueryRunner {
    fn run_query(&self, script: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Runs queries through `powershell -NoProfile -NonInteractive -Command`.
#[derive(Debug, Clone)]
pub struct PowerShellRunner {
    /// Ceiling on captured stdout, in bytes.
    output_limit: usize,
}

impl PowerShellRunner {
    pub fn new(output_limit: usize) -> Self {
        Self { output_limit }
    }
}

impl Default for PowerShellRunner {
    fn default() -> Self {
        Self::new(8 * 1024 * 1024)
    }
}

impl QueryRunner for PowerShellRunner {
    async fn run_query(&self, script: &str) -> Result<String> {
        let full = format!("{SCRIPT_PRELUDE}{script}");
        debug!(script, "running spooler query");

        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &full])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LeisedruckError::ShellQuery(format!("spawn powershell: {e}")))?;

        decode_output(
            output.status.success(),
            &output.stdout,
            &output.stderr,
            self.output_limit,
        )
    }
}

/// Turn raw process output into the decoded stdout text.
///
/// A failed exit status with nothing on stdout is a query failure carrying
/// the trimmed stderr; a failed status with output is treated as a partial
/// success (some cmdlets write warnings to the error stream and still emit
/// usable results).
fn decode_output(
    status_ok: bool,
    stdout: &[u8],
    stderr: &[u8],
    output_limit: usize,
) -> Result<String> {
    if stdout.len() > output_limit {
        return Err(LeisedruckError::ShellQuery(format!(
            "query output of {} bytes exceeds the {} byte ceiling",
            stdout.len(),
            output_limit
        )));
    }

    let text = String::from_utf8_lossy(stdout).into_owned();

    if !status_ok && text.trim().is_empty() {
        let detail = String::from_utf8_lossy(stderr);
        let detail = detail.trim();
        return Err(LeisedruckError::ShellQuery(if detail.is_empty() {
            "command exited with a failure status".into()
        } else {
            detail.to_owned()
        }));
    }

    if !status_ok {
        warn!("query exited non-zero but produced output; using it");
    }

    Ok(text)
}
