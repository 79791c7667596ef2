// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// UI-facing error messages.
//
// The UI layer shows short generic strings, not the internal detail. Queries
// collapse to one "fetch failed" message; printing distinguishes only
// "no default printer" from a wrapped dispatch failure.

use crate::error::LeisedruckError;

/// Convert an internal error into the string the command surface returns.
pub fn ui_message(err: &LeisedruckError) -> String {
    match err {
        LeisedruckError::NoDefaultPrinter => "no default printer found".into(),

        LeisedruckError::Dispatch(detail) => format!("print failed: {detail}"),
        LeisedruckError::SurfaceUnavailable => "print failed: no rendering surface".into(),

        // Query faults are indistinguishable to the UI.
        LeisedruckError::ShellQuery(_)
        | LeisedruckError::MalformedResponse(_)
        | LeisedruckError::Io(_)
        | LeisedruckError::Serialization(_) => "fetch failed".into(),

        // Bus errors never reach the UI, but map them anyway.
        LeisedruckError::Bus(detail) => format!("bus error: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_faults_collapse_to_fetch_failed() {
        let shell = LeisedruckError::ShellQuery("powershell exited 1".into());
        let malformed = LeisedruckError::MalformedResponse("not json".into());
        assert_eq!(ui_message(&shell), "fetch failed");
        assert_eq!(ui_message(&malformed), "fetch failed");
    }

    #[test]
    fn missing_default_printer_is_named() {
        assert_eq!(
            ui_message(&LeisedruckError::NoDefaultPrinter),
            "no default printer found"
        );
    }

    #[test]
    fn dispatch_errors_are_wrapped() {
        let err = LeisedruckError::Dispatch("surface load failed".into());
        assert_eq!(ui_message(&err), "print failed: surface load failed");
    }
}
