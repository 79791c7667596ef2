// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Repair for printer names that were decoded one-byte-per-character.
//
// Host-API printer listings on some systems hand back names whose UTF-8 bytes
// were read as Latin-1, so "Büro" arrives as "BÃ¼ro". The shell path forces
// UTF-8 output and never needs this, but the repair is idempotent so it is
// applied to every name uniformly.

/// Reinterpret a Latin-1-mangled name as UTF-8 where that produces a valid
/// string; otherwise return the input unchanged.
pub fn repair_printer_name(name: &str) -> String {
    // A mangled name consists solely of code points below U+0100 (each one
    // stands for a single byte) and contains at least one above U+007F.
    if !name.chars().all(|c| (c as u32) < 0x100) || name.is_ascii() {
        return name.to_owned();
    }

    let bytes: Vec<u8> = name.chars().map(|c| c as u8).collect();
    match String::from_utf8(bytes) {
        Ok(repaired) => repaired,
        Err(_) => name.to_owned(),
    }
}
