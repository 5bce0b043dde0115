// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Memory size grammar: `^\d+[gmk]?$`, case-insensitive.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid memory string {raw:?}: expected digits optionally followed by g/m/k")]
pub struct InvalidMemoryString {
    raw: String,
}

/// Parse a memory size string into a byte count.
///
/// `g` = GiB, `m` = MiB, `k` = KiB, no suffix = bytes.
pub fn parse_memory_to_bytes(raw: &str) -> Result<u64, InvalidMemoryString> {
    let invalid = || InvalidMemoryString {
        raw: raw.to_string(),
    };
    if raw.is_empty() {
        return Err(invalid());
    }
    let lower = raw.to_ascii_lowercase();
    let (digits, multiplier) = match lower.chars().last() {
        Some('g') => (&lower[..lower.len() - 1], 1024 * 1024 * 1024),
        Some('m') => (&lower[..lower.len() - 1], 1024 * 1024),
        Some('k') => (&lower[..lower.len() - 1], 1024),
        _ => (lower.as_str(), 1),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let value: u64 = digits.parse().map_err(|_| invalid())?;
    Ok(value * multiplier)
}
