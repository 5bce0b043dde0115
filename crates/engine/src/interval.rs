// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interval schedule grammar: `^\d+[smhd]?$`, case-insensitive, no suffix
//! defaults to seconds.

use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid interval string {raw:?}: expected digits optionally followed by s/m/h/d")]
pub struct InvalidInterval {
    raw: String,
}

pub fn parse_interval(raw: &str) -> Result<Duration, InvalidInterval> {
    let invalid = || InvalidInterval {
        raw: raw.to_string(),
    };
    if raw.is_empty() {
        return Err(invalid());
    }
    let lower = raw.to_ascii_lowercase();
    let (digits, unit_seconds) = match lower.chars().last() {
        Some('d') => (&lower[..lower.len() - 1], 86_400),
        Some('h') => (&lower[..lower.len() - 1], 3_600),
        Some('m') => (&lower[..lower.len() - 1], 60),
        Some('s') => (&lower[..lower.len() - 1], 1),
        _ => (lower.as_str(), 1),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let value: i64 = digits.parse().map_err(|_| invalid())?;
    if value <= 0 {
        return Err(invalid());
    }
    Ok(Duration::seconds(value * unit_seconds))
}
