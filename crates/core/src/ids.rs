// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity: `job-YYYY-MM-DD-<6 lowercase alnum>`.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

const SUFFIX_LEN: usize = 6;
const SUFFIX_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Identity of one job execution. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Generate a new id for the given instant. Callers that hit a
    /// filesystem collision should call this again; the random suffix makes
    /// a second collision on retry vanishingly unlikely.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix = nanoid::nanoid!(SUFFIX_LEN, &SUFFIX_ALPHABET);
        Self(format!("job-{}-{suffix}", now.format("%Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when a string does not match the `job-YYYY-MM-DD-<6 alnum>` grammar.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid job id {raw:?}: expected job-YYYY-MM-DD-<6 lowercase alnum>")]
pub struct InvalidJobId {
    raw: String,
}

impl FromStr for JobId {
    type Err = InvalidJobId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidJobId { raw: s.to_string() };
        let rest = s.strip_prefix("job-").ok_or_else(invalid)?;
        let mut parts = rest.splitn(4, '-');
        let (y, m, d, suffix) = (
            parts.next().ok_or_else(invalid)?,
            parts.next().ok_or_else(invalid)?,
            parts.next().ok_or_else(invalid)?,
            parts.next().ok_or_else(invalid)?,
        );
        let valid_date = y.len() == 4
            && y.bytes().all(|b| b.is_ascii_digit())
            && m.len() == 2
            && m.bytes().all(|b| b.is_ascii_digit())
            && d.len() == 2
            && d.bytes().all(|b| b.is_ascii_digit());
        let valid_suffix = suffix.len() == SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        if !valid_date || !valid_suffix {
            return Err(invalid());
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for JobId {
    type Error = InvalidJobId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JobId> for String {
    fn from(value: JobId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generate_matches_grammar() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let id = JobId::generate(now);
        assert!(id.as_str().starts_with("job-2024-01-15-"));
        let reparsed: JobId = id.as_str().parse().expect("generated id must round-trip");
        assert_eq!(reparsed, id);
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["job-2024-01-15-ABCDEF", "job-2024-1-15-abcdef", "not-a-job-id"] {
            assert!(bad.parse::<JobId>().is_err(), "expected {bad} to be rejected");
        }
    }
}
