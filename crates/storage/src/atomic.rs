// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic whole-file writes: write to a sibling temp file, then rename
//! over the target. Rename retries with exponential backoff on
//! `EACCES`/`EPERM`; other errors propagate immediately. The temp file is
//! always cleaned up, whether the write succeeds or not.

use crate::error::AtomicWriteError;
use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_RENAME_ATTEMPTS: u32 = 5;
const BASE_BACKOFF: Duration = Duration::from_millis(20);
const MAX_BACKOFF: Duration = Duration::from_millis(500);

fn temp_path_for(target: &Path) -> PathBuf {
    let suffix: String = (0..16)
        .map(|_| {
            let n: u8 = rand::thread_rng().gen_range(0..16);
            std::char::from_digit(n as u32, 16).unwrap_or('0')
        })
        .collect();
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    target.with_file_name(format!(".{file_name}.tmp.{suffix}"))
}

fn is_retryable(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::PermissionDenied)
}

/// Write `bytes` to `target` atomically.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), AtomicWriteError> {
    let temp_path = temp_path_for(target);
    let result = (|| -> std::io::Result<()> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&temp_path, bytes)?;
        rename_with_retry(&temp_path, target)
    })();

    match result {
        Ok(()) => Ok(()),
        Err(cause) => {
            let _ = std::fs::remove_file(&temp_path);
            Err(AtomicWriteError {
                path: target.to_path_buf(),
                temp_path,
                cause,
            })
        }
    }
}

fn rename_with_retry(temp_path: &Path, target: &Path) -> std::io::Result<()> {
    let mut attempt = 0;
    loop {
        match std::fs::rename(temp_path, target) {
            Ok(()) => return Ok(()),
            Err(err) if is_retryable(&err) && attempt + 1 < MAX_RENAME_ATTEMPTS => {
                let backoff = (BASE_BACKOFF * 2u32.pow(attempt)).min(MAX_BACKOFF);
                std::thread::sleep(backoff);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_atomic_json<T: serde::Serialize>(
    target: &Path,
    value: &T,
) -> Result<(), AtomicWriteError> {
    let json = serde_json::to_vec_pretty(value).map_err(|err| AtomicWriteError {
        path: target.to_path_buf(),
        temp_path: temp_path_for(target),
        cause: std::io::Error::other(err),
    })?;
    write_atomic(target, &json)
}

/// Serialize `value` as YAML and write it atomically.
pub fn write_atomic_yaml<T: serde::Serialize>(
    target: &Path,
    value: &T,
) -> Result<(), AtomicWriteError> {
    let yaml = serde_yaml::to_string(value).map_err(|err| AtomicWriteError {
        path: target.to_path_buf(),
        temp_path: temp_path_for(target),
        cause: std::io::Error::other(err),
    })?;
    write_atomic(target, yaml.as_bytes())
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
