// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID lock: exclusive ownership of one `stateDir` by one running fleet
//! manager process, enforced with an `flock`-style advisory lock so a
//! second `start` against the same directory fails fast instead of
//! corrupting state.

use crate::error::LockError;
use fs2::FileExt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct PidLock {
    path: PathBuf,
    file: File,
}

impl PidLock {
    pub fn acquire(state_dir: &Path) -> Result<Self, LockError> {
        let path = herd_storage::pid_path(state_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| LockError {
                path: path.clone(),
                source,
            })?;
        }
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError {
                path: path.clone(),
                source,
            })?;
        file.try_lock_exclusive().map_err(|source| LockError {
            path: path.clone(),
            source,
        })?;

        let mut file = file;
        file.set_len(0).map_err(|source| LockError {
            path: path.clone(),
            source,
        })?;
        writeln!(file, "{}", std::process::id()).map_err(|source| LockError {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, file })
    }
}

impl Drop for PidLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
