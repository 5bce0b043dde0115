// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage error taxonomy.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("atomic write to {path} failed (temp file {temp_path}): {cause}")]
pub struct AtomicWriteError {
    pub path: PathBuf,
    pub temp_path: PathBuf,
    #[source]
    pub cause: std::io::Error,
}

#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Write(#[from] AtomicWriteError),

    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line_number} in {path}: {message}")]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        message: String,
    },
}
