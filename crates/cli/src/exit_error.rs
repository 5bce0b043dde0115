// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

/// Exit codes per the CLI contract: 0 success, 1 runtime error, 2
/// configuration/not-found, 3 timeout.
pub const CODE_RUNTIME: i32 = 1;
pub const CODE_CONFIG: i32 = 2;
pub const CODE_TIMEOUT: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(CODE_RUNTIME, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(CODE_CONFIG, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(CODE_TIMEOUT, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<herd_config::ConfigError> for ExitError {
    fn from(err: herd_config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

impl From<herd_daemon::FleetError> for ExitError {
    fn from(err: herd_daemon::FleetError) -> Self {
        use herd_daemon::FleetError;
        match &err {
            FleetError::Config(_) | FleetError::AgentNotFound(_) | FleetError::JobNotFound(_) => {
                Self::config(err.to_string())
            }
            FleetError::Shutdown(shutdown) if shutdown.is_timeout() => {
                Self::timeout(err.to_string())
            }
            _ => Self::runtime(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ExitError {
    fn from(err: anyhow::Error) -> Self {
        Self::runtime(err.to_string())
    }
}

impl From<std::io::Error> for ExitError {
    fn from(err: std::io::Error) -> Self {
        Self::runtime(err.to_string())
    }
}

impl From<herd_storage::StateFileError> for ExitError {
    fn from(err: herd_storage::StateFileError) -> Self {
        Self::runtime(err.to_string())
    }
}
