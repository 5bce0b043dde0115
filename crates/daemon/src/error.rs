// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet Manager error taxonomy.

use herd_config::ConfigError;
use herd_core::JobId;
use herd_engine::{ConcurrencyLimitError, CronParseError, ExecuteError, JobCancelError, JobForkError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("fleet manager shutdown did not complete cleanly (timeout: {is_timeout})")]
pub struct FleetManagerShutdownError {
    is_timeout: bool,
}

impl FleetManagerShutdownError {
    pub fn timeout() -> Self {
        Self { is_timeout: true }
    }

    pub fn is_timeout(&self) -> bool {
        self.is_timeout
    }
}

#[derive(Debug, Error)]
#[error("agent {qualified_name:?} not found; available agents: {available:?}")]
pub struct AgentNotFoundError {
    pub qualified_name: String,
    pub available: Vec<String>,
}

#[derive(Debug, Error)]
#[error("invalid fleet manager state: {operation} is not allowed while {current_state}")]
pub struct InvalidStateError {
    pub operation: &'static str,
    pub current_state: String,
}

#[derive(Debug, Error)]
#[error("job {job_id} not found")]
pub struct JobNotFoundError {
    pub job_id: JobId,
}

#[derive(Debug, Error)]
#[error("failed to acquire pid lock at {path}: {source}")]
pub struct LockError {
    pub path: std::path::PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum FleetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    State(#[from] InvalidStateError),

    #[error(transparent)]
    AgentNotFound(#[from] AgentNotFoundError),

    #[error(transparent)]
    JobNotFound(#[from] JobNotFoundError),

    #[error(transparent)]
    ConcurrencyLimit(#[from] ConcurrencyLimitError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    JobCancel(#[from] JobCancelError),

    #[error(transparent)]
    JobFork(#[from] JobForkError),

    #[error(transparent)]
    Shutdown(#[from] FleetManagerShutdownError),

    #[error(transparent)]
    Schedule(#[from] CronParseError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
