// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy: one enum per operation, mirroring the error
//! granularity used throughout the rest of this workspace.

use herd_core::JobId;
use herd_runner::RunnerError;
use herd_storage::StateFileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("storage error: {0}")]
    Storage(#[from] StateFileError),
}

#[derive(Debug, Error)]
#[error("agent {agent} is at its concurrency limit ({current_jobs} running, limit {limit})")]
pub struct ConcurrencyLimitError {
    pub agent: String,
    pub current_jobs: u32,
    pub limit: u32,
}

#[derive(Debug, Error)]
#[error("job {job_id} not found")]
pub struct JobNotFoundError {
    pub job_id: JobId,
}

#[derive(Debug, Error)]
#[error("failed to cancel job {job_id}: {reason}")]
pub struct JobCancelError {
    pub job_id: JobId,
    pub reason: String,
}

#[derive(Debug, Error)]
#[error("failed to fork job {original_job_id}: {reason}")]
pub struct JobForkError {
    pub original_job_id: JobId,
    pub reason: String,
}
