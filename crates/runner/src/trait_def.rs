// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The abstract contract the Job Executor drives. This crate has no
//! opinion on what actually runs the LLM; it only defines the shape of
//! one execution and ships one reference backend ([`crate::process`]) plus
//! a scriptable test backend ([`crate::mock`]).

use crate::error::RunnerError;
use async_trait::async_trait;
use herd_core::JobOutputMessage;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct ExecuteOptions {
    pub model: Option<String>,
    pub prompt: String,
    pub working_directory: PathBuf,
    pub session_id: Option<String>,
    pub injected_tool_servers: Vec<String>,
    pub cancellation: CancellationToken,
}

/// A live execution: a bounded channel the runner feeds as messages are
/// produced, ending with at most one `Err` terminating the stream.
pub struct RunnerHandle {
    pub messages: mpsc::Receiver<Result<JobOutputMessage, RunnerError>>,
}

#[async_trait]
pub trait Runner: Send + Sync {
    async fn execute(&self, options: ExecuteOptions) -> Result<RunnerHandle, RunnerError>;
}
