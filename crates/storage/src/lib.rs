// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd-storage: the filesystem state store — atomic whole-file writes,
//! job metadata and output logs, and chat session bookkeeping, all rooted
//! at a single `stateDir`.

pub mod atomic;
pub mod chat;
pub mod error;
pub mod jobs;
pub mod paths;
pub mod session;

pub use atomic::{write_atomic, write_atomic_json, write_atomic_yaml};
pub use chat::{get_or_create_session, load_session_map, touch_session};
pub use error::{AtomicWriteError, StateFileError};
pub use jobs::{
    append_output, append_output_batch, list_jobs, read_job_metadata, read_job_output_all,
    write_job_metadata, BatchAppendError, JobFilter,
};
pub use paths::{
    chat_session_path, job_metadata_path, job_output_path, jobs_dir, legacy_session_path,
    pid_path,
};
pub use session::{read_agent_session, write_agent_session, AgentSessionPointer};
