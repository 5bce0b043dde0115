// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path builders for everything rooted at `stateDir`.

use herd_core::JobId;
use std::path::{Path, PathBuf};

pub fn jobs_dir(state_dir: &Path) -> PathBuf {
    state_dir.join("jobs")
}

pub fn job_metadata_path(state_dir: &Path, job_id: &JobId) -> PathBuf {
    jobs_dir(state_dir).join(format!("{job_id}.yaml"))
}

pub fn job_output_path(state_dir: &Path, job_id: &JobId) -> PathBuf {
    jobs_dir(state_dir).join(format!("{job_id}.jsonl"))
}

pub fn legacy_session_path(state_dir: &Path, agent_name: &str) -> PathBuf {
    state_dir.join("sessions").join(format!("{agent_name}.json"))
}

pub fn chat_session_path(state_dir: &Path, platform: &str, agent_name: &str) -> PathBuf {
    state_dir
        .join(format!("{platform}-sessions"))
        .join(format!("{agent_name}.yaml"))
}

pub fn pid_path(state_dir: &Path) -> PathBuf {
    state_dir.join("herdctl.pid")
}
