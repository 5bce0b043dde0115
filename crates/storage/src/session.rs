// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent "last known session id" pointer at `sessions/<agentName>.json`
//! — distinct from the multi-channel chat session map in [`crate::chat`].

use crate::atomic::write_atomic_json;
use crate::error::StateFileError;
use crate::paths::legacy_session_path;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSessionPointer {
    pub session_id: String,
}

pub fn write_agent_session(
    state_dir: &Path,
    agent_name: &str,
    session_id: &str,
) -> Result<(), StateFileError> {
    let path = legacy_session_path(state_dir, agent_name);
    write_atomic_json(
        &path,
        &AgentSessionPointer {
            session_id: session_id.to_string(),
        },
    )
    .map_err(StateFileError::from)
}

pub fn read_agent_session(state_dir: &Path, agent_name: &str) -> Option<String> {
    let path = legacy_session_path(state_dir, agent_name);
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str::<AgentSessionPointer>(&content)
        .ok()
        .map(|pointer| pointer.session_id)
}
