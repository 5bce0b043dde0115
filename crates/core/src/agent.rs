// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The resolved `Agent`: the fully-qualified, fully-merged configuration of
//! one agent after the config loader has finished recursing through fleets.

use crate::volume::VolumeMount;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// `^[A-Za-z0-9][A-Za-z0-9_-]*$` — dots are reserved as the qualified-name separator.
pub fn validate_agent_name(name: &str) -> Result<(), InvalidAgentName> {
    let mut chars = name.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if first_ok && rest_ok {
        Ok(())
    } else {
        Err(InvalidAgentName {
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid agent/fleet name {name:?}: must match ^[A-Za-z0-9][A-Za-z0-9_-]*$")]
pub struct InvalidAgentName {
    pub name: String,
}

/// Compute `fleetPath.join(".") + "." + name`, or just `name` at the root.
pub fn qualified_name(fleet_path: &[String], name: &str) -> String {
    if fleet_path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{name}", fleet_path.join("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PermissionMode {
    #[default]
    Default,
    AcceptEdits,
    BypassPermissions,
    Plan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeBackend {
    #[default]
    Sdk,
    Cli,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DockerConfig {
    #[serde(default)]
    pub enabled: bool,
    pub image: Option<String>,
    pub memory: Option<String>,
    pub cpu_shares: Option<u32>,
    pub user: Option<String>,
    pub network: Option<String>,
    #[serde(default)]
    pub volumes: Vec<String>,
    pub workspace_mode: Option<String>,
    pub max_containers: Option<u32>,
    #[serde(default)]
    pub ephemeral: bool,
}

impl DockerConfig {
    /// Parsed `volumes`, rejecting any entry that does not match the grammar.
    pub fn parsed_volumes(&self) -> Result<Vec<VolumeMount>, crate::volume::InvalidVolumeString> {
        self.volumes.iter().map(|v| v.parse()).collect()
    }
}

/// State of an agent controller as observed by fleet-status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Running,
}

/// An agent after the config loader has fully resolved it: name, path,
/// defaults merge, and working-directory normalization are all done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub fleet_path: Vec<String>,
    pub qualified_name: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub working_directory: PathBuf,
    #[serde(default)]
    pub permission_mode: PermissionMode,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub denied_tools: Vec<String>,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: u32,
    #[serde(default)]
    pub schedules: Vec<crate::schedule::ScheduleConfig>,
    pub chat: Option<std::collections::BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub runtime: RuntimeBackend,
    pub docker: Option<DockerConfig>,
    pub config_path: PathBuf,
}

fn default_max_concurrent() -> u32 {
    1
}

impl Agent {
    pub fn validate(&self) -> Result<(), InvalidAgentName> {
        validate_agent_name(&self.name)?;
        if self.max_concurrent < 1 {
            return Err(InvalidAgentName {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}
