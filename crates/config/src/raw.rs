// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed mirrors of the on-disk YAML schema, before recursive resolution.

use herd_core::{DockerConfig, PermissionMode, RuntimeBackend, ScheduleConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RootFleetRef {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub session_expiry_hours: Option<u32>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetRef {
    pub path: String,
    pub name: Option<String>,
    #[serde(default = "null_value")]
    pub overrides: serde_yaml::Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentRef {
    pub path: String,
    #[serde(default = "null_value")]
    pub overrides: serde_yaml::Value,
}

fn null_value() -> serde_yaml::Value {
    serde_yaml::Value::Null
}

/// The root (or any nested) `herdctl.yaml` document, pre-resolution.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RootConfig {
    pub version: u32,
    #[serde(default)]
    pub fleet: RootFleetRef,
    pub web: Option<WebConfig>,
    #[serde(default = "null_value")]
    pub defaults: serde_yaml::Value,
    #[serde(default)]
    pub fleets: Vec<FleetRef>,
    #[serde(default)]
    pub agents: Vec<AgentRef>,
}

impl Default for RootFleetRef {
    fn default() -> Self {
        Self { name: None }
    }
}

/// An agent file, pre-resolution: no `fleetPath`/`qualifiedName` yet, and
/// `working_directory` has not been normalized to an absolute path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentFile {
    pub name: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub working_directory: Option<String>,
    #[serde(default)]
    pub permission_mode: PermissionMode,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub denied_tools: Vec<String>,
    pub max_concurrent: Option<u32>,
    #[serde(default)]
    pub schedules: Vec<ScheduleConfig>,
    pub chat: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub runtime: RuntimeBackend,
    pub docker: Option<DockerConfig>,
}
