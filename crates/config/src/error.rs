// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The config loader's closed error taxonomy.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no herdctl.yaml/.yml found; searched: {searched:?}")]
    ConfigNotFound { searched: Vec<PathBuf> },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} failed schema validation: {issues:?}")]
    SchemaValidation { path: PathBuf, issues: Vec<String> },

    #[error("invalid fleet/agent name {name:?} at {path}: must match ^[A-Za-z0-9][A-Za-z0-9_-]*$")]
    InvalidFleetName { name: String, path: PathBuf },

    #[error("fleet cycle detected: {chain:?}")]
    FleetCycle { chain: Vec<PathBuf> },

    #[error("fleet name collision {name:?} between {first} and {second}")]
    FleetNameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("agent name collision {name:?} between {first} and {second}: qualified names must be unique across the resolved fleet")]
    AgentNameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to load fleet {path}: {source}")]
    FleetLoad {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("failed to load agent {path}: {source}")]
    AgentLoad {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("invalid memory string in {path}: {source}")]
    InvalidMemory {
        path: PathBuf,
        #[source]
        source: herd_core::InvalidMemoryString,
    },

    #[error("invalid volume string in {path}: {source}")]
    InvalidVolume {
        path: PathBuf,
        #[source]
        source: herd_core::InvalidVolumeString,
    },

    #[error("invalid user string in {path}: {source}")]
    InvalidUser {
        path: PathBuf,
        #[source]
        source: herd_core::InvalidUserString,
    },

    #[error("invalid cron expression in {path}: {message}")]
    InvalidCron { path: PathBuf, message: String },
}
