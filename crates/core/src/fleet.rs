// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet-wide aggregate state, derived from the agent controllers — never
//! an independent source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::simple_display! {
    FleetManagerStatus {
        Uninitialized => "uninitialized",
        Initialized => "initialized",
        Running => "running",
        Stopping => "stopping",
        Stopped => "stopped",
        Error => "error",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetManagerStatus {
    Uninitialized,
    Initialized,
    Running,
    Stopping,
    Stopped,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetState {
    pub status: FleetManagerStatus,
    pub total_agents: usize,
    pub idle_agents: usize,
    pub running_agents: usize,
    pub total_schedules: usize,
    pub running_schedules: usize,
    pub running_jobs: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl FleetState {
    pub fn uninitialized() -> Self {
        Self {
            status: FleetManagerStatus::Uninitialized,
            total_agents: 0,
            idle_agents: 0,
            running_agents: 0,
            total_schedules: 0,
            running_schedules: 0,
            running_jobs: 0,
            started_at: None,
            last_error: None,
        }
    }
}
