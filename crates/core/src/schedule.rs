// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedules: a recurrence spec attached to an agent, as configured and as
//! tracked at runtime by the scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Interval,
    Cron,
    Webhook,
    Chat,
}

crate::simple_display! {
    ScheduleStatus {
        Idle => "idle",
        Running => "running",
        Disabled => "disabled",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Idle,
    Running,
    Disabled,
}

/// As written in an agent file's `schedules:` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ScheduleType,
    /// Duration string for `interval`, 5-field cron or `@shorthand` for `cron`.
    pub expression: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub prompt: Option<String>,
    #[serde(default)]
    pub resume_session: bool,
}

fn default_enabled() -> bool {
    true
}

/// Runtime state of one schedule, owned by the scheduler and mutated only
/// by it (plus the enable/disable API, observed on the next tick).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub agent: String,
    pub name: String,
    pub kind: ScheduleType,
    pub expression: String,
    pub enabled: bool,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub run_count: u64,
    pub status: ScheduleStatus,
}

impl Schedule {
    pub fn from_config(agent: impl Into<String>, config: &ScheduleConfig) -> Self {
        Self {
            agent: agent.into(),
            name: config.name.clone(),
            kind: config.kind,
            expression: config.expression.clone(),
            enabled: config.enabled,
            last_run_at: None,
            next_run_at: None,
            run_count: 0,
            status: if config.enabled {
                ScheduleStatus::Idle
            } else {
                ScheduleStatus::Disabled
            },
        }
    }
}
