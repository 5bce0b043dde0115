// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event taxonomy published on the fleet event bus.

use chrono::{DateTime, Utc};
use herd_core::{AgentStatus, FleetState, Job, JobId, JobOutputMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentUpdatedPayload {
    pub qualified_name: String,
    pub status: AgentStatus,
    pub running_count: u32,
    pub schedule_count: u32,
    pub last_job_id: Option<JobId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobErrorPayload {
    pub kind: String,
    pub message: String,
    pub code: Option<String>,
}

/// One topic-tagged event, published in the order the emitting code
/// produced it. Mirrors the teacher's `Event` enum: one variant per wire
/// name, `#[serde(tag = "type")]` for the WebSocket boundary. Topic names
/// use a `namespace:event` wire convention, so each variant carries an
/// explicit rename rather than a blanket `rename_all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "fleet:status")]
    FleetStatus {
        status: FleetState,
    },
    #[serde(rename = "agent:updated")]
    AgentUpdated(AgentUpdatedPayload),
    #[serde(rename = "schedule:triggered")]
    ScheduleTriggered {
        agent_name: String,
        schedule_name: String,
    },
    #[serde(rename = "job:created")]
    JobCreated {
        job: Job,
    },
    #[serde(rename = "job:output")]
    JobOutput {
        job_id: JobId,
        agent_name: String,
        output: String,
        stream: Stream,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "job:completed")]
    JobCompleted {
        job: Job,
        duration_seconds: i64,
    },
    #[serde(rename = "job:failed")]
    JobFailed {
        job: Job,
        error: JobErrorPayload,
    },
    #[serde(rename = "job:cancelled")]
    JobCancelled {
        job: Job,
        reason: String,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::FleetStatus { .. } => "fleet:status",
            Event::AgentUpdated(_) => "agent:updated",
            Event::ScheduleTriggered { .. } => "schedule:triggered",
            Event::JobCreated { .. } => "job:created",
            Event::JobOutput { .. } => "job:output",
            Event::JobCompleted { .. } => "job:completed",
            Event::JobFailed { .. } => "job:failed",
            Event::JobCancelled { .. } => "job:cancelled",
        }
    }

    /// The job id this event concerns, if any — used by `streamJobOutput`
    /// to filter a single job's events out of the bus.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Event::JobCreated { job }
            | Event::JobCompleted { job, .. }
            | Event::JobFailed { job, .. }
            | Event::JobCancelled { job, .. } => Some(&job.id),
            Event::JobOutput { job_id, .. } => Some(job_id),
            _ => None,
        }
    }
}

/// Render a persisted output message as the flattened `(text, stream)`
/// shape the `job:output` event publishes on the wire.
pub fn render_for_bus(message: &JobOutputMessage) -> (String, Stream) {
    match message {
        JobOutputMessage::System { subtype, text, .. } => (
            text.clone().unwrap_or_else(|| subtype.clone()),
            Stream::Stdout,
        ),
        JobOutputMessage::Assistant { text, .. } => (text.clone(), Stream::Stdout),
        JobOutputMessage::ToolUse {
            tool_name, input, ..
        } => (format!("{tool_name}({input})"), Stream::Stdout),
        JobOutputMessage::ToolResult {
            tool_name,
            output,
            is_error,
            ..
        } => (
            format!("{tool_name} -> {output}"),
            if *is_error {
                Stream::Stderr
            } else {
                Stream::Stdout
            },
        ),
        JobOutputMessage::Error { message, .. } => (message.clone(), Stream::Stderr),
    }
}
