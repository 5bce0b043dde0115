// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Job` record: one execution of an agent.

use crate::ids::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Manual,
    Schedule,
    Webhook,
    Chat,
    Fork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Success,
    Error,
    Cancelled,
    Forced,
    StorageError,
}

/// Immutable identity, mutable lifecycle: created `pending` by the agent
/// controller, mutated by the executor up to and including the terminal
/// write, never touched again after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub agent: String,
    pub schedule: Option<String>,
    pub trigger_type: TriggerType,
    pub forked_from: Option<JobId>,
    pub session_id: Option<String>,
    pub status: JobStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub exit_reason: Option<ExitReason>,
    pub prompt: String,
    pub summary: Option<String>,
    pub output_file: String,
}

impl Job {
    /// Construct a freshly-admitted, not-yet-started job record.
    pub fn new_pending(
        id: JobId,
        agent: impl Into<String>,
        schedule: Option<String>,
        trigger_type: TriggerType,
        forked_from: Option<JobId>,
        prompt: impl Into<String>,
    ) -> Self {
        let output_file = format!("{id}.jsonl");
        Self {
            id,
            agent: agent.into(),
            schedule,
            trigger_type,
            forked_from,
            session_id: None,
            status: JobStatus::Pending,
            started_at: None,
            finished_at: None,
            duration_seconds: None,
            exit_reason: None,
            prompt: prompt.into(),
            summary: None,
            output_file,
        }
    }

    /// Transition `pending -> running`, capturing wall-clock start time.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.status = JobStatus::Running;
        self.started_at = Some(now);
    }

    /// Apply a terminal transition, auto-computing `duration_seconds` from
    /// `started_at`/`finished_at` when the caller does not supply it.
    pub fn finish(
        &mut self,
        status: JobStatus,
        exit_reason: ExitReason,
        finished_at: DateTime<Utc>,
        summary: Option<String>,
    ) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.exit_reason = Some(exit_reason);
        self.finished_at = Some(finished_at);
        self.summary = summary;
        if self.duration_seconds.is_none() {
            if let Some(started_at) = self.started_at {
                self.duration_seconds = Some((finished_at - started_at).num_seconds().max(0));
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct JobBuilder => Job {
        set { id: JobId = JobId::generate(chrono::Utc::now()) }
        into { agent: String = "worker" }
        option { schedule: String = None }
        set { trigger_type: TriggerType = TriggerType::Manual }
        option { forked_from: JobId = None }
        option { session_id: String = None }
        set { status: JobStatus = JobStatus::Pending }
        option { started_at: DateTime<Utc> = None }
        option { finished_at: DateTime<Utc> = None }
        option { duration_seconds: i64 = None }
        option { exit_reason: ExitReason = None }
        into { prompt: String = "do the thing" }
        option { summary: String = None }
        into { output_file: String = "job.jsonl" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn finish_computes_duration_when_omitted() {
        let mut job = Job::new_pending(
            JobId::generate(Utc::now()),
            "worker",
            None,
            TriggerType::Manual,
            None,
            "hello",
        );
        let started = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let finished = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 30).unwrap();
        job.start(started);

        job.finish(JobStatus::Completed, ExitReason::Success, finished, None);

        assert_eq!(job.duration_seconds, Some(90));
    }

    #[test]
    fn finish_respects_pre_set_duration() {
        let mut job = Job::new_pending(
            JobId::generate(Utc::now()),
            "worker",
            None,
            TriggerType::Manual,
            None,
            "hello",
        );
        job.start(Utc::now());
        job.duration_seconds = Some(42);
        let finished = job.started_at.unwrap();

        job.finish(JobStatus::Completed, ExitReason::Success, finished, None);

        assert_eq!(job.duration_seconds, Some(42));
    }
}
