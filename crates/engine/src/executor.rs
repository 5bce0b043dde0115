// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Executor: drives one agent execution end to end — metadata create,
//! the runner stream, and the terminal write.

use crate::error::ExecuteError;
use herd_bus::{render_for_bus, Event, EventBus, JobErrorPayload};
use herd_core::{Clock, ExitReason, Job, JobId, JobOutputMessage, JobStatus, TriggerType};
use herd_runner::{ExecuteOptions, Runner, RunnerError};
use herd_storage::{append_output, write_agent_session, write_job_metadata};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

pub struct JobExecutor<C: Clock> {
    state_dir: PathBuf,
    bus: EventBus,
    clock: C,
}

/// Inputs for one execution, gathered by the caller (the agent controller).
pub struct ExecuteRequest {
    pub agent_name: String,
    pub working_directory: PathBuf,
    pub model: Option<String>,
    pub prompt: String,
    pub schedule: Option<String>,
    pub trigger_type: TriggerType,
    pub forked_from: Option<JobId>,
    pub session_id: Option<String>,
    pub injected_tool_servers: Vec<String>,
    pub cancellation: CancellationToken,
    /// Pre-allocated id, used when the caller needs to know the job's
    /// identity before it starts (e.g. to register a cancellation handle).
    /// `None` generates one internally, as with any other trigger.
    pub requested_id: Option<JobId>,
}

impl<C: Clock> JobExecutor<C> {
    pub fn new(state_dir: impl Into<PathBuf>, bus: EventBus, clock: C) -> Self {
        Self {
            state_dir: state_dir.into(),
            bus,
            clock,
        }
    }

    /// Run one job to completion. Never returns `Err` on a failed *agent*
    /// run — that is represented as a `Job` with `status: failed`; `Err` is
    /// reserved for storage failures that prevent even writing the
    /// terminal record.
    pub async fn execute(
        &self,
        runner: &dyn Runner,
        request: ExecuteRequest,
    ) -> Result<Job, ExecuteError> {
        let job = self.create_job(&request)?;
        self.run(runner, job, request).await
    }

    /// Admit a job into the `pending` state and publish `JobCreated`,
    /// without driving it. Split out from [`execute`] so a caller can
    /// return the pending job to its own caller before the run finishes.
    pub fn create_job(&self, request: &ExecuteRequest) -> Result<Job, ExecuteError> {
        let job = if let Some(id) = request.requested_id.clone() {
            let job = Job::new_pending(
                id,
                request.agent_name.clone(),
                request.schedule.clone(),
                request.trigger_type,
                request.forked_from.clone(),
                request.prompt.clone(),
            );
            write_job_metadata(&self.state_dir, &job)?;
            job
        } else {
            const MAX_ATTEMPTS: u32 = 5;
            let mut created = None;
            for _ in 0..MAX_ATTEMPTS {
                let id = JobId::generate(self.clock.now_utc());
                if herd_storage::read_job_metadata(&self.state_dir, &id).is_some() {
                    continue;
                }
                let job = Job::new_pending(
                    id,
                    request.agent_name.clone(),
                    request.schedule.clone(),
                    request.trigger_type,
                    request.forked_from.clone(),
                    request.prompt.clone(),
                );
                write_job_metadata(&self.state_dir, &job)?;
                created = Some(job);
                break;
            }
            match created {
                Some(job) => job,
                // Vanishingly unlikely given the random suffix; surface as
                // a storage error rather than looping forever.
                None => {
                    return Err(ExecuteError::Storage(herd_storage::StateFileError::Write(
                        herd_storage::AtomicWriteError {
                            path: self.state_dir.join("jobs"),
                            temp_path: self.state_dir.join("jobs"),
                            cause: std::io::Error::other("exhausted job id collision retries"),
                        },
                    )))
                }
            }
        };

        self.bus.publish(Event::JobCreated { job: job.clone() });
        Ok(job)
    }

    /// Drive an already-`pending` job (as returned by [`create_job`]) to
    /// completion: runner start, stream, and the terminal write.
    pub async fn run(
        &self,
        runner: &dyn Runner,
        mut job: Job,
        request: ExecuteRequest,
    ) -> Result<Job, ExecuteError> {
        job.start(self.clock.now_utc());
        write_job_metadata(&self.state_dir, &job)?;
        tracing::info!(job_id = %job.id, agent = %job.agent, "job started");

        let handle = match runner
            .execute(ExecuteOptions {
                model: request.model,
                prompt: request.prompt,
                working_directory: request.working_directory,
                session_id: request.session_id,
                injected_tool_servers: request.injected_tool_servers,
                cancellation: request.cancellation.clone(),
            })
            .await
        {
            Ok(handle) => handle,
            Err(error) => return self.finish_failed(job, error),
        };

        self.drive_stream(&mut job, handle, &request.cancellation)
            .await?;

        Ok(job)
    }

    async fn drive_stream(
        &self,
        job: &mut Job,
        mut handle: herd_runner::RunnerHandle,
        cancellation: &CancellationToken,
    ) -> Result<(), ExecuteError> {
        let mut last_assistant_text: Option<String> = None;
        let mut runner_error: Option<RunnerError> = None;

        loop {
            tokio::select! {
                biased;
                () = cancellation.cancelled() => {
                    self.record_cancellation(job)?;
                    return Ok(());
                }
                message = handle.messages.recv() => {
                    match message {
                        None => break,
                        Some(Ok(message)) => {
                            self.record_message(job, &message)?;
                            if let JobOutputMessage::Assistant { text, .. } = &message {
                                last_assistant_text = Some(text.clone());
                            }
                        }
                        Some(Err(error)) => {
                            runner_error = Some(error);
                            break;
                        }
                    }
                }
            }
        }

        match runner_error {
            Some(error) => {
                self.record_runner_error(job, &error)?;
            }
            None => {
                job.finish(
                    JobStatus::Completed,
                    ExitReason::Success,
                    self.clock.now_utc(),
                    last_assistant_text,
                );
                write_job_metadata(&self.state_dir, job)?;
                tracing::info!(
                    job_id = %job.id,
                    duration_seconds = job.duration_seconds.unwrap_or(0),
                    "job completed"
                );
                self.bus.publish(Event::JobCompleted {
                    job: job.clone(),
                    duration_seconds: job.duration_seconds.unwrap_or(0),
                });
            }
        }
        Ok(())
    }

    fn record_message(
        &self,
        job: &mut Job,
        message: &JobOutputMessage,
    ) -> Result<(), ExecuteError> {
        append_output(&self.state_dir, &job.id, message)?;
        let (output, stream) = render_for_bus(message);
        self.bus.publish(Event::JobOutput {
            job_id: job.id.clone(),
            agent_name: job.agent.clone(),
            output,
            stream,
            timestamp: message.timestamp(),
        });

        if let Some(session_id) = message.announced_session_id() {
            job.session_id = Some(session_id.to_string());
            write_job_metadata(&self.state_dir, job)?;
            write_agent_session(&self.state_dir, &job.agent, session_id)?;
        }
        Ok(())
    }

    fn record_runner_error(&self, job: &mut Job, error: &RunnerError) -> Result<(), ExecuteError> {
        let now = self.clock.now_utc();
        append_output(
            &self.state_dir,
            &job.id,
            &JobOutputMessage::Error {
                timestamp: now,
                message: error.to_string(),
                code: None,
            },
        )?;
        job.finish(JobStatus::Failed, ExitReason::Error, now, None);
        write_job_metadata(&self.state_dir, job)?;
        tracing::warn!(job_id = %job.id, error = %error, "job failed");
        self.bus.publish(Event::JobFailed {
            job: job.clone(),
            error: JobErrorPayload {
                kind: runner_error_kind(error).to_string(),
                message: error.to_string(),
                code: None,
            },
        });
        Ok(())
    }

    fn record_cancellation(&self, job: &mut Job) -> Result<(), ExecuteError> {
        let now = self.clock.now_utc();
        append_output(
            &self.state_dir,
            &job.id,
            &JobOutputMessage::System {
                timestamp: now,
                subtype: "cancelled".to_string(),
                session_id: None,
                text: Some("job cancelled".to_string()),
            },
        )?;
        job.finish(JobStatus::Cancelled, ExitReason::Cancelled, now, None);
        write_job_metadata(&self.state_dir, job)?;
        self.bus.publish(Event::JobCancelled {
            job: job.clone(),
            reason: "cancelled".to_string(),
        });
        Ok(())
    }

    fn finish_failed(&self, mut job: Job, error: RunnerError) -> Result<Job, ExecuteError> {
        let now = self.clock.now_utc();
        job.finish(JobStatus::Failed, ExitReason::Error, now, None);
        write_job_metadata(&self.state_dir, &job)?;
        self.bus.publish(Event::JobFailed {
            job: job.clone(),
            error: JobErrorPayload {
                kind: runner_error_kind(&error).to_string(),
                message: error.to_string(),
                code: None,
            },
        });
        Ok(job)
    }
}

fn runner_error_kind(error: &RunnerError) -> &'static str {
    match error {
        RunnerError::SdkInitialization { .. } => "sdk_initialization",
        RunnerError::SdkStreaming { .. } => "sdk_streaming",
        RunnerError::MalformedResponse { .. } => "malformed_response",
    }
}

pub fn output_log_path(state_dir: &Path, job_id: &JobId) -> PathBuf {
    herd_storage::job_output_path(state_dir, job_id)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
