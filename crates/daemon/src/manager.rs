// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FleetManager`: the top-level facade. Owns the lifecycle state machine,
//! the agent controllers, and the scheduler; everything else in this
//! workspace is a collaborator it drives.

use crate::error::{
    AgentNotFoundError, FleetError, FleetManagerShutdownError, InvalidStateError, JobNotFoundError,
};
use crate::lifecycle::PidLock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herd_bus::{
    stream_job_output, stream_logs, AgentUpdatedPayload, Event, EventBus, JobOutputStream,
    LogStream, StreamLogsOptions,
};
use herd_core::{
    Agent, AgentStatus, Clock, ExitReason, FleetManagerStatus, FleetState, Job, JobId, JobStatus,
    Schedule, SystemClock, TriggerType,
};
use herd_engine::{AgentController, ExecuteRequest, JobExecutor, Scheduler, ScheduleHandler};
use herd_runner::Runner;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default)]
pub struct TriggerOptions {
    pub prompt: Option<String>,
    pub bypass_concurrency_limit: Option<bool>,
    pub trigger_type: Option<TriggerType>,
}

#[derive(Debug, Clone)]
pub struct StopOptions {
    pub timeout: Duration,
    pub cancel_on_timeout: bool,
    pub cancel_timeout: Duration,
}

impl Default for StopOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cancel_on_timeout: true,
            cancel_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentInfo {
    pub agent: Agent,
    pub status: AgentStatus,
    pub running_count: u32,
    pub schedule_count: u32,
    pub session_id: Option<String>,
    pub last_job_id: Option<JobId>,
}

struct RunningJob {
    agent_name: String,
    cancellation: CancellationToken,
}

struct Inner<C: Clock> {
    state_dir: PathBuf,
    root_config_path: PathBuf,
    dotenv_path: Option<PathBuf>,
    clock: C,
    bus: EventBus,
    runner: Arc<dyn Runner>,
    status: Mutex<FleetManagerStatus>,
    started_at: Mutex<Option<DateTime<Utc>>>,
    last_error: Mutex<Option<String>>,
    lock: Mutex<Option<PidLock>>,
    agents: Mutex<HashMap<String, Agent>>,
    controllers: Mutex<HashMap<String, Arc<AgentController>>>,
    scheduler: Mutex<Option<Arc<Scheduler<C>>>>,
    scheduler_shutdown: Mutex<Option<CancellationToken>>,
    scheduler_task: Mutex<Option<JoinHandle<()>>>,
    running_jobs: Mutex<HashMap<JobId, RunningJob>>,
}

/// Top-level facade over a loaded fleet. Cheap to clone — every clone
/// shares the same underlying state.
pub struct FleetManager<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> Clone for FleetManager<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Clock> FleetManager<C> {
    pub fn new(
        root_config_path: impl Into<PathBuf>,
        state_dir: impl Into<PathBuf>,
        dotenv_path: Option<PathBuf>,
        runner: Arc<dyn Runner>,
        clock: C,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state_dir: state_dir.into(),
                root_config_path: root_config_path.into(),
                dotenv_path,
                clock,
                bus: EventBus::new(),
                runner,
                status: Mutex::new(FleetManagerStatus::Uninitialized),
                started_at: Mutex::new(None),
                last_error: Mutex::new(None),
                lock: Mutex::new(None),
                agents: Mutex::new(HashMap::new()),
                controllers: Mutex::new(HashMap::new()),
                scheduler: Mutex::new(None),
                scheduler_shutdown: Mutex::new(None),
                scheduler_task: Mutex::new(None),
                running_jobs: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn status(&self) -> FleetManagerStatus {
        *self.inner.status.lock()
    }

    pub fn bus(&self) -> EventBus {
        self.inner.bus.clone()
    }

    fn require_status(
        &self,
        operation: &'static str,
        expected: FleetManagerStatus,
    ) -> Result<(), FleetError> {
        let current = *self.inner.status.lock();
        if current != expected {
            return Err(InvalidStateError {
                operation,
                current_state: current.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn set_status(&self, status: FleetManagerStatus) {
        *self.inner.status.lock() = status;
    }

    fn record_error(&self, message: impl Into<String>) {
        *self.inner.last_error.lock() = Some(message.into());
        self.set_status(FleetManagerStatus::Error);
    }

    /// Run the config loader, build one controller per resolved agent, and
    /// construct the scheduler. Never transitions past `initialized` on its
    /// own; `start()` is a separate step.
    pub async fn initialize(&self) -> Result<(), FleetError> {
        self.require_status("initialize", FleetManagerStatus::Uninitialized)?;

        let loaded = match herd_config::load(
            &self.inner.root_config_path,
            self.inner.dotenv_path.as_deref(),
        ) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.record_error(err.to_string());
                return Err(err.into());
            }
        };

        let mut agents = HashMap::new();
        let mut controllers = HashMap::new();
        let mut schedules = Vec::new();

        for agent in loaded.agents {
            let controller = Arc::new(AgentController::new(
                agent.qualified_name.clone(),
                agent.max_concurrent,
                agent.schedules.len() as u32,
            ));
            for schedule_config in &agent.schedules {
                schedules.push(Schedule::from_config(&agent.qualified_name, schedule_config));
            }
            controllers.insert(agent.qualified_name.clone(), controller);
            agents.insert(agent.qualified_name.clone(), agent);
        }

        let scheduler = match Scheduler::with_default_interval(
            self.inner.clock.clone(),
            self.inner.bus.clone(),
            schedules,
        ) {
            Ok(scheduler) => scheduler,
            Err(err) => {
                self.record_error(err.to_string());
                return Err(err.into());
            }
        };

        let pid_lock = PidLock::acquire(&self.inner.state_dir)?;

        *self.inner.agents.lock() = agents;
        *self.inner.controllers.lock() = controllers;
        *self.inner.scheduler.lock() = Some(Arc::new(scheduler));
        *self.inner.lock.lock() = Some(pid_lock);

        self.set_status(FleetManagerStatus::Initialized);
        Ok(())
    }

    /// Transition to `running` and start the scheduler's tick loop in the
    /// background. Does not block.
    pub async fn start(&self) -> Result<(), FleetError> {
        self.require_status("start", FleetManagerStatus::Initialized)?;

        let scheduler = self
            .inner
            .scheduler
            .lock()
            .clone()
            .expect("scheduler is set once initialize() succeeds");
        let shutdown = CancellationToken::new();
        let dispatch = SchedulerDispatch {
            manager: self.clone(),
        };
        let task_shutdown = shutdown.clone();
        let task = tokio::spawn(async move {
            scheduler.run(&dispatch, task_shutdown).await;
        });

        *self.inner.scheduler_shutdown.lock() = Some(shutdown);
        *self.inner.scheduler_task.lock() = Some(task);
        *self.inner.started_at.lock() = Some(self.inner.clock.now_utc());
        self.set_status(FleetManagerStatus::Running);
        Ok(())
    }

    /// Graceful shutdown: wait for running jobs up to `timeout`, optionally
    /// cancel stragglers and wait a further `cancel_timeout`, then release
    /// the pid lock. Returns `FleetManagerShutdownError{isTimeout}` if
    /// running jobs are still outstanding once both budgets elapse.
    pub async fn stop(&self, options: StopOptions) -> Result<(), FleetError> {
        self.require_status("stop", FleetManagerStatus::Running)?;
        self.set_status(FleetManagerStatus::Stopping);

        if let Some(shutdown) = self.inner.scheduler_shutdown.lock().take() {
            shutdown.cancel();
        }
        if let Some(task) = self.inner.scheduler_task.lock().take() {
            let _ = task.await;
        }

        if !self.wait_for_jobs_to_drain(options.timeout).await {
            if options.cancel_on_timeout {
                self.cancel_all_running_jobs();
                if !self.wait_for_jobs_to_drain(options.cancel_timeout).await {
                    self.record_error("shutdown timed out waiting for cancelled jobs to drain");
                    return Err(FleetManagerShutdownError::timeout().into());
                }
            } else {
                self.record_error("shutdown timed out with jobs still running");
                return Err(FleetManagerShutdownError::timeout().into());
            }
        }

        self.inner.lock.lock().take();
        self.set_status(FleetManagerStatus::Stopped);
        Ok(())
    }

    async fn wait_for_jobs_to_drain(&self, budget: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + budget;
        loop {
            if self.inner.running_jobs.lock().is_empty() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL.min(budget)).await;
        }
    }

    fn cancel_all_running_jobs(&self) {
        for job in self.inner.running_jobs.lock().values() {
            job.cancellation.cancel();
        }
    }

    /// Admit a trigger and return as soon as the job is `pending`. The
    /// agent's actual run happens on its own background task, so a slow or
    /// long-running agent never delays the caller — pair this with events
    /// on the bus or [`Self::stream_job_output`] to observe completion.
    pub async fn trigger(
        &self,
        qualified_name: &str,
        schedule_name: Option<&str>,
        options: TriggerOptions,
    ) -> Result<Job, FleetError> {
        self.trigger_internal(
            qualified_name,
            schedule_name,
            options.prompt,
            options.trigger_type.unwrap_or(TriggerType::Manual),
            options.bypass_concurrency_limit.unwrap_or(false),
            None,
            None,
            None,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn trigger_internal(
        &self,
        qualified_name: &str,
        schedule_name: Option<&str>,
        prompt_override: Option<String>,
        trigger_type: TriggerType,
        bypass_concurrency_limit: bool,
        forked_from: Option<JobId>,
        session_override: Option<String>,
        on_complete: Option<Box<dyn FnOnce() + Send>>,
    ) -> Result<Job, FleetError> {
        macro_rules! bail {
            ($err:expr) => {{
                if let Some(cb) = on_complete {
                    cb();
                }
                return Err($err.into());
            }};
        }

        if let Err(err) = self.require_status("trigger", FleetManagerStatus::Running) {
            bail!(err);
        }

        let found = self.inner.agents.lock().get(qualified_name).cloned();
        let agent = match found {
            Some(agent) => agent,
            None => {
                let available = self.inner.agents.lock().keys().cloned().collect();
                bail!(AgentNotFoundError {
                    qualified_name: qualified_name.to_string(),
                    available,
                });
            }
        };
        let controller = self
            .inner
            .controllers
            .lock()
            .get(qualified_name)
            .cloned()
            .expect("a controller exists for every resolved agent");

        let resume_session = schedule_name
            .and_then(|name| agent.schedules.iter().find(|s| s.name == name))
            .is_some_and(|s| s.resume_session);
        let session_id = session_override.or_else(|| {
            if resume_session {
                controller.session_id()
            } else {
                None
            }
        });

        let permit = match controller.admit(bypass_concurrency_limit) {
            Ok(permit) => permit,
            Err(err) => bail!(err),
        };

        let requested_id = JobId::generate(self.inner.clock.now_utc());
        let cancellation = CancellationToken::new();

        let request = ExecuteRequest {
            agent_name: qualified_name.to_string(),
            working_directory: agent.working_directory.clone(),
            model: agent.model.clone(),
            prompt: prompt_override
                .or_else(|| agent.prompt.clone())
                .unwrap_or_default(),
            schedule: schedule_name.map(str::to_string),
            trigger_type,
            forked_from,
            session_id,
            injected_tool_servers: Vec::new(),
            cancellation: cancellation.clone(),
            requested_id: Some(requested_id.clone()),
        };

        let executor = JobExecutor::new(&self.inner.state_dir, self.inner.bus.clone(), self.inner.clock.clone());
        let job = match executor.create_job(&request) {
            Ok(job) => job,
            Err(err) => bail!(err),
        };

        self.inner.running_jobs.lock().insert(
            requested_id.clone(),
            RunningJob {
                agent_name: qualified_name.to_string(),
                cancellation,
            },
        );

        let pending = job.clone();
        let manager = self.clone();
        let qualified_name = qualified_name.to_string();
        tokio::spawn(async move {
            let runner = manager.inner.runner.clone();
            let result = executor.run(runner.as_ref(), job, request).await;
            manager.inner.running_jobs.lock().remove(&requested_id);

            match result {
                Ok(job) => {
                    controller.set_last_job_id(job.id.clone());
                    if let Some(session_id) = &job.session_id {
                        controller.set_session_id(Some(session_id.clone()));
                    }
                    manager.inner.bus.publish(Event::AgentUpdated(AgentUpdatedPayload {
                        qualified_name: qualified_name.clone(),
                        status: controller.status(),
                        running_count: controller.running_count(),
                        schedule_count: controller.schedule_count(),
                        last_job_id: controller.last_job_id(),
                    }));
                }
                Err(err) => {
                    tracing::warn!(agent = %qualified_name, error = %err, "job run failed after admission");
                }
            }

            drop(permit);
            if let Some(cb) = on_complete {
                cb();
            }
        });

        Ok(pending)
    }

    /// Cancel a running job. A job that has already finished is a no-op;
    /// one the fleet never admitted is `JobNotFoundError`.
    pub async fn cancel_job(&self, job_id: &JobId, timeout: Duration) -> Result<(), FleetError> {
        let cancellation = self
            .inner
            .running_jobs
            .lock()
            .get(job_id)
            .map(|job| job.cancellation.clone());

        let Some(cancellation) = cancellation else {
            match herd_storage::read_job_metadata(&self.inner.state_dir, job_id) {
                Some(job) if job.status.is_terminal() => return Ok(()),
                Some(_) => {
                    return Err(herd_engine::JobCancelError {
                        job_id: job_id.clone(),
                        reason: "job is not tracked as running".to_string(),
                    }
                    .into())
                }
                None => return Err(JobNotFoundError { job_id: job_id.clone() }.into()),
            }
        };

        cancellation.cancel();
        let deadline = tokio::time::Instant::now() + timeout;
        while self.inner.running_jobs.lock().contains_key(job_id) {
            if tokio::time::Instant::now() >= deadline {
                self.force_terminate_job(job_id);
                return Err(herd_engine::JobCancelError {
                    job_id: job_id.clone(),
                    reason: "cancellation did not complete before the timeout".to_string(),
                }
                .into());
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL.min(timeout)).await;
        }
        Ok(())
    }

    /// Abandon a job whose cancellation did not complete within its budget:
    /// stop tracking it as running and, if its on-disk record is not
    /// already terminal, flush a forced-cancellation record so it never
    /// looks stuck from the outside. The worker itself is not waited on
    /// any further.
    fn force_terminate_job(&self, job_id: &JobId) {
        self.inner.running_jobs.lock().remove(job_id);

        let Some(mut job) = herd_storage::read_job_metadata(&self.inner.state_dir, job_id) else {
            return;
        };
        if job.status.is_terminal() {
            return;
        }

        job.finish(
            JobStatus::Cancelled,
            ExitReason::Forced,
            self.inner.clock.now_utc(),
            Some("forcibly terminated after cancellation timed out".to_string()),
        );
        if let Err(err) = herd_storage::write_job_metadata(&self.inner.state_dir, &job) {
            tracing::warn!(job_id = %job_id, error = %err, "failed to flush forced-cancellation state");
            return;
        }
        self.inner.bus.publish(Event::JobCancelled {
            job,
            reason: "forced".to_string(),
        });
    }

    /// Re-run the trigger pipeline for `jobId`'s agent, inheriting its
    /// session id and (by default) its prompt.
    pub async fn fork_job(&self, job_id: &JobId, prompt: Option<String>) -> Result<Job, FleetError> {
        let original = herd_storage::read_job_metadata(&self.inner.state_dir, job_id).ok_or_else(|| {
            herd_engine::JobForkError {
                original_job_id: job_id.clone(),
                reason: "original job not found".to_string(),
            }
        })?;

        self.trigger_internal(
            &original.agent,
            None,
            prompt.or_else(|| Some(original.prompt.clone())),
            TriggerType::Fork,
            false,
            Some(original.id.clone()),
            original.session_id.clone(),
            None,
        )
        .await
        .map_err(|err| match err {
            FleetError::AgentNotFound(AgentNotFoundError { qualified_name, .. }) => {
                herd_engine::JobForkError {
                    original_job_id: job_id.clone(),
                    reason: format!("original agent {qualified_name:?} no longer exists"),
                }
                .into()
            }
            other => other,
        })
    }

    /// Re-run the config loader and reconcile: new agents are added, agents
    /// no longer present are dropped (their controllers are simply
    /// discarded — any job still running against them keeps its own
    /// cancellation handle and finishes independently), and agents present
    /// in both are replaced with their freshly loaded configuration. A
    /// schedule's `lastRunAt`/`nextRunAt` is not preserved across reload for
    /// an agent whose definition changed at all; unaffected agents keep
    /// their schedule runtime state.
    pub async fn reload(&self) -> Result<(), FleetError> {
        if *self.inner.status.lock() == FleetManagerStatus::Stopping {
            return Err(InvalidStateError {
                operation: "reload",
                current_state: FleetManagerStatus::Stopping.to_string(),
            }
            .into());
        }

        let loaded = herd_config::load(&self.inner.root_config_path, self.inner.dotenv_path.as_deref())?;

        let previous_schedules: HashMap<(String, String), Schedule> = self
            .inner
            .scheduler
            .lock()
            .as_ref()
            .map(|scheduler| {
                scheduler
                    .schedules()
                    .into_iter()
                    .map(|s| ((s.agent.clone(), s.name.clone()), s))
                    .collect()
            })
            .unwrap_or_default();

        let mut agents = HashMap::new();
        let mut controllers = HashMap::new();
        let mut schedules = Vec::new();
        let existing_controllers = self.inner.controllers.lock().clone();

        for agent in loaded.agents {
            let controller = existing_controllers
                .get(&agent.qualified_name)
                .filter(|c| c.schedule_count() == agent.schedules.len() as u32)
                .cloned()
                .unwrap_or_else(|| {
                    Arc::new(AgentController::new(
                        agent.qualified_name.clone(),
                        agent.max_concurrent,
                        agent.schedules.len() as u32,
                    ))
                });

            for schedule_config in &agent.schedules {
                let key = (agent.qualified_name.clone(), schedule_config.name.clone());
                let schedule = previous_schedules
                    .get(&key)
                    .filter(|s| s.expression == schedule_config.expression && s.kind == schedule_config.kind)
                    .cloned()
                    .unwrap_or_else(|| Schedule::from_config(&agent.qualified_name, schedule_config));
                schedules.push(schedule);
            }

            controllers.insert(agent.qualified_name.clone(), controller);
            agents.insert(agent.qualified_name.clone(), agent);
        }

        let scheduler = Scheduler::with_default_interval(self.inner.clock.clone(), self.inner.bus.clone(), schedules)?;

        *self.inner.agents.lock() = agents;
        *self.inner.controllers.lock() = controllers;
        *self.inner.scheduler.lock() = Some(Arc::new(scheduler));

        Ok(())
    }

    pub fn fleet_status(&self) -> FleetState {
        let agents = self.inner.agents.lock();
        let controllers = self.inner.controllers.lock();
        let running_agents = controllers.values().filter(|c| c.running_count() > 0).count();
        let schedules = self
            .inner
            .scheduler
            .lock()
            .as_ref()
            .map(|s| s.schedules())
            .unwrap_or_default();
        let running_schedules = schedules
            .iter()
            .filter(|s| s.status == herd_core::ScheduleStatus::Running)
            .count();

        FleetState {
            status: *self.inner.status.lock(),
            total_agents: agents.len(),
            idle_agents: agents.len().saturating_sub(running_agents),
            running_agents,
            total_schedules: schedules.len(),
            running_schedules,
            running_jobs: self.inner.running_jobs.lock().len(),
            started_at: *self.inner.started_at.lock(),
            last_error: self.inner.last_error.lock().clone(),
        }
    }

    pub fn agent_info(&self, qualified_name: &str) -> Option<AgentInfo> {
        let agent = self.inner.agents.lock().get(qualified_name)?.clone();
        let controller = self.inner.controllers.lock().get(qualified_name)?.clone();
        Some(AgentInfo {
            agent,
            status: controller.status(),
            running_count: controller.running_count(),
            schedule_count: controller.schedule_count(),
            session_id: controller.session_id(),
            last_job_id: controller.last_job_id(),
        })
    }

    /// Look up by the agent's bare `name` rather than its qualified path.
    /// Ambiguous only if two distinct fleets declare the same leaf name,
    /// which config loading already forbids at any single level — but
    /// nothing stops it across unrelated branches, so the first match wins.
    pub fn agent_info_by_name(&self, name: &str) -> Option<AgentInfo> {
        let qualified_name = self
            .inner
            .agents
            .lock()
            .values()
            .find(|agent| agent.name == name)
            .map(|agent| agent.qualified_name.clone())?;
        self.agent_info(&qualified_name)
    }

    pub fn schedules(&self) -> Vec<Schedule> {
        self.inner
            .scheduler
            .lock()
            .as_ref()
            .map(|s| s.schedules())
            .unwrap_or_default()
    }

    pub fn stream_logs(&self, options: StreamLogsOptions) -> LogStream {
        let filter = herd_storage::JobFilter {
            agent: options.agent_name.clone(),
            ..Default::default()
        };
        let (jobs, _errors) = herd_storage::list_jobs(&self.inner.state_dir, &filter);
        stream_logs(&self.inner.state_dir, &jobs, &self.inner.bus, options)
    }

    pub fn stream_agent_logs(&self, agent_name: &str, include_history: bool) -> LogStream {
        self.stream_logs(StreamLogsOptions {
            agent_name: Some(agent_name.to_string()),
            include_history,
            ..Default::default()
        })
    }

    pub fn stream_job_output(&self, job_id: &JobId) -> notify::Result<JobOutputStream> {
        stream_job_output(&self.inner.state_dir, job_id)
    }

    pub fn state_dir(&self) -> &Path {
        &self.inner.state_dir
    }
}

/// Bridges the scheduler's "this schedule came due" callback back into the
/// manager's trigger pipeline, marking the schedule running/idle around it
/// so a slow job doesn't get double-fired on the next tick.
struct SchedulerDispatch<C: Clock> {
    manager: FleetManager<C>,
}

#[async_trait]
impl<C: Clock> ScheduleHandler for SchedulerDispatch<C> {
    /// Admits the trigger and returns — the agent's run itself happens on
    /// a background task started by `trigger_internal`, so one slow agent
    /// never holds up the due-list loop for the others. The schedule is
    /// kept `running` (so it can't double-fire) until that background task
    /// actually finishes, not until admission returns.
    async fn on_due(&self, agent_name: &str, schedule_name: &str) {
        if let Some(scheduler) = self.manager.inner.scheduler.lock().clone() {
            scheduler.mark_running(agent_name, schedule_name);
        }

        let manager = self.manager.clone();
        let agent_name = agent_name.to_string();
        let schedule_name = schedule_name.to_string();
        let mark_idle = {
            let manager = manager.clone();
            let agent_name = agent_name.clone();
            let schedule_name = schedule_name.clone();
            move || {
                if let Some(scheduler) = manager.inner.scheduler.lock().clone() {
                    scheduler.mark_idle(&agent_name, &schedule_name);
                }
            }
        };

        let result = manager
            .trigger_internal(
                &agent_name,
                Some(&schedule_name),
                None,
                TriggerType::Schedule,
                false,
                None,
                None,
                Some(Box::new(mark_idle)),
            )
            .await;

        if let Err(err) = result {
            tracing::warn!(agent_name, schedule_name, error = %err, "scheduled trigger failed");
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
