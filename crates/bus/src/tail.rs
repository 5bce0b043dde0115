// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `streamLogs` / `streamJobOutput`: history replay followed by a live
//! subscription, unified behind a pull-style `next()` so callers drive
//! their own cancellation by simply stopping the loop.

use crate::bus::{EventBus, Subscription};
use crate::event::{render_for_bus, Event};
use chrono::{DateTime, Utc};
use herd_core::{Job, JobId};
use herd_storage::read_job_output_all;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub agent_name: Option<String>,
    pub job_id: Option<JobId>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

fn job_output_to_log_entry(job_id: &JobId, agent_name: &str, event: &Event) -> Option<LogEntry> {
    let Event::JobOutput {
        output, timestamp, ..
    } = event
    else {
        return None;
    };
    let level = if output.to_lowercase().contains("error") {
        LogLevel::Error
    } else {
        LogLevel::Info
    };
    Some(LogEntry {
        level,
        agent_name: Some(agent_name.to_string()),
        job_id: Some(job_id.clone()),
        message: output.clone(),
        timestamp: *timestamp,
    })
}

#[derive(Debug, Clone, Default)]
pub struct StreamLogsOptions {
    pub level: Option<LogLevel>,
    pub agent_name: Option<String>,
    pub job_id: Option<JobId>,
    pub include_history: bool,
    pub history_limit: Option<usize>,
}

impl StreamLogsOptions {
    fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(level) = self.level {
            if entry.level < level {
                return false;
            }
        }
        if let Some(agent_name) = &self.agent_name {
            if entry.agent_name.as_deref() != Some(agent_name.as_str()) {
                return false;
            }
        }
        if let Some(job_id) = &self.job_id {
            if entry.job_id.as_ref() != Some(job_id) {
                return false;
            }
        }
        true
    }
}

/// Unified log stream: drains buffered history first, then switches to
/// live `job:output` events matching the same filters.
pub struct LogStream {
    history: std::collections::VecDeque<LogEntry>,
    subscription: Subscription,
    options: StreamLogsOptions,
}

impl LogStream {
    pub async fn next(&mut self) -> LogEntry {
        loop {
            if let Some(entry) = self.history.pop_front() {
                return entry;
            }
            let event = self.subscription.recv().await;
            if let Event::JobOutput {
                job_id, agent_name, ..
            } = &event
            {
                if let Some(entry) = job_output_to_log_entry(job_id, agent_name, &event) {
                    if self.options.matches(&entry) {
                        return entry;
                    }
                }
            }
        }
    }
}

/// Build a `streamLogs` iterator. `state_dir` and `jobs_snapshot` provide
/// the history replay; `jobs_snapshot` is expected to already be filtered
/// to jobs the caller is authorized to see and sorted ascending by
/// `startedAt`, matching `listJobs`'s ordering contract reversed.
pub fn stream_logs(
    state_dir: &Path,
    jobs_snapshot: &[Job],
    bus: &EventBus,
    options: StreamLogsOptions,
) -> LogStream {
    let subscription = bus.subscribe();
    let mut history = std::collections::VecDeque::new();

    if options.include_history {
        let mut candidates: Vec<&Job> = jobs_snapshot
            .iter()
            .filter(|job| {
                options
                    .agent_name
                    .as_deref()
                    .is_none_or(|name| job.agent == name)
                    && options.job_id.as_ref().is_none_or(|id| &job.id == id)
            })
            .collect();
        candidates.sort_by_key(|job| job.started_at);

        'outer: for job in candidates {
            let messages = read_job_output_all(state_dir, &job.id, true).unwrap_or_default();
            for message in messages {
                let (text, _stream) = render_for_bus(&message);
                let level = if text.to_lowercase().contains("error") {
                    LogLevel::Error
                } else {
                    LogLevel::Info
                };
                let entry = LogEntry {
                    level,
                    agent_name: Some(job.agent.clone()),
                    job_id: Some(job.id.clone()),
                    message: text,
                    timestamp: message.timestamp(),
                };
                if options.matches(&entry) {
                    history.push_back(entry);
                    if let Some(limit) = options.history_limit {
                        if history.len() >= limit {
                            break 'outer;
                        }
                    }
                }
            }
        }
    }

    LogStream {
        history,
        subscription,
        options,
    }
}

/// A live tail of one job's output log: replay-then-watch.
pub struct JobOutputStream {
    state_dir: PathBuf,
    job_id: JobId,
    delivered: usize,
    watcher_events: mpsc::Receiver<()>,
    _watcher: RecommendedWatcher,
}

impl JobOutputStream {
    /// `next()` returns `None` once the job is terminal and the log has
    /// been fully drained.
    pub async fn next(&mut self, job_is_active: impl Fn() -> bool) -> Option<herd_core::JobOutputMessage> {
        loop {
            let all = read_job_output_all(&self.state_dir, &self.job_id, true).unwrap_or_default();
            if self.delivered < all.len() {
                let message = all[self.delivered].clone();
                self.delivered += 1;
                return Some(message);
            }
            if !job_is_active() {
                return None;
            }
            self.watcher_events.recv().await;
        }
    }
}

/// Start tailing `<jobId>.jsonl`. Replay happens lazily on the first
/// `next()` call so the caller controls when history is read.
pub fn stream_job_output(
    state_dir: &Path,
    job_id: &JobId,
) -> notify::Result<JobOutputStream> {
    let path = herd_storage::job_output_path(state_dir, job_id);
    let (tx, rx) = mpsc::channel(16);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if res.is_ok() {
            let _ = tx.try_send(());
        }
    })?;
    if let Some(parent) = path.parent() {
        if parent.exists() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }
    }

    Ok(JobOutputStream {
        state_dir: state_dir.to_path_buf(),
        job_id: job_id.clone(),
        delivered: 0,
        watcher_events: rx,
        _watcher: watcher,
    })
}

#[cfg(test)]
#[path = "tail_tests.rs"]
mod tests;
