// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job metadata and output-log persistence.

use crate::atomic::write_atomic_yaml;
use crate::error::StateFileError;
use crate::paths::{job_metadata_path, job_output_path, jobs_dir};
use chrono::{DateTime, Utc};
use herd_core::{Job, JobId, JobOutputMessage, JobStatus};
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::Path;

/// Write job metadata atomically. The writer calling this after a terminal
/// transition must not call it again — the store does not enforce that;
/// the executor's "never mutated after terminal" discipline does.
pub fn write_job_metadata(state_dir: &Path, job: &Job) -> Result<(), StateFileError> {
    let path = job_metadata_path(state_dir, &job.id);
    write_atomic_yaml(&path, job).map_err(StateFileError::from)
}

/// Read one job's metadata. Parse/schema failures are logged and treated
/// as "missing" rather than propagated, matching `listJobs`'s tolerance of
/// malformed files.
pub fn read_job_metadata(state_dir: &Path, job_id: &JobId) -> Option<Job> {
    let path = job_metadata_path(state_dir, job_id);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read job metadata");
            return None;
        }
    };
    match serde_yaml::from_str(&content) {
        Ok(job) => Some(job),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "malformed job metadata, treating as missing");
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub agent: Option<String>,
    pub status: Option<JobStatus>,
    pub started_after: Option<DateTime<Utc>>,
    pub started_before: Option<DateTime<Utc>>,
}

impl JobFilter {
    fn matches(&self, job: &Job) -> bool {
        if let Some(agent) = &self.agent {
            if &job.agent != agent {
                return false;
            }
        }
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if let Some(after) = self.started_after {
            if job.started_at.is_none_or(|t| t < after) {
                return false;
            }
        }
        if let Some(before) = self.started_before {
            if job.started_at.is_none_or(|t| t > before) {
                return false;
            }
        }
        true
    }
}

/// Scan `jobs/*.yaml`, ignoring non-matching and malformed filenames,
/// returning the matching jobs sorted by `startedAt` descending plus a
/// count of files that failed to parse.
pub fn list_jobs(state_dir: &Path, filter: &JobFilter) -> (Vec<Job>, usize) {
    let dir = jobs_dir(state_dir);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return (Vec::new(), 0),
    };

    let mut jobs = Vec::new();
    let mut error_count = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with("job-") || !name.ends_with(".yaml") {
            continue;
        }
        match std::fs::read_to_string(&path).ok().and_then(|c| serde_yaml::from_str::<Job>(&c).ok())
        {
            Some(job) if filter.matches(&job) => jobs.push(job),
            Some(_) => {}
            None => error_count += 1,
        }
    }

    jobs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    (jobs, error_count)
}

/// Append one message, flushed before returning.
pub fn append_output(
    state_dir: &Path,
    job_id: &JobId,
    message: &JobOutputMessage,
) -> Result<(), StateFileError> {
    let path = job_output_path(state_dir, job_id);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StateFileError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| StateFileError::Read {
            path: path.clone(),
            source,
        })?;
    let mut line = serde_json::to_string(message).map_err(|err| StateFileError::MalformedLine {
        path: path.clone(),
        line_number: 0,
        message: err.to_string(),
    })?;
    line.push('\n');
    file.write_all(line.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| StateFileError::Read {
            path: path.clone(),
            source,
        })?;
    Ok(())
}

/// Append a batch of messages, all stamped with `timestamp`. All-or-nothing:
/// the whole batch is serialized before any byte is written; on the first
/// unserializable message, no write happens and its index is reported.
pub fn append_output_batch(
    state_dir: &Path,
    job_id: &JobId,
    mut messages: Vec<JobOutputMessage>,
    timestamp: DateTime<Utc>,
) -> Result<(), BatchAppendError> {
    for message in &mut messages {
        restamp(message, timestamp);
    }
    let mut lines = String::new();
    for (index, message) in messages.iter().enumerate() {
        let json = serde_json::to_string(message).map_err(|err| BatchAppendError {
            first_invalid_index: index,
            message: err.to_string(),
        })?;
        lines.push_str(&json);
        lines.push('\n');
    }

    let path = job_output_path(state_dir, job_id);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| BatchAppendError {
            first_invalid_index: 0,
            message: err.to_string(),
        })?;
    file.write_all(lines.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|err| BatchAppendError {
            first_invalid_index: 0,
            message: err.to_string(),
        })
}

fn restamp(message: &mut JobOutputMessage, timestamp: DateTime<Utc>) {
    match message {
        JobOutputMessage::System { timestamp: t, .. }
        | JobOutputMessage::Assistant { timestamp: t, .. }
        | JobOutputMessage::ToolUse { timestamp: t, .. }
        | JobOutputMessage::ToolResult { timestamp: t, .. }
        | JobOutputMessage::Error { timestamp: t, .. } => *t = timestamp,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("batch append failed at message {first_invalid_index}: {message}")]
pub struct BatchAppendError {
    pub first_invalid_index: usize,
    pub message: String,
}

/// Read every message in the output log, in production order.
///
/// `skip_invalid`: malformed lines are logged and skipped rather than
/// raising [`StateFileError::MalformedLine`].
pub fn read_job_output_all(
    state_dir: &Path,
    job_id: &JobId,
    skip_invalid: bool,
) -> Result<Vec<JobOutputMessage>, StateFileError> {
    let path = job_output_path(state_dir, job_id);
    let file = match std::fs::File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(StateFileError::Read { path, source }),
    };
    let reader = std::io::BufReader::new(file);
    let mut messages = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| StateFileError::Read {
            path: path.clone(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<JobOutputMessage>(&line) {
            Ok(message) => messages.push(message),
            Err(err) if skip_invalid => {
                tracing::warn!(path = %path.display(), line_number, error = %err, "skipping malformed output line");
            }
            Err(err) => {
                return Err(StateFileError::MalformedLine {
                    path,
                    line_number,
                    message: err.to_string(),
                })
            }
        }
    }
    Ok(messages)
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
