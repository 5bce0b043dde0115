// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Controller: per-agent concurrency gate, queue, and session
//! bookkeeping. One instance per resolved agent.

use crate::error::ConcurrencyLimitError;
use herd_core::{AgentStatus, JobId};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Held for the lifetime of one running job; dropping it frees the
/// concurrency slot (a no-op for bypassed admissions).
pub enum AdmissionPermit {
    Bounded(OwnedSemaphorePermit),
    Bypassed,
}

pub struct AgentController {
    name: String,
    max_concurrent: u32,
    schedule_count: u32,
    semaphore: Arc<Semaphore>,
    session_id: Mutex<Option<String>>,
    last_job_id: Mutex<Option<JobId>>,
}

impl AgentController {
    pub fn new(name: impl Into<String>, max_concurrent: u32, schedule_count: u32) -> Self {
        Self {
            name: name.into(),
            max_concurrent,
            schedule_count,
            semaphore: Arc::new(Semaphore::new(max_concurrent as usize)),
            session_id: Mutex::new(None),
            last_job_id: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn running_count(&self) -> u32 {
        self.max_concurrent - self.semaphore.available_permits() as u32
    }

    pub fn schedule_count(&self) -> u32 {
        self.schedule_count
    }

    pub fn status(&self) -> AgentStatus {
        if self.running_count() > 0 {
            AgentStatus::Running
        } else {
            AgentStatus::Idle
        }
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().clone()
    }

    pub fn set_session_id(&self, session_id: Option<String>) {
        *self.session_id.lock() = session_id;
    }

    pub fn last_job_id(&self) -> Option<JobId> {
        self.last_job_id.lock().clone()
    }

    pub fn set_last_job_id(&self, job_id: JobId) {
        *self.last_job_id.lock() = Some(job_id);
    }

    /// Admit one trigger intent. If a slot is free, returns immediately.
    /// Otherwise admission is rejected on the spot — a caller at its cap
    /// never waits for one to free up.
    pub fn admit(&self, bypass_concurrency_limit: bool) -> Result<AdmissionPermit, ConcurrencyLimitError> {
        if bypass_concurrency_limit {
            return Ok(AdmissionPermit::Bypassed);
        }

        match Arc::clone(&self.semaphore).try_acquire_owned() {
            Ok(permit) => Ok(AdmissionPermit::Bounded(permit)),
            Err(_) => Err(ConcurrencyLimitError {
                agent: self.name.clone(),
                current_jobs: self.running_count(),
                limit: self.max_concurrent,
            }),
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
