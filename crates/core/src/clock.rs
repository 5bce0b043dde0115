// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides the current time, in both monotonic and calendar form.
///
/// The scheduler needs calendar time (for cron evaluation); cancellation
/// timeouts and backoff need monotonic time. Both come from the same trait
/// so a single `FakeClock` can drive both kinds of test.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    utc: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(start_utc: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            utc: Arc::new(Mutex::new(start_utc)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
        if let Ok(d) = chrono::Duration::from_std(duration) {
            *self.utc.lock() += d;
        }
    }

    /// Jump directly to a calendar time.
    pub fn set_utc(&self, utc: DateTime<Utc>) {
        *self.utc.lock() = utc;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        *self.utc.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
