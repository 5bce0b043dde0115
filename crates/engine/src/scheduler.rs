// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler: single cooperative tick loop driving `interval` and `cron`
//! schedules. `webhook` and `chat` schedules are not time-driven and are
//! never fired from here.

use crate::cron_expr::{CronParseError, CronSchedule};
use crate::interval::parse_interval;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herd_bus::{Event, EventBus};
use herd_core::{Clock, Schedule, ScheduleStatus, ScheduleType};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(1000);

/// Invoked once per schedule that came due on a tick. Admission,
/// concurrency-limit handling, and execution all live with the caller; the
/// scheduler's only job is deciding *when*.
#[async_trait]
pub trait ScheduleHandler: Send + Sync {
    async fn on_due(&self, agent_name: &str, schedule_name: &str);
}

pub struct Scheduler<C: Clock> {
    clock: C,
    bus: EventBus,
    schedules: Mutex<Vec<Schedule>>,
    check_interval: Duration,
    check_count: AtomicU64,
    trigger_count: AtomicU64,
}

impl<C: Clock> Scheduler<C> {
    /// Validates every `cron` expression up front; an agent with a bad
    /// cron string never makes it into the running scheduler.
    pub fn new(
        clock: C,
        bus: EventBus,
        schedules: Vec<Schedule>,
        check_interval: Duration,
    ) -> Result<Self, CronParseError> {
        for schedule in &schedules {
            if schedule.kind == ScheduleType::Cron {
                CronSchedule::parse(&schedule.expression)?;
            }
        }
        Ok(Self {
            clock,
            bus,
            schedules: Mutex::new(schedules),
            check_interval,
            check_count: AtomicU64::new(0),
            trigger_count: AtomicU64::new(0),
        })
    }

    pub fn with_default_interval(clock: C, bus: EventBus, schedules: Vec<Schedule>) -> Result<Self, CronParseError> {
        Self::new(clock, bus, schedules, DEFAULT_CHECK_INTERVAL)
    }

    pub fn check_count(&self) -> u64 {
        self.check_count.load(Ordering::SeqCst)
    }

    pub fn trigger_count(&self) -> u64 {
        self.trigger_count.load(Ordering::SeqCst)
    }

    pub fn schedules(&self) -> Vec<Schedule> {
        self.schedules.lock().clone()
    }

    pub fn mark_running(&self, agent_name: &str, schedule_name: &str) {
        self.set_status(agent_name, schedule_name, ScheduleStatus::Running);
    }

    pub fn mark_idle(&self, agent_name: &str, schedule_name: &str) {
        self.set_status(agent_name, schedule_name, ScheduleStatus::Idle);
    }

    fn set_status(&self, agent_name: &str, schedule_name: &str, status: ScheduleStatus) {
        let mut schedules = self.schedules.lock();
        if let Some(schedule) = schedules
            .iter_mut()
            .find(|s| s.agent == agent_name && s.name == schedule_name)
        {
            if schedule.status != ScheduleStatus::Disabled {
                schedule.status = status;
            }
        }
    }

    /// One tick: returns the `(agentName, scheduleName)` pairs that came
    /// due, in agent-declaration order, and advances each fired schedule's
    /// `lastRunAt`/`nextRunAt`. Missed ticks never accumulate — a schedule
    /// whose window was slept through fires exactly once, for the window
    /// containing `now`, not once per missed window.
    pub fn tick(&self, now: DateTime<Utc>) -> Vec<(String, String)> {
        self.check_count.fetch_add(1, Ordering::SeqCst);
        let mut due = Vec::new();
        let mut schedules = self.schedules.lock();
        for schedule in schedules.iter_mut() {
            if !is_time_driven(schedule.kind) {
                continue;
            }
            if !schedule.enabled || schedule.status == ScheduleStatus::Disabled {
                continue;
            }
            if schedule.status == ScheduleStatus::Running {
                continue;
            }

            let next_run_at = match schedule.next_run_at {
                Some(at) => at,
                None => match compute_next_run(schedule, now) {
                    Some(at) => at,
                    None => continue,
                },
            };

            if next_run_at > now {
                schedule.next_run_at = Some(next_run_at);
                continue;
            }

            due.push((schedule.agent.clone(), schedule.name.clone()));
            schedule.last_run_at = Some(now);
            schedule.run_count += 1;
            schedule.next_run_at = compute_next_run(schedule, now);
            self.trigger_count.fetch_add(1, Ordering::SeqCst);
            self.bus.publish(Event::ScheduleTriggered {
                agent_name: schedule.agent.clone(),
                schedule_name: schedule.name.clone(),
            });
        }
        due
    }

    /// Drift-corrected run loop: each iteration sleeps only as long as is
    /// left of the configured interval, so tick processing time does not
    /// accumulate into ever-later wakeups.
    pub async fn run(&self, handler: &dyn ScheduleHandler, shutdown: CancellationToken) {
        let mut next_wake = self.clock.now() + self.check_interval;
        loop {
            let remaining = next_wake.saturating_duration_since(self.clock.now());
            tokio::select! {
                biased;
                () = shutdown.cancelled() => return,
                () = tokio::time::sleep(remaining) => {}
            }

            let due = self.tick(self.clock.now_utc());
            for (agent_name, schedule_name) in due {
                tracing::debug!(agent = %agent_name, schedule = %schedule_name, "schedule due");
                handler.on_due(&agent_name, &schedule_name).await;
            }

            next_wake += self.check_interval;
            let now = self.clock.now();
            if next_wake < now {
                // Fell behind by more than one interval; resync instead of
                // firing a burst of immediate ticks.
                next_wake = now + self.check_interval;
            }
        }
    }
}

fn is_time_driven(kind: ScheduleType) -> bool {
    matches!(kind, ScheduleType::Interval | ScheduleType::Cron)
}

fn compute_next_run(schedule: &Schedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match schedule.kind {
        ScheduleType::Interval => {
            let interval = parse_interval(&schedule.expression).ok()?;
            let base = schedule.last_run_at.unwrap_or(now);
            Some(base + interval)
        }
        ScheduleType::Cron => {
            let cron = CronSchedule::parse(&schedule.expression).ok()?;
            cron.next_after(now)
        }
        ScheduleType::Webhook | ScheduleType::Chat => None,
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
