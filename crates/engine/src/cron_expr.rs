// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! 5-field cron expression parsing and evaluation (`minute hour dom month
//! dow`, plus the common `@shorthand` forms). No crate in the dependency
//! tree offers this, so it is hand-rolled on top of `chrono`.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid cron expression {expression:?}: {reason}")]
pub struct CronParseError {
    pub expression: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct CronSchedule {
    minute: BTreeSet<u32>,
    hour: BTreeSet<u32>,
    day_of_month: BTreeSet<u32>,
    month: BTreeSet<u32>,
    day_of_week: BTreeSet<u32>,
    dom_restricted: bool,
    dow_restricted: bool,
}

fn expand_shorthand(expression: &str) -> &str {
    match expression.trim() {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        "@hourly" => "0 * * * *",
        other => other,
    }
}

fn parse_field(field: &str, min: u32, max: u32) -> Result<BTreeSet<u32>, String> {
    let mut values = BTreeSet::new();
    for part in field.split(',') {
        let (range_part, step) = match part.split_once('/') {
            Some((range, step)) => (
                range,
                step.parse::<u32>()
                    .map_err(|_| format!("invalid step {step:?}"))?,
            ),
            None => (part, 1),
        };
        if step == 0 {
            return Err("step cannot be zero".to_string());
        }

        let (start, end) = if range_part == "*" {
            (min, max)
        } else if let Some((a, b)) = range_part.split_once('-') {
            (
                a.parse::<u32>().map_err(|_| format!("invalid value {a:?}"))?,
                b.parse::<u32>().map_err(|_| format!("invalid value {b:?}"))?,
            )
        } else {
            let v = range_part
                .parse::<u32>()
                .map_err(|_| format!("invalid value {range_part:?}"))?;
            (v, v)
        };

        if start < min || end > max || start > end {
            return Err(format!("value out of range {min}..={max}: {range_part:?}"));
        }

        let mut v = start;
        while v <= end {
            values.insert(v);
            v += step;
        }
    }
    Ok(values)
}

impl CronSchedule {
    pub fn parse(expression: &str) -> Result<Self, CronParseError> {
        let expanded = expand_shorthand(expression);
        let fields: Vec<&str> = expanded.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(CronParseError {
                expression: expression.to_string(),
                reason: format!("expected 5 fields, got {}", fields.len()),
            });
        }
        let err = |reason: String| CronParseError {
            expression: expression.to_string(),
            reason,
        };

        let minute = parse_field(fields[0], 0, 59).map_err(err)?;
        let hour = parse_field(fields[1], 0, 23).map_err(err)?;
        let day_of_month = parse_field(fields[2], 1, 31).map_err(err)?;
        let month = parse_field(fields[3], 1, 12).map_err(err)?;
        // 0 and 7 both mean Sunday.
        let mut day_of_week = parse_field(fields[4], 0, 7).map_err(err)?;
        if day_of_week.remove(&7) {
            day_of_week.insert(0);
        }

        Ok(Self {
            dom_restricted: fields[2].trim() != "*",
            dow_restricted: fields[4].trim() != "*",
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        })
    }

    fn matches(&self, at: DateTime<Utc>) -> bool {
        if !self.minute.contains(&at.minute()) || !self.hour.contains(&at.hour()) {
            return false;
        }
        if !self.month.contains(&at.month()) {
            return false;
        }
        let dom_ok = self.day_of_month.contains(&at.day());
        let dow = at.weekday().num_days_from_sunday();
        let dow_ok = self.day_of_week.contains(&dow);

        // Standard cron semantics: when both day-of-month and day-of-week
        // are restricted, a match on either is sufficient (OR); otherwise
        // the unrestricted field is ignored (AND with a tautology).
        match (self.dom_restricted, self.dow_restricted) {
            (true, true) => dom_ok || dow_ok,
            _ => dom_ok && dow_ok,
        }
    }

    /// The first matching minute strictly after `after`, searching up to
    /// four years ahead. `None` means the expression can never fire (e.g.
    /// `30 2 29 2 *` combined with a day-of-week restriction that never
    /// lands on February 29th within the search window).
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = (after + Duration::minutes(1))
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))?;
        let limit = start + Duration::days(4 * 366);
        let mut candidate = start;
        while candidate < limit {
            if self.matches(candidate) {
                return Some(candidate);
            }
            candidate += Duration::minutes(1);
        }
        None
    }
}

#[cfg(test)]
#[path = "cron_expr_tests.rs"]
mod tests;
