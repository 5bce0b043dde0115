// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl agents`: list configured agents and their most recent job.

use crate::cli::Cli;
use crate::commands::Context;
use crate::exit_error::ExitError;
use crate::output::handle_list;
use herd_core::{JobId, JobStatus};
use herd_storage::JobFilter;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AgentRow {
    qualified_name: String,
    description: Option<String>,
    max_concurrent: u32,
    schedule_count: usize,
    last_job_id: Option<JobId>,
    last_job_status: Option<JobStatus>,
}

pub async fn run(cli: &Cli) -> Result<(), ExitError> {
    let ctx = Context::resolve(cli)?;
    let loaded = herd_config::load(&ctx.root_config_path, ctx.dotenv_path.as_deref())?;

    let rows: Vec<AgentRow> = loaded
        .agents
        .iter()
        .map(|agent| {
            let (jobs, _) = herd_storage::list_jobs(
                &ctx.state_dir,
                &JobFilter {
                    agent: Some(agent.qualified_name.clone()),
                    ..Default::default()
                },
            );
            let last = jobs.into_iter().next();
            AgentRow {
                qualified_name: agent.qualified_name.clone(),
                description: agent.description.clone(),
                max_concurrent: agent.max_concurrent,
                schedule_count: agent.schedules.len(),
                last_job_id: last.as_ref().map(|job| job.id.clone()),
                last_job_status: last.as_ref().map(|job| job.status),
            }
        })
        .collect();

    handle_list(ctx.format, &rows, "No agents configured", |rows, out| {
        for row in rows {
            let status = row
                .last_job_status
                .map(|status| status.to_string())
                .unwrap_or_else(|| "never run".to_string());
            let _ = writeln!(
                out,
                "{:<28} concurrency={:<3} schedules={:<3} last={}",
                row.qualified_name, row.max_concurrent, row.schedule_count, status
            );
        }
    })?;

    Ok(())
}

#[cfg(test)]
#[path = "agents_tests.rs"]
mod tests;
