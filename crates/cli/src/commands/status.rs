// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl status`: a best-effort, offline view of the fleet.
//!
//! There is no IPC channel to a running `start` process, so this reports
//! what can be derived from disk alone: whether the pid file names a live
//! process, and job counts read straight out of `stateDir`.

use crate::cli::Cli;
use crate::commands::Context;
use crate::exit_error::ExitError;
use crate::output::format_or_json;
use herd_core::JobStatus;
use herd_storage::JobFilter;
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport {
    config_path: String,
    daemon_running: bool,
    pid: Option<u32>,
    total_agents: usize,
    running_jobs: usize,
}

pub async fn run(cli: &Cli) -> Result<(), ExitError> {
    let ctx = Context::resolve(cli)?;
    let loaded = herd_config::load(&ctx.root_config_path, ctx.dotenv_path.as_deref())?;

    let pid = read_pid(&ctx.state_dir);
    let daemon_running = pid.is_some_and(is_process_alive);

    let (running_jobs, _errors) = herd_storage::list_jobs(
        &ctx.state_dir,
        &JobFilter {
            status: Some(JobStatus::Running),
            ..Default::default()
        },
    );

    let report = StatusReport {
        config_path: ctx.root_config_path.display().to_string(),
        daemon_running,
        pid,
        total_agents: loaded.agents.len(),
        running_jobs: running_jobs.len(),
    };

    format_or_json(ctx.format, &report, || {
        println!(
            "herdctl: {}",
            if report.daemon_running { "running" } else { "stopped" }
        );
        if let Some(pid) = report.pid {
            println!("pid: {pid}");
        }
        println!("agents: {}", report.total_agents);
        println!("running jobs: {}", report.running_jobs);
    })?;

    Ok(())
}

fn read_pid(state_dir: &std::path::Path) -> Option<u32> {
    std::fs::read_to_string(herd_storage::pid_path(state_dir)).ok()?.trim().parse().ok()
}

#[cfg(unix)]
fn is_process_alive(pid: u32) -> bool {
    std::process::Command::new("kill").arg("-0").arg(pid.to_string()).status().is_ok_and(|s| s.success())
}

#[cfg(not(unix))]
fn is_process_alive(_pid: u32) -> bool {
    false
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
