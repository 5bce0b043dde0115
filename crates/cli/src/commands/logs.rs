// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl logs`: print job output, history-only for a fleet-wide view,
//! or live-following one job.
//!
//! Live `--follow` only works with a specific `--job`: it watches that
//! job's output file on disk with `notify`, which works across processes.
//! A fleet-wide live tail would need the in-process event bus, which only
//! carries events published by this same process — there is no IPC to a
//! separately running `start`.

use crate::cli::Cli;
use crate::commands::Context;
use crate::exit_error::ExitError;
use clap::Args;
use herd_bus::render_for_bus;
use herd_core::JobId;
use herd_storage::JobFilter;
use std::str::FromStr;

#[derive(Args)]
pub struct LogsArgs {
    /// Restrict to one agent's jobs.
    #[arg(long)]
    pub agent: Option<String>,

    /// Restrict to one job, and required for --follow.
    #[arg(long)]
    pub job: Option<String>,

    /// Keep printing new output from --job as it arrives.
    #[arg(long)]
    pub follow: bool,
}

pub async fn run(cli: &Cli, args: &LogsArgs) -> Result<(), ExitError> {
    let ctx = Context::resolve(cli)?;

    let job_id = args.job.as_deref().map(JobId::from_str).transpose().map_err(|err| {
        ExitError::config(format!("invalid job id {:?}: {err}", args.job.as_deref().unwrap_or_default()))
    })?;

    if args.follow {
        let job_id =
            job_id.ok_or_else(|| ExitError::config("--follow requires --job"))?;
        return follow_job(&ctx.state_dir, &job_id).await;
    }

    print_history(&ctx.state_dir, args.agent.as_deref(), job_id.as_ref())
}

fn print_history(
    state_dir: &std::path::Path,
    agent: Option<&str>,
    job_id: Option<&JobId>,
) -> Result<(), ExitError> {
    let filter = JobFilter {
        agent: agent.map(str::to_string),
        ..Default::default()
    };
    let (mut jobs, _errors) = herd_storage::list_jobs(state_dir, &filter);
    if let Some(job_id) = job_id {
        jobs.retain(|job| &job.id == job_id);
    }
    jobs.sort_by_key(|job| job.started_at);

    if jobs.is_empty() {
        println!("No jobs found");
        return Ok(());
    }

    for job in &jobs {
        let messages = herd_storage::read_job_output_all(state_dir, &job.id, true)?;
        for message in messages {
            let (text, _stream) = render_for_bus(&message);
            println!("[{} {}] {text}", job.agent, job.id);
        }
    }
    Ok(())
}

async fn follow_job(state_dir: &std::path::Path, job_id: &JobId) -> Result<(), ExitError> {
    let mut stream = herd_bus::stream_job_output(state_dir, job_id)
        .map_err(|err| ExitError::runtime(format!("failed to watch job {job_id}: {err}")))?;

    let state_dir = state_dir.to_path_buf();
    let job_id_for_check = job_id.clone();
    let is_active = move || {
        herd_storage::read_job_metadata(&state_dir, &job_id_for_check)
            .map(|job| !job.status.is_terminal())
            .unwrap_or(false)
    };

    loop {
        tokio::select! {
            message = stream.next(is_active.clone()) => {
                match message {
                    Some(message) => {
                        let (text, _stream) = render_for_bus(&message);
                        println!("{text}");
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
