// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl trigger`: run one agent once, outside of its schedule.
//!
//! This spins up its own short-lived fleet manager for the duration of the
//! single trigger rather than talking to an already-running `start`
//! process (there is no IPC channel for that) — so it fails fast if a
//! `start` already holds the state dir's pid lock.

use crate::cli::Cli;
use crate::commands::{build_manager, build_runner, Context};
use crate::exit_error::ExitError;
use crate::output::format_or_json;
use clap::Args;
use herd_daemon::{StopOptions, TriggerOptions};
use std::time::Duration;

#[derive(Args)]
pub struct TriggerArgs {
    /// Qualified agent name, e.g. `team/monitor`.
    pub agent: String,

    /// Run as this named schedule (affects session-resume behavior only).
    #[arg(long)]
    pub schedule: Option<String>,

    /// Override the agent's configured prompt for this run.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Run even if the agent is already at its concurrency limit.
    #[arg(long)]
    pub bypass_concurrency_limit: bool,

    /// Agent runtime command, `program arg1 arg2 ...`. Falls back to
    /// `HERDCTL_RUNNER_CMD` if omitted.
    #[arg(long)]
    pub runner_cmd: Option<String>,
}

pub async fn run(cli: &Cli, args: &TriggerArgs) -> Result<(), ExitError> {
    let ctx = Context::resolve(cli)?;
    let runner = build_runner(&args.runner_cmd)?;
    let manager = build_manager(&ctx, runner);

    manager.initialize().await?;
    manager.start().await?;

    let options = TriggerOptions {
        prompt: args.prompt.clone(),
        bypass_concurrency_limit: Some(args.bypass_concurrency_limit),
        trigger_type: None,
    };
    let result = manager.trigger(&args.agent, args.schedule.as_deref(), options).await;

    // Best-effort: release the pid lock either way so a stale one-shot
    // process never blocks a subsequent `start` or `trigger`.
    let _ = manager
        .stop(StopOptions {
            timeout: Duration::from_secs(10),
            ..Default::default()
        })
        .await;

    let job = result?;
    // `trigger` now returns as soon as the job is admitted, but `stop` above
    // has already drained it to a terminal state on disk — read that back
    // rather than reporting the stale pending snapshot.
    let job = herd_storage::read_job_metadata(&ctx.state_dir, &job.id).unwrap_or(job);

    format_or_json(ctx.format, &job, || {
        println!("job {} ({:?})", job.id, job.status);
        if let Some(summary) = &job.summary {
            println!("{summary}");
        }
    })?;

    if job.status == herd_core::JobStatus::Failed {
        return Err(ExitError::runtime(format!("job {} failed", job.id)));
    }
    Ok(())
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
