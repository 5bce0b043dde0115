// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl start`: run the fleet manager in the foreground until
//! interrupted, then drain and exit. There is no background-daemon mode —
//! `stop` signals this process directly.

use crate::cli::Cli;
use crate::commands::{build_manager, build_runner, Context};
use crate::exit_error::ExitError;
use clap::Args;
use std::time::Duration;

#[derive(Args)]
pub struct StartArgs {
    /// Agent runtime command, `program arg1 arg2 ...`. Falls back to
    /// `HERDCTL_RUNNER_CMD` if omitted.
    #[arg(long)]
    pub runner_cmd: Option<String>,

    /// Seconds to wait for in-flight jobs to drain on shutdown.
    #[arg(long, default_value_t = 30)]
    pub shutdown_timeout: u64,
}

pub async fn run(cli: &Cli, args: &StartArgs) -> Result<(), ExitError> {
    let ctx = Context::resolve(cli)?;
    let runner = build_runner(&args.runner_cmd)?;
    let manager = build_manager(&ctx, runner);

    manager.initialize().await?;
    manager.start().await?;
    println!("herdctl running ({} agent(s)), pid {}", manager.fleet_status().total_agents, std::process::id());

    wait_for_shutdown_signal().await;
    println!("shutting down...");

    let options = herd_daemon::StopOptions {
        timeout: Duration::from_secs(args.shutdown_timeout),
        ..Default::default()
    };
    manager.stop(options).await?;
    println!("herdctl stopped");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to install SIGTERM handler, falling back to ctrl-c only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
