// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl`: the command-line surface over [`herd_daemon::FleetManager`].
//!
//! Deliberately thin — every command either builds a fleet manager for the
//! span of one invocation or talks to an already-running `start` process
//! through the filesystem (pid file, job/output files). There is no IPC
//! layer; see [`commands::stop`] and [`commands::status`] for what that
//! costs each command.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod cli;
mod color;
mod commands;
mod exit_error;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _file_guard = init_tracing(&cli);

    if let Err(err) = commands::dispatch(&cli).await {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }
}

/// Foreground logging goes to stderr for one-shot commands; `start`, which
/// otherwise has nowhere to send its logs once detached from a terminal,
/// additionally writes to `<stateDir>/herdctl.log`.
fn init_tracing(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Command::Start(_) = &cli.command else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return None;
    };

    let Ok(ctx) = commands::Context::resolve(cli) else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return None;
    };
    if std::fs::create_dir_all(&ctx.state_dir).is_err() {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&ctx.state_dir, "herdctl.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).with_ansi(false).init();
    Some(guard)
}
