// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl stop`: signal a running `start` process to shut down.
//!
//! There is no IPC channel between CLI invocations and the foreground
//! `start` process, so this reads the pid it wrote to `herdctl.pid` and
//! sends it a termination signal, then polls for the pid file to
//! disappear (the `start` process removes it as its last act via
//! [`herd_daemon::PidLock`]'s `Drop` impl).

use crate::cli::Cli;
use crate::commands::Context;
use crate::exit_error::ExitError;
use clap::Args;
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct StopArgs {
    /// Seconds to wait for the process to exit before giving up.
    #[arg(long, default_value_t = 35)]
    pub wait: u64,
}

pub fn run(cli: &Cli, args: &StopArgs) -> Result<(), ExitError> {
    let ctx = Context::resolve(cli)?;
    let pid_path = herd_storage::pid_path(&ctx.state_dir);

    let raw = std::fs::read_to_string(&pid_path)
        .map_err(|_| ExitError::config(format!("no running herdctl found at {}", ctx.state_dir.display())))?;
    let pid: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ExitError::runtime(format!("pid file {} is corrupt", pid_path.display())))?;

    send_terminate(pid)?;

    let deadline = Instant::now() + Duration::from_secs(args.wait);
    while pid_path.exists() {
        if Instant::now() >= deadline {
            return Err(ExitError::timeout(format!(
                "herdctl (pid {pid}) did not stop within {}s",
                args.wait
            )));
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    println!("herdctl (pid {pid}) stopped");
    Ok(())
}

#[cfg(unix)]
fn send_terminate(pid: u32) -> Result<(), ExitError> {
    let status = std::process::Command::new("kill")
        .arg("-TERM")
        .arg(pid.to_string())
        .status()
        .map_err(|err| ExitError::runtime(format!("failed to signal pid {pid}: {err}")))?;
    if !status.success() {
        return Err(ExitError::config(format!("no process with pid {pid} (stale pid file?)")));
    }
    Ok(())
}

#[cfg(not(unix))]
fn send_terminate(_pid: u32) -> Result<(), ExitError> {
    Err(ExitError::runtime("stop is only supported on unix platforms"))
}

#[cfg(test)]
#[path = "stop_tests.rs"]
mod tests;
