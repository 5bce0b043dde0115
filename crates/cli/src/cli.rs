// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `herdctl` argument grammar. Thin by design: this binary is a
//! convenience surface over [`herd_daemon::FleetManager`], not where the
//! fleet manager's behavior lives.

use crate::commands::{init, logs, start, stop, trigger};
use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "herdctl", version, about = "Fleet manager for autonomous coding agents", styles = crate::color::styles())]
pub struct Cli {
    /// Path to herdctl.yaml, or a directory containing it. Searched upward
    /// from the current directory when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory the fleet manager keeps job/session/pid state in.
    /// Defaults to `.herdctl` next to the resolved config file.
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// `.env` file to load agent-facing secrets from before launching agents.
    #[arg(long, global = true)]
    pub dotenv: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scaffold a new herdctl.yaml and one example agent file.
    Init(init::InitArgs),
    /// Load and validate the fleet config without starting anything.
    Validate,
    /// Run the fleet manager in the foreground until interrupted.
    Start(start::StartArgs),
    /// Signal a running `start` process to shut down.
    Stop(stop::StopArgs),
    /// Print fleet-wide status.
    Status,
    /// List configured agents and their current state.
    Agents,
    /// Run one agent once, outside of its schedule.
    Trigger(trigger::TriggerArgs),
    /// Print job output, optionally following a single job live.
    Logs(logs::LogsArgs),
}
