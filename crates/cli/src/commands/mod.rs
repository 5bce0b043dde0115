// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod agents;
pub mod init;
pub mod logs;
pub mod start;
pub mod status;
pub mod stop;
pub mod trigger;
pub mod validate;

use crate::cli::{Cli, Command};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use herd_core::SystemClock;
use herd_daemon::FleetManager;
use herd_runner::{ProcessRunner, Runner};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolved, shared inputs every subcommand needs: where the config lives,
/// where state is kept, and how output should be rendered.
pub struct Context {
    pub root_config_path: PathBuf,
    pub state_dir: PathBuf,
    pub dotenv_path: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Context {
    pub fn resolve(cli: &Cli) -> Result<Self, ExitError> {
        let cwd = std::env::current_dir()?;
        let root_config_path = herd_config::resolve_root_config(cli.config.as_deref(), &cwd)?;
        let state_dir = cli
            .state_dir
            .clone()
            .unwrap_or_else(|| default_state_dir(&root_config_path));
        Ok(Self {
            root_config_path,
            state_dir,
            dotenv_path: cli.dotenv.clone(),
            format: cli.format,
        })
    }
}

fn default_state_dir(root_config_path: &Path) -> PathBuf {
    if let Ok(dir) = std::env::var("HERDCTL_STATE_DIR") {
        return PathBuf::from(dir);
    }
    root_config_path
        .parent()
        .map(|dir| dir.join(".herdctl"))
        .unwrap_or_else(|| PathBuf::from(".herdctl"))
}

/// Build the single [`Runner`] backend shared by every agent, from an
/// explicit `--runner-cmd` or the `HERDCTL_RUNNER_CMD` environment variable
/// (`program arg1 arg2 ...`, whitespace-split). The concrete agent runtime
/// binary is a deployment detail, not part of the fleet config schema, so
/// it is supplied out of band rather than per agent.
pub fn build_runner(runner_cmd: &Option<String>) -> Result<Arc<dyn Runner>, ExitError> {
    let raw = runner_cmd.clone().or_else(|| std::env::var("HERDCTL_RUNNER_CMD").ok()).ok_or_else(|| {
        ExitError::config("no runner command configured; pass --runner-cmd or set HERDCTL_RUNNER_CMD")
    })?;
    let mut parts = raw.split_whitespace();
    let program =
        parts.next().ok_or_else(|| ExitError::config("--runner-cmd must not be empty"))?.to_string();
    let args = parts.map(str::to_string).collect();
    Ok(Arc::new(ProcessRunner::new(program, args)))
}

pub fn build_manager(ctx: &Context, runner: Arc<dyn Runner>) -> FleetManager<SystemClock> {
    FleetManager::new(
        ctx.root_config_path.clone(),
        ctx.state_dir.clone(),
        ctx.dotenv_path.clone(),
        runner,
        SystemClock,
    )
}

pub async fn dispatch(cli: &Cli) -> Result<(), ExitError> {
    match &cli.command {
        Command::Init(args) => init::run(cli, args),
        Command::Validate => validate::run(cli),
        Command::Start(args) => start::run(cli, args).await,
        Command::Stop(args) => stop::run(cli, args),
        Command::Status => status::run(cli).await,
        Command::Agents => agents::run(cli).await,
        Command::Trigger(args) => trigger::run(cli, args).await,
        Command::Logs(args) => logs::run(cli, args).await,
    }
}
