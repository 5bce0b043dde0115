// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl init`: scaffold a new fleet in an empty directory.

use crate::cli::Cli;
use crate::exit_error::ExitError;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Name of the example agent to scaffold.
    #[arg(long, default_value = "example")]
    pub name: String,

    /// Directory to scaffold into. Defaults to the current directory.
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Overwrite herdctl.yaml / the agent file if they already exist.
    #[arg(long)]
    pub force: bool,
}

pub fn run(_cli: &Cli, args: &InitArgs) -> Result<(), ExitError> {
    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&dir)?;

    let root_path = dir.join("herdctl.yaml");
    let agent_path = dir.join(format!("{}.yaml", args.name));

    if !args.force {
        if root_path.exists() {
            return Err(ExitError::config(format!("{} already exists; pass --force", root_path.display())));
        }
        if agent_path.exists() {
            return Err(ExitError::config(format!(
                "{} already exists; pass --force",
                agent_path.display()
            )));
        }
    }

    let root_contents = format!(
        "version: 1\nagents:\n  - path: {agent}.yaml\n",
        agent = args.name
    );
    let agent_contents = format!(
        "name: {name}\nprompt: |\n  You are {name}, a helpful autonomous agent.\nmax_concurrent: 1\nschedules: []\n",
        name = args.name
    );

    std::fs::write(&root_path, root_contents)?;
    std::fs::write(&agent_path, agent_contents)?;

    println!("Wrote {}", root_path.display());
    println!("Wrote {}", agent_path.display());
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
