// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl validate`: load the fleet config and report the first error,
//! without touching any state on disk.

use crate::cli::Cli;
use crate::commands::Context;
use crate::exit_error::ExitError;
use crate::output::format_or_json;
use serde::Serialize;

#[derive(Serialize)]
struct ValidationReport {
    config_path: String,
    agent_count: usize,
    root_name: Option<String>,
}

pub fn run(cli: &Cli) -> Result<(), ExitError> {
    let ctx = Context::resolve(cli)?;
    let loaded = herd_config::load(&ctx.root_config_path, ctx.dotenv_path.as_deref())?;

    let report = ValidationReport {
        config_path: ctx.root_config_path.display().to_string(),
        agent_count: loaded.agents.len(),
        root_name: loaded.root_name.clone(),
    };

    format_or_json(ctx.format, &report, || {
        println!("{} is valid", report.config_path);
        println!("{} agent(s) resolved", report.agent_count);
        if let Some(name) = &report.root_name {
            println!("root fleet name: {name}");
        }
    })?;

    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
