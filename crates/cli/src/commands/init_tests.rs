// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::cli::Cli;
use clap::Parser;

fn cli() -> Cli {
    Cli::parse_from(["herdctl", "init"])
}

#[test]
fn init_scaffolds_root_config_and_agent_file() {
    let dir = tempfile::tempdir().unwrap();
    let args = InitArgs {
        name: "monitor".to_string(),
        dir: Some(dir.path().to_path_buf()),
        force: false,
    };

    run(&cli(), &args).unwrap();

    let root = std::fs::read_to_string(dir.path().join("herdctl.yaml")).unwrap();
    assert!(root.contains("monitor.yaml"));
    let agent = std::fs::read_to_string(dir.path().join("monitor.yaml")).unwrap();
    assert!(agent.contains("name: monitor"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let args = InitArgs {
        name: "monitor".to_string(),
        dir: Some(dir.path().to_path_buf()),
        force: false,
    };
    run(&cli(), &args).unwrap();

    let err = run(&cli(), &args).unwrap_err();
    assert_eq!(err.code, crate::exit_error::CODE_CONFIG);
}

#[test]
fn init_with_force_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let args = InitArgs {
        name: "monitor".to_string(),
        dir: Some(dir.path().to_path_buf()),
        force: false,
    };
    run(&cli(), &args).unwrap();

    let args = InitArgs {
        force: true,
        ..args
    };
    run(&cli(), &args).unwrap();
}
