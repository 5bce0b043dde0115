// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;
use herd_core::JobBuilder;

fn write(dir: &std::path::Path, rel: &str, content: &str) {
    std::fs::write(dir.join(rel), content).unwrap();
}

fn cli_for(config_path: &std::path::Path, state_dir: &std::path::Path) -> crate::cli::Cli {
    crate::cli::Cli::parse_from([
        "herdctl",
        "--config",
        &config_path.to_string_lossy(),
        "--state-dir",
        &state_dir.to_string_lossy(),
        "agents",
    ])
}

#[tokio::test]
async fn agents_lists_configured_agents_with_last_job_status() {
    let config_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    write(config_dir.path(), "herdctl.yaml", "version: 1\nagents:\n  - path: monitor.yaml\n");
    write(config_dir.path(), "monitor.yaml", "name: monitor\nprompt: say hi\n");

    let job = JobBuilder::default()
        .agent("monitor")
        .status(JobStatus::Completed)
        .build();
    herd_storage::write_job_metadata(state_dir.path(), &job).unwrap();

    let cli = cli_for(&config_dir.path().join("herdctl.yaml"), state_dir.path());
    run(&cli).await.unwrap();
}

#[tokio::test]
async fn agents_errors_on_missing_config() {
    let config_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    write(config_dir.path(), "herdctl.yaml", "version: 1\nagents:\n  - path: missing.yaml\n");

    let cli = cli_for(&config_dir.path().join("herdctl.yaml"), state_dir.path());
    let err = run(&cli).await.unwrap_err();
    assert_eq!(err.code, crate::exit_error::CODE_CONFIG);
}
