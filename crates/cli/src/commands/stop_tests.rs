// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

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
        "stop",
    ])
}

#[test]
fn stop_errors_when_no_pid_file() {
    let config_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    write(config_dir.path(), "herdctl.yaml", "version: 1\nagents:\n  - path: monitor.yaml\n");
    write(config_dir.path(), "monitor.yaml", "name: monitor\nprompt: say hi\n");

    let cli = cli_for(&config_dir.path().join("herdctl.yaml"), state_dir.path());
    let err = run(&cli, &StopArgs { wait: 1 }).unwrap_err();
    assert_eq!(err.code, crate::exit_error::CODE_CONFIG);
}

#[test]
fn stop_errors_on_corrupt_pid_file() {
    let config_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    write(config_dir.path(), "herdctl.yaml", "version: 1\nagents:\n  - path: monitor.yaml\n");
    write(config_dir.path(), "monitor.yaml", "name: monitor\nprompt: say hi\n");
    std::fs::write(herd_storage::pid_path(state_dir.path()), "not-a-pid").unwrap();

    let cli = cli_for(&config_dir.path().join("herdctl.yaml"), state_dir.path());
    let err = run(&cli, &StopArgs { wait: 1 }).unwrap_err();
    assert_eq!(err.code, crate::exit_error::CODE_RUNTIME);
}

#[test]
#[cfg(unix)]
fn stop_succeeds_once_pid_file_disappears() {
    let config_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    write(config_dir.path(), "herdctl.yaml", "version: 1\nagents:\n  - path: monitor.yaml\n");
    write(config_dir.path(), "monitor.yaml", "name: monitor\nprompt: say hi\n");

    let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
    std::fs::write(herd_storage::pid_path(state_dir.path()), child.id().to_string()).unwrap();

    let pid_path = herd_storage::pid_path(state_dir.path());
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(200));
        let _ = std::fs::remove_file(&pid_path);
    });

    let cli = cli_for(&config_dir.path().join("herdctl.yaml"), state_dir.path());
    run(&cli, &StopArgs { wait: 5 }).unwrap();
    let _ = child.wait();
}

#[test]
#[cfg(unix)]
fn stop_times_out_when_pid_file_never_disappears() {
    let config_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    write(config_dir.path(), "herdctl.yaml", "version: 1\nagents:\n  - path: monitor.yaml\n");
    write(config_dir.path(), "monitor.yaml", "name: monitor\nprompt: say hi\n");

    let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
    std::fs::write(herd_storage::pid_path(state_dir.path()), child.id().to_string()).unwrap();

    let cli = cli_for(&config_dir.path().join("herdctl.yaml"), state_dir.path());
    let err = run(&cli, &StopArgs { wait: 1 }).unwrap_err();
    assert_eq!(err.code, crate::exit_error::CODE_TIMEOUT);

    let _ = child.kill();
    let _ = child.wait();
    let _ = std::fs::remove_file(herd_storage::pid_path(state_dir.path()));
}
