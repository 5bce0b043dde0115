//! Help/usage/init specs: the surface a first-time operator hits first.

use crate::support::{OutputExt, Project};

#[test]
fn herdctl_no_args_shows_usage_and_exits_nonzero() {
    let project = Project::empty();
    project.herdctl().output().unwrap().failed().stderr_has("Usage:");
}

#[test]
fn herdctl_help_shows_usage() {
    let project = Project::empty();
    project.herdctl().arg("--help").output().unwrap().ok().stdout_has("Usage:");
}

#[test]
fn herdctl_start_help_shows_runner_cmd_flag() {
    let project = Project::empty();
    project
        .herdctl()
        .args(["start", "--help"])
        .output()
        .unwrap()
        .ok()
        .stdout_has("--runner-cmd");
}

#[test]
fn init_scaffolds_a_minimal_fleet() {
    let project = Project::empty();
    assert_cmd::Command::cargo_bin("herdctl")
        .unwrap()
        .current_dir(project.path())
        .args(["init", "--name", "monitor"])
        .output()
        .unwrap()
        .ok();

    assert!(project.path().join("herdctl.yaml").exists());
    assert!(project.path().join("monitor.yaml").exists());
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let project = Project::empty();
    let bin = || assert_cmd::Command::cargo_bin("herdctl").unwrap();

    bin()
        .current_dir(project.path())
        .arg("init")
        .output()
        .unwrap()
        .ok();
    bin()
        .current_dir(project.path())
        .arg("init")
        .output()
        .unwrap()
        .failed()
        .stderr_has("already exists");
}

#[test]
fn validate_succeeds_on_a_well_formed_single_agent_fleet() {
    let project = Project::empty();
    project.file("herdctl.yaml", "version: 1\nagents:\n  - path: monitor.yaml\n");
    project.file("monitor.yaml", "name: monitor\nprompt: say hi\n");

    project.herdctl().arg("validate").output().unwrap().ok();
}

#[test]
fn agents_reports_no_agents_configured_for_an_empty_fleet() {
    let project = Project::empty();
    project.file("herdctl.yaml", "version: 1\nagents: []\n");

    project
        .herdctl()
        .arg("agents")
        .output()
        .unwrap()
        .ok()
        .stdout_has("No agents configured");
}
