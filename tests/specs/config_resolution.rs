//! Fleet-of-fleets resolution specs: qualified names, cycle detection, and
//! same-level name collisions, driven through `herdctl validate` since that
//! command does nothing but load and report on the resolved tree.

use crate::support::{OutputExt, Project};

#[test]
fn qualified_names_combine_root_and_sub_fleet_agents() {
    let project = Project::empty();
    project.file(
        "herdctl.yaml",
        "version: 1\nagents:\n  - path: monitor.yaml\nfleets:\n  - path: project-a/herdctl.yaml\n    name: project-a\n",
    );
    project.file("monitor.yaml", "name: monitor\nprompt: watch things\n");
    project.file(
        "project-a/herdctl.yaml",
        "version: 1\nagents:\n  - path: engineer.yaml\n  - path: security-auditor.yaml\n",
    );
    project.file("project-a/engineer.yaml", "name: engineer\nprompt: write code\n");
    project.file(
        "project-a/security-auditor.yaml",
        "name: security-auditor\nprompt: audit code\n",
    );

    let output = project
        .herdctl()
        .args(["validate", "--format", "json"])
        .output()
        .unwrap();
    output.ok();

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("validate prints JSON");
    similar_asserts::assert_eq!(report["agent_count"], serde_json::json!(3));
}

#[test]
fn same_level_name_collision_between_sub_fleets_is_a_config_error() {
    let project = Project::empty();
    project.file(
        "herdctl.yaml",
        "version: 1\nfleets:\n  - path: a/herdctl.yaml\n    name: dup\n  - path: b/herdctl.yaml\n    name: dup\n",
    );
    project.file("a/herdctl.yaml", "version: 1\nagents: []\n");
    project.file("b/herdctl.yaml", "version: 1\nagents: []\n");

    project
        .herdctl()
        .arg("validate")
        .output()
        .unwrap()
        .failed()
        .stderr_has("dup");
}

#[test]
fn a_fleet_cycle_is_rejected_with_the_cycle_path() {
    let project = Project::empty();
    project.file("herdctl.yaml", "version: 1\nfleets:\n  - path: a.yaml\n");
    project.file("a.yaml", "version: 1\nfleets:\n  - path: b.yaml\n");
    project.file("b.yaml", "version: 1\nfleets:\n  - path: a.yaml\n");

    project
        .herdctl()
        .arg("validate")
        .output()
        .unwrap()
        .failed()
        .stderr_has("cycle");
}

#[test]
fn a_missing_agent_file_is_a_config_error_not_a_runtime_error() {
    let project = Project::empty();
    project.file("herdctl.yaml", "version: 1\nagents:\n  - path: missing.yaml\n");

    let output = project.herdctl().arg("validate").output().unwrap();
    output.failed();
    assert_eq!(output.status.code(), Some(2), "missing agent file should exit with CODE_CONFIG");
}
