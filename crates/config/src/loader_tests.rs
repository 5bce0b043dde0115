// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn qualified_names_cover_root_and_nested_agents() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "herdctl.yaml",
        "version: 1\nagents:\n  - path: monitor.yaml\nfleets:\n  - path: project-a/herdctl.yaml\n    name: project-a\n",
    );
    write(root, "monitor.yaml", "name: monitor\n");
    write(
        root,
        "project-a/herdctl.yaml",
        "version: 1\nagents:\n  - path: engineer.yaml\n  - path: security-auditor.yaml\n",
    );
    write(root, "project-a/engineer.yaml", "name: engineer\n");
    write(
        root,
        "project-a/security-auditor.yaml",
        "name: security-auditor\n",
    );

    let loaded = load(&root.join("herdctl.yaml"), None).unwrap();
    let mut names: Vec<_> = loaded.agents.iter().map(|a| a.qualified_name.clone()).collect();
    names.sort();

    assert_eq!(
        names,
        vec!["monitor", "project-a.engineer", "project-a.security-auditor"]
    );
}

#[test]
fn cycle_between_fleets_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "herdctl.yaml",
        "version: 1\nfleets:\n  - path: a.yaml\n    name: a\n",
    );
    write(
        root,
        "a.yaml",
        "version: 1\nfleets:\n  - path: b.yaml\n    name: b\n",
    );
    write(
        root,
        "b.yaml",
        "version: 1\nfleets:\n  - path: a.yaml\n    name: a\n",
    );

    let err = load(&root.join("herdctl.yaml"), None).unwrap_err();
    match err {
        ConfigError::FleetLoad { source, .. } => match *source {
            ConfigError::FleetLoad { source, .. } => {
                assert!(matches!(*source, ConfigError::FleetCycle { .. }));
            }
            other => panic!("expected nested FleetLoad, got {other:?}"),
        },
        other => panic!("expected FleetLoad wrapping FleetCycle, got {other:?}"),
    }
}

#[test]
fn same_level_fleet_name_collision_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "herdctl.yaml",
        "version: 1\nfleets:\n  - path: a/herdctl.yaml\n    name: dup\n  - path: b/herdctl.yaml\n    name: dup\n",
    );
    write(root, "a/herdctl.yaml", "version: 1\n");
    write(root, "b/herdctl.yaml", "version: 1\n");

    let err = load(&root.join("herdctl.yaml"), None).unwrap_err();
    assert!(matches!(err, ConfigError::FleetNameCollision { .. }));
}

#[test]
fn duplicate_agent_name_within_one_agents_list_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "herdctl.yaml",
        "version: 1\nagents:\n  - path: monitor.yaml\n  - path: monitor-2.yaml\n",
    );
    write(root, "monitor.yaml", "name: monitor\n");
    write(root, "monitor-2.yaml", "name: monitor\n");

    let err = load(&root.join("herdctl.yaml"), None).unwrap_err();
    assert!(matches!(err, ConfigError::AgentNameCollision { ref name, .. } if name == "monitor"));
}

#[test]
fn defaults_fill_gaps_and_overrides_win() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "herdctl.yaml",
        "version: 1\ndefaults:\n  model: sonnet\n  max_concurrent: 2\nagents:\n  - path: worker.yaml\n    overrides:\n      max_concurrent: 5\n",
    );
    write(root, "worker.yaml", "name: worker\n");

    let loaded = load(&root.join("herdctl.yaml"), None).unwrap();
    let agent = &loaded.agents[0];
    assert_eq!(agent.model.as_deref(), Some("sonnet"));
    assert_eq!(agent.max_concurrent, 5);
}

#[test]
fn env_interpolation_fills_agent_fields() {
    std::env::set_var("HERDCTL_TEST_MODEL", "opus");
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root, "herdctl.yaml", "version: 1\nagents:\n  - path: worker.yaml\n");
    write(root, "worker.yaml", "name: worker\nmodel: ${HERDCTL_TEST_MODEL}\n");

    let loaded = load(&root.join("herdctl.yaml"), None).unwrap();
    assert_eq!(loaded.agents[0].model.as_deref(), Some("opus"));
    std::env::remove_var("HERDCTL_TEST_MODEL");
}
