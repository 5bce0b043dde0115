//! `herdctl trigger`: one-shot agent runs outside the schedule, including
//! the concurrency-limit contract trigger shares with the scheduler.

use crate::support::{OutputExt, Project};

fn single_agent_fleet(project: &Project, max_concurrent: u32) {
    project.file("herdctl.yaml", "version: 1\nagents:\n  - path: worker.yaml\n");
    project.file(
        "worker.yaml",
        &format!("name: worker\nprompt: do the thing\nmax_concurrent: {max_concurrent}\n"),
    );
}

#[test]
fn trigger_runs_the_agent_and_reports_completion() {
    let project = Project::empty();
    single_agent_fleet(&project, 1);
    let runner = project.echo_runner_script();

    project
        .herdctl()
        .args(["trigger", "worker", "--runner-cmd"])
        .arg(runner.to_string_lossy().to_string())
        .output()
        .unwrap()
        .ok()
        .stdout_has("Completed");
}

#[test]
fn trigger_without_a_configured_agent_is_a_config_error() {
    let project = Project::empty();
    single_agent_fleet(&project, 1);
    let runner = project.echo_runner_script();

    let output = project
        .herdctl()
        .args(["trigger", "does-not-exist", "--runner-cmd"])
        .arg(runner.to_string_lossy().to_string())
        .output()
        .unwrap();
    output.failed();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn trigger_overrides_the_configured_prompt_when_given_one() {
    let project = Project::empty();
    single_agent_fleet(&project, 1);
    let runner = project.echo_runner_script();

    project
        .herdctl()
        .args(["trigger", "worker", "--prompt", "say something else", "--runner-cmd"])
        .arg(runner.to_string_lossy().to_string())
        .output()
        .unwrap()
        .ok()
        .stdout_has("Completed");
}
