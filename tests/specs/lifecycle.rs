//! `herdctl start` / `herdctl stop`: the foreground-process lifecycle, since
//! there is no background daemon mode. Unix-only: `stop` signals via pid +
//! `kill -TERM`, which has no Windows analogue in this implementation.

#![cfg(unix)]

use crate::support::Project;
use std::time::{Duration, Instant};

fn wait_for_pid_file(state_dir: &std::path::Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if herd_storage::pid_path(state_dir).exists() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn start_then_stop_drains_and_exits_cleanly() {
    let project = Project::empty();
    project.file("herdctl.yaml", "version: 1\nagents:\n  - path: monitor.yaml\n");
    project.file("monitor.yaml", "name: monitor\nprompt: say hi\nschedules: []\n");
    let runner = project.echo_runner_script();

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("herdctl"))
        .current_dir(project.path())
        .arg("--config")
        .arg(project.path().join("herdctl.yaml"))
        .arg("--state-dir")
        .arg(project.state_dir())
        .arg("start")
        .arg("--runner-cmd")
        .arg(&runner)
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("spawn herdctl start");

    assert!(
        wait_for_pid_file(&project.state_dir(), Duration::from_secs(5)),
        "start never wrote a pid file"
    );

    let stop_output = project
        .herdctl()
        .args(["stop", "--wait", "10"])
        .output()
        .expect("run herdctl stop");
    assert!(
        stop_output.status.success(),
        "stop failed: {}",
        String::from_utf8_lossy(&stop_output.stderr)
    );

    let status = child.wait().expect("wait for start process");
    assert!(status.success(), "start process did not exit cleanly after stop");
}

/// Poll the state dir's job list until at least one job record exists,
/// returning its id. The scheduler writes the `pending`/`running` record
/// before the runner script even starts sleeping.
fn wait_for_a_job(state_dir: &std::path::Path, timeout: Duration) -> herd_core::JobId {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        let (jobs, _errors) = herd_storage::list_jobs(state_dir, &herd_storage::JobFilter::default());
        if let Some(job) = jobs.into_iter().next() {
            return job.id;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    panic!("no job ever appeared in the state dir");
}

#[test]
fn a_running_job_is_drained_before_shutdown_completes() {
    let project = Project::empty();
    project.file("herdctl.yaml", "version: 1\nagents:\n  - path: worker.yaml\n");
    project.file(
        "worker.yaml",
        "name: worker\nprompt: do the thing\nschedules:\n  - name: tick\n    type: interval\n    expression: 1s\n",
    );
    let runner = project.slow_runner_script(2);

    // The scheduler's own interval fires a slow job shortly after startup,
    // so it is still running when `stop` is issued. `--shutdown-timeout`
    // is comfortably longer than the job so the drain has room to finish.
    let mut start = std::process::Command::new(assert_cmd::cargo::cargo_bin("herdctl"))
        .current_dir(project.path())
        .arg("--config")
        .arg(project.path().join("herdctl.yaml"))
        .arg("--state-dir")
        .arg(project.state_dir())
        .arg("start")
        .arg("--runner-cmd")
        .arg(&runner)
        .arg("--shutdown-timeout")
        .arg("30")
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("spawn herdctl start");

    assert!(wait_for_pid_file(&project.state_dir(), Duration::from_secs(5)));
    let job_id = wait_for_a_job(&project.state_dir(), Duration::from_secs(10));

    let stop_output = project
        .herdctl()
        .args(["stop", "--wait", "30"])
        .output()
        .expect("run herdctl stop");
    assert!(stop_output.status.success());

    let status = start.wait().expect("wait for start process");
    assert!(status.success());

    let job = herd_storage::read_job_metadata(&project.state_dir(), &job_id).expect("job metadata on disk");
    assert!(
        job.status.is_terminal(),
        "job should have been drained to a terminal state before shutdown completed, got {:?}",
        job.status
    );
    assert_eq!(job.status, herd_core::JobStatus::Completed);
}
