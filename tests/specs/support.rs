//! Shared black-box harness: a scratch fleet directory plus a `herdctl`
//! command builder, in the style of the unit-level fixtures used by
//! `crates/cli/src/commands/*_tests.rs` but driving the real binary.

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Output assertions that read like the ones on a `std::process::Output`,
/// without pulling in a separate predicates crate.
pub trait OutputExt {
    fn ok(&self) -> &Self;
    fn failed(&self) -> &Self;
    fn stdout_has(&self, needle: &str) -> &Self;
    fn stderr_has(&self, needle: &str) -> &Self;
}

impl OutputExt for std::process::Output {
    fn ok(&self) -> &Self {
        assert!(
            self.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stdout),
            String::from_utf8_lossy(&self.stderr)
        );
        self
    }

    fn failed(&self) -> &Self {
        assert!(
            !self.status.success(),
            "expected failure, got success\nstdout: {}",
            String::from_utf8_lossy(&self.stdout)
        );
        self
    }

    fn stdout_has(&self, needle: &str) -> &Self {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(stdout.contains(needle), "stdout did not contain {needle:?}:\n{stdout}");
        self
    }

    fn stderr_has(&self, needle: &str) -> &Self {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(stderr.contains(needle), "stderr did not contain {needle:?}:\n{stderr}");
        self
    }
}

/// A scratch directory holding a fleet config tree and its state dir.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join(".herdctl")
    }

    /// Write a file relative to the project root, creating parent dirs.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write fixture file");
        self
    }

    /// Build a `herdctl` invocation rooted at this project, with
    /// `--config`/`--state-dir` pre-filled.
    pub fn herdctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("herdctl").expect("herdctl binary");
        cmd.current_dir(self.dir.path());
        cmd.arg("--config").arg(self.dir.path().join("herdctl.yaml"));
        cmd.arg("--state-dir").arg(self.state_dir());
        cmd
    }

    /// Absolute path to a shell script that echoes a single `assistant`
    /// JSONL message and exits 0, wired in as `--runner-cmd`. Mirrors the
    /// fixture runner used by `trigger_tests.rs`.
    pub fn echo_runner_script(&self) -> PathBuf {
        let path = self.dir.path().join("echo-runner.sh");
        std::fs::write(
            &path,
            "#!/bin/sh\ncat > /dev/null\necho '{\"type\":\"assistant\",\"timestamp\":\"2026-01-01T00:00:00Z\",\"text\":\"done\"}'\n",
        )
        .expect("write echo runner");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
        }
        path
    }

    /// Absolute path to a shell script that sleeps for `secs` seconds before
    /// echoing completion, so a job can be observed mid-flight.
    pub fn slow_runner_script(&self, secs: u64) -> PathBuf {
        let path = self.dir.path().join("slow-runner.sh");
        std::fs::write(
            &path,
            format!(
                "#!/bin/sh\ncat > /dev/null\nsleep {secs}\necho '{{\"type\":\"assistant\",\"timestamp\":\"2026-01-01T00:00:00Z\",\"text\":\"done\"}}'\n"
            ),
        )
        .expect("write slow runner");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
        }
        path
    }
}
