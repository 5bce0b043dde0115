// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference [`Runner`] backend: spawns a configured subprocess and treats
//! its stdout as newline-delimited [`JobOutputMessage`] JSON.

use crate::error::RunnerError;
use crate::trait_def::{ExecuteOptions, Runner, RunnerHandle};
use async_trait::async_trait;
use herd_core::JobOutputMessage;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 256;

/// Spawns `program` (plus any fixed `args`) per execution. The prompt is
/// passed on stdin; the process is expected to write one JSON-encoded
/// [`JobOutputMessage`] per line of stdout.
pub struct ProcessRunner {
    program: String,
    args: Vec<String>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn execute(&self, options: ExecuteOptions) -> Result<RunnerHandle, RunnerError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&options.working_directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(model) = &options.model {
            command.env("HERDCTL_MODEL", model);
        }
        if let Some(session_id) = &options.session_id {
            command.env("HERDCTL_SESSION_ID", session_id);
        }

        let mut child = command.spawn().map_err(|err| RunnerError::SdkInitialization {
            missing_api_key: false,
            network: false,
            message: format!("failed to spawn runner process: {err}"),
        })?;

        let mut stdin = child.stdin.take().ok_or_else(|| RunnerError::SdkInitialization {
            missing_api_key: false,
            network: false,
            message: "runner process did not expose stdin".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| RunnerError::SdkInitialization {
            missing_api_key: false,
            network: false,
            message: "runner process did not expose stdout".to_string(),
        })?;

        {
            use tokio::io::AsyncWriteExt;
            stdin
                .write_all(options.prompt.as_bytes())
                .await
                .map_err(|err| RunnerError::SdkInitialization {
                    missing_api_key: false,
                    network: false,
                    message: format!("failed to write prompt: {err}"),
                })?;
            stdin.shutdown().await.ok();
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let cancellation = options.cancellation.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                tokio::select! {
                    _ = cancellation.cancelled() => break,
                    line = lines.next_line() => {
                        match line {
                            Ok(Some(line)) if line.trim().is_empty() => continue,
                            Ok(Some(line)) => {
                                let parsed = serde_json::from_str::<JobOutputMessage>(&line).map_err(|err| {
                                    RunnerError::MalformedResponse {
                                        expected: Some("JobOutputMessage JSON".to_string()),
                                        message: err.to_string(),
                                    }
                                });
                                if tx.send(parsed).await.is_err() {
                                    break;
                                }
                            }
                            Ok(None) => break,
                            Err(err) => {
                                let _ = tx
                                    .send(Err(RunnerError::SdkStreaming {
                                        is_recoverable: false,
                                        is_rate_limited: false,
                                        message: err.to_string(),
                                    }))
                                    .await;
                                break;
                            }
                        }
                    }
                }
            }

            match child.wait().await {
                Ok(status) if !status.success() => {
                    tracing::warn!(%status, "runner process exited non-zero");
                }
                Err(err) => {
                    tracing::error!(%err, "failed to wait on runner process");
                }
                _ => {}
            }
        });

        Ok(RunnerHandle { messages: rx })
    }
}
