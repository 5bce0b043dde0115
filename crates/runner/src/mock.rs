// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable test backend: replays a fixed sequence of messages/errors
//! without spawning anything.

use crate::error::RunnerError;
use crate::trait_def::{ExecuteOptions, Runner, RunnerHandle};
use async_trait::async_trait;
use herd_core::JobOutputMessage;
use parking_lot::Mutex;
use tokio::sync::mpsc;

pub type ScriptedItem = Result<JobOutputMessage, RunnerError>;

/// Each call to `execute` pops the next scripted sequence; calling it more
/// times than there are scripts panics, which is the point in a test.
pub struct MockRunner {
    scripts: Mutex<Vec<Vec<ScriptedItem>>>,
}

impl MockRunner {
    pub fn new(scripts: Vec<Vec<ScriptedItem>>) -> Self {
        Self {
            scripts: Mutex::new(scripts),
        }
    }

    /// Convenience for the common single-execution case.
    pub fn once(messages: Vec<ScriptedItem>) -> Self {
        Self::new(vec![messages])
    }
}

#[async_trait]
impl Runner for MockRunner {
    async fn execute(&self, _options: ExecuteOptions) -> Result<RunnerHandle, RunnerError> {
        let script = self
            .scripts
            .lock()
            .pop()
            .expect("MockRunner called more times than it was scripted for");
        let (tx, rx) = mpsc::channel(script.len().max(1));
        tokio::spawn(async move {
            for item in script {
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });
        Ok(RunnerHandle { messages: rx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn replays_scripted_messages_in_order() {
        let runner = MockRunner::once(vec![
            Ok(JobOutputMessage::session_start(Utc::now(), "sess-1")),
            Ok(JobOutputMessage::Assistant {
                timestamp: Utc::now(),
                text: "done".to_string(),
            }),
        ]);

        let mut handle = runner
            .execute(ExecuteOptions {
                model: None,
                prompt: "hi".to_string(),
                working_directory: std::env::temp_dir(),
                session_id: None,
                injected_tool_servers: vec![],
                cancellation: CancellationToken::new(),
            })
            .await
            .unwrap();

        let first = handle.messages.recv().await.unwrap().unwrap();
        assert_eq!(first.announced_session_id(), Some("sess-1"));
        let second = handle.messages.recv().await.unwrap().unwrap();
        assert!(matches!(second, JobOutputMessage::Assistant { .. }));
        assert!(handle.messages.recv().await.is_none());
    }
}
