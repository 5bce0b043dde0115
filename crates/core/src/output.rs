// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job output message: the tagged union appended to `<jobId>.jsonl` and
//! published as `job:output`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobOutputMessage {
    System {
        timestamp: DateTime<Utc>,
        subtype: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Assistant {
        timestamp: DateTime<Utc>,
        text: String,
    },
    ToolUse {
        timestamp: DateTime<Utc>,
        tool_name: String,
        input: serde_json::Value,
    },
    ToolResult {
        timestamp: DateTime<Utc>,
        tool_name: String,
        output: serde_json::Value,
        #[serde(default)]
        is_error: bool,
    },
    Error {
        timestamp: DateTime<Utc>,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl JobOutputMessage {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::System { timestamp, .. }
            | Self::Assistant { timestamp, .. }
            | Self::ToolUse { timestamp, .. }
            | Self::ToolResult { timestamp, .. }
            | Self::Error { timestamp, .. } => *timestamp,
        }
    }

    /// A `system` message announcing a fresh or resumed runner session.
    pub fn session_start(timestamp: DateTime<Utc>, session_id: impl Into<String>) -> Self {
        Self::System {
            timestamp,
            subtype: "session_start".to_string(),
            session_id: Some(session_id.into()),
            text: None,
        }
    }

    /// The session id this message announces, if it is a `session_start` system message.
    pub fn announced_session_id(&self) -> Option<&str> {
        match self {
            Self::System {
                subtype,
                session_id: Some(id),
                ..
            } if subtype == "session_start" => Some(id),
            _ => None,
        }
    }
}
