// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat session pointers: per-platform, per-agent, per-channel bookkeeping
//! so a chat connector can resume the runner's conversational state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub last_message_at: DateTime<Utc>,
}

/// `channelId -> session`, persisted at `<platform>-sessions/<agentName>.yaml`.
pub type ChatSessionMap = BTreeMap<String, ChatSession>;

/// Idle longer than `expiry_hours` is treated as absent.
pub fn is_expired(session: &ChatSession, now: DateTime<Utc>, expiry_hours: i64) -> bool {
    now.signed_duration_since(session.last_message_at) > chrono::Duration::hours(expiry_hours)
}

/// New session ids are generated `<platform>-<agentName>-<random>`.
pub fn generate_session_id(platform: &str, agent_name: &str) -> String {
    format!("{platform}-{agent_name}-{}", nanoid::nanoid!(12))
}
