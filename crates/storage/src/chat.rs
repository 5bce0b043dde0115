// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat session persistence: one `ChatSessionMap` per `(platform, agent)`
//! pair, keyed by channel id.

use crate::atomic::write_atomic_yaml;
use crate::error::StateFileError;
use crate::paths::chat_session_path;
use chrono::{DateTime, Utc};
use herd_core::chat::{generate_session_id, is_expired, ChatSession, ChatSessionMap};
use std::path::Path;

/// Load the session map for a platform/agent pair. A missing file is an
/// empty map; a malformed file is logged and treated as empty rather than
/// propagated, matching the tolerance shown elsewhere in this store.
pub fn load_session_map(state_dir: &Path, platform: &str, agent_name: &str) -> ChatSessionMap {
    let path = chat_session_path(state_dir, platform, agent_name);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return ChatSessionMap::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read chat session map");
            return ChatSessionMap::new();
        }
    };
    serde_yaml::from_str(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "malformed chat session map, treating as empty");
        ChatSessionMap::new()
    })
}

fn save_session_map(
    state_dir: &Path,
    platform: &str,
    agent_name: &str,
    map: &ChatSessionMap,
) -> Result<(), StateFileError> {
    let path = chat_session_path(state_dir, platform, agent_name);
    write_atomic_yaml(&path, map).map_err(StateFileError::from)
}

/// Look up a live session for `channel_id`, or mint and persist a new one
/// if there is none, or the one on file has gone idle past `expiry_hours`.
pub fn get_or_create_session(
    state_dir: &Path,
    platform: &str,
    agent_name: &str,
    channel_id: &str,
    now: DateTime<Utc>,
    expiry_hours: i64,
) -> Result<ChatSession, StateFileError> {
    let mut map = load_session_map(state_dir, platform, agent_name);

    if let Some(session) = map.get(channel_id) {
        if !is_expired(session, now, expiry_hours) {
            return Ok(session.clone());
        }
    }

    let session = ChatSession {
        session_id: generate_session_id(platform, agent_name),
        last_message_at: now,
    };
    map.insert(channel_id.to_string(), session.clone());
    save_session_map(state_dir, platform, agent_name, &map)?;
    Ok(session)
}

/// Record activity on an existing channel session, extending its expiry.
pub fn touch_session(
    state_dir: &Path,
    platform: &str,
    agent_name: &str,
    channel_id: &str,
    now: DateTime<Utc>,
) -> Result<(), StateFileError> {
    let mut map = load_session_map(state_dir, platform, agent_name);
    if let Some(session) = map.get_mut(channel_id) {
        session.last_message_at = now;
        save_session_map(state_dir, platform, agent_name, &map)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;
