// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket envelope: the JSON shapes exchanged with dashboard/chat
//! subscribers. Every server event mirrors the internal event bus
//! ([`herd_bus::Event`]) verbatim; this module only adds the handshake
//! messages (`subscribe`/`unsubscribe`/`ping`/`pong`) around it.

use herd_bus::Event;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { agent_name: Option<String> },
    Unsubscribe,
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Event(Event),
    Pong(PongMessage),
}

impl ServerMessage {
    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage::default())
    }

    pub fn event(event: Event) -> Self {
        ServerMessage::Event(event)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PongMessage {
    #[serde(rename = "type")]
    kind: PongTag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PongTag {
    #[default]
    Pong,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed client message: {0}")]
pub struct MalformedClientMessage(String);

pub fn decode_client_message(raw: &str) -> Result<ClientMessage, MalformedClientMessage> {
    serde_json::from_str(raw).map_err(|e| MalformedClientMessage(e.to_string()))
}

pub fn encode_server_message(message: &ServerMessage) -> String {
    serde_json::to_string(message).expect("ServerMessage always serializes")
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
