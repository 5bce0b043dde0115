// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd-wire: the WebSocket envelope around the event bus — client
//! handshake messages and the server-side event/pong wrapper. No
//! transport; framing and socket handling belong to the daemon.

mod envelope;

pub use envelope::{
    decode_client_message, encode_server_message, ClientMessage, MalformedClientMessage,
    PongMessage, ServerMessage,
};
pub use herd_bus::Event;
