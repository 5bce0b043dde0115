// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd-bus: the in-process event topic dispatcher and log/output tailing
//! built on top of it.

pub mod bus;
pub mod event;
pub mod tail;

pub use bus::{EventBus, Subscription};
pub use event::{render_for_bus, AgentUpdatedPayload, Event, JobErrorPayload, Stream};
pub use tail::{
    stream_job_output, stream_logs, JobOutputStream, LogEntry, LogLevel, LogStream,
    StreamLogsOptions,
};
