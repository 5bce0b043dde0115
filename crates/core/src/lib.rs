// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd-core: shared domain vocabulary for the herdctl fleet manager —
//! agents, jobs, schedules, chat sessions, fleet state, and the small
//! string grammars (memory/volume/user) used throughout agent config.

pub mod macros;

pub mod agent;
pub mod chat;
pub mod clock;
pub mod fleet;
pub mod ids;
pub mod job;
pub mod memory;
pub mod output;
pub mod schedule;
pub mod user;
pub mod volume;

pub use agent::{
    qualified_name, validate_agent_name, Agent, AgentStatus, DockerConfig, InvalidAgentName,
    PermissionMode, RuntimeBackend,
};
pub use chat::{generate_session_id, is_expired, ChatSession, ChatSessionMap};
pub use clock::{Clock, FakeClock, SystemClock};
pub use fleet::{FleetManagerStatus, FleetState};
pub use ids::{InvalidJobId, JobId};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{ExitReason, Job, JobStatus, TriggerType};
pub use memory::{parse_memory_to_bytes, InvalidMemoryString};
pub use output::JobOutputMessage;
pub use schedule::{Schedule, ScheduleConfig, ScheduleStatus, ScheduleType};
pub use user::{DockerUser, InvalidUserString};
pub use volume::{InvalidVolumeString, VolumeMode, VolumeMount};
