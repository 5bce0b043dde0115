// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner failure taxonomy. Every variant carries the flags the executor
//! needs to decide what to do next without parsing a message string.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RunnerError {
    #[error("runner failed to initialize: {message}")]
    SdkInitialization {
        missing_api_key: bool,
        network: bool,
        message: String,
    },

    #[error("runner stream error: {message}")]
    SdkStreaming {
        is_recoverable: bool,
        is_rate_limited: bool,
        message: String,
    },

    #[error("malformed runner response: {message}")]
    MalformedResponse {
        expected: Option<String>,
        message: String,
    },
}

impl RunnerError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SdkStreaming { is_recoverable, .. } if *is_recoverable)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::SdkStreaming { is_rate_limited, .. } if *is_rate_limited)
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::SdkInitialization { network, .. } if *network)
    }

    pub fn is_missing_api_key(&self) -> bool {
        matches!(self, Self::SdkInitialization { missing_api_key, .. } if *missing_api_key)
    }
}
