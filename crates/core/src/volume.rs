// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker volume mount grammar: `host:container[:ro|:rw]`, absolute paths required.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeMode {
    Ro,
    Rw,
}

impl fmt::Display for VolumeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ro => "ro",
            Self::Rw => "rw",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host: String,
    pub container: String,
    pub mode: VolumeMode,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid volume string {raw:?}: expected host:container[:ro|:rw] with absolute paths")]
pub struct InvalidVolumeString {
    raw: String,
}

impl std::str::FromStr for VolumeMount {
    type Err = InvalidVolumeString;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidVolumeString {
            raw: raw.to_string(),
        };
        let parts: Vec<&str> = raw.split(':').collect();
        let (host, container, mode) = match parts.as_slice() {
            [host, container] => (*host, *container, VolumeMode::Rw),
            [host, container, "ro"] => (*host, *container, VolumeMode::Ro),
            [host, container, "rw"] => (*host, *container, VolumeMode::Rw),
            _ => return Err(invalid()),
        };
        if !host.starts_with('/') || !container.starts_with('/') {
            return Err(invalid());
        }
        Ok(VolumeMount {
            host: host.to_string(),
            container: container.to_string(),
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_rw_mode() {
        let v: VolumeMount = "/host/path:/container/path".parse().unwrap();
        assert_eq!(v.mode, VolumeMode::Rw);
    }

    #[test]
    fn parses_explicit_ro_mode() {
        let v: VolumeMount = "/host/path:/container/path:ro".parse().unwrap();
        assert_eq!(v.mode, VolumeMode::Ro);
    }

    #[test]
    fn rejects_relative_paths() {
        assert!("host:/container".parse::<VolumeMount>().is_err());
        assert!("/host:container".parse::<VolumeMount>().is_err());
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!("/host:/container:wat".parse::<VolumeMount>().is_err());
    }
}
