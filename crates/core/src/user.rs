// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker user grammar: `UID` or `UID:GID`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockerUser {
    pub uid: u32,
    pub gid: Option<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid user string {raw:?}: expected UID or UID:GID")]
pub struct InvalidUserString {
    raw: String,
}

impl std::str::FromStr for DockerUser {
    type Err = InvalidUserString;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidUserString {
            raw: raw.to_string(),
        };
        match raw.split_once(':') {
            Some((uid, gid)) => Ok(DockerUser {
                uid: uid.parse().map_err(|_| invalid())?,
                gid: Some(gid.parse().map_err(|_| invalid())?),
            }),
            None => Ok(DockerUser {
                uid: raw.parse().map_err(|_| invalid())?,
                gid: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uid_only() {
        let u: DockerUser = "1000".parse().unwrap();
        assert_eq!(u, DockerUser { uid: 1000, gid: None });
    }

    #[test]
    fn parses_uid_and_gid() {
        let u: DockerUser = "1000:1000".parse().unwrap();
        assert_eq!(
            u,
            DockerUser {
                uid: 1000,
                gid: Some(1000)
            }
        );
    }

    #[test]
    fn rejects_non_numeric() {
        assert!("root".parse::<DockerUser>().is_err());
        assert!("1000:staff".parse::<DockerUser>().is_err());
    }
}
