// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating the root config file when the caller did not give an explicit path.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

const CANDIDATE_NAMES: [&str; 2] = ["herdctl.yaml", "herdctl.yml"];

/// Resolve the root config path.
///
/// `explicit` may be a file (used directly), a directory (searched
/// directly, not upward), or `None` (search upward from `start`, which
/// should be the current working directory, until the filesystem root).
pub fn resolve_root_config(
    explicit: Option<&Path>,
    start: &Path,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        if path.is_dir() {
            if let Some(found) = find_in_dir(path) {
                return Ok(found);
            }
            return Err(ConfigError::ConfigNotFound {
                searched: CANDIDATE_NAMES.iter().map(|n| path.join(n)).collect(),
            });
        }
        return Err(ConfigError::ConfigNotFound {
            searched: vec![path.to_path_buf()],
        });
    }

    let mut searched = Vec::new();
    let mut dir = Some(start.to_path_buf());
    while let Some(current) = dir {
        if let Some(found) = find_in_dir(&current) {
            return Ok(found);
        }
        searched.extend(CANDIDATE_NAMES.iter().map(|n| current.join(n)));
        dir = current.parent().map(Path::to_path_buf);
    }
    Err(ConfigError::ConfigNotFound { searched })
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CANDIDATE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_config_in_starting_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("herdctl.yaml"), "version: 1\n").unwrap();
        let found = resolve_root_config(None, dir.path()).unwrap();
        assert_eq!(found, dir.path().join("herdctl.yaml"));
    }

    #[test]
    fn searches_upward_through_parents() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("herdctl.yml"), "version: 1\n").unwrap();
        let nested = root.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        let found = resolve_root_config(None, &nested).unwrap();
        assert_eq!(found, root.path().join("herdctl.yml"));
    }

    #[test]
    fn reports_all_searched_paths_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_root_config(None, dir.path()).unwrap_err();
        match err {
            ConfigError::ConfigNotFound { searched } => assert!(!searched.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
