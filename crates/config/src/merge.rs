// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deep-merge of parsed YAML fragments: fleet defaults composition and
//! per-reference overrides both use this.

use serde_yaml::Value;

/// Merge `overlay` onto `base`, recursing into mappings and letting the
/// overlay win on any scalar/sequence collision. Neither input is mutated;
/// the merged value is returned.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged_value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// `web:` config is dropped from a sub-fleet unless the parent reference's
/// `overrides` explicitly set it.
pub fn strip_web_unless_overridden(fleet_value: &mut Value, overrides: &Value) {
    let overrides_set_web = matches!(
        overrides.get("web"),
        Some(v) if !v.is_null()
    );
    if !overrides_set_web {
        if let Value::Mapping(map) = fleet_value {
            map.remove("web");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn overlay_scalar_wins() {
        let base = yaml("model: sonnet\nmax_concurrent: 1\n");
        let overlay = yaml("model: opus\n");
        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["model"].as_str(), Some("opus"));
        assert_eq!(merged["max_concurrent"].as_i64(), Some(1));
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let base = yaml("docker:\n  enabled: true\n  image: base\n");
        let overlay = yaml("docker:\n  image: override\n");
        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["docker"]["enabled"].as_bool(), Some(true));
        assert_eq!(merged["docker"]["image"].as_str(), Some("override"));
    }

    #[test]
    fn web_is_stripped_without_explicit_override() {
        let mut fleet = yaml("web:\n  enabled: true\nfleet:\n  name: a\n");
        let overrides = yaml("name: a\n");
        strip_web_unless_overridden(&mut fleet, &overrides);
        assert!(fleet.get("web").is_none());
    }

    #[test]
    fn web_survives_with_explicit_override() {
        let mut fleet = yaml("web:\n  enabled: true\n");
        let overrides = yaml("web:\n  enabled: false\n");
        strip_web_unless_overridden(&mut fleet, &overrides);
        assert!(fleet.get("web").is_some());
    }
}
