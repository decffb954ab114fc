//! Deep merge for layered YAML configuration.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences are replaced entirely (a project's `optional_tools` list
//!   replaces the default list rather than extending it)
//! - Null in the overlay deletes the key from the base (`sdk: null`)
//! - Scalars in the overlay replace scalars in the base

use serde_yaml::Value;

/// Deep merge two YAML values; `overlay` wins at the point of conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }

        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order (first is base, last has highest priority).
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn nested_field_override_keeps_siblings() {
        let base = yaml(
            r#"
toolchain:
  command: rustup
  version_args: ["--version"]
"#,
        );
        let overlay = yaml("toolchain:\n  command: rustup-nightly\n");

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["toolchain"]["command"], "rustup-nightly");
        assert_eq!(result["toolchain"]["version_args"][0], "--version");
    }

    #[test]
    fn sequences_are_replaced_not_merged() {
        let base = yaml("binaries: [cc, gcc, clang]\n");
        let overlay = yaml("binaries: [zig]\n");

        let result = deep_merge(&base, &overlay);
        let binaries = result["binaries"].as_sequence().unwrap();
        assert_eq!(binaries.len(), 1);
        assert_eq!(binaries[0], "zig");
    }

    #[test]
    fn null_deletes_key() {
        let base = yaml("sdk:\n  minimum: 10.0.19041.0\nworkspace:\n  primary: Cargo.toml\n");
        let overlay = yaml("sdk: null\n");

        let result = deep_merge(&base, &overlay);
        assert!(result.get("sdk").is_none());
        assert_eq!(result["workspace"]["primary"], "Cargo.toml");
    }

    #[test]
    fn merge_configs_applies_in_order() {
        let layers = vec![
            yaml("timeouts:\n  probe_secs: 10\n  remediation_secs: 600\n"),
            yaml("timeouts:\n  probe_secs: 5\n"),
            yaml("timeouts:\n  probe_secs: 20\n"),
        ];

        let result = merge_configs(&layers);
        assert_eq!(result["timeouts"]["probe_secs"], 20);
        assert_eq!(result["timeouts"]["remediation_secs"], 600);
    }

    #[test]
    fn merge_configs_empty_is_empty_mapping() {
        let result = merge_configs(&[]);
        assert!(result.as_mapping().unwrap().is_empty());
    }
}
