//! Field-by-field merging of settings tiers.
//!
//! Settings files are parsed into `serde_json::Value` and folded from the
//! lowest tier to the highest. Arrays are replaced entirely, not
//! concatenated.

use serde_json::Value;

/// Merge `overlay` into `base`, with `overlay` taking precedence.
///
/// - Objects are merged key by key, recursively
/// - A null in `overlay` means "not specified" and keeps the base value
/// - Anything else in `overlay` replaces the base value
///
/// # Example
/// ```
/// use serde_json::json;
/// use sftp_sync_config::config::deep_merge;
///
/// let base = json!({"discovery": {"skip_dirs": [".git"], "follow_links": false}});
/// let overlay = json!({"discovery": {"follow_links": true}});
/// let merged = deep_merge(base, overlay);
/// assert_eq!(merged, json!({"discovery": {"skip_dirs": [".git"], "follow_links": true}}));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Fold tiers in order; later tiers win.
pub fn deep_merge_all(tiers: impl IntoIterator<Item = Value>) -> Value {
    tiers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_settings_merge() {
        let base = json!({
            "config_file_name": ".sftpConfig.json",
            "defaults": {"port": 22, "remotePath": "/home"}
        });
        let overlay = json!({"defaults": {"port": 2222}});

        assert_eq!(
            deep_merge(base, overlay),
            json!({
                "config_file_name": ".sftpConfig.json",
                "defaults": {"port": 2222, "remotePath": "/home"}
            })
        );
    }

    #[test]
    fn test_skip_dirs_replaced_not_appended() {
        let base = json!({"discovery": {"skip_dirs": [".git", "node_modules"]}});
        let overlay = json!({"discovery": {"skip_dirs": ["target"]}});

        assert_eq!(
            deep_merge(base, overlay),
            json!({"discovery": {"skip_dirs": ["target"]}})
        );
    }

    #[test]
    fn test_null_keeps_lower_tier() {
        let base = json!({"case_sensitive": false});
        let overlay = json!({"case_sensitive": null});
        assert_eq!(deep_merge(base, overlay), json!({"case_sensitive": false}));
    }

    #[test]
    fn test_empty_yaml_tier_is_noop() {
        // An empty YAML document parses to null.
        let tiers = vec![json!({"a": 1}), Value::Null, json!({"b": 2})];
        assert_eq!(deep_merge_all(tiers), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_scalar_and_object_replace_each_other() {
        assert_eq!(
            deep_merge(json!({"v": 1}), json!({"v": {"x": true}})),
            json!({"v": {"x": true}})
        );
        assert_eq!(
            deep_merge(json!({"v": {"x": true}}), json!({"v": 1})),
            json!({"v": 1})
        );
    }
}
