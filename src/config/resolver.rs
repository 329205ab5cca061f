//! Materialization of a raw config record for one query path.
//!
//! Merges the record over defaults field by field and re-expresses the
//! path-valued fields:
//! - `ignore` globs are anchored at the config root
//! - `remotePath` is extended by the query path's offset below the config root

use super::remote;
use super::types::{ConfigFields, DEFAULT_IGNORE, DEFAULT_PORT, EffectiveConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::index::ConfigRecord;
use crate::paths::{CaseSensitivity, join_pattern, normalize_absolute, relative_segments};
use std::path::Path;
use tracing::debug;

/// Turns stored records into [`EffectiveConfig`]s.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    defaults: ConfigFields,
    case: CaseSensitivity,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(ConfigFields::builtin_defaults(), CaseSensitivity::default())
    }
}

impl ConfigResolver {
    /// `case` must match the index the records come from.
    pub fn new(defaults: ConfigFields, case: CaseSensitivity) -> Self {
        Self { defaults, case }
    }

    pub fn defaults(&self) -> &ConfigFields {
        &self.defaults
    }

    /// Materialize an indexed record for `query_path`.
    pub fn resolve_record(
        &self,
        record: &ConfigRecord,
        query_path: &Path,
    ) -> ConfigResult<EffectiveConfig> {
        self.materialize(record.fields(), record.config_root(), query_path)
    }

    /// Merge `fields` over the defaults and rewrite its path fields for `query_path`.
    ///
    /// `query_path` must be `config_root` or below it. Fails with
    /// `MissingField` if host or remote path is set neither in `fields` nor
    /// in the defaults.
    pub fn materialize(
        &self,
        fields: &ConfigFields,
        config_root: &Path,
        query_path: &Path,
    ) -> ConfigResult<EffectiveConfig> {
        let defaults = &self.defaults;

        let host = pick(&fields.host, &defaults.host).ok_or(ConfigError::missing_field("host"))?;
        let remote_base = pick(&fields.remote_path, &defaults.remote_path)
            .ok_or(ConfigError::missing_field("remotePath"))?;

        let offset = relative_segments(config_root, query_path, self.case)?;
        let remote_path = remote::join(&remote_base, &offset);

        let ignore = pick(&fields.ignore, &defaults.ignore)
            .unwrap_or_else(|| DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect())
            .iter()
            .map(|pattern| join_pattern(config_root, pattern))
            .collect::<ConfigResult<Vec<_>>>()?;

        let mut extra = defaults.extra.clone();
        extra.extend(fields.extra.clone());

        debug!(
            root = %config_root.display(),
            path = %query_path.display(),
            remote = %remote_path,
            "Materialized config"
        );

        Ok(EffectiveConfig {
            host,
            port: pick(&fields.port, &defaults.port).unwrap_or(DEFAULT_PORT),
            username: pick(&fields.username, &defaults.username),
            password: pick(&fields.password, &defaults.password),
            protocol: pick(&fields.protocol, &defaults.protocol).unwrap_or_default(),
            private_key_path: pick(&fields.private_key_path, &defaults.private_key_path),
            passphrase: pick(&fields.passphrase, &defaults.passphrase),
            remote_path,
            upload_on_save: pick(&fields.upload_on_save, &defaults.upload_on_save)
                .unwrap_or(false),
            sync_mode: pick(&fields.sync_mode, &defaults.sync_mode).unwrap_or_default(),
            ignore,
            config_root: normalize_absolute(config_root)?,
            extra,
        })
    }
}

/// The record's value if set, else the default's.
fn pick<T: Clone>(value: &Option<T>, default: &Option<T>) -> Option<T> {
    value.as_ref().or(default.as_ref()).cloned()
}
