//! Matching paths against a materialized config's ignore globs.

use super::types::EffectiveConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::paths::{CaseSensitivity, NormalizedPath};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Compiled ignore globs of one [`EffectiveConfig`].
///
/// The globs are absolute, so matching works for any path in the config's
/// subtree. A path is ignored when it, or any of its ancestors, matches.
/// Case sensitivity must match the index the config was resolved from.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    glob_set: GlobSet,
}

impl IgnoreMatcher {
    /// Compile absolute `/`-separated glob patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S], case: CaseSensitivity) -> ConfigResult<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            if pattern.is_empty() {
                continue;
            }
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .case_insensitive(case == CaseSensitivity::Insensitive)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(glob);
        }

        let glob_set = builder.build().map_err(|source| ConfigError::InvalidPattern {
            pattern: patterns
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;

        Ok(Self { glob_set })
    }

    pub fn from_config(config: &EffectiveConfig, case: CaseSensitivity) -> ConfigResult<Self> {
        Self::new(config.ignore.as_slice(), case)
    }

    /// Whether `path` or one of its ancestor directories is ignored.
    ///
    /// Relative paths never match.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let Some(normalized) = NormalizedPath::parse(path) else {
            return false;
        };
        let full = normalized.to_slash_string();

        // Check the path, then each ancestor by trimming the last segment.
        let mut candidate = full.as_str();
        loop {
            if self.glob_set.is_match(candidate) {
                return true;
            }
            match candidate.rfind('/') {
                Some(0) | None => return false,
                Some(pos) => candidate = &candidate[..pos],
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glob_set.is_empty()
    }
}
