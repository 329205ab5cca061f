//! Prefix trie of per-directory config records.
//!
//! Each node corresponds to one directory below the project root and holds
//! the record of the config file in that directory, if there is one.
//! Lookups walk the trie iteratively and remember the deepest record seen,
//! so the cost is proportional to the depth of the queried path.

use crate::config::ConfigFields;
use crate::error::{ConfigError, ConfigResult};
use crate::paths::{CaseSensitivity, PathKey, normalize_absolute};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Raw contents of one config file plus the directory that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigRecord {
    config_root: PathBuf,
    fields: ConfigFields,
}

impl ConfigRecord {
    pub fn new(config_root: impl Into<PathBuf>, fields: ConfigFields) -> Self {
        Self {
            config_root: config_root.into(),
            fields,
        }
    }

    /// Directory the config file lives in.
    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    pub fn fields(&self) -> &ConfigFields {
        &self.fields
    }
}

#[derive(Debug, Clone, Default)]
struct ConfigIndexNode {
    record: Option<ConfigRecord>,
    children: BTreeMap<String, ConfigIndexNode>,
}

/// Nearest-ancestor lookup structure for a single project tree.
///
/// Not internally synchronized: `insert` needs `&mut self`, lookups only
/// `&self`. Rebuilds replace the whole index (see
/// [`ProjectConfigs::rebuild`](crate::project::ProjectConfigs::rebuild)).
#[derive(Debug, Clone)]
pub struct ConfigIndex {
    project_root: PathBuf,
    case: CaseSensitivity,
    root: ConfigIndexNode,
    len: usize,
}

impl ConfigIndex {
    /// Create an empty index for the project rooted at `project_root`.
    pub fn new(project_root: &Path, case: CaseSensitivity) -> ConfigResult<Self> {
        Ok(Self {
            project_root: normalize_absolute(project_root)?,
            case,
            root: ConfigIndexNode::default(),
            len: 0,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    /// Key of `target` under this index's project root.
    pub fn key_for(&self, target: &Path) -> ConfigResult<PathKey> {
        PathKey::from_paths(&self.project_root, target, self.case)
    }

    /// Store `fields` as the config of directory `dir`.
    ///
    /// Replaces (never merges with) a record already stored for `dir` and
    /// returns it. Field contents are not validated here.
    pub fn insert(
        &mut self,
        dir: &Path,
        fields: ConfigFields,
    ) -> ConfigResult<Option<ConfigRecord>> {
        let key = self.key_for(dir)?;
        let config_root = normalize_absolute(dir)?;

        let mut node = &mut self.root;
        for segment in key.segments() {
            node = node.children.entry(segment.clone()).or_default();
        }

        let previous = node.record.replace(ConfigRecord::new(config_root, fields));
        match previous {
            Some(ref old) => {
                debug!(key = %key, root = %old.config_root.display(), "Replaced config record")
            }
            None => self.len += 1,
        }
        Ok(previous)
    }

    /// Record stored at exactly `dir`, if any.
    pub fn get(&self, dir: &Path) -> ConfigResult<Option<&ConfigRecord>> {
        let key = self.key_for(dir)?;
        let mut node = &self.root;
        for segment in key.segments() {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(node.record.as_ref())
    }

    /// Record of the deepest directory that is `target` or one of its ancestors.
    ///
    /// The returned record carries its own config root. Fails with
    /// `ConfigNotFound` when no directory between the project root and
    /// `target` has a config.
    pub fn resolve_nearest(&self, target: &Path) -> ConfigResult<&ConfigRecord> {
        let key = self.key_for(target)?;

        let mut node = &self.root;
        let mut nearest = node.record.as_ref();
        for segment in key.segments() {
            let Some(child) = node.children.get(segment) else {
                break;
            };
            node = child;
            if let Some(record) = node.record.as_ref() {
                nearest = Some(record);
            }
        }

        match nearest {
            Some(record) => {
                trace!(key = %key, root = %record.config_root.display(), "Resolved nearest config");
                Ok(record)
            }
            None => Err(ConfigError::not_found(target)),
        }
    }

    /// All records, parents before children, siblings in key order.
    pub fn records(&self) -> Vec<&ConfigRecord> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let Some(record) = node.record.as_ref() {
                out.push(record);
            }
            // Reverse so the smallest key is popped first.
            stack.extend(node.children.values().rev());
        }
        out
    }

    /// Directories that own a config file.
    pub fn config_roots(&self) -> Vec<&Path> {
        self.records().into_iter().map(|r| r.config_root()).collect()
    }

    /// Drop every record, keeping the project root.
    pub fn clear(&mut self) {
        self.root = ConfigIndexNode::default();
        self.len = 0;
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
