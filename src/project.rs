//! Project-level owner of the config index.
//!
//! [`ProjectConfigs`] ties a project root to its settings and its current
//! [`ConfigIndex`]. Rebuilds construct a complete new index off to the side
//! and publish it with a single atomic swap, so concurrent readers always
//! see either the old or the new index, never a half-built one.

use crate::config::{
    ConfigResolver, EffectiveConfig, HostInfo, IgnoreMatcher, Settings, build_index,
};
use crate::index::ConfigIndex;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Config index and resolver for one project tree.
pub struct ProjectConfigs {
    root: PathBuf,
    settings: Settings,
    resolver: ConfigResolver,
    index: ArcSwap<ConfigIndex>,
}

impl ProjectConfigs {
    /// Discover every config file under `root` and index it.
    pub fn open(root: impl Into<PathBuf>, settings: Settings) -> Result<Self> {
        let root = root.into();
        let index = build_index(&root, &settings)?;
        Ok(Self::from_index(root, settings, index))
    }

    /// Wrap an already built index.
    pub fn from_index(root: impl Into<PathBuf>, settings: Settings, index: ConfigIndex) -> Self {
        let resolver = ConfigResolver::new(settings.field_defaults(), settings.case_sensitivity());
        Self {
            root: root.into(),
            settings,
            resolver,
            index: ArcSwap::from_pointee(index),
        }
    }

    /// Rediscover config files and replace the index.
    ///
    /// On failure the previous index stays in place.
    pub fn rebuild(&self) -> Result<()> {
        let index = build_index(&self.root, &self.settings)?;
        let count = index.len();
        self.index.store(Arc::new(index));
        info!(configs = count, root = %self.root.display(), "Config index rebuilt");
        Ok(())
    }

    /// Effective configuration for `path`.
    pub fn resolve(&self, path: &Path) -> Result<EffectiveConfig> {
        let index = self.index.load();
        let record = index.resolve_nearest(path)?;
        Ok(self.resolver.resolve_record(record, path)?)
    }

    /// Connection details for `path`.
    pub fn host_info(&self, path: &Path) -> Result<HostInfo> {
        Ok(self.resolve(path)?.host_info())
    }

    /// Whether `path` is excluded by the ignore globs of its own config.
    pub fn is_ignored(&self, path: &Path) -> Result<bool> {
        let config = self.resolve(path)?;
        let matcher = IgnoreMatcher::from_config(&config, self.settings.case_sensitivity())?;
        Ok(matcher.is_ignored(path))
    }

    /// Directories that currently own a config file.
    pub fn config_roots(&self) -> Vec<PathBuf> {
        self.index
            .load()
            .config_roots()
            .into_iter()
            .map(Path::to_path_buf)
            .collect()
    }

    /// The index as of now; unaffected by later rebuilds.
    pub fn snapshot(&self) -> Arc<ConfigIndex> {
        self.index.load_full()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFields;
    use crate::paths::CaseSensitivity;

    fn project_with(records: &[(&str, &str)]) -> ProjectConfigs {
        let mut index = ConfigIndex::new(Path::new("/proj"), CaseSensitivity::Sensitive).unwrap();
        for (dir, remote) in records {
            let fields = ConfigFields {
                remote_path: Some(remote.to_string()),
                ..Default::default()
            };
            index.insert(Path::new(dir), fields).unwrap();
        }
        ProjectConfigs::from_index("/proj", Settings::default(), index)
    }

    #[test]
    fn test_resolve_uses_settings_defaults() {
        let mut settings = Settings::default();
        settings.defaults.port = Some(2022);
        let mut index = ConfigIndex::new(Path::new("/proj"), CaseSensitivity::Sensitive).unwrap();
        index.insert(Path::new("/proj"), ConfigFields::default()).unwrap();

        let project = ProjectConfigs::from_index("/proj", settings, index);
        let config = project.resolve(Path::new("/proj/a")).unwrap();
        assert_eq!(config.port, 2022);
        assert_eq!(config.remote_path, "/home/a");
    }

    #[test]
    fn test_host_info_projection() {
        let project = project_with(&[("/proj", "/r")]);
        let info = project.host_info(Path::new("/proj/x")).unwrap();
        assert_eq!(info.host, "host");
        assert_eq!(info.port, 22);
    }

    #[test]
    fn test_resolve_without_config_fails() {
        let project = project_with(&[("/proj/a", "/r")]);
        assert!(project.resolve(Path::new("/proj/b")).is_err());
    }

    #[test]
    fn test_snapshot_survives_rebuild_failure() {
        // The root does not exist on disk, so rediscovery fails.
        let project = project_with(&[("/proj", "/r")]);
        let before = project.snapshot();
        assert!(project.rebuild().is_err());
        assert_eq!(project.snapshot().len(), before.len());
        assert_eq!(project.config_roots(), vec![PathBuf::from("/proj")]);
    }
}
