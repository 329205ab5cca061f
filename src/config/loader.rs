//! Discovery and loading of per-directory config files.
//!
//! Walks the project tree for config files, parses each one, and feeds the
//! results into a fresh [`ConfigIndex`]. Also creates the default config
//! file at the project root on request.

use super::settings::Settings;
use super::types::ConfigFields;
use crate::error::{ConfigError, ConfigResult};
use crate::index::ConfigIndex;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Find every config file below `project_root`, sorted by path.
pub fn discover_config_files(project_root: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    let skip_dirs = &settings.discovery.skip_dirs;

    let walker = WalkDir::new(project_root)
        .follow_links(settings.discovery.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Never prune the root itself, even if its name is in skip_dirs.
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !skip_dirs
                    .iter()
                    .any(|skip| entry.file_name().to_string_lossy() == skip.as_str())
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", project_root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == settings.config_file_name.as_str() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(count = files.len(), root = %project_root.display(), "Discovered config files");
    Ok(files)
}

/// Read and parse one config file.
pub fn load_fields(path: &Path) -> ConfigResult<ConfigFields> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build a fresh index from every config file under `project_root`.
///
/// Any unreadable or malformed file fails the whole build.
pub fn build_index(project_root: &Path, settings: &Settings) -> Result<ConfigIndex> {
    let mut index = ConfigIndex::new(project_root, settings.case_sensitivity())?;

    for file in discover_config_files(project_root, settings)? {
        let fields = load_fields(&file)?;
        let dir = file
            .parent()
            .with_context(|| format!("config file {} has no parent", file.display()))?;
        index.insert(dir, fields)?;
    }

    info!(
        configs = index.len(),
        root = %project_root.display(),
        "Config index built"
    );
    Ok(index)
}

/// Outcome of [`init_default_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

impl InitOutcome {
    pub fn path(&self) -> &Path {
        match self {
            InitOutcome::Created(p) | InitOutcome::AlreadyExists(p) => p,
        }
    }
}

/// Path of the config file at the project root.
pub fn default_config_path(project_root: &Path, settings: &Settings) -> PathBuf {
    project_root.join(&settings.config_file_name)
}

/// Write the default config at the project root unless one already exists.
pub fn init_default_config(project_root: &Path, settings: &Settings) -> Result<InitOutcome> {
    let path = default_config_path(project_root, settings);
    if path.exists() {
        return Ok(InitOutcome::AlreadyExists(path));
    }

    let content = to_json_4_spaces(&settings.field_defaults())?;
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), "Created default config");
    Ok(InitOutcome::Created(path))
}

/// Pretty-print with four-space indentation.
fn to_json_4_spaces<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}
