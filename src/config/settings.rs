//! Tool settings with tier-based merging.
//!
//! Settings control how projects are indexed, not what a project's config
//! files say. Tiers, lowest to highest:
//! 1. **Defaults** - built in
//! 2. **Project** - `<root>/.sftp-sync.yaml`
//! 3. **User** - `~/.sftp-sync/settings.yaml`
//! 4. **Environment** - `SFTP_SYNC_*` variables
//!
//! `SFTP_SYNC_SETTINGS_PATH` names a single file that replaces tiers 2 and 3.

use super::merge::deep_merge_all;
use super::types::{ConfigFields, DEFAULT_CONFIG_FILE_NAME};
use crate::paths::CaseSensitivity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the project-level settings tier.
pub const PROJECT_SETTINGS_FILE: &str = ".sftp-sync.yaml";

/// File name inside the user settings directory.
pub const USER_SETTINGS_FILE: &str = "settings.yaml";

/// Settings tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SettingsTier {
    Defaults = 0,
    Project = 1,
    User = 2,
    Environment = 3,
}

impl std::fmt::Display for SettingsTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsTier::Defaults => write!(f, "defaults"),
            SettingsTier::Project => write!(f, "project"),
            SettingsTier::User => write!(f, "user"),
            SettingsTier::Environment => write!(f, "environment"),
        }
    }
}

/// How config files are discovered on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Directory names never descended into.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    #[serde(default)]
    pub follow_links: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            skip_dirs: default_skip_dirs(),
            follow_links: false,
        }
    }
}

fn default_skip_dirs() -> Vec<String> {
    vec![".git".to_string(), "node_modules".to_string()]
}

fn default_config_file_name() -> String {
    DEFAULT_CONFIG_FILE_NAME.to_string()
}

fn default_case_sensitive() -> bool {
    true
}

/// Merged tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Name of per-directory config files.
    #[serde(default = "default_config_file_name")]
    pub config_file_name: String,

    /// Whether path segments compare case-sensitively.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    #[serde(default)]
    pub discovery: DiscoverySettings,

    /// Overrides applied on top of the built-in field defaults.
    #[serde(default)]
    pub defaults: ConfigFields,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file_name: default_config_file_name(),
            case_sensitive: default_case_sensitive(),
            discovery: DiscoverySettings::default(),
            defaults: ConfigFields::default(),
        }
    }
}

impl Settings {
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        CaseSensitivity::from_flag(self.case_sensitive)
    }

    /// Built-in field defaults with this settings' overrides applied.
    pub fn field_defaults(&self) -> ConfigFields {
        ConfigFields::builtin_defaults().overlay(self.defaults.clone())
    }

    /// Load settings for the project at `project_root` from all tiers.
    pub fn load(project_root: &Path) -> Result<Self> {
        let paths = SettingsPaths::discover(project_root);
        let mut settings = Self::load_with_paths(&paths)?;
        settings.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Load settings from explicit file tiers, without environment overrides.
    pub fn load_with_paths(paths: &SettingsPaths) -> Result<Self> {
        let mut tiers: Vec<Value> = vec![serde_json::to_value(Settings::default())?];

        if let Some(ref explicit) = paths.explicit_file {
            let value = read_yaml(explicit)
                .with_context(|| format!("loading settings from {}", explicit.display()))?;
            tiers.push(value);
        } else {
            for (tier, file) in [
                (SettingsTier::Project, &paths.project_file),
                (SettingsTier::User, &paths.user_file),
            ] {
                let Some(file) = file else { continue };
                if !file.exists() {
                    continue;
                }
                match read_yaml(file) {
                    Ok(value) => {
                        debug!(tier = %tier, path = %file.display(), "Loaded settings tier");
                        tiers.push(value);
                    }
                    Err(e) => warn!(
                        tier = %tier,
                        path = %file.display(),
                        "Skipping settings file: {:#}",
                        e
                    ),
                }
            }
        }

        let merged = deep_merge_all(tiers);
        Ok(serde_json::from_value(merged)?)
    }

    /// Apply `SFTP_SYNC_*` overrides read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("SFTP_SYNC_CONFIG_FILE_NAME") {
            self.config_file_name = name;
        }

        if let Some(flag) = lookup("SFTP_SYNC_CASE_SENSITIVE") {
            match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.case_sensitive = true,
                "0" | "false" | "no" => self.case_sensitive = false,
                other => warn!("Ignoring SFTP_SYNC_CASE_SENSITIVE={}", other),
            }
        }
    }
}

/// Locations of the file-based settings tiers.
#[derive(Debug, Clone, Default)]
pub struct SettingsPaths {
    /// Replaces the project and user tiers when set.
    pub explicit_file: Option<PathBuf>,
    pub project_file: Option<PathBuf>,
    pub user_file: Option<PathBuf>,
}

impl SettingsPaths {
    /// Discover tier files from the environment and home directory.
    pub fn discover(project_root: &Path) -> Self {
        let explicit_file = std::env::var("SFTP_SYNC_SETTINGS_PATH")
            .ok()
            .map(PathBuf::from);

        // User dir: SFTP_SYNC_USER_DIR or ~/.sftp-sync
        let user_file = std::env::var("SFTP_SYNC_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".sftp-sync")))
            .map(|dir| dir.join(USER_SETTINGS_FILE));

        Self {
            explicit_file,
            project_file: Some(project_root.join(PROJECT_SETTINGS_FILE)),
            user_file,
        }
    }

    pub fn with_files(project_file: Option<PathBuf>, user_file: Option<PathBuf>) -> Self {
        Self {
            explicit_file: None,
            project_file,
            user_file,
        }
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str::<Value>(&content)?)
}
