//! Per-directory SFTP sync configuration.
//!
//! A project may hold any number of `.sftpConfig.json` files. Each applies
//! to its own directory and everything below it until a deeper file takes
//! over. This module holds:
//! - **Types** - the file schema ([`ConfigFields`]) and the per-path result
//!   ([`EffectiveConfig`], [`HostInfo`])
//! - **Resolver** - defaults merge and path rewriting for one query path
//! - **Loader** - discovery of config files and default file creation
//! - **Settings** - tiered settings of the tool itself
//!
//! ## Environment Variables
//! - `SFTP_SYNC_SETTINGS_PATH` - Explicit settings file (overrides file tiers)
//! - `SFTP_SYNC_USER_DIR` - User settings dir (default: `~/.sftp-sync`)
//! - `SFTP_SYNC_CONFIG_FILE_NAME` - Config file name
//! - `SFTP_SYNC_CASE_SENSITIVE` - `true`/`false`

mod ignore;
mod loader;
mod merge;
pub mod remote;
mod resolver;
mod settings;
mod types;

pub use ignore::IgnoreMatcher;
pub use loader::{
    InitOutcome, build_index, default_config_path, discover_config_files, init_default_config,
    load_fields,
};
pub use merge::{deep_merge, deep_merge_all};
pub use resolver::ConfigResolver;
pub use settings::{DiscoverySettings, Settings, SettingsPaths, SettingsTier};
pub use types::*;
