//! SFTP Sync Config Library
//!
//! Nearest-ancestor resolution of per-directory sync configuration:
//! [`index::ConfigIndex`] finds which config file governs a path and
//! [`config::ConfigResolver`] turns it into an [`config::EffectiveConfig`]
//! for that exact path.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod logging;
pub mod paths;
pub mod project;
