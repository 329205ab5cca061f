//! CLI command definitions for sftp-sync-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve per-directory SFTP sync configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (default: current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit settings file (replaces project and user settings)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration for a path
    Resolve(PathArgs),

    /// Print the connection details for a path
    HostInfo(PathArgs),

    /// List directories that own a config file
    Roots,

    /// Create the default config file at the project root
    Init,

    /// Report which paths are excluded by their config's ignore patterns
    CheckIgnore(CheckIgnoreArgs),
}

/// Arguments for commands that take a single path
#[derive(Args, Debug)]
pub struct PathArgs {
    /// File or directory inside the project
    pub path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Arguments for the check-ignore subcommand
#[derive(Args, Debug)]
pub struct CheckIgnoreArgs {
    /// Paths to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}
