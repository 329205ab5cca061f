//! sftp-sync-config CLI
//!
//! Indexes the `.sftpConfig.json` files of a project and answers which
//! configuration applies to a given path.

use anyhow::{Context, Result};
use clap::Parser;
use sftp_sync_config::cli::{Cli, Command};
use sftp_sync_config::config::{InitOutcome, Settings, SettingsPaths, init_default_config};
use sftp_sync_config::format::{format_effective, format_host_info, format_roots};
use sftp_sync_config::logging::{LogTarget, init_logging};
use sftp_sync_config::project::ProjectConfigs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogTarget::parse(&cli.log), cli.verbose)?;

    let root = match cli.root {
        Some(ref root) => absolute(root)?,
        None => std::env::current_dir().context("reading current directory")?,
    };
    let settings = load_settings(&root, cli.settings.as_deref())?;
    debug!(root = %root.display(), ?settings, "Settings loaded");

    match cli.command {
        Command::Init => {
            match init_default_config(&root, &settings)? {
                InitOutcome::Created(path) => println!("Created {}", path.display()),
                InitOutcome::AlreadyExists(path) => {
                    println!("Config already exists: {}", path.display())
                }
            }
        }
        Command::Roots => {
            let project = ProjectConfigs::open(&root, settings)?;
            print!("{}", format_roots(&project.config_roots()));
        }
        Command::Resolve(args) => {
            let project = ProjectConfigs::open(&root, settings)?;
            let config = project.resolve(&absolute(&args.path)?)?;
            println!("{}", format_effective(&config, args.format)?.trim_end());
        }
        Command::HostInfo(args) => {
            let project = ProjectConfigs::open(&root, settings)?;
            let info = project.host_info(&absolute(&args.path)?)?;
            println!("{}", format_host_info(&info, args.format)?.trim_end());
        }
        Command::CheckIgnore(args) => {
            let project = ProjectConfigs::open(&root, settings)?;
            run_check_ignore(&project, &args.paths)?;
        }
    }

    Ok(())
}

/// Load settings, honoring an explicit `--settings` file.
fn load_settings(root: &Path, explicit: Option<&Path>) -> Result<Settings> {
    let Some(explicit) = explicit else {
        return Settings::load(root);
    };
    let paths = SettingsPaths {
        explicit_file: Some(absolute(explicit)?),
        ..Default::default()
    };
    let mut settings = Settings::load_with_paths(&paths)?;
    settings.apply_env_overrides(|name| std::env::var(name).ok());
    Ok(settings)
}

/// Print each ignored path, like `git check-ignore`.
fn run_check_ignore(project: &ProjectConfigs, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let path = absolute(path)?;
        if project.is_ignored(&path)? {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolving {}", path.display()))
}
