//! Output formatting for the CLI.

use crate::config::{EffectiveConfig, HostInfo};
use anyhow::Result;
use std::path::Path;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Render an effective config.
pub fn format_effective(config: &EffectiveConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Text => Ok(effective_text(config)),
    }
}

/// Render host info. Text output never prints secrets.
pub fn format_host_info(info: &HostInfo, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(info)?),
        OutputFormat::Text => {
            let mut out = format!("host: {}:{}\n", info.host, info.port);
            if let Some(ref user) = info.username {
                out.push_str(&format!("username: {}\n", user));
            }
            if info.password.is_some() {
                out.push_str("password: [set]\n");
            }
            if let Some(ref key) = info.private_key_path {
                out.push_str(&format!("private key: {}\n", key));
            }
            if info.passphrase.is_some() {
                out.push_str("passphrase: [set]\n");
            }
            Ok(out)
        }
    }
}

fn effective_text(config: &EffectiveConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("config root: {}\n", config.config_root.display()));
    out.push_str(&format!(
        "remote: {}://{}:{}{}\n",
        config.protocol.as_str(), config.host, config.port, config.remote_path
    ));
    if let Some(ref user) = config.username {
        out.push_str(&format!("username: {}\n", user));
    }
    out.push_str(&format!("sync mode: {}\n", config.sync_mode.as_str()));
    out.push_str(&format!("upload on save: {}\n", config.upload_on_save));

    if config.ignore.is_empty() {
        out.push_str("ignore: (none)\n");
    } else {
        out.push_str("ignore:\n");
        for pattern in &config.ignore {
            out.push_str(&format!("  - {}\n", pattern));
        }
    }

    for (key, value) in &config.extra {
        out.push_str(&format!("{}: {}\n", key, value));
    }

    out
}

/// Render config roots, one per line.
pub fn format_roots(roots: &[impl AsRef<Path>]) -> String {
    roots
        .iter()
        .map(|r| format!("{}\n", r.as_ref().display()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFields, ConfigResolver};

    fn sample() -> EffectiveConfig {
        ConfigResolver::default()
            .materialize(
                &ConfigFields {
                    host: Some("example.com".to_string()),
                    password: Some("hunter2".to_string()),
                    ..Default::default()
                },
                Path::new("/proj"),
                Path::new("/proj/site"),
            )
            .unwrap()
    }

    #[test]
    fn test_text_format() {
        let text = format_effective(&sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("config root: /proj\n"));
        assert!(text.contains("remote: sftp://example.com:22/home/site\n"));
        assert!(text.contains("  - /proj/**/.git\n"));
    }

    #[test]
    fn test_host_info_text_hides_password() {
        let text = format_host_info(&sample().host_info(), OutputFormat::Text).unwrap();
        assert!(text.contains("host: example.com:22"));
        assert!(text.contains("password: [set]"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn test_roots() {
        let roots = vec![Path::new("/proj"), Path::new("/proj/web")];
        assert_eq!(format_roots(&roots), "/proj\n/proj/web\n");
    }
}
