//! Configuration types and structures.
//!
//! [`ConfigFields`] is what a config file declares (every field optional),
//! [`EffectiveConfig`] is what a caller gets back for one path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Well-known name of a per-directory config file.
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".sftpConfig.json";

/// Default SSH port.
pub const DEFAULT_PORT: u16 = 22;

/// Default remote destination.
pub const DEFAULT_REMOTE_PATH: &str = "/home";

/// Ignore patterns applied when a config does not declare its own.
pub const DEFAULT_IGNORE: &[&str] = &["/**/.vscode", "/**/.git", "/**/.DS_Store"];

/// Transfer protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Sftp,
    Ftp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Sftp => "sftp",
            Protocol::Ftp => "ftp",
        }
    }
}

/// How a sync decides which files to transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Transfer new and changed files only (default).
    #[default]
    Update,
    /// Mirror the tree, removing files missing on the source side.
    Full,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Update => "update",
            SyncMode::Full => "full",
        }
    }
}

/// Fields declared by one config file.
///
/// Every field is optional; unset fields fall back to defaults at
/// materialization time. Keys the schema does not know are kept in `extra`.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,

    /// Absolute path on the remote host, always `/`-separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_on_save: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<SyncMode>,

    /// Globs rooted at the directory that owns the config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,

    /// Unrecognized keys, preserved but not interpreted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigFields {
    /// Built-in defaults covering every mandatory field.
    pub fn builtin_defaults() -> Self {
        Self {
            host: Some("host".to_string()),
            port: Some(DEFAULT_PORT),
            username: Some("username".to_string()),
            password: Some("password".to_string()),
            protocol: Some(Protocol::Sftp),
            private_key_path: None,
            passphrase: None,
            remote_path: Some(DEFAULT_REMOTE_PATH.to_string()),
            upload_on_save: Some(false),
            sync_mode: Some(SyncMode::Update),
            ignore: Some(DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect()),
            extra: Map::new(),
        }
    }

    /// Field-wise overlay: every field set in `overlay` replaces the one in `self`.
    pub fn overlay(mut self, overlay: ConfigFields) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if overlay.$field.is_some() { self.$field = overlay.$field; })*
            };
        }
        take!(
            host,
            port,
            username,
            password,
            protocol,
            private_key_path,
            passphrase,
            remote_path,
            upload_on_save,
            sync_mode,
            ignore
        );
        self.extra.extend(overlay.extra);
        self
    }
}

/// The configuration that applies to one specific path.
///
/// Path-valued fields are already re-expressed for that path: `ignore`
/// holds absolute globs and `remote_path` is the remote counterpart of the
/// queried path.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub protocol: Protocol,
    pub private_key_path: Option<String>,
    pub passphrase: Option<String>,
    pub remote_path: String,
    pub upload_on_save: bool,
    pub sync_mode: SyncMode,
    pub ignore: Vec<String>,
    /// Directory whose config file produced this configuration.
    pub config_root: PathBuf,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EffectiveConfig {
    /// Connection details for the transport layer.
    pub fn host_info(&self) -> HostInfo {
        HostInfo {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            private_key_path: self.private_key_path.clone(),
            passphrase: self.passphrase.clone(),
        }
    }
}

/// Read-only connection projection of an [`EffectiveConfig`].
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub private_key_path: Option<String>,
    pub passphrase: Option<String>,
}

const REDACTED: &str = "[REDACTED]";

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| REDACTED)
}

// Secrets never reach logs through `{:?}`.
impl fmt::Debug for ConfigFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFields")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("protocol", &self.protocol)
            .field("private_key_path", &self.private_key_path)
            .field("passphrase", &redact(&self.passphrase))
            .field("remote_path", &self.remote_path)
            .field("upload_on_save", &self.upload_on_save)
            .field("sync_mode", &self.sync_mode)
            .field("ignore", &self.ignore)
            .field("extra", &self.extra)
            .finish()
    }
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("protocol", &self.protocol)
            .field("private_key_path", &self.private_key_path)
            .field("passphrase", &redact(&self.passphrase))
            .field("remote_path", &self.remote_path)
            .field("upload_on_save", &self.upload_on_save)
            .field("sync_mode", &self.sync_mode)
            .field("ignore", &self.ignore)
            .field("config_root", &self.config_root)
            .field("extra", &self.extra)
            .finish()
    }
}

impl fmt::Debug for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostInfo")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("private_key_path", &self.private_key_path)
            .field("passphrase", &redact(&self.passphrase))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_camel_case_fields() {
        let fields: ConfigFields = serde_json::from_value(json!({
            "host": "example.com",
            "port": 2222,
            "remotePath": "/srv/app",
            "uploadOnSave": true,
            "syncMode": "full",
            "privateKeyPath": "~/.ssh/id_ed25519"
        }))
        .unwrap();

        assert_eq!(fields.host.as_deref(), Some("example.com"));
        assert_eq!(fields.port, Some(2222));
        assert_eq!(fields.remote_path.as_deref(), Some("/srv/app"));
        assert_eq!(fields.upload_on_save, Some(true));
        assert_eq!(fields.sync_mode, Some(SyncMode::Full));
        assert_eq!(fields.private_key_path.as_deref(), Some("~/.ssh/id_ed25519"));
        assert!(fields.username.is_none());
        assert!(fields.extra.is_empty());
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let fields: ConfigFields = serde_json::from_value(json!({
            "host": "h",
            "watcher": {"files": "**/*.js"}
        }))
        .unwrap();

        assert_eq!(fields.extra["watcher"]["files"], "**/*.js");
        let back = serde_json::to_value(&fields).unwrap();
        assert_eq!(back["watcher"]["files"], "**/*.js");
    }

    #[test]
    fn test_builtin_defaults() {
        let defaults = ConfigFields::builtin_defaults();
        assert_eq!(defaults.port, Some(22));
        assert_eq!(defaults.protocol, Some(Protocol::Sftp));
        assert_eq!(defaults.remote_path.as_deref(), Some("/home"));
        assert_eq!(defaults.sync_mode, Some(SyncMode::Update));
        assert_eq!(defaults.upload_on_save, Some(false));
        assert_eq!(
            defaults.ignore.unwrap(),
            vec!["/**/.vscode", "/**/.git", "/**/.DS_Store"]
        );
        assert!(defaults.private_key_path.is_none());
    }

    #[test]
    fn test_overlay_only_replaces_set_fields() {
        let overlay = ConfigFields {
            host: Some("override".to_string()),
            ignore: Some(vec![]),
            ..Default::default()
        };
        let merged = ConfigFields::builtin_defaults().overlay(overlay);

        assert_eq!(merged.host.as_deref(), Some("override"));
        assert_eq!(merged.ignore, Some(vec![]));
        assert_eq!(merged.port, Some(22));
    }

    #[test]
    fn test_host_info_debug_redacts_secrets() {
        let info = HostInfo {
            host: "h".to_string(),
            port: 22,
            username: Some("me".to_string()),
            password: Some("hunter2".to_string()),
            private_key_path: None,
            passphrase: Some("secret".to_string()),
        };
        let debug = format!("{:?}", info);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_config_fields_debug_redacts_secrets() {
        let fields = ConfigFields {
            password: Some("hunter2".to_string()),
            passphrase: Some("open sesame".to_string()),
            ..ConfigFields::builtin_defaults()
        };
        let debug = format!("{:?}", fields);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("open sesame"));
        assert!(debug.contains("username: Some(\"username\")"));

        let unset = format!("{:?}", ConfigFields::default());
        assert!(unset.contains("password: None"));
    }
}
