//! Structured error types for configuration resolution.

use serde::Serialize;
use std::path::PathBuf;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Caller errors
    OutOfScope,
    InvalidPattern,

    // Not found errors
    ConfigNotFound,

    // Schema errors
    MissingField,

    // Discovery errors
    IoError,
    ParseError,
}

/// Errors raised while indexing, resolving or materializing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The path is neither the project root nor below it.
    #[error("path {} is outside of {}", path.display(), root.display())]
    OutOfScope { path: PathBuf, root: PathBuf },

    /// No configuration exists on the ancestor chain of the path.
    #[error("config file not found for {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// A mandatory field is absent after merging with defaults.
    #[error("{field} is required but missing from both the config and the defaults")]
    MissingField { field: &'static str },

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn out_of_scope(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::OutOfScope {
            path: path.into(),
            root: root.into(),
        }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::OutOfScope { .. } => ErrorCode::OutOfScope,
            ConfigError::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            ConfigError::MissingField { .. } => ErrorCode::MissingField,
            ConfigError::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            ConfigError::Io { .. } => ErrorCode::IoError,
            ConfigError::Parse { .. } => ErrorCode::ParseError,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ConfigError::out_of_scope("/etc", "/proj").code(),
            ErrorCode::OutOfScope
        );
        assert_eq!(
            ConfigError::not_found("/proj/a").code(),
            ErrorCode::ConfigNotFound
        );
        assert_eq!(
            ConfigError::missing_field("host").code(),
            ErrorCode::MissingField
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::not_found("/proj/a");
        assert_eq!(err.to_string(), "config file not found for /proj/a");

        let err = ConfigError::missing_field("remotePath");
        assert!(err.to_string().starts_with("remotePath is required"));
    }

    #[test]
    fn test_code_serializes_screaming_snake() {
        let value = serde_json::to_value(ErrorCode::ConfigNotFound).unwrap();
        assert_eq!(value, "CONFIG_NOT_FOUND");
    }
}
