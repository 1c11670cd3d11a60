//! Error types for claimsboard-core
//!
//! Local failures only (files, configuration, client construction). Remote
//! failures never surface as `CoreError`: they are normalized into the
//! response envelope by [`crate::api::envelope`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for claimsboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Credential storage
    // ===================
    #[error("Failed to read credentials: {path}")]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write credentials: {path}")]
    CredentialWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize credentials for {path}")]
    CredentialEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{surface} storage unavailable: {message}")]
    StorageUnavailable {
        surface: &'static str,
        message: String,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Could not determine the user config directory")]
    ConfigDirNotFound,

    // ===================
    // HTTP client
    // ===================
    #[error("Failed to build HTTP client: {message}")]
    HttpClient { message: String },
}

impl CoreError {
    /// Actionable hint for terminal output, when one exists
    pub fn suggestion(&self) -> Option<String> {
        match self {
            CoreError::CredentialRead { path, .. } | CoreError::CredentialWrite { path, .. } => {
                Some(format!("Check permissions on {}", path.display()))
            }
            CoreError::ConfigParse { path, .. } => {
                Some(format!("Validate TOML syntax in {}", path.display()))
            }
            CoreError::InvalidBaseUrl { .. } => Some(
                "Set CLAIMSBOARD_API_BASE_URL to an http:// or https:// URL".to_string(),
            ),
            CoreError::ConfigDirNotFound => {
                Some("Pass --config or set CLAIMSBOARD_CONFIG explicitly".to_string())
            }
            _ => None,
        }
    }
}
