//! Portal configuration
//!
//! Resolution order: built-in defaults, then `<config dir>/claimsboard/config.toml`,
//! then the `CLAIMSBOARD_API_BASE_URL` environment variable. Command-line
//! flags are applied on top by the binary.

use crate::error::CoreError;
use crate::guard::GuardConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default remote API
pub const DEFAULT_API_BASE_URL: &str = "https://api.medicalclaims.example.com/v1";

/// Environment override for the API base URL
pub const API_BASE_URL_ENV: &str = "CLAIMSBOARD_API_BASE_URL";

const APP_DIR: &str = "claimsboard";
const CONFIG_FILE: &str = "config.toml";
const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub api_base_url: String,

    /// Requests taking longer than this are reported as transport failures
    pub request_timeout_secs: u64,

    /// Overrides `<config dir>/claimsboard/credentials.json`
    pub credentials_path: Option<PathBuf>,

    pub guard: GuardConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            credentials_path: None,
            guard: GuardConfig::default(),
        }
    }
}

impl PortalConfig {
    /// `<config dir>/claimsboard`
    pub fn default_dir() -> Result<PathBuf, CoreError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(CoreError::ConfigDirNotFound)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_dir() {
                Ok(dir) => dir.join(CONFIG_FILE),
                Err(_) => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(CoreError::ConfigRead { path, source }),
        };

        let config: Self = toml::from_str(&content).map_err(|e| CoreError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), "Loaded config file");
        config.validate()?;
        Ok(config)
    }

    /// Apply `CLAIMSBOARD_API_BASE_URL` when set and non-empty
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(API_BASE_URL_ENV).ok())
    }

    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api_base_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_base_url(&self.api_base_url)?;
        if self.request_timeout_secs == 0 {
            return Err(CoreError::InvalidConfig {
                message: "request_timeout_secs must be greater than 0".to_string(),
            });
        }
        self.guard
            .validate()
            .map_err(|message| CoreError::InvalidConfig { message })
    }

    /// Where the CLI keeps its session token
    pub fn credentials_path(&self) -> Result<PathBuf, CoreError> {
        match &self.credentials_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::default_dir()?.join(CREDENTIALS_FILE)),
        }
    }
}

/// Only absolute `http`/`https` URLs are accepted
pub fn validate_base_url(url: &str) -> Result<(), CoreError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| CoreError::InvalidBaseUrl {
            url: url.to_string(),
            reason: "expected an http:// or https:// URL".to_string(),
        })?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(CoreError::InvalidBaseUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = PortalConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, PortalConfig::default());
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
api_base_url = "http://localhost:4000/v1"

[guard]
protected_paths = ["/dashboard", "/reports"]
"#,
        )
        .unwrap();

        let config = PortalConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000/v1");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.guard.protected_paths, vec!["/dashboard", "/reports"]);
        assert_eq!(config.guard.login_path, "/login");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = [").unwrap();
        assert!(matches!(
            PortalConfig::load(Some(&path)),
            Err(CoreError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 0").unwrap();
        assert!(matches!(
            PortalConfig::load(Some(&path)),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_base_url_override() {
        let config = PortalConfig::default()
            .with_base_url_override(Some("  http://127.0.0.1:9000 ".into()));
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");

        let config = PortalConfig::default().with_base_url_override(Some(String::new()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("https://api.example.com/v1").is_ok());
        assert!(validate_base_url("http://localhost:8080").is_ok());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("https://").is_err());
    }

    #[test]
    fn test_explicit_credentials_path() {
        let config = PortalConfig {
            credentials_path: Some(PathBuf::from("/tmp/creds.json")),
            ..PortalConfig::default()
        };
        assert_eq!(
            config.credentials_path().unwrap(),
            PathBuf::from("/tmp/creds.json")
        );
    }
}
