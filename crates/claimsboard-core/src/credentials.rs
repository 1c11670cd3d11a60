//! Persisted session credential
//!
//! The bearer token lives on two surfaces: a durable client-side key
//! (`authToken` in browser storage or the CLI credentials file) and a
//! transport-level `authToken` cookie that the route guard reads.
//! [`MirroredCredentials`] is the one write path that keeps both in step.

use crate::error::CoreError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key and cookie name of the session token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// A place the session token can be persisted
pub trait CredentialStore: Send + Sync {
    /// Stored token; empty values read as absent
    fn load(&self) -> Option<String>;

    fn save(&self, token: &str) -> Result<(), CoreError>;

    fn clear(&self) -> Result<(), CoreError>;

    /// Short name used in logs
    fn surface(&self) -> &'static str;
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}

/// In-process store (tests, ephemeral sessions)
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        non_empty(self.token.read().clone())
    }

    fn save(&self, token: &str) -> Result<(), CoreError> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.token.write() = None;
        Ok(())
    }

    fn surface(&self) -> &'static str {
        "memory"
    }
}

/// On-disk layout of the credentials file
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

/// JSON credentials file: `{ "authToken": "…" }`
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Like [`CredentialStore::load`] but surfaces I/O errors
    pub fn try_load(&self) -> Result<Option<String>, CoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CoreError::CredentialRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<CredentialFile>(&content) {
            Ok(file) => Ok(non_empty(file.auth_token)),
            Err(e) => {
                // Corrupt file: treat as logged out rather than failing start-up
                warn!(path = %self.path.display(), error = %e, "Ignoring malformed credentials file");
                Ok(None)
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        match self.try_load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read credentials file");
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CoreError::CredentialWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&CredentialFile {
            auth_token: Some(token.to_string()),
        })
        .map_err(|source| CoreError::CredentialEncode {
            path: self.path.clone(),
            source,
        })?;

        std::fs::write(&self.path, content).map_err(|source| CoreError::CredentialWrite {
            path: self.path.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&self.path, permissions) {
                warn!(path = %self.path.display(), error = %e, "Could not restrict credentials file permissions");
            }
        }

        debug!(path = %self.path.display(), "Session token written");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CoreError::CredentialWrite {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn surface(&self) -> &'static str {
        "file"
    }
}

/// Durable + transport surfaces written as one.
///
/// `save` and `clear` always attempt both surfaces and report the first
/// failure; `load` prefers the durable surface.
#[derive(Clone)]
pub struct MirroredCredentials {
    durable: Arc<dyn CredentialStore>,
    transport: Arc<dyn CredentialStore>,
}

impl MirroredCredentials {
    pub fn new(durable: Arc<dyn CredentialStore>, transport: Arc<dyn CredentialStore>) -> Self {
        Self { durable, transport }
    }

    pub fn durable(&self) -> &Arc<dyn CredentialStore> {
        &self.durable
    }

    pub fn transport(&self) -> &Arc<dyn CredentialStore> {
        &self.transport
    }

    fn both(
        &self,
        op: impl Fn(&dyn CredentialStore) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let durable = op(self.durable.as_ref());
        let transport = op(self.transport.as_ref());
        for (store, result) in [(&self.durable, &durable), (&self.transport, &transport)] {
            if let Err(e) = result {
                warn!(surface = store.surface(), error = %e, "Credential surface update failed");
            }
        }
        durable.and(transport)
    }
}

impl std::fmt::Debug for MirroredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirroredCredentials")
            .field("durable", &self.durable.surface())
            .field("transport", &self.transport.surface())
            .finish()
    }
}

impl CredentialStore for MirroredCredentials {
    fn load(&self) -> Option<String> {
        self.durable.load().or_else(|| self.transport.load())
    }

    fn save(&self, token: &str) -> Result<(), CoreError> {
        self.both(|store| store.save(token))
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.both(|store| store.clear())
    }

    fn surface(&self) -> &'static str {
        "mirrored"
    }
}
