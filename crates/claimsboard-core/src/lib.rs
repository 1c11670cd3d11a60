//! claimsboard-core - Core library for claimsboard
//!
//! Session manager, route guard, extraction grouping, credential stores and
//! the API client for the medical claims portal. The `http` feature adds the
//! native `reqwest` client; the WASM front-end builds without it.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extraction;
pub mod format;
pub mod forms;
pub mod guard;
pub mod session;

pub use api::{ClaimsApi, UploadRequest};
#[cfg(feature = "http")]
pub use api::HttpApiClient;
pub use config::PortalConfig;
pub use credentials::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, MirroredCredentials,
    AUTH_TOKEN_KEY,
};
pub use error::CoreError;
pub use extraction::{group_claim, group_lines, ConfidenceTier, GroupedExtraction};
pub use forms::FieldError;
pub use guard::{GuardConfig, GuardDecision, RouteGuard};
pub use session::{Session, SessionManager, SessionPhase};
