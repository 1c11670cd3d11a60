//! Session manager
//!
//! Single owner of the authentication state: who is logged in, with which
//! bearer token, and whether a login is in flight. Front-ends hold one
//! `SessionManager` per process (or per browser tab) and read snapshots.
//!
//! Overlapping logins are resolved by a generation counter: every `login`
//! and `logout` bumps it, and a login response whose generation is no longer
//! current is dropped without touching the state.

use crate::api::ClaimsApi;
use crate::credentials::CredentialStore;
use claimsboard_types::envelope::LOGIN_FAILED;
use claimsboard_types::{ApiErrorDetail, ApiResponse, LoginPayload, RegisterPayload, User};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication state visible to views
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    /// Only present together with `token`
    pub user: Option<User>,
    pub is_loading: bool,
    pub last_error: Option<ApiErrorDetail>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.token, &self.user, self.is_loading) {
            (None, _, true) => SessionPhase::Authenticating,
            (None, _, false) => SessionPhase::Idle,
            (Some(_), Some(_), _) => SessionPhase::Authenticated,
            (Some(_), None, _) => SessionPhase::TokenOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Authenticating,
    Authenticated,
    /// Token restored from storage; profile not fetched
    TokenOnly,
}

pub struct SessionManager<A> {
    api: A,
    credentials: Arc<dyn CredentialStore>,
    state: RwLock<Session>,
    generation: AtomicU64,
}

impl<A: ClaimsApi> SessionManager<A> {
    pub fn new(api: A, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            state: RwLock::new(Session::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase()
    }

    /// Authenticate and persist the token. Returns true on success.
    ///
    /// Failures land in `last_error`; this never returns an error.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.last_error = None;
        }

        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&payload).await;

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded login response");
            return false;
        }
        state.is_loading = false;

        let outcome = match response {
            ApiResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiResponse {
                error: Some(error), ..
            } => Err(error),
            _ => Err(ApiErrorDetail::new(LOGIN_FAILED, "Login failed")),
        };

        match outcome {
            Ok(data) => {
                if let Err(e) = self.credentials.save(&data.token) {
                    warn!(error = %e, "Failed to persist session token");
                }
                info!(user_id = %data.user.user_id, "Logged in");
                state.token = Some(data.token);
                state.user = Some(data.user);
                state.last_error = None;
                true
            }
            Err(error) => {
                warn!(code = %error.code, "Login failed");
                // Drop any token left by an earlier session so both surfaces agree
                if state.token.is_some() {
                    if let Err(e) = self.credentials.clear() {
                        warn!(error = %e, "Failed to clear session token");
                    }
                }
                state.token = None;
                state.user = None;
                state.last_error = Some(error);
                false
            }
        }
    }

    /// Create an account. The full envelope is returned to the caller.
    ///
    /// Any earlier error is cleared first. Only transport failures are
    /// recorded in `last_error`; validation errors reported by the server are
    /// the caller's to display.
    pub async fn register(&self, payload: &RegisterPayload) -> ApiResponse<User> {
        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.last_error = None;
        }

        let response = self.api.register(payload).await;

        let mut state = self.state.write();
        state.is_loading = false;
        match &response.error {
            Some(error) if error.is_transport() => {
                warn!(error = %error, "Registration request failed");
                state.last_error = Some(error.clone());
            }
            Some(error) => debug!(code = %error.code, "Registration rejected"),
            None => info!(email = %payload.email, "Registered"),
        }
        response
    }

    /// Forget the session on every surface and cancel any in-flight login
    pub fn logout(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear session token");
        }
        *self.state.write() = Session::default();
        info!("Logged out");
    }

    /// Restore a persisted token, without fetching the profile
    pub fn initialize_auth(&self) {
        if let Some(token) = self.credentials.load() {
            debug!(surface = self.credentials.surface(), "Restored session token");
            let mut state = self.state.write();
            state.token = Some(token);
            state.user = None;
        }
    }

    pub fn clear_error(&self) {
        self.state.write().last_error = None;
    }
}

impl<A> std::fmt::Debug for SessionManager<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SessionManager")
            .field("phase", &state.phase())
            .field("credentials", &self.credentials.surface())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
