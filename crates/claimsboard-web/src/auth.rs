//! Reactive wrapper around the session manager

use crate::api::{BrowserApi, API_BASE_URL};
use crate::storage::browser_credentials;
use claimsboard_core::{Session, SessionManager};
use claimsboard_types::{ApiResponse, RegisterPayload, User};
use leptos::prelude::*;
use std::sync::Arc;

/// Session manager plus a signal mirroring its state
#[derive(Clone)]
pub struct AuthContext {
    manager: Arc<SessionManager<BrowserApi>>,
    session: RwSignal<Session>,
}

impl AuthContext {
    pub fn new() -> Self {
        let credentials = browser_credentials();
        let api = BrowserApi::new(API_BASE_URL, credentials.clone());
        let manager = Arc::new(SessionManager::new(api, credentials));
        manager.initialize_auth();

        Self {
            session: RwSignal::new(manager.snapshot()),
            manager,
        }
    }

    fn sync(&self) {
        self.session.set(self.manager.snapshot());
    }

    /// Reactive session state
    pub fn session(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated())
    }

    pub fn api(&self) -> &BrowserApi {
        self.manager.api()
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.session.update(|s| {
            s.is_loading = true;
            s.last_error = None;
        });
        let ok = self.manager.login(email, password).await;
        self.sync();
        ok
    }

    pub async fn register(&self, payload: &RegisterPayload) -> ApiResponse<User> {
        self.session.update(|s| {
            s.is_loading = true;
            s.last_error = None;
        });
        let response = self.manager.register(payload).await;
        self.sync();
        response
    }

    pub fn logout(&self) {
        self.manager.logout();
        self.sync();
    }

    pub fn clear_error(&self) {
        self.manager.clear_error();
        self.sync();
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Auth provider component (wraps app root)
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    provide_context(AuthContext::new());
    children()
}

/// Hook to access the auth context
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
