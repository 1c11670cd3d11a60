//! Browser credential surfaces
//!
//! `localStorage["authToken"]` is the durable copy the app reads on start;
//! the `authToken` cookie is what the server-side route guard sees.

use claimsboard_core::credentials::{CredentialStore, MirroredCredentials, AUTH_TOKEN_KEY};
use claimsboard_core::CoreError;
use std::sync::Arc;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage};

fn unavailable(surface: &'static str, message: impl Into<String>) -> CoreError {
    CoreError::StorageUnavailable {
        surface,
        message: message.into(),
    }
}

fn js_message(value: wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<Storage, CoreError> {
        web_sys::window()
            .ok_or_else(|| unavailable("localStorage", "no window"))?
            .local_storage()
            .map_err(|e| unavailable("localStorage", js_message(e)))?
            .ok_or_else(|| unavailable("localStorage", "disabled"))
    }
}

impl CredentialStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        Self::storage()
            .ok()?
            .get_item(AUTH_TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.trim().is_empty())
    }

    fn save(&self, token: &str) -> Result<(), CoreError> {
        Self::storage()?
            .set_item(AUTH_TOKEN_KEY, token)
            .map_err(|e| unavailable("localStorage", js_message(e)))
    }

    fn clear(&self) -> Result<(), CoreError> {
        Self::storage()?
            .remove_item(AUTH_TOKEN_KEY)
            .map_err(|e| unavailable("localStorage", js_message(e)))
    }

    fn surface(&self) -> &'static str {
        "localStorage"
    }
}

/// `authToken=<token>; Path=/; SameSite=Lax`
#[derive(Debug, Default, Clone, Copy)]
pub struct CookieStore;

impl CookieStore {
    fn document() -> Result<HtmlDocument, CoreError> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| unavailable("cookie", "no document"))?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| unavailable("cookie", "not an HTML document"))
    }

    fn write(value: &str) -> Result<(), CoreError> {
        Self::document()?
            .set_cookie(value)
            .map_err(|e| unavailable("cookie", js_message(e)))
    }
}

impl CredentialStore for CookieStore {
    fn load(&self) -> Option<String> {
        let cookies = Self::document().ok()?.cookie().ok()?;
        claimsboard_core::guard::token_from_cookie_header(&cookies).map(str::to_string)
    }

    fn save(&self, token: &str) -> Result<(), CoreError> {
        Self::write(&format!("{AUTH_TOKEN_KEY}={token}; Path=/; SameSite=Lax"))
    }

    fn clear(&self) -> Result<(), CoreError> {
        Self::write(&format!("{AUTH_TOKEN_KEY}=; Path=/; Max-Age=0; SameSite=Lax"))
    }

    fn surface(&self) -> &'static str {
        "cookie"
    }
}

/// Both browser surfaces behind the single credential write path
pub fn browser_credentials() -> Arc<dyn CredentialStore> {
    Arc::new(MirroredCredentials::new(
        Arc::new(LocalStorageStore),
        Arc::new(CookieStore),
    ))
}
