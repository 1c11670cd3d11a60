//! Navigation-time route guard
//!
//! Decides per request whether to allow it, send an anonymous visitor to the
//! login page, or bounce an authenticated session away from the auth pages.
//! The token comes from the transport-level `authToken` cookie because the
//! guard runs before any page code, outside the page's own storage.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::credentials::AUTH_TOKEN_KEY;

/// Paths the guard never evaluates: API routes, the compiled bundle, static
/// files, the favicon and images.
static EXCLUDED_PATHS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(?:api|pkg|static)(?:/|$)|^/favicon\.ico$|(?i:\.(?:svg|png|jpe?g|gif|webp))$")
        .expect("exclusion pattern is valid")
});

/// Characters kept verbatim in the return-target parameter (RFC 3986 unreserved)
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Route guard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Require a token (prefix match on whole path segments)
    pub protected_paths: Vec<String>,
    /// Auth pages, off-limits once a token is present
    pub public_paths: Vec<String>,
    pub login_path: String,
    /// Where authenticated sessions land when they hit an auth page
    pub landing_path: String,
    /// Query parameter carrying the originally requested path
    pub redirect_param: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_paths: vec![
                "/dashboard".to_string(),
                "/upload".to_string(),
                "/claims".to_string(),
            ],
            public_paths: vec!["/login".to_string(), "/register".to_string()],
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
            redirect_param: "redirectedFrom".to_string(),
        }
    }
}

impl GuardConfig {
    /// Every configured path must be absolute
    pub fn validate(&self) -> Result<(), String> {
        let all = self
            .protected_paths
            .iter()
            .chain(&self.public_paths)
            .chain([&self.login_path, &self.landing_path]);
        for path in all {
            if !path.starts_with('/') {
                return Err(format!("guard path '{path}' must start with '/'"));
            }
        }
        if self.redirect_param.trim().is_empty() {
            return Err("guard redirect_param must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Protected,
    Public,
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect { location: String },
}

impl GuardDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Redirect { location } => Some(location),
        }
    }
}

/// Stateless access check; the same input always yields the same decision
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: GuardConfig,
}

impl RouteGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Static assets, image files and API routes bypass the guard
    pub fn is_excluded(path: &str) -> bool {
        EXCLUDED_PATHS.is_match(strip_query(path))
    }

    pub fn classify(&self, path: &str) -> PathClass {
        let path = strip_query(path);
        if self
            .config
            .protected_paths
            .iter()
            .any(|prefix| matches_prefix(path, prefix))
        {
            PathClass::Protected
        } else if self
            .config
            .public_paths
            .iter()
            .any(|prefix| matches_prefix(path, prefix))
        {
            PathClass::Public
        } else {
            PathClass::Unclassified
        }
    }

    /// Decide what to do with a navigation to `path`.
    ///
    /// An empty token counts as no token.
    pub fn decide(&self, path: &str, token: Option<&str>) -> GuardDecision {
        if Self::is_excluded(path) {
            return GuardDecision::Allow;
        }

        let has_token = token.is_some_and(|t| !t.trim().is_empty());

        match (self.classify(path), has_token) {
            (PathClass::Protected, false) => GuardDecision::Redirect {
                location: self.login_redirect(strip_query(path)),
            },
            (PathClass::Public, true) => GuardDecision::Redirect {
                location: self.config.landing_path.clone(),
            },
            _ => GuardDecision::Allow,
        }
    }

    /// Where to go after a successful login.
    ///
    /// Only same-origin absolute paths are honoured; anything else (missing,
    /// `//host`, `https://…`) falls back to the landing path.
    pub fn return_target(&self, redirected_from: Option<&str>) -> String {
        match redirected_from.map(str::trim) {
            Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
                path.to_string()
            }
            _ => self.config.landing_path.clone(),
        }
    }

    fn login_redirect(&self, original_path: &str) -> String {
        format!(
            "{}?{}={}",
            self.config.login_path,
            self.config.redirect_param,
            utf8_percent_encode(original_path, QUERY_VALUE)
        )
    }
}

/// Extract the `authToken` value from a `Cookie` request header
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_TOKEN_KEY)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// `/dashboard` matches `/dashboard` and `/dashboard/…`, not `/dashboards`
fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> RouteGuard {
        RouteGuard::default()
    }

    #[test]
    fn test_protected_without_token_redirects_to_login() {
        let decision = guard().decide("/dashboard", None);
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                location: "/login?redirectedFrom=%2Fdashboard".to_string()
            }
        );
    }

    #[test]
    fn test_nested_protected_path_carries_full_path() {
        let decision = guard().decide("/claims/c-42?tab=docs", None);
        assert_eq!(
            decision.location(),
            Some("/login?redirectedFrom=%2Fclaims%2Fc-42")
        );
    }

    #[test]
    fn test_protected_with_token_allowed() {
        assert!(guard().decide("/dashboard", Some("jwt")).is_allow());
    }

    #[test]
    fn test_public_with_token_redirects_to_landing() {
        assert_eq!(
            guard().decide("/login", Some("jwt")).location(),
            Some("/dashboard")
        );
        assert_eq!(
            guard().decide("/register", Some("jwt")).location(),
            Some("/dashboard")
        );
    }

    #[test]
    fn test_public_without_token_allowed() {
        assert!(guard().decide("/login", None).is_allow());
    }

    #[test]
    fn test_unclassified_passes_regardless_of_token() {
        assert!(guard().decide("/", None).is_allow());
        assert!(guard().decide("/", Some("jwt")).is_allow());
        assert!(guard().decide("/about", None).is_allow());
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        assert!(!guard().decide("/upload", Some("")).is_allow());
        assert!(guard().decide("/login", Some("  ")).is_allow());
    }

    #[test]
    fn test_segment_aware_prefix() {
        assert_eq!(guard().classify("/dashboard"), PathClass::Protected);
        assert_eq!(guard().classify("/dashboard/"), PathClass::Protected);
        assert_eq!(guard().classify("/dashboards"), PathClass::Unclassified);
        assert_eq!(guard().classify("/login"), PathClass::Public);
    }

    #[test]
    fn test_exclusions() {
        for path in [
            "/api/health",
            "/api",
            "/pkg/claimsboard_web_bg.wasm",
            "/static/app.css",
            "/favicon.ico",
            "/dashboard/logo.PNG",
            "/images/banner.webp",
        ] {
            assert!(RouteGuard::is_excluded(path), "{path} should be excluded");
            assert!(guard().decide(path, None).is_allow());
        }
        assert!(!RouteGuard::is_excluded("/apiary"));
        assert!(!RouteGuard::is_excluded("/dashboard"));
    }

    #[test]
    fn test_decision_is_idempotent() {
        let g = guard();
        assert_eq!(g.decide("/upload", None), g.decide("/upload", None));
    }

    #[test]
    fn test_custom_config() {
        let g = RouteGuard::new(GuardConfig {
            protected_paths: vec!["/app/".into()],
            public_paths: vec!["/signin".into()],
            login_path: "/signin".into(),
            landing_path: "/app/home".into(),
            redirect_param: "next".into(),
        });
        assert_eq!(
            g.decide("/app/x", None).location(),
            Some("/signin?next=%2Fapp%2Fx")
        );
        assert_eq!(g.decide("/signin", Some("t")).location(), Some("/app/home"));
    }

    #[test]
    fn test_config_validation() {
        assert!(GuardConfig::default().validate().is_ok());
        let bad = GuardConfig {
            login_path: "login".into(),
            ..GuardConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_return_target() {
        let g = guard();
        assert_eq!(g.return_target(Some("/claims/c-1")), "/claims/c-1");
        assert_eq!(g.return_target(None), "/dashboard");
        assert_eq!(g.return_target(Some("//evil.example")), "/dashboard");
        assert_eq!(g.return_target(Some("https://evil.example")), "/dashboard");
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(
            token_from_cookie_header("theme=dark; authToken=abc.def; other=1"),
            Some("abc.def")
        );
        assert_eq!(token_from_cookie_header("authToken="), None);
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("xauthToken=1"), None);
    }
}
