//! Web router using Axum

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use claimsboard_core::guard::token_from_cookie_header;
use claimsboard_core::{GuardDecision, PortalConfig, RouteGuard};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::debug;

/// Overrides where the compiled Trunk bundle is served from
pub const DIST_DIR_ENV: &str = "CLAIMSBOARD_WEB_DIST";

#[derive(Clone)]
pub struct WebState {
    pub guard: Arc<RouteGuard>,
    pub dist_dir: PathBuf,
    pub api_base_url: String,
}

impl WebState {
    pub fn from_config(config: &PortalConfig) -> Self {
        let dist_dir = std::env::var_os(DIST_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/dist")));
        Self {
            guard: Arc::new(RouteGuard::new(config.guard.clone())),
            dist_dir,
            api_base_url: config.api_base_url.clone(),
        }
    }

    pub fn bundle_built(&self) -> bool {
        self.dist_dir.join("index.html").is_file()
    }
}

/// Create the web router
pub fn create_router(state: WebState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().route("/api/health", get(health_handler));

    // SPA: unknown paths fall back to index.html so client routes resolve
    let router = if state.bundle_built() {
        let index = ServeFile::new(state.dist_dir.join("index.html"));
        router.fallback_service(ServeDir::new(&state.dist_dir).fallback(index))
    } else {
        router.fallback(placeholder_handler)
    };

    router
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(cors)
        .with_state(state)
}

/// Redirects navigations the route guard rejects (307 + `Location`)
async fn route_guard(State(state): State<WebState>, request: Request, next: Next) -> Response {
    let decision = {
        let token = request
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(token_from_cookie_header);
        state.guard.decide(request.uri().path(), token)
    };

    match decision {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect { location } => {
            debug!(path = %request.uri().path(), %location, "Route guard redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}

async fn health_handler(State(state): State<WebState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "apiBaseUrl": state.api_base_url,
        "bundleBuilt": state.bundle_built(),
    }))
}

async fn placeholder_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>claimsboard - Medical Claims Portal</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: system-ui, -apple-system, sans-serif;
            background: #f5f5f5;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
        }
        .setup-message {
            max-width: 600px;
            background: white;
            padding: 2rem;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }
        h1 { font-size: 1.75rem; margin-bottom: 1rem; color: #1a1a1a; }
        p { margin-bottom: 1rem; color: #333; line-height: 1.6; }
        code {
            background: #f0f0f0;
            padding: 0.25rem 0.5rem;
            border-radius: 4px;
            font-family: monospace;
        }
        .step {
            margin: 1.5rem 0;
            padding: 1rem;
            background: #f8f8f8;
            border-left: 3px solid #0f766e;
        }
    </style>
</head>
<body>
    <div class="setup-message">
        <h1>claimsboard web UI - build required</h1>
        <p>The Leptos WASM frontend has not been compiled yet.</p>

        <div class="step">
            <strong>Setup:</strong>
            <ol style="margin-left: 1.5rem; margin-top: 0.5rem;">
                <li>Install Trunk: <code>cargo install trunk</code></li>
                <li>Add WASM target: <code>rustup target add wasm32-unknown-unknown</code></li>
                <li>Build frontend: <code>cd crates/claimsboard-web && trunk build --release</code></li>
                <li>Restart server: <code>claimsboard web --port 3333</code></li>
            </ol>
        </div>

        <p>Health check: <a href="/api/health">/api/health</a></p>
    </div>
</body>
</html>"#,
    )
}
