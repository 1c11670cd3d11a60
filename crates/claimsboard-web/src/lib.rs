//! claimsboard-web - Web frontend for claimsboard using Leptos + Axum
//!
//! `ssr` (default): the Axum server that fronts the compiled bundle and
//! applies the route guard on every navigation.
//! `csr`: the Leptos single-page app, built to WASM with Trunk.

#![recursion_limit = "1024"]

#[cfg(feature = "csr")]
pub mod api;
#[cfg(feature = "csr")]
pub mod app;
#[cfg(feature = "csr")]
pub mod auth;
#[cfg(feature = "csr")]
pub mod components;
#[cfg(feature = "csr")]
pub mod pages;
#[cfg(feature = "ssr")]
pub mod router;
#[cfg(feature = "csr")]
pub mod storage;

#[cfg(feature = "csr")]
pub use app::App;
#[cfg(feature = "ssr")]
pub use router::{create_router, WebState};

#[cfg(feature = "ssr")]
pub use server::run;

#[cfg(feature = "ssr")]
mod server {
    use crate::{create_router, WebState};
    use anyhow::{Context, Result};
    use claimsboard_core::PortalConfig;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tracing::info;

    /// Run the web server
    pub async fn run(config: &PortalConfig, port: u16) -> Result<()> {
        let state = WebState::from_config(config);
        if !state.bundle_built() {
            info!(dist = %state.dist_dir.display(), "Frontend bundle not found, serving placeholder");
        }
        let router = create_router(state);

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("Web server listening on http://{}", addr);
        println!("Web server listening on http://{}", addr);

        axum::serve(listener, router)
            .await
            .context("Web server terminated")?;

        Ok(())
    }
}
