//! Main Leptos App component with SPA router

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes},
    hooks::{use_location, use_navigate},
    path, NavigateOptions,
};

use crate::auth::AuthProvider;
use crate::components::{Header, ToastProvider};
use crate::pages::{ClaimDetail, Dashboard, Home, Login, Register, Upload};
use crate::storage::CookieStore;
use claimsboard_core::{CredentialStore, GuardDecision, RouteGuard};

/// Main App component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <ToastProvider>
            <AuthProvider>
                <Router>
                    <ClientGuard />
                    <div class="app">
                        <Header />
                        <main class="content">
                            <Routes fallback=|| view! { <div class="empty-state">"Page not found"</div> }>
                                <Route path=path!("/") view=Home />
                                <Route path=path!("/login") view=Login />
                                <Route path=path!("/register") view=Register />
                                <Route path=path!("/dashboard") view=Dashboard />
                                <Route path=path!("/upload") view=Upload />
                                <Route path=path!("/claims/:claim_id") view=ClaimDetail />
                            </Routes>
                        </main>
                    </div>
                </Router>
            </AuthProvider>
        </ToastProvider>
    }
}

/// Applies the route guard to in-app navigations.
///
/// Full page loads are already checked by the server; this covers history
/// navigations. Only the pathname is tracked: session changes are followed by
/// the page that caused them (login navigates to its return target, logout
/// reloads `/login`).
#[component]
fn ClientGuard() -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();
    let guard = RouteGuard::default();

    Effect::new(move |_| {
        let path = location.pathname.get();
        let token = CookieStore.load();
        if let GuardDecision::Redirect { location } = guard.decide(&path, token.as_deref()) {
            navigate(
                &location,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });
}
