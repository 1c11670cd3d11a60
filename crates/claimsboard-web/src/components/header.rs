//! Header component

use crate::auth::use_auth;
use leptos::prelude::*;
use leptos_router::components::A;

/// Top bar: brand, navigation and sign-out once a session exists
#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();

    let on_logout = move |_| {
        auth.logout();
        // Full navigation so the server-side guard sees the cleared cookie
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/login");
        }
    };

    let user_name = move || session.with(|s| s.user.as_ref().map(|u| u.display_name()));

    view! {
        <header class="header">
            <div class="header-content">
                <h1 class="logo">"claimsboard"</h1>
                <p class="subtitle">"Medical Claims Portal"</p>
            </div>
            <nav
                class="header-nav"
                class:hidden=move || !session.with(|s| s.is_authenticated())
            >
                <A href="/dashboard">"Dashboard"</A>
                <A href="/upload">"Upload"</A>
                <span class="header-user">{user_name}</span>
                <button class="btn btn-secondary" on:click=on_logout>
                    "Sign out"
                </button>
            </nav>
        </header>
    }
}
