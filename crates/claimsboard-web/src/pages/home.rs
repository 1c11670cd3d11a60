//! Landing page

use crate::auth::use_auth;
use leptos::prelude::*;
use leptos_router::components::{Redirect, A};

#[component]
pub fn Home() -> impl IntoView {
    let auth = use_auth();

    if auth.is_authenticated() {
        return view! { <Redirect path="/dashboard" /> }.into_any();
    }

    view! {
        <section class="hero">
            <h2>"Medical claims, processed for you"</h2>
            <p>
                "Upload invoices, discharge summaries and prescriptions. "
                "We extract the details and track each claim to completion."
            </p>
            <div class="hero-actions">
                <A href="/register">"Get started"</A>
                <A href="/login">"Sign in"</A>
            </div>
        </section>
    }
    .into_any()
}
