//! Sign-in page

use crate::auth::use_auth;
use crate::components::use_toast;
use claimsboard_core::forms::{message_for, validate_login, FieldError};
use claimsboard_core::RouteGuard;
use claimsboard_types::LoginPayload;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_query_map};

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let toast = use_toast();
    let navigate = use_navigate();
    let query = use_query_map();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<FieldError>::new());

    let leave = auth.clone();

    let field_error = move |field: &'static str| {
        move || errors.with(|e| message_for(e, field).map(str::to_string))
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();
        let payload = LoginPayload {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };

        let field_errors = validate_login(&payload);
        if !field_errors.is_empty() {
            set_errors.set(field_errors);
            return;
        }
        set_errors.set(Vec::new());

        let target = query.with_untracked(|q| {
            RouteGuard::default().return_target(q.get("redirectedFrom").as_deref())
        });
        let auth = auth.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            if auth.login(&payload.email, &payload.password).await {
                toast.success("Login successful", "Welcome back!");
                navigate(&target, Default::default());
            } else {
                let error = auth.session().with_untracked(|s| s.last_error.clone());
                toast.api_error("Login failed", error.as_ref());
            }
        });
    };

    view! {
        <div class="auth-page">
            <form class="card auth-card" on:submit=on_submit novalidate=true>
                <h2>"Sign in"</h2>
                <p class="muted">"Access your medical claims dashboard"</p>

                <label for="email">"Email"</label>
                <input
                    id="email"
                    type="email"
                    autocomplete="email"
                    prop:value=move || email.get()
                    on:input=move |e| set_email.set(event_target_value(&e))
                />
                <p class="field-error">{field_error("email")}</p>

                <label for="password">"Password"</label>
                <input
                    id="password"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |e| set_password.set(event_target_value(&e))
                />
                <p class="field-error">{field_error("password")}</p>

                <p class="form-error">
                    {move || session.with(|s| s.last_error.as_ref().map(|e| e.message.clone()))}
                </p>

                <button
                    class="btn btn-primary"
                    type="submit"
                    disabled=move || session.with(|s| s.is_loading)
                >
                    {move || if session.with(|s| s.is_loading) { "Signing in..." } else { "Sign in" }}
                </button>

                <p class="muted">
                    "No account yet? "
                    <span on:click=move |_| leave.clear_error()>
                        <A href="/register">"Create one"</A>
                    </span>
                </p>
            </form>
        </div>
    }
}
