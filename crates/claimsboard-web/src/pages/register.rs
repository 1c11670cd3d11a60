//! Account creation page

use crate::auth::use_auth;
use crate::components::use_toast;
use claimsboard_core::forms::{message_for, validate_register, FieldError};
use claimsboard_types::RegisterPayload;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

#[component]
pub fn Register() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let toast = use_toast();
    let navigate = use_navigate();

    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    // Field messages returned by the server (`error.details`)
    let (server_errors, set_server_errors) = signal(Vec::<(String, String)>::new());

    let leave = auth.clone();

    let field_error = move |field: &'static str| {
        move || {
            errors
                .with(|e| message_for(e, field).map(str::to_string))
                .or_else(|| {
                    server_errors.with(|e| {
                        e.iter()
                            .find(|(name, _)| name == field)
                            .map(|(_, message)| message.clone())
                    })
                })
        }
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();
        let payload = RegisterPayload {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            first_name: first_name.get_untracked().trim().to_string(),
            last_name: last_name.get_untracked().trim().to_string(),
        };

        let field_errors = validate_register(&payload);
        set_server_errors.set(Vec::new());
        if !field_errors.is_empty() {
            set_errors.set(field_errors);
            return;
        }
        set_errors.set(Vec::new());

        let auth = auth.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let response = auth.register(&payload).await;
            if response.success {
                toast.success("Registration successful", "You can now sign in.");
                navigate("/login", Default::default());
                return;
            }
            if let Some(error) = &response.error {
                set_server_errors.set(error.field_messages());
            }
            toast.api_error("Registration failed", response.error.as_ref());
        });
    };

    let input = move |id: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      value: ReadSignal<String>,
                      set: WriteSignal<String>| {
        view! {
            <label for=id>{label}</label>
            <input
                id=id
                type=kind
                prop:value=move || value.get()
                on:input=move |e| set.set(event_target_value(&e))
            />
            <p class="field-error">{field_error(id)}</p>
        }
    };

    view! {
        <div class="auth-page">
            <form class="card auth-card" on:submit=on_submit novalidate=true>
                <h2>"Create an account"</h2>
                {input("firstName", "First name", "text", first_name, set_first_name)}
                {input("lastName", "Last name", "text", last_name, set_last_name)}
                {input("email", "Email", "email", email, set_email)}
                {input("password", "Password", "password", password, set_password)}

                <button
                    class="btn btn-primary"
                    type="submit"
                    disabled=move || session.with(|s| s.is_loading)
                >
                    {move || if session.with(|s| s.is_loading) { "Creating account..." } else { "Create account" }}
                </button>

                <p class="muted">
                    "Already registered? "
                    <span on:click=move |_| leave.clear_error()>
                        <A href="/login">"Sign in"</A>
                    </span>
                </p>
            </form>
        </div>
    }
}
