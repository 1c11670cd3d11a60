//! Toast notifications

use claimsboard_types::ApiErrorDetail;
use leptos::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }

    fn dismiss_after(&self) -> Duration {
        match self {
            ToastKind::Success => Duration::from_millis(3000),
            // Errors stay longer
            ToastKind::Error => Duration::from_millis(6000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: usize,
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<usize>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn show(&self, kind: ToastKind, title: impl Into<String>, message: impl Into<String>) {
        let id = self.next_id.get_untracked();
        self.next_id.update(|n| *n += 1);

        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                title: title.into(),
                message: message.into(),
                kind,
            })
        });

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|toasts| toasts.retain(|t| t.id != id)),
            kind.dismiss_after(),
        );
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.show(ToastKind::Success, title, message);
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.show(ToastKind::Error, title, message);
    }

    /// Error toast from an API envelope error
    pub fn api_error(&self, title: impl Into<String>, error: Option<&ApiErrorDetail>) {
        let message = error
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "An unexpected error occurred".to_string());
        self.error(title, message);
    }

    pub fn dismiss(&self, id: usize) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    provide_context(ToastContext::new());

    view! {
        {children()}
        <ToastContainer />
    }
}

#[component]
fn ToastContainer() -> impl IntoView {
    let toast_context = use_toast();

    view! {
        <div class="toast-container">
            <For
                each=move || toast_context.toasts.get()
                key=|toast| toast.id
                children=move |toast| view! { <ToastItem toast=toast /> }
            />
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let toast_context = use_toast();
    let id = toast.id;

    view! {
        <div class=toast.kind.class() role="status">
            <div class="toast-content">
                <strong class="toast-title">{toast.title}</strong>
                <span class="toast-message">{toast.message}</span>
            </div>
            <button
                class="toast-close"
                on:click=move |_| toast_context.dismiss(id)
                aria-label="Dismiss"
            >
                "×"
            </button>
        </div>
    }
}

pub fn use_toast() -> ToastContext {
    expect_context::<ToastContext>()
}
