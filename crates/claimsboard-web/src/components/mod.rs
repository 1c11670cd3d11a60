//! Leptos UI components

mod extraction_groups;
mod header;
mod toast;

pub use extraction_groups::ExtractionGroups;
pub use header::Header;
pub use toast::{use_toast, ToastContext, ToastKind, ToastProvider};
