//! Document upload page

use crate::auth::use_auth;
use crate::components::use_toast;
use claimsboard_core::forms::{validate_upload, MISSING_UPLOAD_FIELDS};
use claimsboard_core::{ClaimsApi, UploadRequest};
use claimsboard_types::DocumentType;
use leptos::ev::SubmitEvent;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::JsFuture;

/// Read a selected file into memory
async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Could not read {}: {e:?}", file.name()))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[component]
pub fn Upload() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let navigate = use_navigate();

    let file_input: NodeRef<Input> = NodeRef::new();
    let (file_name, set_file_name) = signal(None::<String>);
    let (document_type, set_document_type) = signal(None::<DocumentType>);
    let (description, set_description) = signal(String::new());
    let (uploading, set_uploading) = signal(false);
    let (inline_error, set_inline_error) = signal(None::<String>);

    let selected_file = move || {
        file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let file = selected_file();
        let doc_type = document_type.get_untracked();

        if !validate_upload(file.is_some(), doc_type).is_empty() {
            set_inline_error.set(Some(MISSING_UPLOAD_FIELDS.to_string()));
            return;
        }
        let (Some(file), Some(doc_type)) = (file, doc_type) else {
            return;
        };

        set_inline_error.set(None);
        set_uploading.set(true);
        let auth = auth.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = match read_file(&file).await {
                Ok(bytes) => {
                    let content_type = Some(file.type_()).filter(|t| !t.is_empty());
                    let upload = UploadRequest {
                        file_name: file.name(),
                        bytes,
                        content_type,
                        document_type: doc_type,
                        description: description.get_untracked(),
                    };
                    auth.api()
                        .upload_document(upload)
                        .await
                        .into_result("UPLOAD_FAILED")
                        .map_err(|e| e.message)
                }
                Err(message) => Err(message),
            };
            set_uploading.set(false);

            match result {
                Ok(document) => {
                    toast.success(
                        "Document uploaded successfully",
                        format!("{} is being processed", document.file_name),
                    );
                    navigate("/dashboard", Default::default());
                }
                Err(message) => {
                    toast.error("Upload failed", message.clone());
                    set_inline_error.set(Some(message));
                }
            }
        });
    };

    view! {
        <div class="page upload-page">
            <form class="card" on:submit=on_submit>
                <h2>"Upload a document"</h2>
                <p class="muted">"Invoices, discharge summaries and prescriptions (PDF or image)"</p>

                <label for="document">"Document"</label>
                <input
                    id="document"
                    type="file"
                    accept=".pdf,.png,.jpg,.jpeg"
                    node_ref=file_input
                    on:change=move |_| {
                        set_file_name.set(selected_file().map(|f| f.name()));
                    }
                />
                <p class="muted">{move || file_name.get()}</p>

                <label for="document-type">"Document type"</label>
                <select
                    id="document-type"
                    on:change=move |e| {
                        set_document_type.set(event_target_value(&e).parse::<DocumentType>().ok());
                    }
                >
                    <option value="">"Select a type"</option>
                    {DocumentType::ALL
                        .iter()
                        .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                        .collect_view()}
                </select>

                <label for="description">"Description"</label>
                <textarea
                    id="description"
                    prop:value=move || description.get()
                    on:input=move |e| set_description.set(event_target_value(&e))
                />

                <p class="form-error">{move || inline_error.get()}</p>

                <button class="btn btn-primary" type="submit" disabled=move || uploading.get()>
                    {move || if uploading.get() { "Uploading..." } else { "Upload" }}
                </button>
            </form>
        </div>
    }
}
