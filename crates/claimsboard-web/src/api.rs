//! Browser API client over `gloo-net`
//!
//! Same contract as the native client: every call ends in
//! [`into_envelope`], so pages only ever see the portal envelope.

use claimsboard_core::api::{encode_segment, into_envelope, RawOutcome};
use claimsboard_core::{ClaimsApi, CredentialStore, UploadRequest};
use claimsboard_types::{
    ApiResponse, ClaimsPage, ClaimsQuery, DetailedClaim, Document, DocumentStatus, LoginData,
    LoginPayload, PresignedUrl, RegisterPayload, User,
};
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// Remote API base, fixed when the bundle is built
pub const API_BASE_URL: &str = match option_env!("CLAIMSBOARD_API_BASE_URL") {
    Some(url) => url,
    None => claimsboard_core::config::DEFAULT_API_BASE_URL,
};

#[derive(Clone)]
pub struct BrowserApi {
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl BrowserApi {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.load() {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: Result<Request, gloo_net::Error>) -> ApiResponse<T> {
        let outcome = match request {
            Ok(request) => match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(body) => RawOutcome::Response { status, body },
                        Err(e) => RawOutcome::Transport(e.to_string()),
                    }
                }
                Err(e) => RawOutcome::Transport(e.to_string()),
            },
            Err(e) => RawOutcome::Transport(e.to_string()),
        };
        into_envelope(outcome)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        self.send(self.authorize(Request::get(&self.url(path))).build())
            .await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResponse<T> {
        self.send(self.authorize(Request::post(&self.url(path))).json(body))
            .await
    }
}

fn multipart(upload: &UploadRequest) -> Result<FormData, String> {
    let form = FormData::new().map_err(|e| format!("{e:?}"))?;

    let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    if let Some(content_type) = &upload.content_type {
        options.set_type(content_type);
    }
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| format!("{e:?}"))?;

    form.append_with_blob_and_filename("document", &blob, &upload.file_name)
        .map_err(|e| format!("{e:?}"))?;
    form.append_with_str("documentType", upload.document_type.as_str())
        .map_err(|e| format!("{e:?}"))?;
    form.append_with_str("description", &upload.description)
        .map_err(|e| format!("{e:?}"))?;
    Ok(form)
}

impl ClaimsApi for BrowserApi {
    async fn login(&self, payload: &LoginPayload) -> ApiResponse<LoginData> {
        self.post_json("/auth/login", payload).await
    }

    async fn register(&self, payload: &RegisterPayload) -> ApiResponse<User> {
        self.post_json("/auth/register", payload).await
    }

    async fn list_claims(&self, query: &ClaimsQuery) -> ApiResponse<ClaimsPage> {
        let pairs = query.to_pairs();
        let builder = Request::get(&self.url("/claims"))
            .query(pairs.iter().map(|(key, value)| (*key, value.as_str())));
        self.send(self.authorize(builder).build()).await
    }

    async fn get_claim(&self, claim_id: &str) -> ApiResponse<DetailedClaim> {
        self.get(&format!("/claims/{}", encode_segment(claim_id))).await
    }

    async fn upload_document(&self, upload: UploadRequest) -> ApiResponse<Document> {
        let form = match multipart(&upload) {
            Ok(form) => form,
            Err(message) => return into_envelope(RawOutcome::Transport(message)),
        };
        // No Content-Type header: the browser sets the multipart boundary
        let builder = self.authorize(Request::post(&self.url("/documents")));
        self.send(builder.body(form)).await
    }

    async fn document_url(&self, document_id: &str) -> ApiResponse<PresignedUrl> {
        self.get(&format!("/documents/{}/url", encode_segment(document_id)))
            .await
    }

    async fn document_status(&self, document_id: &str) -> ApiResponse<DocumentStatus> {
        self.get(&format!("/documents/{}/status", encode_segment(document_id)))
            .await
    }
}
