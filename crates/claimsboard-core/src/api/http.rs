//! Native API client over `reqwest`

use super::envelope::{into_envelope, RawOutcome};
use super::{encode_segment, ClaimsApi, UploadRequest};
use crate::config::{validate_base_url, PortalConfig};
use crate::credentials::CredentialStore;
use crate::error::CoreError;
use claimsboard_types::{
    ApiErrorDetail, ApiResponse, ClaimsPage, ClaimsQuery, DetailedClaim, Document, DocumentStatus,
    LoginData, LoginPayload, PresignedUrl, RegisterPayload, User,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("claimsboard/", env!("CARGO_PKG_VERSION"));

/// `ClaimsApi` backed by a shared `reqwest::Client`.
///
/// The bearer token is read from the credential store on every request, so a
/// login or logout through the same store is picked up immediately.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    timeout: Duration,
}

impl HttpApiClient {
    pub fn new(
        config: &PortalConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, CoreError> {
        validate_base_url(&config.api_base_url)?;
        let timeout = Duration::from_secs(config.request_timeout_secs.max(1));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CoreError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.credentials.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResponse<T> {
        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(status, url = %response.url(), "Received API response");
                match response.text().await {
                    Ok(body) => RawOutcome::Response { status, body },
                    Err(e) => RawOutcome::Transport(self.describe(&e)),
                }
            }
            Err(e) => RawOutcome::Transport(self.describe(&e)),
        };
        into_envelope(outcome)
    }

    fn describe(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            format!("Request timed out after {}s", self.timeout.as_secs())
        } else if error.is_connect() {
            format!("Could not connect to {}", self.base_url)
        } else {
            error.to_string()
        }
    }
}

impl std::fmt::Debug for HttpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApiClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials.surface())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClaimsApi for HttpApiClient {
    async fn login(&self, payload: &LoginPayload) -> ApiResponse<LoginData> {
        self.execute(self.request(Method::POST, "/auth/login").json(payload))
            .await
    }

    async fn register(&self, payload: &RegisterPayload) -> ApiResponse<User> {
        self.execute(self.request(Method::POST, "/auth/register").json(payload))
            .await
    }

    async fn list_claims(&self, query: &ClaimsQuery) -> ApiResponse<ClaimsPage> {
        self.execute(
            self.request(Method::GET, "/claims")
                .query(&query.to_pairs()),
        )
        .await
    }

    async fn get_claim(&self, claim_id: &str) -> ApiResponse<DetailedClaim> {
        let path = format!("/claims/{}", encode_segment(claim_id));
        self.execute(self.request(Method::GET, &path)).await
    }

    async fn upload_document(&self, upload: UploadRequest) -> ApiResponse<Document> {
        let mime = upload.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&upload.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });

        let part = match Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&mime)
        {
            Ok(part) => part,
            Err(e) => {
                return ApiResponse::failure(ApiErrorDetail::unknown(format!(
                    "Invalid content type '{mime}': {e}"
                )))
            }
        };

        let form = Form::new()
            .part("document", part)
            .text("documentType", upload.document_type.as_str())
            .text("description", upload.description);

        debug!(file = %upload.file_name, %mime, "Uploading document");
        self.execute(self.request(Method::POST, "/documents").multipart(form))
            .await
    }

    async fn document_url(&self, document_id: &str) -> ApiResponse<PresignedUrl> {
        let path = format!("/documents/{}/url", encode_segment(document_id));
        self.execute(self.request(Method::GET, &path)).await
    }

    async fn document_status(&self, document_id: &str) -> ApiResponse<DocumentStatus> {
        let path = format!("/documents/{}/status", encode_segment(document_id));
        self.execute(self.request(Method::GET, &path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use claimsboard_types::DocumentType;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, store: Arc<dyn CredentialStore>) -> HttpApiClient {
        let config = PortalConfig {
            api_base_url: format!("{}/v1/", server.uri()),
            ..PortalConfig::default()
        };
        HttpApiClient::new(&config, store).unwrap()
    }

    fn user_json() -> serde_json::Value {
        json!({ "userId": "u-1", "email": "jane@example.com", "firstName": "Jane", "lastName": "Doe" })
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .and(body_json(json!({ "email": "jane@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "token": "jwt.1", "user": user_json() }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryCredentialStore::new()));
        let response = client
            .login(&LoginPayload {
                email: "jane@example.com".into(),
                password: "pw".into(),
            })
            .await;

        assert!(response.success);
        assert_eq!(response.data.unwrap().token, "jwt.1");
    }

    #[tokio::test]
    async fn test_error_envelope_passes_through_on_4xx() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "error": { "code": "INVALID_CREDENTIALS", "message": "Invalid email or password" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryCredentialStore::new()));
        let response = client
            .login(&LoginPayload {
                email: "jane@example.com".into(),
                password: "wrong".into(),
            })
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, "INVALID_CREDENTIALS");
        assert_eq!(error.message, "Invalid email or password");
    }

    #[tokio::test]
    async fn test_bearer_token_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/claims"))
            .and(header("authorization", "Bearer jwt.2"))
            .and(query_param("status", "APPROVED"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .and(query_param("sortBy", "createdAt"))
            .and(query_param("sortDirection", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "claims": [],
                    "pagination": { "totalItems": 0, "totalPages": 0, "currentPage": 2, "limit": 10 }
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryCredentialStore::with_token("jwt.2")));
        let query = ClaimsQuery::default().with_status("APPROVED").with_page(2);
        let response = client.list_claims(&query).await;

        assert!(response.success, "{:?}", response.error);
        assert_eq!(response.data.unwrap().pagination.current_page, 2);
    }

    #[tokio::test]
    async fn test_document_id_is_path_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/documents/doc%2F1/url"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "presignedUrl": "https://s3/x", "expiresAt": "2025-01-01T00:00:00Z" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryCredentialStore::new()));
        let response = client.document_url("doc/1").await;
        assert_eq!(response.data.unwrap().presigned_url, "https://s3/x");
    }

    #[tokio::test]
    async fn test_upload_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/documents"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": {
                    "documentId": "d-1",
                    "fileName": "bill.pdf",
                    "documentType": "INVOICE",
                    "uploadedAt": "2025-01-01T00:00:00Z",
                    "status": "PROCESSING"
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryCredentialStore::with_token("t")));
        let response = client
            .upload_document(UploadRequest {
                file_name: "bill.pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
                content_type: None,
                document_type: DocumentType::Invoice,
                description: "January visit".into(),
            })
            .await;
        assert_eq!(response.data.unwrap().document_id, "d-1");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));
        assert!(body.contains("name=\"document\"; filename=\"bill.pdf\""));
        assert!(body.contains("application/pdf"));
        assert!(body.contains("name=\"documentType\""));
        assert!(body.contains("INVOICE"));
        assert!(body.contains("January visit"));
    }

    #[tokio::test]
    async fn test_non_envelope_error_maps_to_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/claims/c-1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryCredentialStore::new()));
        let response = client.get_claim("c-1").await;
        assert_eq!(response.error.unwrap().code, "HTTP_503");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unknown_error() {
        let config = PortalConfig {
            api_base_url: "http://127.0.0.1:1".into(),
            ..PortalConfig::default()
        };
        let client = HttpApiClient::new(&config, Arc::new(MemoryCredentialStore::new())).unwrap();
        let response = client.document_status("d-1").await;

        assert!(!response.success);
        assert!(response.error.unwrap().is_transport());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = PortalConfig {
            api_base_url: "localhost:8080".into(),
            ..PortalConfig::default()
        };
        assert!(matches!(
            HttpApiClient::new(&config, Arc::new(MemoryCredentialStore::new())),
            Err(CoreError::InvalidBaseUrl { .. })
        ));
    }
}
