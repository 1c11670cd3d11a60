//! Portal API client contract
//!
//! [`ClaimsApi`] is the seam between the session manager / views and the
//! remote service. Every operation returns the uniform envelope and never
//! fails with a Rust error: see [`envelope`].

pub mod envelope;
#[cfg(feature = "http")]
pub mod http;

pub use envelope::{into_envelope, RawOutcome};
#[cfg(feature = "http")]
pub use http::HttpApiClient;

use claimsboard_types::{
    ApiResponse, ClaimsPage, ClaimsQuery, DetailedClaim, Document, DocumentStatus, DocumentType,
    LoginData, LoginPayload, PresignedUrl, RegisterPayload, User,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters kept verbatim in a path segment (RFC 3986 unreserved)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode an id for use as a single URL path segment (`doc/1` → `doc%2F1`)
pub fn encode_segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// A document selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type when known; guessed from the file name otherwise
    pub content_type: Option<String>,
    pub document_type: DocumentType,
    pub description: String,
}

/// Remote portal operations
#[allow(async_fn_in_trait)]
pub trait ClaimsApi {
    /// `POST /auth/login`
    async fn login(&self, payload: &LoginPayload) -> ApiResponse<LoginData>;

    /// `POST /auth/register`
    async fn register(&self, payload: &RegisterPayload) -> ApiResponse<User>;

    /// `GET /claims`
    async fn list_claims(&self, query: &ClaimsQuery) -> ApiResponse<ClaimsPage>;

    /// `GET /claims/{id}`
    async fn get_claim(&self, claim_id: &str) -> ApiResponse<DetailedClaim>;

    /// `POST /documents` (multipart)
    async fn upload_document(&self, upload: UploadRequest) -> ApiResponse<Document>;

    /// `GET /documents/{id}/url`
    async fn document_url(&self, document_id: &str) -> ApiResponse<PresignedUrl>;

    /// `GET /documents/{id}/status`
    async fn document_status(&self, document_id: &str) -> ApiResponse<DocumentStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("doc/1 a"), "doc%2F1%20a");
        assert_eq!(encode_segment("c-42_x.y~z"), "c-42_x.y~z");
    }
}
