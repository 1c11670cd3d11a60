//! claimsboard-types - Shared wire types for claimsboard
//!
//! This crate contains pure data structures without heavy dependencies.
//! No tokio, no async runtime - just serde-serializable types mirroring the
//! claims portal API (camelCase on the wire).
//!
//! Used by:
//! - claimsboard-core (session, guard, grouping, HTTP client)
//! - claimsboard-web (frontend WASM)
//! - claimsboard (CLI)

pub mod envelope;
pub mod models;

pub use envelope::{ApiErrorDetail, ApiResponse, ErrorDetails};

pub use models::{
    Claim, ClaimDetails, ClaimDocument, ClaimsPage, ClaimsQuery, DetailedClaim, Document,
    DocumentState, DocumentStatus, DocumentType, ExtractedData, ExtractedLine,
    ExtractionMetadata, LoginData, LoginPayload, MedicalEntity, PatientInfo, Pagination,
    PresignedUrl, ProviderInfo, RegisterPayload, SortDirection, User,
};
