//! Portal data models

pub mod auth;
pub mod claim;
pub mod document;

pub use auth::{LoginData, LoginPayload, RegisterPayload, User};
pub use claim::{
    Claim, ClaimDetails, ClaimDocument, ClaimsPage, ClaimsQuery, DetailedClaim, ExtractedData,
    ExtractedLine, ExtractionMetadata, MedicalEntity, Pagination, PatientInfo, ProviderInfo,
    SortDirection,
};
pub use document::{Document, DocumentState, DocumentStatus, DocumentType, PresignedUrl};
