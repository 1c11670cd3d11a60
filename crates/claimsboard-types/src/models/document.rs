//! Uploaded document models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of medical document being uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Invoice,
    DischargeSummary,
    Prescription,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Invoice,
        DocumentType::DischargeSummary,
        DocumentType::Prescription,
    ];

    /// Wire value sent in the multipart form
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INVOICE",
            DocumentType::DischargeSummary => "DISCHARGE_SUMMARY",
            DocumentType::Prescription => "PRESCRIPTION",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoice",
            DocumentType::DischargeSummary => "Discharge Summary",
            DocumentType::Prescription => "Prescription",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    /// Accepts the wire value or a kebab/space separated form (`discharge-summary`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', ' '], "_").to_ascii_uppercase();
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown document type '{s}' (expected invoice|discharge-summary|prescription)")
            })
    }
}

/// Processing state of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentState {
    Processing,
    Completed,
    Failed,
}

impl DocumentState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DocumentState::Processing)
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentState::Processing => "PROCESSING",
            DocumentState::Completed => "COMPLETED",
            DocumentState::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// `POST /documents` response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: String,
    pub file_name: String,
    pub document_type: DocumentType,
    #[serde(default)]
    pub description: String,
    pub uploaded_at: String,
    pub status: DocumentState,
    #[serde(default)]
    pub claim_id: Option<String>,
}

/// `GET /documents/{id}/status` response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatus {
    pub document_id: String,
    pub status: DocumentState,
    /// Percentage, 0-100
    #[serde(default)]
    pub progress: u8,
    pub started_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub claim_id: Option<String>,
}

/// `GET /documents/{id}/url` response data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrl {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub file_name: String,
    pub presigned_url: String,
    pub expires_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_parse() {
        assert_eq!("invoice".parse::<DocumentType>(), Ok(DocumentType::Invoice));
        assert_eq!(
            "discharge-summary".parse::<DocumentType>(),
            Ok(DocumentType::DischargeSummary)
        );
        assert_eq!(
            "PRESCRIPTION".parse::<DocumentType>(),
            Ok(DocumentType::Prescription)
        );
        assert!("receipt".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_document_status_wire_format() {
        let json = r#"{
            "documentId": "d-1",
            "status": "COMPLETED",
            "progress": 100,
            "startedAt": "2025-01-01T00:00:00Z",
            "completedAt": "2025-01-01T00:01:00Z",
            "claimId": "c-1"
        }"#;
        let status: DocumentStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, DocumentState::Completed);
        assert!(status.status.is_terminal());
        assert_eq!(status.claim_id.as_deref(), Some("c-1"));
    }
}
