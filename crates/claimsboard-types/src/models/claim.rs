//! Claim listing and claim detail models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Claim summary row as returned by `GET /claims`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: String,
    pub document_id: String,
    /// e.g. APPROVED, PROCESSING, REJECTED
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub service_date: String,
    #[serde(default)]
    pub amount: f64,
    /// e.g. OUTPATIENT, CONSULTATION
    #[serde(default)]
    pub claim_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// `GET /claims` response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsPage {
    pub claims: Vec<Claim>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("invalid sort direction '{other}' (expected asc|desc)")),
        }
    }
}

/// Query parameters for `GET /claims`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsQuery {
    pub status: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl ClaimsQuery {
    /// Dashboard page size
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Status filter value meaning "no filter"
    pub const ALL_STATUSES: &'static str = "ALL";

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Clicking a column header: same column flips direction, new column resets to desc
    pub fn sorted_by(mut self, column: &str) -> Self {
        if self.sort_by == column {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_by = column.to_string();
            self.sort_direction = SortDirection::Desc;
        }
        self
    }

    /// Query-string pairs; an empty or `ALL` status filter is omitted
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortDirection", self.sort_direction.to_string()),
        ];
        if let Some(status) = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(Self::ALL_STATUSES))
        {
            pairs.insert(0, ("status", status.to_string()));
        }
        pairs
    }
}

impl Default for ClaimsQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: Self::DEFAULT_LIMIT,
            sort_by: "createdAt".to_string(),
            sort_direction: SortDirection::Desc,
        }
    }
}

/// One key/value pair extracted from a document, with its confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedLine {
    pub key: String,
    pub value: String,
    /// In `[0, 1]`
    pub confidence: f64,
}

impl ExtractedLine {
    pub fn new(key: impl Into<String>, value: impl Into<String>, confidence: f64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientInfo {
    pub name: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub insurance_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderInfo {
    pub name: String,
    pub address: Option<String>,
    pub provider_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimDetails {
    pub service_date: String,
    pub discharge_date: Option<String>,
    pub total_amount: f64,
    pub covered_amount: Option<f64>,
    pub patient_responsibility: Option<f64>,
    pub currency: Option<String>,
    pub claim_type: Option<String>,
    pub diagnosis_codes: Option<Vec<String>>,
    pub procedure_codes: Option<Vec<String>>,
}

/// Server-side extraction result attached to a claim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedData {
    pub patient_info: PatientInfo,
    pub provider_info: ProviderInfo,
    pub claim_details: ClaimDetails,
    /// Flat key/value lines in server order
    pub lines: Vec<ExtractedLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionMetadata {
    pub confidence_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub value: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDocument {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub url: String,
    pub created_at: String,
}

/// `GET /claims/{id}` response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedClaim {
    pub id: String,
    pub document_id: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub s3_key: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub service_date: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub extracted_data: ExtractedData,
    #[serde(default)]
    pub extracted_medical_entities: Option<Vec<MedicalEntity>>,
    #[serde(default)]
    pub documents: Option<Vec<ClaimDocument>>,
    #[serde(default)]
    pub metadata: Option<ExtractionMetadata>,
}

impl DetailedClaim {
    /// Threshold sent by the server, if any
    pub fn confidence_threshold(&self) -> Option<f64> {
        self.metadata.as_ref().and_then(|m| m.confidence_threshold)
    }

    /// Extracted patient name, falling back to the claim-level field
    pub fn patient_display_name(&self) -> &str {
        non_empty(&self.extracted_data.patient_info.name).unwrap_or(&self.patient_name)
    }

    /// Extracted provider name, falling back to the claim-level field
    pub fn provider_display_name(&self) -> &str {
        non_empty(&self.extracted_data.provider_info.name).unwrap_or(&self.provider_name)
    }

    /// Extracted total, falling back to the claim-level amount when zero
    pub fn total_amount(&self) -> f64 {
        let extracted = self.extracted_data.claim_details.total_amount;
        if extracted != 0.0 {
            extracted
        } else {
            self.amount
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_default() {
        let pairs = ClaimsQuery::default().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("sortBy", "createdAt".to_string()),
                ("sortDirection", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_skip_all_status() {
        let pairs = ClaimsQuery::default().with_status("ALL").to_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "status"));

        let pairs = ClaimsQuery::default().with_status("APPROVED").to_pairs();
        assert_eq!(pairs[0], ("status", "APPROVED".to_string()));
    }

    #[test]
    fn test_sorted_by_toggles_same_column() {
        let query = ClaimsQuery::default().sorted_by("createdAt");
        assert_eq!(query.sort_direction, SortDirection::Asc);

        let query = query.sorted_by("amount");
        assert_eq!(query.sort_by, "amount");
        assert_eq!(query.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_detailed_claim_with_lines_and_metadata() {
        let json = r#"{
            "id": "c-1",
            "documentId": "doc/1",
            "status": "PROCESSING",
            "createdAt": "2025-01-02T10:00:00Z",
            "updatedAt": "2025-01-02T10:05:00Z",
            "amount": 120.5,
            "patientName": "Jane Doe",
            "extractedData": {
                "patientInfo": { "name": "" },
                "providerInfo": { "name": "City Clinic", "providerNumber": "P-9" },
                "claimDetails": { "serviceDate": "2025-01-01", "totalAmount": 0 },
                "lines": [
                    { "key": "patient_name", "value": "Jane Doe", "confidence": 0.97 }
                ]
            },
            "metadata": { "confidenceThreshold": 0.75 }
        }"#;

        let claim: DetailedClaim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.extracted_data.lines.len(), 1);
        assert_eq!(claim.confidence_threshold(), Some(0.75));
        assert_eq!(claim.patient_display_name(), "Jane Doe");
        assert_eq!(claim.provider_display_name(), "City Clinic");
        assert_eq!(claim.total_amount(), 120.5);
    }

    #[test]
    fn test_detailed_claim_minimal() {
        let json = r#"{
            "id": "c-2", "documentId": "d-2", "status": "APPROVED",
            "createdAt": "2025-01-02", "updatedAt": "2025-01-02"
        }"#;
        let claim: DetailedClaim = serde_json::from_str(json).unwrap();
        assert!(claim.extracted_data.lines.is_empty());
        assert_eq!(claim.confidence_threshold(), None);
    }
}
