//! CLI rendering and error reporting
//!
//! Turns portal envelopes into `CliError`s and renders claims, grouped
//! extractions and document status as terminal tables.

use claimsboard_core::extraction::format_key;
use claimsboard_core::format::{
    format_codes, format_confidence, format_currency, format_date, format_value,
};
use claimsboard_core::{FieldError, GroupedExtraction};
use claimsboard_types::{
    ApiErrorDetail, ApiResponse, ClaimsPage, DetailedClaim, Document, DocumentStatus, Pagination,
    PresignedUrl,
};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::future::Future;
use std::time::Duration;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    /// No stored session token
    NotLoggedIn,
    /// Client-side form checks rejected the input
    Invalid(Vec<FieldError>),
    /// The portal answered with an error envelope (or was unreachable)
    Api {
        action: &'static str,
        error: ApiErrorDetail,
    },
    /// Document still processing when `--max-wait` ran out
    WaitTimedOut {
        document_id: String,
        progress: u8,
        waited: Duration,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NotLoggedIn => {
                write!(f, "Not logged in. Run `claimsboard login --email <EMAIL>` first")
            }
            CliError::Invalid(errors) => {
                write!(f, "Invalid input")?;
                for error in errors {
                    write!(f, "\n  - {}", error)?;
                }
                Ok(())
            }
            CliError::Api { action, error } => {
                write!(f, "{} failed: {}", action, error)?;
                for (field, message) in error.field_messages() {
                    write!(f, "\n  - {}: {}", field, message)?;
                }
                Ok(())
            }
            CliError::WaitTimedOut {
                document_id,
                progress,
                waited,
            } => write!(
                f,
                "Document {} still processing ({}%) after {}s",
                document_id,
                (*progress).min(100),
                waited.as_secs()
            ),
        }
    }
}

impl std::error::Error for CliError {}

/// Unwrap an envelope, reporting failures against `action`
pub fn expect_data<T>(
    response: ApiResponse<T>,
    action: &'static str,
    fallback_code: &str,
) -> Result<T, CliError> {
    response
        .into_result(fallback_code)
        .map_err(|error| CliError::Api { action, error })
}

/// Poll `fetch` every `interval` until the document leaves PROCESSING.
///
/// Gives up with [`CliError::WaitTimedOut`] once another sleep would pass
/// `max_wait`. `on_progress` sees every non-terminal status.
pub async fn poll_until_done<F, Fut>(
    mut fetch: F,
    interval: Duration,
    max_wait: Duration,
    mut on_progress: impl FnMut(&DocumentStatus),
) -> Result<DocumentStatus, CliError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DocumentStatus, CliError>>,
{
    let deadline = tokio::time::Instant::now() + max_wait;
    loop {
        let status = fetch().await?;
        if status.status.is_terminal() {
            return Ok(status);
        }
        if tokio::time::Instant::now() + interval > deadline {
            return Err(CliError::WaitTimedOut {
                document_id: status.document_id,
                progress: status.progress,
                waited: max_wait,
            });
        }
        on_progress(&status);
        tokio::time::sleep(interval).await;
    }
}

// ============================================================================
// Tables
// ============================================================================

fn header(table: &mut Table, columns: &[&str]) {
    table.set_header(
        columns
            .iter()
            .map(|c| Cell::new(c).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

fn key_value_table(rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), Cell::new(value)]);
    }
    table
}

fn status_color(status: &str) -> Color {
    match status.to_ascii_uppercase().as_str() {
        "APPROVED" | "COMPLETED" => Color::Green,
        "REJECTED" | "FAILED" => Color::Red,
        "PENDING" | "PROCESSING" | "IN_REVIEW" => Color::Yellow,
        _ => Color::Reset,
    }
}

/// Truncate string to max length with ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn claims_table(page: &ClaimsPage) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    header(
        &mut table,
        &["ID", "Patient", "Provider", "Service date", "Amount", "Status", "Created"],
    );

    for claim in &page.claims {
        table.add_row(vec![
            Cell::new(&claim.id),
            Cell::new(truncate(&format_value(Some(&claim.patient_name)), 24)),
            Cell::new(truncate(&format_value(Some(&claim.provider_name)), 24)),
            Cell::new(format_date(Some(&claim.service_date))),
            Cell::new(format_currency(Some(claim.amount), None)),
            Cell::new(&claim.status).fg(status_color(&claim.status)),
            Cell::new(format_date(Some(&claim.created_at))),
        ]);
    }
    table
}

/// `Page 2 of 5 (47 claims)`
pub fn pagination_summary(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} claims)",
        pagination.current_page,
        pagination.total_pages.max(1),
        pagination.total_items
    )
}

pub fn claim_summary_table(claim: &DetailedClaim) -> Table {
    let details = &claim.extracted_data.claim_details;
    let patient = &claim.extracted_data.patient_info;
    let provider = &claim.extracted_data.provider_info;
    let currency = details.currency.as_deref();

    key_value_table(vec![
        ("Claim", claim.id.clone()),
        ("Status", claim.status.clone()),
        ("Created", format_date(Some(&claim.created_at))),
        ("Updated", format_date(Some(&claim.updated_at))),
        ("Patient", format_value(Some(claim.patient_display_name()))),
        ("Date of birth", format_date(patient.dob.as_deref())),
        ("Insurance ID", format_value(patient.insurance_id.as_deref())),
        ("Provider", format_value(Some(claim.provider_display_name()))),
        ("Provider number", format_value(Some(&provider.provider_number))),
        ("Service date", format_date(Some(&details.service_date))),
        ("Discharge date", format_date(details.discharge_date.as_deref())),
        (
            "Total amount",
            format_currency(Some(claim.total_amount()), currency),
        ),
        (
            "Covered amount",
            format_currency(details.covered_amount, currency),
        ),
        (
            "Patient responsibility",
            format_currency(details.patient_responsibility, currency),
        ),
        (
            "Diagnosis codes",
            format_codes(details.diagnosis_codes.as_deref()),
        ),
        (
            "Procedure codes",
            format_codes(details.procedure_codes.as_deref()),
        ),
    ])
}

/// One table per non-empty confidence tier, in tier order
pub fn extraction_tables(grouped: &GroupedExtraction) -> Vec<(String, Table)> {
    grouped
        .groups()
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(tier, lines)| {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            header(&mut table, &["Field", "Value", "Confidence"]);
            for line in lines {
                table.add_row(vec![
                    Cell::new(format_key(&line.key)),
                    Cell::new(&line.value),
                    Cell::new(format_confidence(line.confidence)),
                ]);
            }
            (format!("{} ({})", tier.label(), lines.len()), table)
        })
        .collect()
}

/// Full claim detail as printable text; `grouped` was filtered at `threshold`
pub fn render_claim(claim: &DetailedClaim, grouped: &GroupedExtraction, threshold: f64) -> String {
    let mut out = String::new();
    out.push_str(&claim_summary_table(claim).to_string());
    out.push('\n');

    if grouped.is_empty() {
        out.push_str("\nNo extracted fields\n");
    } else {
        out.push_str(&format!(
            "\nExtracted fields (threshold {})\n",
            format_confidence(threshold)
        ));
        for (title, table) in extraction_tables(grouped) {
            out.push_str(&format!("\n{}\n{}\n", title, table));
        }
    }

    if let Some(entities) = claim
        .extracted_medical_entities
        .as_ref()
        .filter(|e| !e.is_empty())
    {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        header(&mut table, &["Type", "Value", "Confidence"]);
        for entity in entities {
            table.add_row(vec![
                Cell::new(format_key(&entity.entity_type)),
                Cell::new(&entity.value),
                Cell::new(
                    entity
                        .confidence
                        .map(format_confidence)
                        .unwrap_or_else(|| format_value(None)),
                ),
            ]);
        }
        out.push_str(&format!("\nMedical entities\n{}\n", table));
    }

    if let Some(documents) = claim.documents.as_ref().filter(|d| !d.is_empty()) {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        header(&mut table, &["ID", "Name", "Type", "Uploaded"]);
        for document in documents {
            table.add_row(vec![
                Cell::new(&document.id),
                Cell::new(&document.name),
                Cell::new(&document.document_type),
                Cell::new(format_date(Some(&document.created_at))),
            ]);
        }
        out.push_str(&format!("\nDocuments\n{}\n", table));
    }

    out
}

pub fn document_status_table(status: &DocumentStatus) -> Table {
    let state = status.status.to_string();
    let mut table = key_value_table(vec![
        ("Document", status.document_id.clone()),
        ("Progress", format!("{}%", status.progress.min(100))),
        ("Started", format_date(Some(&status.started_at))),
        ("Completed", format_date(status.completed_at.as_deref())),
        ("Claim", format_value(status.claim_id.as_deref())),
    ]);
    table.add_row(vec![
        Cell::new("Status").fg(Color::Cyan),
        Cell::new(&state).fg(status_color(&state)),
    ]);
    table
}

pub fn uploaded_document_table(document: &Document) -> Table {
    key_value_table(vec![
        ("Document", document.document_id.clone()),
        ("File", document.file_name.clone()),
        ("Type", document.document_type.label().to_string()),
        ("Status", document.status.to_string()),
        ("Uploaded", format_date(Some(&document.uploaded_at))),
    ])
}

pub fn presigned_url_line(url: &PresignedUrl) -> String {
    format!(
        "{}\n(expires {})",
        url.presigned_url,
        format_value(Some(&url.expires_at))
    )
}
