//! Claim detail page

use crate::auth::use_auth;
use crate::components::{use_toast, ExtractionGroups};
use claimsboard_core::extraction::{group_claim, threshold_or_default};
use claimsboard_core::format::{
    format_codes, format_confidence, format_currency, format_date, format_value,
};
use claimsboard_core::ClaimsApi;
use claimsboard_types::{ApiResponse, DetailedClaim};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

#[component]
pub fn ClaimDetail() -> impl IntoView {
    let auth = use_auth();
    let params = use_params_map();
    let claim_id = move || params.with(|p| p.get("claim_id")).unwrap_or_default();

    let claim = LocalResource::new(move || {
        let id = claim_id();
        let auth = auth.clone();
        async move { auth.api().get_claim(&id).await }
    });

    view! {
        <div class="page claim-page">
            <div class="page-header">
                <A href="/dashboard">"← Back to Claims"</A>
                <h2>"Claim Details"</h2>
            </div>
            <Suspense fallback=move || view! { <div class="loading">"Loading claim..."</div> }>
                {move || {
                    claim
                        .get()
                        .map(|response| {
                            let response: &ApiResponse<DetailedClaim> = &response;
                            match (&response.data, &response.error) {
                                (Some(claim), _) => view! { <ClaimView claim=claim.clone() /> }.into_any(),
                                (None, Some(error)) => {
                                    view! { <div class="error">{error.message.clone()}</div> }.into_any()
                                }
                                (None, None) => {
                                    view! { <div class="empty-state">"Claim not found"</div> }.into_any()
                                }
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

fn detail_row(label: &'static str, value: String) -> impl IntoView {
    view! {
        <dt>{label}</dt>
        <dd>{value}</dd>
    }
}

#[component]
fn ClaimView(claim: DetailedClaim) -> impl IntoView {
    let threshold = threshold_or_default(claim.confidence_threshold());
    let grouped = group_claim(&claim);

    let patient = &claim.extracted_data.patient_info;
    let provider = &claim.extracted_data.provider_info;
    let details = &claim.extracted_data.claim_details;
    let currency = details.currency.as_deref();

    let basic = view! {
        <dl class="detail-grid">
            {detail_row("Claim ID", claim.id.clone())}
            {detail_row("Status", claim.status.clone())}
            {detail_row("Created", format_date(Some(&claim.created_at)))}
            {detail_row("Updated", format_date(Some(&claim.updated_at)))}
            {detail_row("Total", format_currency(Some(claim.total_amount()), currency))}
        </dl>
    };

    let patient_view = view! {
        <dl class="detail-grid">
            {detail_row("Name", format_value(Some(claim.patient_display_name())))}
            {detail_row("Date of Birth", format_date(patient.dob.as_deref()))}
            {detail_row("Gender", format_value(patient.gender.as_deref()))}
            {detail_row("Insurance ID", format_value(patient.insurance_id.as_deref()))}
        </dl>
    };

    let provider_view = view! {
        <dl class="detail-grid">
            {detail_row("Name", format_value(Some(claim.provider_display_name())))}
            {detail_row("Provider Number", format_value(Some(&provider.provider_number)))}
            {detail_row("Address", format_value(provider.address.as_deref()))}
        </dl>
    };

    let details_view = view! {
        <dl class="detail-grid">
            {detail_row("Service Date", format_date(Some(&details.service_date)))}
            {detail_row("Discharge Date", format_date(details.discharge_date.as_deref()))}
            {detail_row("Claim Type", format_value(details.claim_type.as_deref()))}
            {detail_row("Covered Amount", format_currency(details.covered_amount, currency))}
            {detail_row("Patient Responsibility", format_currency(details.patient_responsibility, currency))}
            {detail_row("Diagnosis Codes", format_codes(details.diagnosis_codes.as_deref()))}
            {detail_row("Procedure Codes", format_codes(details.procedure_codes.as_deref()))}
        </dl>
    };

    let entities = claim.extracted_medical_entities.clone().unwrap_or_default();
    let entities_view = if entities.is_empty() {
        view! { <p class="muted">"No medical entities extracted."</p> }.into_any()
    } else {
        entities
            .into_iter()
            .map(|entity| {
                let confidence = entity.confidence.map(format_confidence);
                view! {
                    <div class="entity">
                        <span class="entity-type">{entity.entity_type}</span>
                        <span class="entity-value">{entity.value}</span>
                        <span class="muted">{confidence}</span>
                        <p class="muted">{entity.context}</p>
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    let documents = claim.documents.clone().unwrap_or_default();
    let documents_view = if documents.is_empty() {
        view! { <p class="muted">"No documents attached."</p> }.into_any()
    } else {
        documents
            .into_iter()
            .map(|doc| {
                view! {
                    <div class="document">
                        <strong>{doc.name.clone()}</strong>
                        <span class="muted">{doc.document_type}</span>
                        <span class="muted">{format!("Uploaded: {}", format_date(Some(&doc.created_at)))}</span>
                        <a href=doc.url.clone() target="_blank" rel="noopener">"View"</a>
                        <a href=doc.url download=doc.name>"Download"</a>
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="card">
            <details class="section" open=true>
                <summary>"Basic Details"</summary>
                {basic}
            </details>
            <details class="section">
                <summary>"Patient Information"</summary>
                {patient_view}
            </details>
            <details class="section">
                <summary>"Provider Information"</summary>
                {provider_view}
            </details>
            <details class="section">
                <summary>"Claim Details"</summary>
                {details_view}
            </details>
            <details class="section" open=true>
                <summary>
                    {format!("Extracted Fields ({} at or above {})", grouped.total(), format_confidence(threshold))}
                </summary>
                <ExtractionGroups grouped=grouped threshold=threshold />
            </details>
            <details class="section">
                <summary>"Medical Entities"</summary>
                {entities_view}
            </details>
            <details class="section">
                <summary>"Associated Documents"</summary>
                {documents_view}
                <DocumentStatusButton document_id=claim.document_id.clone() />
            </details>
        </div>
    }
}

/// Polls `GET /documents/{id}/status` on demand
#[component]
fn DocumentStatusButton(document_id: String) -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let (status, set_status) = signal(None::<String>);

    let on_click = move |_| {
        let auth = auth.clone();
        let document_id = document_id.clone();
        spawn_local(async move {
            let response = auth.api().document_status(&document_id).await;
            match response.into_result("STATUS_UNAVAILABLE") {
                Ok(s) => set_status.set(Some(format!("{} ({}%)", s.status, s.progress))),
                Err(error) => toast.api_error("Status check failed", Some(&error)),
            }
        });
    };

    view! {
        <div class="document-status">
            <button class="btn btn-secondary" on:click=on_click>"Check processing status"</button>
            <span class="muted">{move || status.get()}</span>
        </div>
    }
}
