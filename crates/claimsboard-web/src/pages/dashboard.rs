//! Claims dashboard: paged, filterable, sortable claim list

use crate::auth::use_auth;
use claimsboard_core::api::encode_segment;
use claimsboard_core::format::{format_currency, format_date};
use claimsboard_core::ClaimsApi;
use claimsboard_types::{ApiResponse, Claim, ClaimsPage, ClaimsQuery, SortDirection};
use leptos::prelude::*;
use leptos_router::components::A;

const STATUS_OPTIONS: [(&str, &str); 4] = [
    (ClaimsQuery::ALL_STATUSES, "All Status"),
    ("PROCESSING", "Processing"),
    ("APPROVED", "Approved"),
    ("REJECTED", "Rejected"),
];

#[component]
pub fn Dashboard() -> impl IntoView {
    let auth = use_auth();
    let (query, set_query) = signal(ClaimsQuery::default());

    // LocalResource: gloo-net futures are not Send
    let claims = LocalResource::new(move || {
        let query = query.get();
        let auth = auth.clone();
        async move { auth.api().list_claims(&query).await }
    });

    let sort_header = move |column: &'static str, label: &'static str| {
        let indicator = move || {
            query.with(|q| match (q.sort_by == column, q.sort_direction) {
                (false, _) => "↕",
                (true, SortDirection::Asc) => "↑",
                (true, SortDirection::Desc) => "↓",
            })
        };
        view! {
            <th>
                <button
                    class="btn-link"
                    on:click=move |_| set_query.update(|q| *q = q.clone().sorted_by(column))
                >
                    {label} " " {indicator}
                </button>
            </th>
        }
    };

    view! {
        <div class="page dashboard-page">
            <div class="page-header">
                <h2>"Claims"</h2>
                <A href="/upload">"Upload document"</A>
            </div>

            <div class="filters">
                <label for="status-filter">"Status"</label>
                <select
                    id="status-filter"
                    on:change=move |e| {
                        let status = event_target_value(&e);
                        set_query.update(|q| *q = q.clone().with_status(status).with_page(1));
                    }
                >
                    {STATUS_OPTIONS
                        .iter()
                        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                        .collect_view()}
                </select>
            </div>

            <Suspense fallback=move || view! { <div class="loading">"Loading claims..."</div> }>
                {move || {
                    claims
                        .get()
                        .map(|response| {
                            let response: &ApiResponse<ClaimsPage> = &response;
                            match (&response.data, &response.error) {
                                (Some(page), _) => {
                                    render_page(page.clone(), sort_header, set_query).into_any()
                                }
                                (None, error) => {
                                    let message = error
                                        .as_ref()
                                        .map(|e| e.message.clone())
                                        .unwrap_or_else(|| "Failed to load claims".to_string());
                                    view! { <div class="error">{message}</div> }.into_any()
                                }
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

fn render_page<H, V>(page: ClaimsPage, sort_header: H, set_query: WriteSignal<ClaimsQuery>) -> impl IntoView
where
    H: Fn(&'static str, &'static str) -> V,
    V: IntoView,
{
    if page.claims.is_empty() {
        return view! { <div class="empty-state">"No claims found."</div> }.into_any();
    }

    let pagination = page.pagination;
    let rows = page.claims.into_iter().map(claim_row).collect_view();

    view! {
        <table class="claims-table">
            <thead>
                <tr>
                    <th>"Claim ID"</th>
                    <th>"Status"</th>
                    {sort_header("patientName", "Patient")}
                    {sort_header("providerName", "Provider")}
                    {sort_header("serviceDate", "Service Date")}
                    {sort_header("amount", "Amount")}
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>

        <div class="pagination">
            <button
                class="btn btn-secondary"
                disabled=!pagination.has_previous()
                on:click=move |_| set_query.update(|q| *q = q.clone().with_page(q.page.saturating_sub(1)))
            >
                "Previous"
            </button>
            <span>
                {format!(
                    "Page {} of {} ({} claims)",
                    pagination.current_page,
                    pagination.total_pages.max(1),
                    pagination.total_items,
                )}
            </span>
            <button
                class="btn btn-secondary"
                disabled=!pagination.has_next()
                on:click=move |_| set_query.update(|q| *q = q.clone().with_page(q.page + 1))
            >
                "Next"
            </button>
        </div>
    }
    .into_any()
}

fn claim_row(claim: Claim) -> impl IntoView {
    let href = format!("/claims/{}", encode_segment(&claim.id));
    let status_class = format!("status status-{}", claim.status.to_ascii_lowercase());

    view! {
        <tr>
            <td class="mono">{claim.id}</td>
            <td><span class=status_class>{claim.status}</span></td>
            <td>{claim.patient_name}</td>
            <td>{claim.provider_name}</td>
            <td>{format_date(Some(&claim.service_date))}</td>
            <td>{format_currency(Some(claim.amount), None)}</td>
            <td><A href=href>"View"</A></td>
        </tr>
    }
}
