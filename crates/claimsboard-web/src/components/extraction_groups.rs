//! Collapsible confidence groups for a claim's extracted lines

use claimsboard_core::extraction::{format_key, GroupedExtraction};
use claimsboard_core::format::format_confidence;
use leptos::prelude::*;

#[component]
pub fn ExtractionGroups(grouped: GroupedExtraction, threshold: f64) -> impl IntoView {
    if grouped.is_empty() {
        return view! {
            <p class="muted">
                {format!("No extracted fields at or above {} confidence.", format_confidence(threshold))}
            </p>
        }
        .into_any();
    }

    let groups = grouped
        .groups()
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(tier, lines)| {
            let rows = lines
                .iter()
                .map(|line| {
                    view! {
                        <tr>
                            <td class="field-key">{format_key(&line.key)}</td>
                            <td class="field-value">{line.value.clone()}</td>
                            <td class="field-confidence">{format_confidence(line.confidence)}</td>
                        </tr>
                    }
                })
                .collect_view();

            view! {
                <details class=format!("confidence-group confidence-{}", tier.slug()) open=true>
                    <summary>
                        {tier.label()} " (" {lines.len()} ")"
                    </summary>
                    <table class="field-table">
                        <tbody>{rows}</tbody>
                    </table>
                </details>
            }
        })
        .collect_view();

    view! { <div class="extraction-groups">{groups}</div> }.into_any()
}
