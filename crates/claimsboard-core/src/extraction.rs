//! Confidence-based grouping of extracted key/value lines
//!
//! Lines below the claim's confidence threshold are dropped, the rest are
//! partitioned into four disjoint buckets for display:
//!
//! | bucket   | rule                                   |
//! |----------|----------------------------------------|
//! | `other`  | key is exactly `"Other"`, any confidence |
//! | `high`   | confidence in `[0.9, 1.0]`             |
//! | `medium` | confidence in `[0.8, 0.9)`             |
//! | `low`    | confidence below `0.8`                 |
//!
//! The partition is stable: each bucket keeps the server's line order.

use claimsboard_types::{DetailedClaim, ExtractedLine};

/// Threshold applied when the claim metadata does not carry one
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Lower bound (inclusive) of the high-confidence bucket
pub const HIGH_CONFIDENCE_MIN: f64 = 0.9;

/// Lower bound (inclusive) of the medium-confidence bucket
pub const MEDIUM_CONFIDENCE_MIN: f64 = 0.8;

/// Catch-all key routed to the `other` bucket regardless of confidence
pub const OTHER_KEY: &str = "Other";

/// Display bucket of an extracted line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    Other,
}

impl ConfidenceTier {
    pub const ALL: [ConfidenceTier; 4] = [
        ConfidenceTier::High,
        ConfidenceTier::Medium,
        ConfidenceTier::Low,
        ConfidenceTier::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High Confidence",
            ConfidenceTier::Medium => "Medium Confidence",
            ConfidenceTier::Low => "Low Confidence",
            ConfidenceTier::Other => "Other",
        }
    }

    /// Stable identifier for CSS classes / anchors
    pub fn slug(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
            ConfidenceTier::Other => "other",
        }
    }

    /// Bucket for a line that already passed the threshold filter
    pub fn of(line: &ExtractedLine) -> Self {
        if line.key == OTHER_KEY {
            ConfidenceTier::Other
        } else if line.confidence >= HIGH_CONFIDENCE_MIN {
            ConfidenceTier::High
        } else if line.confidence >= MEDIUM_CONFIDENCE_MIN {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

/// Display-ready buckets derived from a claim's extracted lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedExtraction {
    pub high: Vec<ExtractedLine>,
    pub medium: Vec<ExtractedLine>,
    pub low: Vec<ExtractedLine>,
    pub other: Vec<ExtractedLine>,
}

impl GroupedExtraction {
    pub fn bucket(&self, tier: ConfidenceTier) -> &[ExtractedLine] {
        match tier {
            ConfidenceTier::High => &self.high,
            ConfidenceTier::Medium => &self.medium,
            ConfidenceTier::Low => &self.low,
            ConfidenceTier::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, tier: ConfidenceTier) -> &mut Vec<ExtractedLine> {
        match tier {
            ConfidenceTier::High => &mut self.high,
            ConfidenceTier::Medium => &mut self.medium,
            ConfidenceTier::Low => &mut self.low,
            ConfidenceTier::Other => &mut self.other,
        }
    }

    /// Buckets in display order, each with its tier
    pub fn groups(&self) -> impl Iterator<Item = (ConfidenceTier, &[ExtractedLine])> {
        ConfidenceTier::ALL
            .into_iter()
            .map(move |tier| (tier, self.bucket(tier)))
    }

    /// Number of lines that passed the threshold
    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Metadata threshold, or [`DEFAULT_CONFIDENCE_THRESHOLD`] when absent or not finite
pub fn threshold_or_default(threshold: Option<f64>) -> f64 {
    threshold
        .filter(|t| t.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD)
}

/// Filter lines by `confidence >= threshold` and partition the survivors.
///
/// NaN confidences never pass the filter. The input is not modified.
pub fn group_lines(lines: &[ExtractedLine], threshold: f64) -> GroupedExtraction {
    let mut grouped = GroupedExtraction::default();

    for line in lines.iter().filter(|line| line.confidence >= threshold) {
        grouped.bucket_mut(ConfidenceTier::of(line)).push(line.clone());
    }

    tracing::trace!(
        input = lines.len(),
        retained = grouped.total(),
        threshold,
        "Grouped extracted lines"
    );

    grouped
}

/// Group a claim's lines using its own threshold (default 0.7)
pub fn group_claim(claim: &DetailedClaim) -> GroupedExtraction {
    group_lines(
        &claim.extracted_data.lines,
        threshold_or_default(claim.confidence_threshold()),
    )
}

/// `"patient_first_name"` -> `"Patient First Name"`
///
/// Underscores become spaces and each word gets an upper-case first letter;
/// the rest of the word is kept as-is so acronyms survive (`"DOB"`).
pub fn format_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(key: &str, confidence: f64) -> ExtractedLine {
        ExtractedLine::new(key, format!("{key}-value"), confidence)
    }

    fn keys(lines: &[ExtractedLine]) -> Vec<&str> {
        lines.iter().map(|l| l.key.as_str()).collect()
    }

    #[test]
    fn test_reference_example() {
        let lines = vec![
            ExtractedLine::new("Name", "Jane", 0.95),
            ExtractedLine::new("DOB", "1990", 0.85),
            ExtractedLine::new("Gender", "F", 0.72),
            ExtractedLine::new("Other", "misc", 0.99),
        ];

        let grouped = group_lines(&lines, 0.7);

        assert_eq!(keys(&grouped.high), vec!["Name"]);
        assert_eq!(keys(&grouped.medium), vec!["DOB"]);
        assert_eq!(keys(&grouped.low), vec!["Gender"]);
        assert_eq!(keys(&grouped.other), vec!["Other"]);
        assert_eq!(grouped.total(), 4);
    }

    #[test]
    fn test_below_threshold_excluded() {
        let grouped = group_lines(&[line("Name", 0.65), line("Other", 0.5)], 0.7);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let grouped = group_lines(&[line("Gender", 0.7)], 0.7);
        assert_eq!(keys(&grouped.low), vec!["Gender"]);
    }

    #[test]
    fn test_other_key_wins_over_tier() {
        let grouped = group_lines(&[line("Other", 0.95)], 0.7);
        assert_eq!(keys(&grouped.other), vec!["Other"]);
        assert!(grouped.high.is_empty());
    }

    #[test]
    fn test_other_key_is_case_sensitive() {
        let grouped = group_lines(&[line("other", 0.95)], 0.7);
        assert_eq!(keys(&grouped.high), vec!["other"]);
    }

    #[test]
    fn test_boundaries() {
        let grouped = group_lines(
            &[
                line("a", 0.9),
                line("b", 0.895),
                line("c", 0.89),
                line("d", 0.8),
                line("e", 0.7999),
                line("f", 1.0),
            ],
            0.0,
        );
        assert_eq!(keys(&grouped.high), vec!["a", "f"]);
        assert_eq!(keys(&grouped.medium), vec!["b", "c", "d"]);
        assert_eq!(keys(&grouped.low), vec!["e"]);
    }

    #[test]
    fn test_nan_confidence_dropped() {
        let grouped = group_lines(&[line("Name", f64::NAN)], 0.0);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_order_preserved_within_bucket() {
        let grouped = group_lines(
            &[line("z", 0.99), line("a", 0.91), line("m", 0.95)],
            0.7,
        );
        assert_eq!(keys(&grouped.high), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_groups_display_order() {
        let grouped = group_lines(&[line("Other", 0.9), line("x", 0.75)], 0.7);
        let tiers: Vec<_> = grouped.groups().map(|(tier, lines)| (tier, lines.len())).collect();
        assert_eq!(
            tiers,
            vec![
                (ConfidenceTier::High, 0),
                (ConfidenceTier::Medium, 0),
                (ConfidenceTier::Low, 1),
                (ConfidenceTier::Other, 1),
            ]
        );
    }

    #[test]
    fn test_threshold_or_default() {
        assert_eq!(threshold_or_default(None), DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(threshold_or_default(Some(0.85)), 0.85);
        assert_eq!(threshold_or_default(Some(f64::NAN)), DEFAULT_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn test_format_key() {
        assert_eq!(format_key("patient_first_name"), "Patient First Name");
        assert_eq!(format_key("DOB"), "DOB");
        assert_eq!(format_key("insurance__id"), "Insurance Id");
        assert_eq!(format_key("Other"), "Other");
        assert_eq!(format_key(""), "");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_line() -> impl Strategy<Value = ExtractedLine> {
            (
                prop_oneof![
                    Just("Other".to_string()),
                    "[a-z_]{1,12}",
                ],
                0.0f64..=1.0,
            )
                .prop_map(|(key, confidence)| ExtractedLine::new(key, "v", confidence))
        }

        proptest! {
            #[test]
            fn partition_is_exhaustive_and_disjoint(
                lines in proptest::collection::vec(arb_line(), 0..64),
                threshold in 0.0f64..=1.0,
            ) {
                let grouped = group_lines(&lines, threshold);
                let filtered = lines.iter().filter(|l| l.confidence >= threshold).count();
                prop_assert_eq!(grouped.total(), filtered);
            }

            #[test]
            fn below_threshold_never_retained(
                lines in proptest::collection::vec(arb_line(), 0..64),
                threshold in 0.0f64..=1.0,
            ) {
                let grouped = group_lines(&lines, threshold);
                for (_, bucket) in grouped.groups() {
                    prop_assert!(bucket.iter().all(|l| l.confidence >= threshold));
                }
            }

            #[test]
            fn buckets_respect_their_rules(
                lines in proptest::collection::vec(arb_line(), 0..64),
                threshold in 0.0f64..=1.0,
            ) {
                let grouped = group_lines(&lines, threshold);
                prop_assert!(grouped.other.iter().all(|l| l.key == OTHER_KEY));
                prop_assert!(grouped.high.iter().all(|l| l.key != OTHER_KEY && l.confidence >= 0.9));
                prop_assert!(grouped.medium.iter().all(|l| l.key != OTHER_KEY && l.confidence >= 0.8 && l.confidence < 0.9));
                prop_assert!(grouped.low.iter().all(|l| l.key != OTHER_KEY && l.confidence < 0.8));
            }

            #[test]
            fn partition_is_stable(
                lines in proptest::collection::vec(arb_line(), 0..64),
                threshold in 0.0f64..=1.0,
            ) {
                let grouped = group_lines(&lines, threshold);
                for (tier, bucket) in grouped.groups() {
                    let expected: Vec<&ExtractedLine> = lines
                        .iter()
                        .filter(|l| l.confidence >= threshold && ConfidenceTier::of(l) == tier)
                        .collect();
                    let actual: Vec<&ExtractedLine> = bucket.iter().collect();
                    prop_assert_eq!(actual, expected);
                }
            }

            #[test]
            fn input_is_untouched(lines in proptest::collection::vec(arb_line(), 0..32)) {
                let before = lines.clone();
                let _ = group_lines(&lines, DEFAULT_CONFIDENCE_THRESHOLD);
                prop_assert_eq!(lines, before);
            }
        }
    }
}
