//! Display formatting for claim fields

use chrono::{DateTime, NaiveDate};

/// Placeholder for missing values
pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_value(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `12.5` → `"USD 12.50"`; currency defaults to USD
pub fn format_currency(amount: Option<f64>, currency: Option<&str>) -> String {
    match amount {
        Some(amount) if amount.is_finite() => {
            let currency = currency
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or("USD");
            format!("{} {:.2}", currency.to_ascii_uppercase(), amount)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// RFC 3339 timestamps and plain dates render as `YYYY-MM-DD`
pub fn format_date(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

/// `0.953` → `"95.3%"`
pub fn format_confidence(confidence: f64) -> String {
    if confidence.is_finite() {
        format!("{:.1}%", confidence * 100.0)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

pub fn format_codes(codes: Option<&[String]>) -> String {
    match codes {
        Some(codes) if !codes.is_empty() => codes.join(", "),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some("Jane")), "Jane");
        assert_eq!(format_value(Some("  ")), "N/A");
        assert_eq!(format_value(None), "N/A");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some(12.5), None), "USD 12.50");
        assert_eq!(format_currency(Some(1234.0), Some("eur")), "EUR 1234.00");
        assert_eq!(format_currency(None, Some("USD")), "N/A");
        assert_eq!(format_currency(Some(f64::NAN), None), "N/A");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2025-01-02T10:00:00Z")), "2025-01-02");
        assert_eq!(format_date(Some("2025-01-02")), "2025-01-02");
        assert_eq!(format_date(Some("yesterday")), "N/A");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.953), "95.3%");
        assert_eq!(format_confidence(1.0), "100.0%");
    }

    #[test]
    fn test_format_codes() {
        let codes = vec!["J45.909".to_string(), "R05".to_string()];
        assert_eq!(format_codes(Some(codes.as_slice())), "J45.909, R05");
        assert_eq!(format_codes(Some(&[][..])), "N/A");
        assert_eq!(format_codes(None), "N/A");
    }
}
