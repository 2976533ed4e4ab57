use crate::types::Record;
use chrono::NaiveDate;
use serde_json::Value;

/// Fields every record must carry, in declaration order
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "content", "url", "date"];

/// Result of validating a raw record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    /// Required fields that are absent or have the wrong type
    pub missing: Vec<&'static str>,
}

/// Check that a raw value has every required field with the correct type.
///
/// A field counts as present only if it exists and its value is a non-empty
/// string (`title`, `content`, `url`) or a string parseable as a calendar
/// date (`date`). Numeric, object, array, bool, and null values fail.
pub fn validate(raw: &Value) -> Validation {
    let mut missing = Vec::new();

    for field in REQUIRED_FIELDS {
        let ok = match raw.get(field) {
            Some(Value::String(s)) if field == "date" => parse_date(s).is_some(),
            Some(Value::String(s)) => !s.trim().is_empty(),
            _ => false,
        };
        if !ok {
            missing.push(field);
        }
    }

    Validation {
        valid: missing.is_empty(),
        missing,
    }
}

/// Typed conversion used after a successful validation
pub fn parse_record(raw: &Value) -> Option<Record> {
    if !validate(raw).valid {
        return None;
    }
    serde_json::from_value(raw.clone()).ok()
}

/// Parse a date string: plain YYYY-MM-DD, or the date part of an RFC 3339
/// timestamp
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    // Timestamps like 2024-03-01T12:00:00Z carry the date in the first
    // ten characters
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_record() {
        let raw = json!({
            "title": "Plant Expansion",
            "content": "A manufacturer announced 50 new jobs.",
            "url": "https://example.com/plant",
            "date": "2024-03-01"
        });
        let result = validate(&raw);
        assert!(result.valid);
        assert!(result.missing.is_empty());
        assert!(parse_record(&raw).is_some());
    }

    #[test]
    fn test_missing_fields_are_named() {
        let raw = json!({ "title": "X", "content": "Y" });
        let result = validate(&raw);
        assert!(!result.valid);
        assert_eq!(result.missing, vec!["url", "date"]);
    }

    #[test]
    fn test_empty_string_fails() {
        let raw = json!({
            "title": "",
            "content": "Y",
            "url": "https://example.com",
            "date": "2024-03-01"
        });
        let result = validate(&raw);
        assert!(!result.valid);
        assert_eq!(result.missing, vec!["title"]);
    }

    #[test]
    fn test_non_string_types_fail() {
        let raw = json!({
            "title": 42,
            "content": ["a", "b"],
            "url": { "href": "https://example.com" },
            "date": "2024-03-01"
        });
        let result = validate(&raw);
        assert_eq!(result.missing, vec!["title", "content", "url"]);
    }

    #[test]
    fn test_invalid_date_fails() {
        let raw = json!({
            "title": "X",
            "content": "Y",
            "url": "https://example.com",
            "date": "not a date"
        });
        let result = validate(&raw);
        assert_eq!(result.missing, vec!["date"]);
    }

    #[test]
    fn test_date_accepts_rfc3339_timestamp() {
        assert!(parse_date("2024-03-01T12:00:00Z").is_some());
        assert!(parse_date("2024-03-01").is_some());
        assert!(parse_date("2024-02-30").is_none());
    }
}
