//! Lenient numeric coercion for provider fields.
//!
//! Providers send numbers as JSON numbers, numeric strings, the literal
//! string `"None"`, `{ "raw": .., "fmt": .. }` wrappers, nulls, or nothing
//! at all. Everything that is not a finite number becomes `None`.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

pub fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(map) => map.get("raw").and_then(number),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn number_or_zero(value: &Value) -> f64 {
    number(value).unwrap_or(0.0)
}

/// Accepts `YYYY-MM-DD` strings, epoch seconds, or Yahoo's `{ raw, fmt }` wrapper.
pub fn date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.date_naive()),
        Value::Object(map) => map
            .get("fmt")
            .and_then(date)
            .or_else(|| map.get("raw").and_then(date)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_shapes() {
        assert_eq!(number(&json!(12.5)), Some(12.5));
        assert_eq!(number(&json!("383285000000")), Some(383285000000.0));
        assert_eq!(number(&json!({"raw": -1.25, "fmt": "-1.25"})), Some(-1.25));
        assert_eq!(number(&json!("None")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&Value::Null), None);
        assert_eq!(number(&json!({})), None);
        assert_eq!(number_or_zero(&json!("-")), 0.0);
    }

    #[test]
    fn test_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2023, 9, 30);
        assert_eq!(date(&json!("2023-09-30")), expected);
        assert_eq!(date(&json!({"raw": 1696032000, "fmt": "2023-09-30"})), expected);
        assert_eq!(date(&json!(1696032000)), expected);
        assert_eq!(date(&json!("last year")), None);
    }
}
