//! Sanitization of price-like and volume-like text
//!
//! Upstream markets format numbers for humans ("$12.50", "1,234 sold").
//! Anything that does not survive cleaning is treated as absent.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parse a price from free-form text
///
/// Keeps only digits and decimal points, then parses as a decimal.
/// Empty, unparsable and non-positive results are rejected.
pub fn sanitize_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let price = Decimal::from_str(&cleaned).ok()?;
    if price <= Decimal::ZERO {
        return None;
    }
    Some(price)
}

/// Parse a volume from free-form text, keeping digits only
pub fn sanitize_volume(text: &str) -> Option<u64> {
    let cleaned: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Text form of a JSON scalar, for fields sent as either string or number
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
