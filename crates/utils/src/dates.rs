//! Date conversion between the stored and editable representations.
//!
//! The document store keeps full RFC 3339 timestamps; date inputs edit a
//! plain `YYYY-MM-DD` string. Conversion keeps only the calendar date and
//! never fails: anything that does not parse is handed back unchanged.

use chrono::{DateTime, Utc};

/// Returns true if `value` is already a plain `YYYY-MM-DD` literal.
pub fn is_plain_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if matches!(i, 4 | 7) { *b == b'-' } else { b.is_ascii_digit() })
}

/// Convert a stored timestamp into the editable `YYYY-MM-DD` form.
///
/// Idempotent: empty strings and values already in the plain form come
/// back unchanged, as does anything that fails to parse as an RFC 3339
/// timestamp. The calendar date is taken from the UTC instant, not the
/// local timezone.
pub fn to_editable_date(value: &str) -> String {
    if value.is_empty() || is_plain_date(value) {
        return value.to_string();
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => parsed.with_timezone(&Utc).format("%Y-%m-%d").to_string(),
        Err(_) => value.to_string(),
    }
}
