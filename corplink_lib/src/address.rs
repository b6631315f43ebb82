//! Human-readable composite addresses for reporting.
//!
//! Nothing in here takes part in matching decisions.

use crate::record::RawRecord;

/// Join address components with `", "`, trimming each and skipping blanks.
pub fn compose_address<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Composite address of a raw record: street lines, city, state, postal code.
pub fn record_address(record: &RawRecord) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(lines) = &record.street_lines {
        parts.extend(lines.iter().map(String::as_str));
    }
    for field in [&record.city, &record.state, &record.postal_code] {
        if let Some(value) = field {
            parts.push(value);
        }
    }
    compose_address(&parts)
}
