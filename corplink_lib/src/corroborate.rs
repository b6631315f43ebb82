//! Secondary-attribute corroboration for a chosen candidate pair.

use crate::record::{OverlapSignals, Record};

/// Evaluate city, zip and street agreement independently.
///
/// Empty values never agree. Street agreement is containment in either
/// direction, since one dataset often carries a fuller address line.
pub fn score_overlap(source: &Record, target: &Record) -> OverlapSignals {
    OverlapSignals {
        city: both_equal(&source.city_norm, &target.city_norm),
        zip: both_equal(&source.zip_norm, &target.zip_norm),
        street: either_contains(&source.street_norm, &target.street_norm),
    }
}

fn both_equal(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && a == b
}

fn either_contains(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, zip: &str, street: &str) -> Record {
        Record {
            id: "x".to_string(),
            display_name: String::new(),
            match_key: "ACME".to_string(),
            city_norm: city.to_string(),
            zip_norm: zip.to_string(),
            street_norm: street.to_string(),
            composite_address: String::new(),
        }
    }

    #[test]
    fn test_all_signals_fire() {
        let a = record("springfield", "62701", "123 main st");
        let b = record("springfield", "62701", "123 main st suite 4");
        let signals = score_overlap(&a, &b);
        assert!(signals.city && signals.zip && signals.street);
        assert_eq!(signals.to_string(), "city, zip, street");
    }

    #[test]
    fn test_empty_values_never_overlap() {
        let a = record("", "", "");
        let b = record("", "", "");
        assert!(score_overlap(&a, &b).is_empty());
    }

    #[test]
    fn test_one_side_empty() {
        let a = record("springfield", "", "123 main st");
        let b = record("", "62701", "");
        assert!(score_overlap(&a, &b).is_empty());
    }

    #[test]
    fn test_street_containment_symmetric() {
        let short = record("", "", "123 main st");
        let long = record("", "", "123 main st suite 4");
        assert!(score_overlap(&short, &long).street);
        assert!(score_overlap(&long, &short).street);
        assert_eq!(score_overlap(&short, &long), score_overlap(&long, &short));
    }

    #[test]
    fn test_street_mismatch() {
        let a = record("", "", "123 main st");
        let b = record("", "", "125 main st");
        assert!(!score_overlap(&a, &b).street);
    }

    #[test]
    fn test_city_only() {
        let a = record("springfield", "", "");
        let b = record("springfield", "11111", "");
        let signals = score_overlap(&a, &b);
        assert!(signals.city);
        assert!(!signals.zip);
        assert_eq!(signals.len(), 1);
    }

    #[test]
    fn test_zip_mismatch() {
        let a = record("toronto", "m5v2t6", "");
        let b = record("toronto", "m5v2t7", "");
        let signals = score_overlap(&a, &b);
        assert!(signals.city);
        assert!(!signals.zip);
    }
}
