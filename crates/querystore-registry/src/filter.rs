//! Driver compatibility filters.
//!
//! A driver filter restricts which definitions a bulk import admits, by
//! matching definition metadata against sets of acceptable values.

use querystore_core::{QueryDefinition, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Metadata key to acceptable values.
pub type DriverFilter = BTreeMap<String, BTreeSet<String>>;

/// Check whether `def` is compatible with `filter`.
///
/// Every key with a non-empty value set must match. A list-valued metadata
/// entry matches when it shares a value with the set; a scalar matches when
/// it is in the set. The key `data_sources` reads the `data_source` entry.
pub fn matches_driver_filter(def: &QueryDefinition, filter: &DriverFilter) -> bool {
    filter
        .iter()
        .filter(|(_, accepted)| !accepted.is_empty())
        .all(|(key, accepted)| {
            let key = if key == "data_sources" {
                "data_source"
            } else {
                key.as_str()
            };
            match def.metadata.get(key) {
                Some(Value::Sequence(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|item| accepted.contains(item)),
                Some(Value::String(item)) => accepted.contains(item),
                _ => false,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def() -> QueryDefinition {
        QueryDefinition::builder("q", "x")
            .family("F")
            .metadata("data_source", "security_event")
            .metadata(
                "data_connectors",
                Value::Sequence(vec!["WindowsForwardedEvents".into(), "AzureMonitor".into()]),
            )
            .build()
    }

    fn filter(key: &str, values: &[&str]) -> DriverFilter {
        let mut filter = DriverFilter::new();
        filter.insert(key.to_string(), values.iter().map(|v| (*v).to_string()).collect());
        filter
    }

    #[test]
    fn test_empty_filters_always_match() {
        assert!(matches_driver_filter(&def(), &DriverFilter::new()));
        assert!(matches_driver_filter(&def(), &filter("anything", &[])));
    }

    #[test]
    fn test_data_sources_alias() {
        assert!(matches_driver_filter(&def(), &filter("data_sources", &["security_event"])));
        assert!(!matches_driver_filter(&def(), &filter("data_sources", &["syslog"])));
    }

    #[test]
    fn test_sequence_intersection() {
        let f = filter("data_connectors", &["AzureMonitor", "Other"]);
        assert!(matches_driver_filter(&def(), &f));
        let f = filter("data_connectors", &["Other"]);
        assert!(!matches_driver_filter(&def(), &f));
    }

    #[test]
    fn test_all_keys_must_match() {
        let mut f = filter("data_source", &["security_event"]);
        f.extend(filter("data_connectors", &["Nope"]));
        assert!(!matches_driver_filter(&def(), &f));
    }

    #[test]
    fn test_missing_key_does_not_match() {
        assert!(!matches_driver_filter(&def(), &filter("cluster", &["a"])));
    }
}
