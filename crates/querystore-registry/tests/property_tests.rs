//! Property-based tests for lookup and filtering.
//!
//! Run with: cargo test -p querystore-registry --test `property_tests`

use proptest::prelude::*;
use querystore_core::QueryDefinition;
use querystore_registry::{matches_driver_filter, DriverFilter, QueryStore};
use std::collections::BTreeSet;

fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,8}"
}

fn arb_family() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_segment(), 1..4).prop_map(|parts| parts.join("."))
}

proptest! {
    /// `get_query("family.name")` finds the same definition as
    /// `get_query("name", family)`.
    #[test]
    fn prop_dotted_lookup_matches_explicit_family(
        entries in prop::collection::vec((arb_family(), arb_segment()), 1..8),
    ) {
        let mut store = QueryStore::new("Test");
        for (family, name) in &entries {
            store
                .add_definition(QueryDefinition::builder(name.as_str(), "Events").family(family.as_str()).build())
                .unwrap();
        }

        for (family, name) in &entries {
            let explicit = store.get_query(name, Some(family.as_str())).unwrap();
            let dotted = store.get_query(&format!("{family}.{name}"), None).unwrap();
            prop_assert!(std::ptr::eq(explicit, dotted));
        }
    }

    /// Enumeration lists each visible family/name once, ordered by family
    /// then name, and is restartable.
    #[test]
    fn prop_query_names_sorted(
        entries in prop::collection::vec((arb_family(), arb_segment()), 0..12),
        hide_mask in any::<u16>(),
    ) {
        let mut store = QueryStore::new("Test");
        for (family, name) in &entries {
            store
                .add_definition(QueryDefinition::builder(name.as_str(), "Events").family(family.as_str()).build())
                .unwrap();
        }
        let hidden: BTreeSet<&str> = entries
            .iter()
            .enumerate()
            .filter(|(i, _)| hide_mask & (1 << i) != 0)
            .map(|(_, (_, name))| name.as_str())
            .collect();
        store.apply_query_filter(|def| !hidden.contains(def.name()));

        let expected: Vec<(&str, &str)> = entries
            .iter()
            .map(|(family, name)| (family.as_str(), name.as_str()))
            .filter(|(_, name)| !hidden.contains(name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        prop_assert!(expected.windows(2).all(|pair| pair[0] < pair[1]));

        let names: Vec<_> = store.query_names().collect();
        let expected_names: Vec<_> = expected
            .iter()
            .map(|(family, name)| format!("{family}.{name}"))
            .collect();
        prop_assert_eq!(&names, &expected_names);
        prop_assert_eq!(store.query_names().collect::<Vec<_>>(), names);
    }

    /// Filters whose value sets are all empty accept every definition.
    #[test]
    fn prop_empty_value_sets_always_match(
        keys in prop::collection::vec("[a-z_]{1,12}", 0..5),
        source in "[a-z_]{0,12}",
    ) {
        let def = QueryDefinition::builder("q", "Events")
            .family("F")
            .metadata("data_source", source.as_str())
            .build();
        let filter: DriverFilter = keys.into_iter().map(|k| (k, BTreeSet::new())).collect();
        prop_assert!(matches_driver_filter(&def, &filter));
    }
}
