//! Property-based tests for querystore-core.
//!
//! Run with: cargo test -p querystore-core --test `property_tests`

use proptest::prelude::*;
use querystore_core::dot_path::{resolve, PathMatch};
use querystore_core::validate::placeholders;
use std::collections::BTreeMap;

fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,8}"
}

fn arb_family() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_segment(), 1..4).prop_map(|parts| parts.join("."))
}

proptest! {
    /// A leaf stored under a family is reachable as `family.leaf`.
    #[test]
    fn prop_family_leaf_resolves(family in arb_family(), leaf in arb_segment(), value in any::<u32>()) {
        let mut map: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        map.entry(family.clone()).or_default().insert(leaf.clone(), value);

        let path = format!("{family}.{leaf}");
        // the joined path may itself not be a key, so it must come back as the leaf
        match resolve(&path, &map) {
            Ok(PathMatch::Leaf(found)) => prop_assert_eq!(*found, value),
            other => prop_assert!(false, "unexpected {:?}", other.map(|_| ())),
        }
    }

    /// Resolving a top-level key always returns that branch.
    #[test]
    fn prop_top_level_key_is_branch(family in arb_family()) {
        let mut map: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        map.insert(family.clone(), BTreeMap::new());
        prop_assert!(matches!(resolve(&family, &map), Ok(PathMatch::Branch(_))));
    }

    /// Doubled braces never produce fields.
    #[test]
    fn prop_escaped_braces_have_no_fields(text in "[a-z ]{0,20}") {
        let template = format!("{{{{{text}}}}}");
        prop_assert!(placeholders(&template).is_empty());
    }
}
