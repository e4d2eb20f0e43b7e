//! Property-based tests for canonicalization and the merge engine.
//!
//! These tests use proptest to generate random documents and selections and
//! verify that the ordering and merge invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::path::Path;

    use crate::canonical::{canonicalize, canonicalized};
    use crate::document::{Document, DocumentKind, Record, Value};
    use crate::merge::merge_children;
    use crate::selector::{Selector, SelectorKey};
    use proptest::prelude::*;

    fn access(class: &str, enabled: bool) -> Value {
        Value::Record(
            Record::new()
                .with_text("apexClass", class)
                .with_text("enabled", enabled.to_string()),
        )
    }

    fn key(value: &Value) -> &str {
        value.as_record().unwrap().text("apexClass").unwrap()
    }

    prop_compose! {
        fn class_accesses()(entries in prop::collection::vec(("[A-Z][A-Za-z0-9_]{0,8}", any::<bool>()), 0..12)) -> Vec<Value> {
            entries.iter().map(|(name, enabled)| access(name, *enabled)).collect()
        }
    }

    prop_compose! {
        /// A profile with fields in arbitrary order, some of them unknown.
        fn profile()(
            accesses in class_accesses(),
            permissions in prop::collection::vec("[A-Z][A-Za-z]{0,10}", 0..6),
            extra in prop::collection::vec(("[a-z]{1,6}Custom", "[ -~]{0,12}"), 0..3),
            reversed in any::<bool>(),
        ) -> Document {
            let mut root = Record::new().with_text("custom", "false");
            for value in accesses {
                root.push("classAccesses", value);
            }
            for name in permissions {
                root.push(
                    "userPermissions",
                    Value::Record(Record::new().with_text("enabled", "true").with_text("name", name)),
                );
            }
            for (name, text) in extra {
                root.push(&name, Value::text(text));
            }
            if reversed {
                root.fields_mut().reverse();
            }
            Document::new(DocumentKind::Profile, root)
        }
    }

    // ============================================================================
    // canonicalize property tests
    // ============================================================================

    proptest! {
        /// Property: canonicalizing twice gives the same bytes as once
        #[test]
        fn canonicalize_is_idempotent(document in profile()) {
            let once = canonicalized(&document);
            let twice = canonicalized(&once);
            prop_assert_eq!(once.to_xml(), twice.to_xml());
        }

        /// Property: keyed collections come out sorted by key
        #[test]
        fn canonicalize_sorts_class_accesses(document in profile()) {
            let mut document = document;
            canonicalize(&mut document);
            let keys: Vec<&str> = document.root().get("classAccesses").iter().map(key).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }

        /// Property: field order in the input does not change the output
        #[test]
        fn canonicalize_ignores_input_field_order(document in profile()) {
            let mut reversed = document.clone();
            reversed.root_mut().fields_mut().reverse();
            prop_assert_eq!(canonicalized(&document).to_xml(), canonicalized(&reversed).to_xml());
        }

        /// Property: serialized canonical output parses back to the same document
        #[test]
        fn canonical_output_parses_back(document in profile()) {
            let canonical = canonicalized(&document);
            let parsed = Document::parse(DocumentKind::Profile, &canonical.to_xml(), Path::new("prop"));
            prop_assert!(parsed.is_ok());
            let parsed = parsed.unwrap();
            prop_assert_eq!(parsed.root().get("classAccesses"), canonical.root().get("classAccesses"));
        }
    }

    // ============================================================================
    // merge_children property tests
    // ============================================================================

    proptest! {
        /// Property: a wildcard merge yields exactly the retrieved records
        #[test]
        fn wildcard_merge_replaces(current in class_accesses(), retrieved in class_accesses()) {
            let merged = merge_children(&current, &retrieved, &Selector::All, "apexClass");
            prop_assert_eq!(merged, retrieved);
        }

        /// Property: records no key selects survive in their original order
        #[test]
        fn named_merge_keeps_unselected(
            current in class_accesses(),
            retrieved in class_accesses(),
            picks in prop::collection::vec("[A-Z][A-Za-z0-9_]{0,8}", 0..4),
        ) {
            let selector = Selector::keys(picks.iter().map(|p| SelectorKey::Exact(p.clone())));
            let merged = merge_children(&current, &retrieved, &selector, "apexClass");

            let untouched: Vec<&Value> = current
                .iter()
                .filter(|v| !picks.iter().any(|p| p == key(v)))
                .collect();
            prop_assert!(merged.len() >= untouched.len());
            for (kept, original) in merged.iter().zip(untouched.iter()) {
                prop_assert_eq!(kept, *original);
            }
        }

        /// Property: every selected record in the result comes from the org
        #[test]
        fn named_merge_takes_selected_from_org(
            current in class_accesses(),
            retrieved in class_accesses(),
            picks in prop::collection::vec("[A-Z][A-Za-z0-9_]{0,8}", 0..4),
        ) {
            let selector = Selector::keys(picks.iter().map(|p| SelectorKey::Exact(p.clone())));
            let merged = merge_children(&current, &retrieved, &selector, "apexClass");

            for value in merged.iter().filter(|v| picks.iter().any(|p| p == key(v))) {
                prop_assert!(retrieved.contains(value));
            }
        }
    }
}
