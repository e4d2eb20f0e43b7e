//! Merge engine for metadata documents
//!
//! Every category the tool reconciles (object permissions, layout
//! translations, custom labels...) is one field of a document holding a list
//! of records. A single algorithm, [`merge_children`], grafts the selected
//! records from the retrieved document onto the current one; the category
//! tables in the submodules say which field and which key each category uses.
//!
//! ## Submodules
//!
//! - `profile` - category table and per-document update for profiles
//! - `translation` - category tables for object translations and
//!   translation bundles
//!
//! ## Semantics
//!
//! - [`Selector::All`]: the category becomes the retrieved content.
//! - [`Selector::Keys`]: current records matched by a key are removed, then
//!   retrieved records matched by each key are appended in key order. A key
//!   without a retrieved match deletes the local record.
//! - Records no key matches are kept untouched.
//! - A category left empty is removed from the document.

pub mod profile;
pub mod translation;

use std::collections::BTreeSet;

use crate::document::{Record, Value};
use crate::selector::{Selector, SelectorKey};

/// How a category field is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeShape {
    /// Records identified by the text of `key_field`. When `separator` is set,
    /// keys are composite (`Entity<sep>Child`) and entity-wide selector keys
    /// use it as their prefix terminator.
    Keyed {
        key_field: &'static str,
        separator: Option<char>,
    },
    /// The whole field is replaced by the retrieved value.
    Overwrite,
}

/// One row of a category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Document field holding the category.
    pub field: &'static str,
    pub shape: MergeShape,
}

impl CategoryRule {
    pub const fn keyed(field: &'static str, key_field: &'static str) -> Self {
        Self {
            field,
            shape: MergeShape::Keyed {
                key_field,
                separator: None,
            },
        }
    }

    pub const fn composite(field: &'static str, key_field: &'static str, separator: char) -> Self {
        Self {
            field,
            shape: MergeShape::Keyed {
                key_field,
                separator: Some(separator),
            },
        }
    }

    pub const fn overwrite(field: &'static str) -> Self {
        Self {
            field,
            shape: MergeShape::Overwrite,
        }
    }
}

fn key_of<'a>(value: &'a Value, key_field: &str) -> Option<&'a str> {
    value.as_record().and_then(|record| record.text(key_field))
}

/// Merges one category's records.
///
/// `current` and `retrieved` may be empty. The result keeps unselected
/// current records in their original order, followed by the grafted
/// retrieved records.
pub fn merge_children(
    current: &[Value],
    retrieved: &[Value],
    selector: &Selector,
    key_field: &str,
) -> Vec<Value> {
    let keys = match selector {
        Selector::All => return retrieved.to_vec(),
        Selector::Keys(keys) => keys,
    };

    let selected = |value: &Value| {
        key_of(value, key_field).is_some_and(|key| keys.iter().any(|k| k.matches(key)))
    };

    let mut merged: Vec<Value> = current.iter().filter(|v| !selected(*v)).cloned().collect();

    // Indexes already grafted, so overlapping keys never duplicate a record.
    let mut taken = BTreeSet::new();
    for selector_key in keys {
        let matching = retrieved.iter().enumerate().filter(|(_, value)| {
            key_of(value, key_field).is_some_and(|key| selector_key.matches(key))
        });
        for (index, value) in matching {
            if taken.insert(index) {
                merged.push(value.clone());
            }
            if matches!(selector_key, SelectorKey::Exact(_)) {
                break;
            }
        }
    }

    merged
}

/// Applies one category rule to `current`, returning whether the field
/// changed.
pub fn apply_rule(
    current: &mut Record,
    retrieved: &Record,
    rule: &CategoryRule,
    selector: &Selector,
) -> bool {
    let before = current.get(rule.field).to_vec();
    let after = match rule.shape {
        MergeShape::Keyed { key_field, .. } => {
            merge_children(&before, retrieved.get(rule.field), selector, key_field)
        }
        MergeShape::Overwrite => retrieved.get(rule.field).to_vec(),
    };

    if after == before {
        return false;
    }
    current.set(rule.field, after);
    true
}
