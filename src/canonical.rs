//! Deterministic ordering of metadata documents.
//!
//! [`canonicalize`] sorts every keyed collection listed in the document
//! kind's [`Schema`](crate::document::Schema) by its key field, orders the
//! top-level fields (template fields first in template order, then unknown
//! fields alphabetically) and drops empty fields. Two documents with the same
//! content therefore serialize to identical bytes, whatever order the org or
//! a previous merge produced.

use std::cmp::Ordering;

use crate::document::{Document, Record, Value};

/// Canonicalizes `document` in place. Idempotent.
pub fn canonicalize(document: &mut Document) {
    let schema = document.kind().schema();
    let root = document.root_mut();

    for (collection, key_field) in schema.sort_keys {
        if let Some(values) = root.get_mut(collection) {
            sort_by_key(values, key_field);
        }
    }

    let fields = root.fields_mut();
    fields.retain(|field| !field.values.is_empty());
    // Stable sort: template rank first, then name.
    fields.sort_by(|a, b| {
        let rank_a = schema.template.iter().position(|name| *name == a.name);
        let rank_b = schema.template.iter().position(|name| *name == b.name);
        match (rank_a, rank_b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        }
    });
}

/// Returns a canonical copy of `document`.
pub fn canonicalized(document: &Document) -> Document {
    let mut copy = document.clone();
    canonicalize(&mut copy);
    copy
}

/// Stable sort of records by the text of `key_field`. Records without the
/// key (and text values) sort first, keeping their relative order.
fn sort_by_key(values: &mut [Value], key_field: &str) {
    values.sort_by(|a, b| key_of(a, key_field).cmp(&key_of(b, key_field)));
}

fn key_of<'a>(value: &'a Value, key_field: &str) -> Option<&'a str> {
    value.as_record().and_then(|record: &Record| record.text(key_field))
}
