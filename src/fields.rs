//! Typed accessors over a document's metadata mapping.
//!
//! Metadata is loosely typed YAML: `categories` may be a list or a single
//! string, `title` may be a number, `taxonomy` may be missing or malformed.
//! These helpers give the pipelines one consistent reading of it.

use serde_yaml::{Mapping, Value};

pub const TITLE: &str = "title";
pub const SUBTITLE: &str = "subtitle";
pub const DESCRIPTION: &str = "description";
pub const SLUG: &str = "slug";
pub const PERMALINK: &str = "permalink";
pub const DATE: &str = "date";
pub const UPDATED: &str = "updated";
pub const DIFFICULTY: &str = "difficulty";
pub const CATEGORIES: &str = "categories";
pub const KEYWORDS: &str = "keywords";
pub const LAYOUT: &str = "layout";
pub const TAXONOMY: &str = "taxonomy";
pub const TAXONOMY_CATEGORY: &str = "category";
pub const TAXONOMY_SUBCATEGORY: &str = "subcategory";
pub const TAXONOMY_ORDER: &str = "order";

/// Render a scalar as text. Mappings, sequences and null yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Text of a scalar field, treating absent, null and empty values alike.
pub fn text(meta: &Mapping, key: &str) -> Option<String> {
    meta.get(key)
        .and_then(scalar_text)
        .filter(|s| !s.is_empty())
}

/// A field that may hold a list of strings or a single string.
pub fn string_list(meta: &Mapping, key: &str) -> Vec<String> {
    match meta.get(key) {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(value) => scalar_text(value)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
        None => Vec::new(),
    }
}

/// The `taxonomy` mapping, if present and well-formed.
pub fn taxonomy(meta: &Mapping) -> Option<&Mapping> {
    meta.get(TAXONOMY).and_then(Value::as_mapping)
}

/// Run `f` against the `taxonomy` mapping, creating it (or replacing a
/// non-mapping value) first. The entry keeps its position in the metadata.
pub fn with_taxonomy<R>(
    meta: &mut Mapping,
    f: impl FnOnce(&mut Mapping) -> R,
) -> R {
    let mut tax = match meta.get(TAXONOMY) {
        Some(Value::Mapping(map)) => map.clone(),
        _ => Mapping::new(),
    };
    let out = f(&mut tax);
    meta.insert(Value::from(TAXONOMY), Value::Mapping(tax));
    out
}

/// `(category, subcategory)` from the taxonomy block, each `None` when blank.
pub fn taxonomy_pair(meta: &Mapping) -> (Option<String>, Option<String>) {
    match taxonomy(meta) {
        Some(tax) => (
            text(tax, TAXONOMY_CATEGORY),
            text(tax, TAXONOMY_SUBCATEGORY),
        ),
        None => (None, None),
    }
}

/// Set `key` to `value` only when the current value is absent or blank.
///
/// Returns the value that ends up stored.
pub fn set_if_blank(map: &mut Mapping, key: &str, value: &str) -> String {
    if let Some(existing) = text(map, key) {
        return existing;
    }
    map.insert(Value::from(key), Value::from(value));
    value.to_string()
}
