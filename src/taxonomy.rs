//! The taxonomy definition (`_data/taxonomy.yml`) and the reconciliation of
//! each document's `taxonomy.order` against it.
//!
//! ```yaml
//! categories:
//!   - id: network
//!     name: Networking
//!     subcategories:
//!       - id: protocol
//!         name: Protocols
//!         weight: 5
//! ```

use std::{collections::HashMap, fmt, path::Path};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::{
    error::{Error, Result},
    fields,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubcategoryDef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub weight: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryDef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxonomyDefinition {
    pub categories: Vec<CategoryDef>,
}

impl TaxonomyDefinition {
    /// Load the definition. A missing file or a file without a `categories`
    /// list is an error: reconciling against partial data would silently
    /// renumber documents.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Taxonomy(format!(
                "taxonomy file not found at {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text).map_err(|e| {
            Error::Taxonomy(format!("taxonomy file is not valid YAML: {e}"))
        })?;

        let has_categories = value
            .as_mapping()
            .and_then(|m| m.get("categories"))
            .is_some_and(|c| !c.is_null());
        if !has_categories {
            return Err(Error::Taxonomy(
                "invalid taxonomy file structure: missing `categories`".into(),
            ));
        }

        serde_yaml::from_value(value).map_err(|e| {
            Error::Taxonomy(format!("invalid taxonomy file structure: {e}"))
        })
    }

    /// Flatten into category id -> subcategory id -> weight. Entries
    /// without an id or a weight are left out.
    pub fn weights(&self) -> WeightMap {
        let mut map: HashMap<String, HashMap<String, i64>> = HashMap::new();
        for category in &self.categories {
            let Some(cat_id) = category.id.as_deref().filter(|s| !s.is_empty())
            else {
                continue;
            };
            for sub in &category.subcategories {
                if let Some(sub_id) = sub.id.as_deref().filter(|s| !s.is_empty())
                    && let Some(weight) = sub.weight
                {
                    map.entry(cat_id.to_string())
                        .or_default()
                        .insert(sub_id.to_string(), weight);
                }
            }
        }
        WeightMap(map)
    }
}

/// Expected `taxonomy.order` per (category, subcategory).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightMap(HashMap<String, HashMap<String, i64>>);

impl WeightMap {
    pub fn weight(&self, category: &str, subcategory: &str) -> Option<i64> {
        self.0.get(category)?.get(subcategory).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String, i64)> for WeightMap {
    fn from_iter<T: IntoIterator<Item = (String, String, i64)>>(iter: T) -> Self {
        let mut map: HashMap<String, HashMap<String, i64>> = HashMap::new();
        for (category, subcategory, weight) in iter {
            map.entry(category).or_default().insert(subcategory, weight);
        }
        Self(map)
    }
}

/// A `taxonomy.order` value that was overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderChange {
    pub category: String,
    pub subcategory: String,
    pub previous: Option<Value>,
    pub expected: i64,
}

impl fmt::Display for OrderChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let previous = self
            .previous
            .as_ref()
            .and_then(fields::scalar_text)
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "{}/{} order {} -> {}",
            self.category, self.subcategory, previous, self.expected
        )
    }
}

/// Bring `taxonomy.order` in line with the definition.
///
/// Documents without both a category and a subcategory, and pairs the
/// definition does not know, are left untouched.
pub fn reconcile_order(
    meta: &mut Mapping,
    weights: &WeightMap,
) -> Option<OrderChange> {
    let (Some(category), Some(subcategory)) = fields::taxonomy_pair(meta) else {
        return None;
    };
    let expected = weights.weight(&category, &subcategory)?;

    let current = fields::taxonomy(meta)
        .and_then(|tax| tax.get(fields::TAXONOMY_ORDER))
        .cloned();
    if current.as_ref().and_then(Value::as_i64) == Some(expected) {
        return None;
    }

    fields::with_taxonomy(meta, |tax| {
        tax.insert(Value::from(fields::TAXONOMY_ORDER), Value::from(expected))
    });

    Some(OrderChange {
        category,
        subcategory,
        previous: current,
        expected,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulatedSubcategory {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub weight: Option<i64>,
    pub document_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulatedCategory {
    pub id: String,
    pub name: Option<String>,
    pub subcategories: Vec<PopulatedSubcategory>,
}

/// Subcategories of the definition that at least one document belongs to,
/// grouped by category in definition order. A document belongs to a
/// subcategory when its `taxonomy.subcategory` equals the subcategory id.
pub fn populated_subcategories<'a>(
    definition: &TaxonomyDefinition,
    documents: impl IntoIterator<Item = &'a Mapping>,
) -> Vec<PopulatedCategory> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for meta in documents {
        if let (_, Some(sub)) = fields::taxonomy_pair(meta) {
            *counts.entry(sub).or_default() += 1;
        }
    }

    definition
        .categories
        .iter()
        .filter_map(|category| {
            let id = category.id.clone()?;
            let subcategories: Vec<_> = category
                .subcategories
                .iter()
                .filter_map(|sub| {
                    let sub_id = sub.id.clone()?;
                    let document_count = *counts.get(&sub_id)?;
                    Some(PopulatedSubcategory {
                        id: sub_id,
                        name: sub.name.clone(),
                        description: sub.description.clone(),
                        weight: sub.weight,
                        document_count,
                    })
                })
                .collect();
            (!subcategories.is_empty()).then(|| PopulatedCategory {
                id,
                name: category.name.clone(),
                subcategories,
            })
        })
        .collect()
}
