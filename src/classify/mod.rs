//! The classification pipeline: decide a document's taxonomy and tags from
//! its path and text, and merge them into its metadata without clobbering
//! anything an author already set.
//!
//! Per document:
//! 1. `layout` is forced to the knowledge-base layout.
//! 2. `taxonomy.category` is filled from the storage path when blank.
//! 3. `taxonomy.subcategory` is filled by keyword scoring when blank.
//! 4. `keywords` is harvested from the text when there is no non-empty list.
//! 5. `taxonomy.order` is reconciled against the taxonomy weights, if any.
//!
//! The file is rewritten only when the metadata actually changed.

pub mod domains;
pub mod keywords;
pub mod language;
pub mod matcher;
pub mod path_category;
pub mod policy;

use std::path::Path;

use serde_yaml::Value;

use self::{
    domains::{DomainTable, SubcategoryClassifier},
    keywords::KeywordHarvester,
    path_category::CategoryFromPathResolver,
    policy::ClassificationPolicy,
};
use crate::{
    error::Result,
    fields,
    front_matter::{Document, SerializeOptions},
    rewrite::{self, Outcome},
    taxonomy::{self, OrderChange, WeightMap},
};

/// What classification decided for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyReport {
    pub category: String,
    pub subcategory: String,
    /// Tags added by harvesting; empty when the document already had some.
    pub harvested: Vec<String>,
    pub order: Option<OrderChange>,
}

#[derive(Debug)]
pub struct Classifier {
    paths: CategoryFromPathResolver,
    subcategories: SubcategoryClassifier,
    harvester: KeywordHarvester,
    weights: Option<WeightMap>,
}

impl Classifier {
    /// A classifier over the built-in domain table, path rules and tag pool.
    pub fn new(policy: ClassificationPolicy) -> Result<Self> {
        Ok(Self::from_parts(
            CategoryFromPathResolver::default(),
            SubcategoryClassifier::new(&DomainTable::builtin(), policy)?,
            KeywordHarvester::builtin()?,
        ))
    }

    pub fn from_parts(
        paths: CategoryFromPathResolver,
        subcategories: SubcategoryClassifier,
        harvester: KeywordHarvester,
    ) -> Self {
        Self {
            paths,
            subcategories,
            harvester,
            weights: None,
        }
    }

    /// Also reconcile `taxonomy.order` against `weights`.
    pub fn with_weights(mut self, weights: WeightMap) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Merge classification results into `doc`'s metadata.
    pub fn apply(&self, path: &Path, doc: &mut Document) -> ClassifyReport {
        let body = &doc.body;
        let meta = &mut doc.metadata;
        let policy = self.subcategories.policy();

        meta.insert(
            Value::from(fields::LAYOUT),
            Value::from(policy.layout.as_str()),
        );

        let title = fields::text(meta, fields::TITLE).unwrap_or_default();
        let (category, subcategory) = fields::with_taxonomy(meta, |tax| {
            let category = fields::set_if_blank(
                tax,
                fields::TAXONOMY_CATEGORY,
                self.paths.resolve(path),
            );
            let subcategory = match fields::text(tax, fields::TAXONOMY_SUBCATEGORY)
            {
                Some(existing) => existing,
                None => {
                    let picked = self.subcategories.classify(&title, body).subcategory;
                    tax.insert(
                        Value::from(fields::TAXONOMY_SUBCATEGORY),
                        Value::from(picked.as_str()),
                    );
                    picked
                }
            };
            (category, subcategory)
        });

        let mut harvested = Vec::new();
        if fields::string_list(meta, fields::KEYWORDS).is_empty() {
            harvested = self.harvester.harvest(&title, body);
            if !harvested.is_empty() {
                meta.insert(
                    Value::from(fields::KEYWORDS),
                    Value::Sequence(
                        harvested.iter().map(|t| Value::from(t.as_str())).collect(),
                    ),
                );
            }
        }

        let order = self
            .weights
            .as_ref()
            .and_then(|weights| taxonomy::reconcile_order(meta, weights));

        ClassifyReport {
            category,
            subcategory,
            harvested,
            order,
        }
    }

    /// Classify the document at `path` in place.
    pub fn process_file(
        &self,
        path: &Path,
        options: SerializeOptions,
    ) -> Result<Outcome<ClassifyReport>> {
        rewrite::rewrite_if_changed(path, options, |doc| Ok(self.apply(path, doc)))
    }
}
