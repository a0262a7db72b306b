//! Build `assets/search-index.json` from every post and collection
//! document of a site.
//!
//! Documents are read strictly one after another into an in-memory list,
//! which is sorted newest first and written out in a single pass,
//! replacing any previous artifact.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::{
    date,
    error::Result,
    excerpt::ExcerptExtractor,
    fields,
    front_matter::{self, Document},
    permalink::{Origin, PermalinkResolver},
    site::SiteRoot,
    site_config::SiteConfig,
    title_tags::TitleTagParser,
    walker::{self, DiscoveredFile},
};

/// Collection name recorded for files under `_posts/`.
pub const POSTS_COLLECTION: &str = "posts";

/// Title recorded for documents that have none.
pub const UNTITLED: &str = "Untitled";

/// A markdown file of the site with parsed metadata.
#[derive(Debug, Clone)]
pub struct SiteDocument {
    pub collection: String,
    pub file: DiscoveredFile,
    pub document: Document,
}

impl SiteDocument {
    pub fn is_post(&self) -> bool {
        self.collection == POSTS_COLLECTION
    }

    pub fn metadata(&self) -> &Mapping {
        &self.document.metadata
    }
}

/// Every post, then every document of each declared collection, in
/// directory order. Files without usable metadata are left out.
pub fn collect_site_documents(
    site: &SiteRoot,
    config: &SiteConfig,
) -> Result<Vec<SiteDocument>> {
    let mut sources = vec![(POSTS_COLLECTION.to_string(), site.posts_dir())];
    for collection in &config.collections {
        if collection.name == POSTS_COLLECTION {
            continue;
        }
        sources.push((
            collection.name.clone(),
            site.collection_dir(&collection.name),
        ));
    }

    let mut documents = Vec::new();
    for (collection, dir) in sources {
        for file in walker::discover_markdown(&dir)? {
            let Some(document) = front_matter::read_document(&file.path)?
            else {
                debug!(
                    path = %file.path.display(),
                    "no front matter, skipping"
                );
                continue;
            };
            documents.push(SiteDocument {
                collection: collection.clone(),
                file,
                document,
            });
        }
    }
    Ok(documents)
}

/// One entry of the search index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchIndexRecord {
    pub title: String,
    /// Leading `[Tag]` badges of the title.
    pub title_tags: Vec<String>,
    pub subtitle: JsonValue,
    pub description: JsonValue,
    pub url: String,
    pub collection: String,
    pub relative_path: String,
    pub date: String,
    pub updated: JsonValue,
    pub keywords: Vec<String>,
    pub categories: Vec<String>,
    pub taxonomy: JsonValue,
    pub difficulty: JsonValue,
    pub excerpt: String,
    pub search_text: String,
}

/// The complete artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchIndex {
    pub generated_at: String,
    pub document_count: usize,
    pub documents: Vec<SearchIndexRecord>,
}

#[derive(Debug, Clone)]
pub struct DocumentIndexBuilder {
    permalinks: PermalinkResolver,
    excerpts: ExcerptExtractor,
    title_tags: TitleTagParser,
}

impl DocumentIndexBuilder {
    pub fn new(
        permalinks: PermalinkResolver,
        excerpts: ExcerptExtractor,
    ) -> Result<Self> {
        Ok(Self {
            permalinks,
            excerpts,
            title_tags: TitleTagParser::new()?,
        })
    }

    /// A builder using the site's collection patterns and `excerpt_limit`.
    pub fn from_config(
        config: &SiteConfig,
        excerpt_limit: usize,
    ) -> Result<Self> {
        Self::new(
            PermalinkResolver::new(config.permalink_patterns()),
            ExcerptExtractor::new(excerpt_limit)?,
        )
    }

    pub fn record(
        &self,
        site: &SiteRoot,
        doc: &SiteDocument,
    ) -> SearchIndexRecord {
        let meta = doc.metadata();
        let body = &doc.document.body;
        let date = date::resolve(meta.get(fields::DATE), doc.file.mtime);

        let stem = doc.file.stem();
        let url_path = doc.file.url_path();
        let (origin, relative_path) = if doc.is_post() {
            (
                Origin::Post { stem: &stem },
                path_string(site.relative(&doc.file.path)),
            )
        } else {
            (
                Origin::Collection {
                    name: &doc.collection,
                    relative_path: &url_path,
                },
                url_path.clone(),
            )
        };
        let url = self.permalinks.resolve(origin, meta, &date);

        let title = fields::text(meta, fields::TITLE);
        let (title_tags, _) = match &title {
            Some(t) => self.title_tags.split(t),
            None => (Vec::new(), String::new()),
        };
        let excerpt = self.excerpts.extract(body);
        let keywords = fields::string_list(meta, fields::KEYWORDS);
        let categories = fields::string_list(meta, fields::CATEGORIES);
        let (tax_category, tax_subcategory) = fields::taxonomy_pair(meta);

        let search_text = [
            title.clone().unwrap_or_default(),
            fields::text(meta, fields::SUBTITLE).unwrap_or_default(),
            fields::text(meta, fields::DESCRIPTION).unwrap_or_default(),
            keywords.join(" "),
            categories.join(" "),
            tax_category.unwrap_or_default(),
            tax_subcategory.unwrap_or_default(),
            excerpt.clone(),
            body.clone(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

        SearchIndexRecord {
            title: title.unwrap_or_else(|| UNTITLED.to_string()),
            title_tags,
            subtitle: passthrough(meta, fields::SUBTITLE),
            description: passthrough(meta, fields::DESCRIPTION),
            url,
            collection: doc.collection.clone(),
            relative_path,
            date: date.to_iso(),
            updated: passthrough(meta, fields::UPDATED),
            keywords,
            categories,
            taxonomy: fields::taxonomy(meta)
                .map(|tax| to_json(&Value::Mapping(tax.clone())))
                .unwrap_or_else(|| JsonValue::Object(Default::default())),
            difficulty: passthrough(meta, fields::DIFFICULTY),
            excerpt,
            search_text,
        }
    }

    /// Records for `documents`, newest first. Equal dates keep their input
    /// order.
    pub fn build(
        &self,
        site: &SiteRoot,
        documents: &[SiteDocument],
    ) -> SearchIndex {
        let mut records: Vec<_> =
            documents.iter().map(|doc| self.record(site, doc)).collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));

        SearchIndex {
            generated_at: Utc::now()
                .to_rfc3339_opts(SecondsFormat::Micros, false),
            document_count: records.len(),
            documents: records,
        }
    }
}

fn path_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn passthrough(meta: &Mapping, key: &str) -> JsonValue {
    meta.get(key).map(to_json).unwrap_or(JsonValue::Null)
}

/// YAML values whose keys are not strings have no JSON form; they become
/// null.
fn to_json(value: &Value) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

/// Pretty-printed JSON with a trailing newline, parent directories created
/// as needed.
pub fn write_index(path: &Path, index: &SearchIndex) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(index)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

/// Collect, build and write the site's index to `output`.
pub fn generate(
    site: &SiteRoot,
    config: &SiteConfig,
    excerpt_limit: usize,
    output: &Path,
) -> Result<SearchIndex> {
    let documents = collect_site_documents(site, config)?;
    let builder = DocumentIndexBuilder::from_config(config, excerpt_limit)?;
    let index = builder.build(site, &documents);
    write_index(output, &index)?;
    debug!(
        documents = index.document_count,
        path = %output.display(),
        "wrote search index"
    );
    Ok(index)
}
