//! kb-indexer - classification and search indexing for a markdown
//! knowledge-base site.
//!
//! Two batch pipelines run over the site's markdown documents:
//!
//! - **classify**: fill in `taxonomy.category`, `taxonomy.subcategory`,
//!   `layout` and `keywords` from each document's path and text, and keep
//!   `taxonomy.order` in line with `_data/taxonomy.yml`. Files are rewritten
//!   only when their metadata changes, so repeated runs converge.
//! - **index**: read every post and collection document and write
//!   `assets/search-index.json` with URLs, dates, excerpts and a flattened
//!   search text, newest first.
//!
//! # Quick start
//!
//! ```no_run
//! use kb_indexer::{SiteConfig, SiteRoot, index};
//!
//! let site = SiteRoot::resolve(None).unwrap();
//! let config = SiteConfig::load(&site.config_file()).unwrap();
//! let output = site.search_index_file();
//!
//! let built =
//!     index::generate(&site, &config, config.settings.excerpt_limit, &output)
//!         .unwrap();
//! println!("{} documents", built.document_count);
//! ```

pub mod candidates;
pub mod classify;
pub mod date;
pub mod error;
pub mod excerpt;
pub mod fields;
pub mod front_matter;
pub mod index;
pub mod permalink;
pub mod rewrite;
pub mod site;
pub mod site_config;
pub mod taxonomy;
pub mod title_tags;
pub mod walker;

pub use classify::{Classifier, policy::ClassificationPolicy};
pub use error::{Error, Result};
pub use front_matter::Document;
pub use index::{DocumentIndexBuilder, SearchIndex, SearchIndexRecord};
pub use permalink::{PermalinkResolver, slugify};
pub use site::SiteRoot;
pub use site_config::SiteConfig;
pub use taxonomy::TaxonomyDefinition;
