//! The parts of the site's `_config.yml` the indexer reads.
//!
//! ```yaml
//! collections:
//!   knowledge-base:
//!     output: true
//!     permalink: /kb/:path/
//!   til:
//! kb_indexer:
//!   excerpt_limit: 200
//!   policy:
//!     tie_break: keep-first
//!     language: { heuristic: latin-ratio, min_ratio: 0.8 }
//! ```
//!
//! Everything else in the file belongs to the site generator and is
//! ignored.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::{
    classify::policy::ClassificationPolicy,
    error::{Error, Result},
    excerpt::DEFAULT_EXCERPT_LIMIT,
    fields,
};

const COLLECTIONS_KEY: &str = "collections";
const SETTINGS_KEY: &str = "kb_indexer";

/// Settings for one declared collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionConfig {
    pub name: String,
    /// Permalink pattern; `None` means the default `/<name>/:path/`.
    pub permalink: Option<String>,
}

/// Indexer-specific overrides under the `kb_indexer` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndexerSettings {
    pub policy: ClassificationPolicy,
    pub excerpt_limit: usize,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            policy: ClassificationPolicy::default(),
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfig {
    /// Declared collections in file order.
    pub collections: Vec<CollectionConfig>,
    pub settings: IndexerSettings,
}

impl SiteConfig {
    /// Load `path`. A missing file means an all-default configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!(path = %path.display(), "no site config, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| match e {
            Error::Config(msg) => {
                Error::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("not valid YAML: {e}")))?;
        let root = match value {
            Value::Mapping(map) => map,
            Value::Null => return Ok(Self::default()),
            _ => return Err(Error::Config("expected a mapping".into())),
        };

        let collections = match root.get(COLLECTIONS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Mapping(map)) => map
                .iter()
                .filter_map(|(name, cfg)| {
                    let name = fields::scalar_text(name)?;
                    let permalink = cfg
                        .as_mapping()
                        .and_then(|c| fields::text(c, fields::PERMALINK));
                    Some(CollectionConfig { name, permalink })
                })
                .collect(),
            Some(Value::Sequence(names)) => names
                .iter()
                .filter_map(fields::scalar_text)
                .map(|name| CollectionConfig {
                    name,
                    permalink: None,
                })
                .collect(),
            Some(_) => {
                return Err(Error::Config(
                    "`collections` must be a mapping or a list".into(),
                ));
            }
        };

        let settings = match root.get(SETTINGS_KEY) {
            None | Some(Value::Null) => IndexerSettings::default(),
            Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| {
                Error::Config(format!("invalid `{SETTINGS_KEY}` section: {e}"))
            })?,
        };

        Ok(Self {
            collections,
            settings,
        })
    }

    /// `(name, pattern)` for collections that configure a permalink.
    pub fn permalink_patterns(&self) -> impl Iterator<Item = (String, String)> {
        self.collections.iter().filter_map(|c| {
            c.permalink.clone().map(|pattern| (c.name.clone(), pattern))
        })
    }
}
