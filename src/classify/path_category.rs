use std::path::Path;

use serde::Deserialize;

/// Category used when no marker matches the path.
pub const FALLBACK_CATEGORY: &str = "knowledge-base";

/// A directory marker and the category it implies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathRule {
    pub marker: String,
    pub category: String,
}

impl PathRule {
    pub fn new(marker: &str, category: &str) -> Self {
        Self {
            marker: marker.to_string(),
            category: category.to_string(),
        }
    }
}

/// Maps a storage path to a coarse category. Rules are checked in order and
/// the first marker found anywhere in the path wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFromPathResolver {
    rules: Vec<PathRule>,
    fallback: String,
}

impl CategoryFromPathResolver {
    pub fn new(rules: Vec<PathRule>, fallback: &str) -> Self {
        Self {
            rules,
            fallback: fallback.to_string(),
        }
    }

    pub fn resolve(&self, path: &Path) -> &str {
        // Markers are written with forward slashes on every platform.
        let path = path.to_string_lossy().replace('\\', "/");
        self.rules
            .iter()
            .find(|rule| path.contains(&rule.marker))
            .map_or(self.fallback.as_str(), |rule| rule.category.as_str())
    }
}

impl Default for CategoryFromPathResolver {
    fn default() -> Self {
        Self::new(
            vec![
                PathRule::new("_knowledge-base/", "knowledge-base"),
                PathRule::new("_tutorials/", "tutorials"),
                PathRule::new("_projects/", "projects"),
                PathRule::new("_til/", "til"),
                PathRule::new("_posts/", "blog"),
            ],
            FALLBACK_CATEGORY,
        )
    }
}
