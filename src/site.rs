use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the site root.
pub const ROOT_ENV: &str = "KB_INDEXER_ROOT";

/// The root of a static site checkout and the well-known paths inside it.
#[derive(Debug, Clone)]
pub struct SiteRoot {
    root: PathBuf,
}

impl SiteRoot {
    /// Resolve the site root from, in order of priority:
    /// 1. An explicit path (from --root)
    /// 2. The KB_INDEXER_ROOT environment variable
    /// 3. The current directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var(ROOT_ENV)
            && !val.is_empty()
        {
            PathBuf::from(val)
        } else {
            std::env::current_dir()?
        };
        Self::new(root)
    }

    /// Use `root` as-is. It must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::SiteRoot(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("_config.yml")
    }

    pub fn taxonomy_file(&self) -> PathBuf {
        self.root.join("_data").join("taxonomy.yml")
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.collection_dir("posts")
    }

    /// `_<name>/` under the root.
    pub fn collection_dir(&self, name: &str) -> PathBuf {
        self.root.join(format!("_{name}"))
    }

    pub fn search_index_file(&self) -> PathBuf {
        self.root.join("assets").join("search-index.json")
    }

    /// Make `path` relative to the root when it lies inside it.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_with_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let site = SiteRoot::resolve(Some(tmp.path())).unwrap();

        assert_eq!(site.root(), tmp.path());
        assert_eq!(site.config_file(), tmp.path().join("_config.yml"));
        assert_eq!(
            site.taxonomy_file(),
            tmp.path().join("_data/taxonomy.yml")
        );
        assert_eq!(site.posts_dir(), tmp.path().join("_posts"));
        assert_eq!(
            site.collection_dir("knowledge-base"),
            tmp.path().join("_knowledge-base")
        );
        assert_eq!(
            site.search_index_file(),
            tmp.path().join("assets/search-index.json")
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SiteRoot::new(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::SiteRoot(_)));
    }

    #[test]
    fn relative_strips_root() {
        let tmp = tempfile::tempdir().unwrap();
        let site = SiteRoot::new(tmp.path()).unwrap();
        let inside = tmp.path().join("_posts/a.md");
        assert_eq!(site.relative(&inside), Path::new("_posts/a.md"));
        assert_eq!(site.relative(Path::new("/elsewhere")), Path::new("/elsewhere"));
    }
}
