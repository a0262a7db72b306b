//! "Compute the new metadata, write only if it changed."
//!
//! Both the classification pipeline and order reconciliation go through
//! [`rewrite_if_changed`], so running either twice is a no-op the second
//! time.

use std::path::Path;

use tracing::debug;

use crate::{
    error::Result,
    front_matter::{self, Document, SerializeOptions},
};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The path does not exist.
    Missing,
    /// The file has no usable metadata block and was not touched.
    NoMetadata,
    /// The transform ran but the metadata came out identical.
    Unchanged(T),
    /// The metadata changed and the file was rewritten.
    Rewritten(T),
}

impl<T> Outcome<T> {
    /// The transform's report, for files it ran on.
    pub fn report(&self) -> Option<&T> {
        match self {
            Self::Unchanged(r) | Self::Rewritten(r) => Some(r),
            Self::Missing | Self::NoMetadata => None,
        }
    }

    pub fn was_rewritten(&self) -> bool {
        matches!(self, Self::Rewritten(_))
    }
}

/// Read `path`, let `transform` mutate the document, and write it back only
/// when its metadata differs from what was read.
pub fn rewrite_if_changed<T>(
    path: &Path,
    options: SerializeOptions,
    transform: impl FnOnce(&mut Document) -> Result<T>,
) -> Result<Outcome<T>> {
    if !path.is_file() {
        debug!(path = %path.display(), "skipping missing file");
        return Ok(Outcome::Missing);
    }

    let Some(mut doc) = front_matter::read_document(path)? else {
        debug!(path = %path.display(), "skipping file without front matter");
        return Ok(Outcome::NoMetadata);
    };

    let original = doc.metadata.clone();
    let report = transform(&mut doc)?;

    if doc.metadata == original {
        return Ok(Outcome::Unchanged(report));
    }

    let content = front_matter::serialize(&doc, options)?;
    std::fs::write(path, content)?;
    debug!(path = %path.display(), "rewrote front matter");
    Ok(Outcome::Rewritten(report))
}

#[cfg(test)]
mod tests {
    use serde_yaml::Value;

    use super::*;

    #[test]
    fn missing_file_is_reported_not_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = rewrite_if_changed(
            &tmp.path().join("gone.md"),
            SerializeOptions::default(),
            |_| Ok(()),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Missing);
    }

    #[test]
    fn file_without_metadata_is_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plain.md");
        std::fs::write(&path, "# Just markdown\n").unwrap();

        let outcome =
            rewrite_if_changed(&path, SerializeOptions::default(), |doc| {
                doc.metadata.insert(Value::from("x"), Value::from(1));
                Ok(())
            })
            .unwrap();
        assert_eq!(outcome, Outcome::NoMetadata);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Just markdown\n");
    }

    #[test]
    fn identical_metadata_is_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doc.md");
        // Unusual formatting that a rewrite would normalise.
        let original = "---\ntitle:    'Spaced'\n---\nbody\n";
        std::fs::write(&path, original).unwrap();

        let outcome =
            rewrite_if_changed(&path, SerializeOptions::default(), |_| Ok(7))
                .unwrap();
        assert_eq!(outcome, Outcome::Unchanged(7));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn changed_metadata_is_written_with_body_intact() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doc.md");
        std::fs::write(&path, "---\ntitle: T\n---\nline one\n\nline two\n")
            .unwrap();

        let outcome =
            rewrite_if_changed(&path, SerializeOptions::default(), |doc| {
                doc.metadata
                    .insert(Value::from("layout"), Value::from("knowledge-base"));
                Ok(())
            })
            .unwrap();
        assert!(outcome.was_rewritten());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "---\ntitle: T\nlayout: knowledge-base\n---\nline one\n\nline two\n"
        );
    }
}
