//! Split a markdown document into its YAML metadata block and body, and put
//! the two back together.
//!
//! A document carries metadata only when its content starts with `---`. The
//! content is split on the first two occurrences of the delimiter; the middle
//! segment must parse as a non-empty YAML mapping. Anything else means "no
//! metadata" and the document is left alone by every pipeline.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::Result;

/// Marker that opens and closes the metadata block.
pub const DELIMITER: &str = "---";

/// A markdown document with parsed metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Metadata keys in the order they appear in the file.
    pub metadata: Mapping,
    /// Raw markdown following the closing delimiter line.
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// Drop blank lines at the start of the body when writing.
    pub strip_leading_blank_lines: bool,
}

/// Parse `content` into metadata and body.
///
/// Returns `None` when the content does not start with the delimiter, when
/// the closing delimiter is missing, or when the metadata is not a non-empty
/// YAML mapping. Never fails.
pub fn parse(content: &str) -> Option<Document> {
    if !content.starts_with(DELIMITER) {
        return None;
    }

    let mut parts = content.splitn(3, DELIMITER);
    let _leading = parts.next()?;
    let yaml = parts.next()?;
    let rest = parts.next()?;

    let metadata = match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) if !map.is_empty() => map,
        _ => return None,
    };

    // The line break closing the delimiter line is part of the delimiter.
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    Some(Document {
        metadata,
        body: body.to_string(),
    })
}

/// Render a document back to text: delimiter, YAML dump in mapping order,
/// delimiter, body.
pub fn serialize(doc: &Document, options: SerializeOptions) -> Result<String> {
    let yaml = serde_yaml::to_string(&Value::Mapping(doc.metadata.clone()))?;
    let body = if options.strip_leading_blank_lines {
        strip_leading_blank_lines(&doc.body)
    } else {
        &doc.body
    };

    let mut out =
        String::with_capacity(yaml.len() + body.len() + 2 * DELIMITER.len() + 2);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

fn strip_leading_blank_lines(body: &str) -> &str {
    let mut rest = body;
    loop {
        let Some(end) = rest.find('\n') else {
            return if rest.trim().is_empty() { "" } else { rest };
        };
        if !rest[..end].trim().is_empty() {
            return rest;
        }
        rest = &rest[end + 1..];
    }
}

/// Read a file as UTF-8, silently dropping byte sequences that do not decode.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            let bytes = err.into_bytes();
            let mut text = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                text.push_str(chunk.valid());
            }
            Ok(text)
        }
    }
}

/// Read and parse a document from disk.
pub fn read_document(path: &Path) -> Result<Option<Document>> {
    Ok(parse(&read_text(path)?))
}
