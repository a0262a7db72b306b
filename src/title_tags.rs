//! Leading bracketed tags in titles, e.g. `[Rust][WIP] Ownership notes`.

use regex::Regex;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct TitleTagParser {
    prefix: Regex,
    tag: Regex,
}

impl TitleTagParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            prefix: Regex::new(r"^(?:\[[^\]]+\]\s*)+")?,
            tag: Regex::new(r"\[([^\]]+)\]")?,
        })
    }

    /// Split `title` into its leading tags (trimmed, in order) and the
    /// remaining title (trimmed). A title without leading tags is returned
    /// unchanged with an empty tag list.
    pub fn split(&self, title: &str) -> (Vec<String>, String) {
        let Some(prefix) = self.prefix.find(title) else {
            return (Vec::new(), title.to_string());
        };

        let tags = self
            .tag
            .captures_iter(prefix.as_str())
            .map(|caps| caps[1].trim().to_string())
            .collect();
        (tags, title[prefix.end()..].trim().to_string())
    }
}
