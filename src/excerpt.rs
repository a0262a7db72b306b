use regex::Regex;

use crate::error::Result;

/// Maximum number of characters in an excerpt before truncation.
pub const DEFAULT_EXCERPT_LIMIT: usize = 280;

/// Appended to excerpts that were cut short.
pub const ELLIPSIS: char = '…';

/// Reduces markdown to a short plain-text preview.
///
/// Stripping happens in a fixed order: fenced code blocks, inline code,
/// images, links (keeping their text), HTML tags, then emphasis and heading
/// punctuation. Whitespace runs collapse to single spaces.
#[derive(Debug, Clone)]
pub struct ExcerptExtractor {
    limit: usize,
    fenced_code: Regex,
    inline_code: Regex,
    image: Regex,
    link: Regex,
    html_tag: Regex,
    punctuation: Regex,
    whitespace: Regex,
}

impl ExcerptExtractor {
    /// `limit` is in characters; 0 disables truncation.
    pub fn new(limit: usize) -> Result<Self> {
        Ok(Self {
            limit,
            fenced_code: Regex::new(r"```[\s\S]*?```")?,
            inline_code: Regex::new(r"`[^`]+`")?,
            image: Regex::new(r"!\[[^\]]*\]\([^)]*\)")?,
            link: Regex::new(r"\[([^\]]+)\]\([^)]*\)")?,
            html_tag: Regex::new(r"<[^>]+>")?,
            punctuation: Regex::new(r"[#>*_~]")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn extract(&self, markdown: &str) -> String {
        let text = self.fenced_code.replace_all(markdown, " ");
        let text = self.inline_code.replace_all(&text, " ");
        let text = self.image.replace_all(&text, " ");
        let text = self.link.replace_all(&text, "$1");
        let text = self.html_tag.replace_all(&text, " ");
        let text = self.punctuation.replace_all(&text, " ");
        let text = self.whitespace.replace_all(&text, " ");
        let text = text.trim();

        if self.limit == 0 || text.chars().count() <= self.limit {
            return text.to_string();
        }

        let mut cut: String = text.chars().take(self.limit).collect();
        cut.truncate(cut.trim_end().len());
        cut.push(ELLIPSIS);
        cut
    }
}
