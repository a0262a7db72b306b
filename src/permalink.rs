//! Canonical URLs for posts and collection documents.

use serde_yaml::Mapping;
use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use crate::{classify::language::is_hangul_syllable, date::ResolvedDate, fields};

/// Used when neither slug, title nor filename yield a usable slug.
pub const FALLBACK_SLUG: &str = "post";

/// Extension substituted for `:output_ext`.
pub const OUTPUT_EXT: &str = ".html";

/// Turn free text into a lowercase, hyphen-separated URL segment.
///
/// Text is compatibility-decomposed (precomposed Hangul syllables are kept
/// whole), lowercased, and every character outside `0-9`, `a-z`, `-` and the
/// Hangul syllable block becomes a hyphen. Hyphen runs collapse to one and
/// leading or trailing hyphens are dropped.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut push = |c: char| {
        let c = if c.is_ascii_digit()
            || c.is_ascii_lowercase()
            || is_hangul_syllable(c)
        {
            c
        } else {
            '-'
        };
        if c == '-' && (out.is_empty() || out.ends_with('-')) {
            return;
        }
        out.push(c);
    };

    for c in text.chars() {
        if is_hangul_syllable(c) {
            push(c);
            continue;
        }
        for decomposed in std::iter::once(c).nfkd() {
            decomposed.to_lowercase().for_each(&mut push);
        }
    }

    out.truncate(out.trim_end_matches('-').len());
    out
}

/// Where a document lives, which decides how its URL is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin<'a> {
    /// A file under the posts directory, identified by its filename stem.
    Post { stem: &'a str },
    /// A file under `_<name>/`, with its extension-less path relative to
    /// that directory (`/`-separated).
    Collection {
        name: &'a str,
        relative_path: &'a str,
    },
}

/// Resolves permalinks, given the URL patterns configured per collection.
#[derive(Debug, Clone, Default)]
pub struct PermalinkResolver {
    patterns: Vec<(String, String)>,
}

impl PermalinkResolver {
    /// `patterns` maps collection names to their configured permalink pattern.
    pub fn new(patterns: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    fn pattern_for(&self, collection: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, pattern)| pattern.as_str())
    }

    /// The URL of a document. An explicit `permalink` always wins.
    pub fn resolve(
        &self,
        origin: Origin<'_>,
        meta: &Mapping,
        date: &ResolvedDate,
    ) -> String {
        if let Some(explicit) = fields::text(meta, fields::PERMALINK) {
            return explicit;
        }

        let url = match origin {
            Origin::Post { stem } => post_url(stem, meta, date),
            Origin::Collection {
                name,
                relative_path,
            } => collection_url(name, relative_path, self.pattern_for(name)),
        };
        trace!(%url, "derived permalink");
        url
    }
}

/// Split `YYYY-MM-DD-rest`. The date parts must be digits.
fn split_dated_stem(stem: &str) -> Option<(&str, &str, &str, &str)> {
    let mut parts = stem.splitn(4, '-');
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    let rest = parts.next()?;

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    (digits(year) && digits(month) && digits(day))
        .then_some((year, month, day, rest))
}

/// `/<category slugs>/YYYY/MM/DD/<slug>.html`.
pub fn post_url(stem: &str, meta: &Mapping, date: &ResolvedDate) -> String {
    let (year, month, day, slug_source) = match split_dated_stem(stem) {
        Some((y, m, d, rest)) => {
            (y.to_string(), m.to_string(), d.to_string(), rest)
        }
        None => (
            format!("{:04}", date.year()),
            format!("{:02}", date.month()),
            format!("{:02}", date.day()),
            stem,
        ),
    };

    let preferred = fields::text(meta, fields::SLUG)
        .or_else(|| fields::text(meta, fields::TITLE))
        .unwrap_or_else(|| slug_source.to_string());
    let mut slug = slugify(&preferred);
    if slug.is_empty() {
        slug = slugify(slug_source);
    }
    if slug.is_empty() {
        slug = FALLBACK_SLUG.to_string();
    }

    let mut segments: Vec<String> = fields::string_list(meta, fields::CATEGORIES)
        .iter()
        .map(|c| slugify(c))
        .filter(|c| !c.is_empty())
        .collect();
    segments.extend([year, month, day, slug]);

    format!("/{}{OUTPUT_EXT}", segments.join("/"))
}

/// Substitute `:collection`, `:path`, `:name`, `:slug` and `:output_ext`
/// into the collection's pattern, defaulting to `/<collection>/:path/`.
pub fn collection_url(
    collection: &str,
    relative_path: &str,
    pattern: Option<&str>,
) -> String {
    let default_pattern;
    let pattern = match pattern.filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => {
            default_pattern = format!("/{collection}/:path/");
            &default_pattern
        }
    };

    let name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let replacements = [
        (":collection", collection.to_string()),
        (":path", relative_path.to_string()),
        (":name", name.to_string()),
        (":slug", slugify(name)),
        (":output_ext", OUTPUT_EXT.to_string()),
    ];

    let mut url = pattern.to_string();
    for (token, value) in &replacements {
        url = url.replace(token, value);
    }
    if !url.starts_with('/') {
        url.insert(0, '/');
    }
    url
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;

    fn meta(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> ResolvedDate {
        ResolvedDate::Naive(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Zero-Copy I/O!!"), "zero-copy-i-o");
    }

    #[test]
    fn slugify_handles_whitespace_and_underscores() {
        assert_eq!(slugify("  snake_case   and\ttabs "), "snake-case-and-tabs");
    }

    #[test]
    fn slugify_keeps_hangul() {
        assert_eq!(slugify("리눅스 커널 eBPF"), "리눅스-커널-ebpf");
    }

    #[test]
    fn slugify_decomposes_accents() {
        assert_eq!(slugify("Café"), "cafe");
        assert_eq!(slugify("ﬁle"), "file");
    }

    #[test]
    fn slugify_of_symbols_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn explicit_permalink_wins() {
        let resolver = PermalinkResolver::default();
        let m = meta("permalink: /custom/here/\ntitle: Ignored");
        let url = resolver.resolve(
            Origin::Post {
                stem: "not-a-dated-name",
            },
            &m,
            &date(2024, 1, 1),
        );
        assert_eq!(url, "/custom/here/");
    }

    #[test]
    fn post_uses_filename_date_and_title() {
        let m = meta("title: Zero-Copy I/O!!\ncategories: [Linux, Network Stack]");
        assert_eq!(
            post_url("2024-03-05-zero-copy", &m, &date(1999, 1, 1)),
            "/linux/network-stack/2024/03/05/zero-copy-i-o.html"
        );
    }

    #[test]
    fn slug_field_beats_title() {
        let m = meta("title: Long Title\nslug: short");
        assert_eq!(
            post_url("2024-03-05-whatever", &m, &date(1999, 1, 1)),
            "/2024/03/05/short.html"
        );
    }

    #[test]
    fn undated_filename_falls_back_to_date() {
        let m = meta("draft: true");
        assert_eq!(
            post_url("my-notes", &m, &date(2023, 7, 9)),
            "/2023/07/09/my-notes.html"
        );
    }

    #[test]
    fn non_digit_prefix_is_not_a_date() {
        let m = meta("draft: true");
        assert_eq!(
            post_url("aaaa-bb-cc-title", &m, &date(2023, 7, 9)),
            "/2023/07/09/aaaa-bb-cc-title.html"
        );
    }

    #[test]
    fn empty_slug_falls_back_to_source_then_literal() {
        let m = meta("title: '!!!'");
        assert_eq!(
            post_url("2024-01-02-hello", &m, &date(1999, 1, 1)),
            "/2024/01/02/hello.html"
        );
        assert_eq!(
            post_url("2024-01-02-???", &m, &date(1999, 1, 1)),
            "/2024/01/02/post.html"
        );
    }

    #[test]
    fn collection_default_pattern() {
        assert_eq!(
            collection_url("knowledge-base", "network/ebpf-intro", None),
            "/knowledge-base/network/ebpf-intro/"
        );
    }

    #[test]
    fn collection_tokens_are_substituted() {
        let resolver = PermalinkResolver::new([(
            "tutorials".to_string(),
            ":collection/:slug:output_ext".to_string(),
        )]);
        let url = resolver.resolve(
            Origin::Collection {
                name: "tutorials",
                relative_path: "rust/My_Guide",
            },
            &meta("title: x"),
            &date(2024, 1, 1),
        );
        assert_eq!(url, "/tutorials/my-guide.html");
    }

    #[test]
    fn collection_name_token() {
        assert_eq!(
            collection_url("til", "a/b/Entry", Some("/til/:name/")),
            "/til/Entry/"
        );
    }

    proptest! {
        #[test]
        fn slug_alphabet(text in "\\PC{0,80}") {
            let slug = slugify(&text);
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert!(slug.chars().all(|c| c.is_ascii_digit()
                || c.is_ascii_lowercase()
                || c == '-'
                || is_hangul_syllable(c)));
        }
    }
}
