use regex::Regex;

use crate::error::Result;

/// Case-insensitive whole-word matcher for a single term.
///
/// A term only matches when it is not glued to a longer word: `react`
/// matches in "use react here" but not in "reaction". Boundaries are only
/// enforced on sides where the term itself ends in a word character, so
/// terms such as `c++` or `.net` still match next to punctuation.
///
/// Word boundaries are Unicode-aware, so a Korean particle attached to a
/// term (`eBPF를`, `kafka의`) counts as part of the word and blocks the match.
#[derive(Debug, Clone)]
pub struct WordPattern {
    term: String,
    regex: Regex,
}

impl WordPattern {
    pub fn new(term: &str) -> Result<Self> {
        let regex = Regex::new(&pattern_for(term))?;
        Ok(Self {
            term: term.to_string(),
            regex,
        })
    }

    /// The term as it was given, display casing preserved.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Number of non-overlapping whole-word occurrences in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn pattern_for(term: &str) -> String {
    let escaped = regex::escape(term);
    let head = if term.chars().next().is_some_and(is_word_char) {
        r"\b"
    } else {
        ""
    };
    let tail = if term.chars().next_back().is_some_and(is_word_char) {
        r"\b"
    } else {
        ""
    };
    format!("(?i){head}{escaped}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attached_particle_blocks_match() {
        let p = WordPattern::new("kafka").unwrap();
        assert_eq!(p.count("kafka의 파티션"), 0);
        assert_eq!(p.count("kafka 파티션"), 1);
    }

    #[test]
    fn rejects_substring_of_longer_word() {
        let p = WordPattern::new("react").unwrap();
        assert_eq!(p.count("a chemical reaction"), 0);
        assert_eq!(p.count("preact is not react "), 1);
    }

    #[test]
    fn matches_case_insensitively() {
        let p = WordPattern::new("eBPF").unwrap();
        assert_eq!(p.count("EBPF and ebpf and eBPF"), 3);
    }

    #[test]
    fn hyphenated_and_underscored_terms() {
        let io = WordPattern::new("io_uring").unwrap();
        assert!(io.is_match("using io_uring for disk I/O"));
        assert!(!io.is_match("io_uring_setup"));

        let zc = WordPattern::new("zero-copy").unwrap();
        assert!(zc.is_match("a zero-copy path"));
    }

    #[test]
    fn punctuation_edges_need_no_boundary() {
        let p = WordPattern::new("c++").unwrap();
        assert!(p.is_match("modern c++, templates"));
    }

    #[test]
    fn term_keeps_display_casing() {
        assert_eq!(WordPattern::new("PyTorch").unwrap().term(), "PyTorch");
    }
}
