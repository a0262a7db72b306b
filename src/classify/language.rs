//! Decide whether a text is mostly English.
//!
//! Long English technical prose mentions many domain keywords in passing, so
//! the classifier demands more evidence from it. Two heuristics are
//! available; both treat empty text as English.

use serde::Deserialize;

/// Share of Hangul syllables below which text counts as English.
pub const DEFAULT_MAX_SCRIPT_RATIO: f64 = 0.05;

/// Share of Latin letters at or above which text counts as English.
pub const DEFAULT_MIN_LATIN_RATIO: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "heuristic", rename_all = "kebab-case")]
pub enum LanguageHeuristic {
    /// Hangul syllables divided by total character count.
    ScriptDensity {
        #[serde(default = "default_max_script_ratio")]
        max_ratio: f64,
    },
    /// Latin letters divided by non-whitespace character count.
    LatinRatio {
        #[serde(default = "default_min_latin_ratio")]
        min_ratio: f64,
    },
}

fn default_max_script_ratio() -> f64 {
    DEFAULT_MAX_SCRIPT_RATIO
}

fn default_min_latin_ratio() -> f64 {
    DEFAULT_MIN_LATIN_RATIO
}

impl Default for LanguageHeuristic {
    fn default() -> Self {
        Self::ScriptDensity {
            max_ratio: DEFAULT_MAX_SCRIPT_RATIO,
        }
    }
}

impl LanguageHeuristic {
    pub fn is_primarily_english(&self, text: &str) -> bool {
        match *self {
            Self::ScriptDensity { max_ratio } => match script_density(text) {
                Some(ratio) => ratio < max_ratio,
                None => true,
            },
            Self::LatinRatio { min_ratio } => match latin_ratio(text) {
                Some(ratio) => ratio >= min_ratio,
                None => true,
            },
        }
    }
}

pub fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Hangul syllables over all characters, `None` for empty text.
pub fn script_density(text: &str) -> Option<f64> {
    let (script, total) = text.chars().fold((0usize, 0usize), |(s, t), c| {
        (s + usize::from(is_hangul_syllable(c)), t + 1)
    });
    (total > 0).then(|| script as f64 / total as f64)
}

/// ASCII letters over non-whitespace characters, `None` when there are none.
pub fn latin_ratio(text: &str) -> Option<f64> {
    let (latin, visible) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(l, v), c| {
            (l + usize::from(c.is_ascii_alphabetic()), v + 1)
        });
    (visible > 0).then(|| latin as f64 / visible as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_english() {
        assert!(LanguageHeuristic::default().is_primarily_english(""));
        let latin = LanguageHeuristic::LatinRatio {
            min_ratio: DEFAULT_MIN_LATIN_RATIO,
        };
        assert!(latin.is_primarily_english("   \n "));
    }

    #[test]
    fn english_prose_is_english() {
        let text = "The kernel scheduler picks the next runnable task.";
        assert!(LanguageHeuristic::default().is_primarily_english(text));
        let latin = LanguageHeuristic::LatinRatio {
            min_ratio: DEFAULT_MIN_LATIN_RATIO,
        };
        assert!(latin.is_primarily_english(text));
    }

    #[test]
    fn korean_prose_is_not_english() {
        let text = "커널 스케줄러는 다음에 실행할 태스크를 고른다. eBPF";
        assert!(!LanguageHeuristic::default().is_primarily_english(text));
        let latin = LanguageHeuristic::LatinRatio {
            min_ratio: DEFAULT_MIN_LATIN_RATIO,
        };
        assert!(!latin.is_primarily_english(text));
    }

    #[test]
    fn density_threshold_is_exclusive() {
        // 1 syllable in 20 characters is exactly 5%.
        let text = format!("가{}", "a".repeat(19));
        assert_eq!(script_density(&text), Some(0.05));
        assert!(!LanguageHeuristic::default().is_primarily_english(&text));
    }

    #[test]
    fn latin_threshold_is_inclusive() {
        let latin = LanguageHeuristic::LatinRatio {
            min_ratio: DEFAULT_MIN_LATIN_RATIO,
        };

        // 8 letters in 10 visible characters is exactly 80%.
        let at = format!("{} 12", "a".repeat(8));
        assert_eq!(latin_ratio(&at), Some(0.80));
        assert!(latin.is_primarily_english(&at));

        let below = format!("{}{}", "a".repeat(79), "1".repeat(21));
        assert_eq!(latin_ratio(&below), Some(0.79));
        assert!(!latin.is_primarily_english(&below));
    }

    #[test]
    fn heuristic_deserializes_from_yaml() {
        let h: LanguageHeuristic =
            serde_yaml::from_str("heuristic: latin-ratio").unwrap();
        assert_eq!(
            h,
            LanguageHeuristic::LatinRatio {
                min_ratio: DEFAULT_MIN_LATIN_RATIO
            }
        );
    }
}
