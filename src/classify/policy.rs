use serde::Deserialize;

use super::language::LanguageHeuristic;

/// Subcategory assigned when no domain clears its threshold.
pub const FALLBACK_SUBCATEGORY: &str = "general-tech";

/// Layout every classified document is switched to.
pub const KNOWLEDGE_BASE_LAYOUT: &str = "knowledge-base";

/// Extra matches demanded from mostly-English text.
pub const DEFAULT_ENGLISH_OFFSET: usize = 3;

/// How domains are picked from the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyVersion {
    /// Weighted keyword scores against per-domain thresholds.
    #[default]
    Scored,
    /// First domain in table order with any whole-word keyword hit.
    /// Thresholds and language bias are ignored.
    FirstMatch,
}

/// What happens when two qualifying domains have the same score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The earlier domain in table order keeps the win.
    #[default]
    KeepFirst,
    /// A later domain with an equal score takes over.
    PreferLater,
}

impl TieBreak {
    pub fn replaces(self, candidate: usize, best: usize) -> bool {
        match self {
            Self::KeepFirst => candidate > best,
            Self::PreferLater => candidate >= best,
        }
    }
}

/// Every knob on which classifier revisions have disagreed, in one place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassificationPolicy {
    pub version: PolicyVersion,
    pub language: LanguageHeuristic,
    pub english_offset: usize,
    pub tie_break: TieBreak,
    pub fallback_subcategory: String,
    pub layout: String,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            version: PolicyVersion::default(),
            language: LanguageHeuristic::default(),
            english_offset: DEFAULT_ENGLISH_OFFSET,
            tie_break: TieBreak::default(),
            fallback_subcategory: FALLBACK_SUBCATEGORY.to_string(),
            layout: KNOWLEDGE_BASE_LAYOUT.to_string(),
        }
    }
}
