use serde::{Deserialize, Serialize};

/// Sort order for ranked results. Exactly one is active per ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest score first
    #[default]
    Score,
    /// Highest coverage first
    Coverage,
    /// Fewest missing ingredients first
    Missing,
    /// Folded title, ascending by code point. Not locale-aware: Japanese
    /// titles group by script block (kana before kanji), not by reading.
    Title,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score => write!(f, "score"),
            Self::Coverage => write!(f, "coverage"),
            Self::Missing => write!(f, "missing"),
            Self::Title => write!(f, "title"),
        }
    }
}

/// Which scoring formula produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Coverage plus optional bonus minus missing penalty
    Local,
    /// Weighted coverage plus weighted preference score
    PreferenceBoosted,
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::PreferenceBoosted => write!(f, "preference"),
        }
    }
}
