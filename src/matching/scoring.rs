use serde::{Deserialize, Serialize};

use crate::core::types::ScoringMode;
use crate::matching::matcher::MatchResult;
use crate::utils::validation::count_to_f64;

/// Configurable weights for the two scoring formulas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Bonus per optional ingredient on hand (local mode)
    pub optional_weight: f64,
    /// Penalty per missing required ingredient (local mode)
    pub missing_penalty: f64,
    /// Weight for coverage (preference mode)
    pub coverage_weight: f64,
    /// Weight for the preference score (preference mode)
    pub preference_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            optional_weight: 0.05,
            missing_penalty: 0.01,
            coverage_weight: 0.7,
            preference_weight: 0.3,
        }
    }
}

/// Local-mode score: coverage plus an optional-ingredient bonus minus a
/// per-missing penalty.
#[must_use]
pub fn local_score(result: &MatchResult, weights: &ScoringWeights) -> f64 {
    result.coverage + weights.optional_weight * count_to_f64(result.optional_have_count)
        - weights.missing_penalty * count_to_f64(result.missing.len())
}

/// Preference-boosted score: weighted blend of coverage and an externally
/// derived preference score.
#[must_use]
pub fn boosted_score(result: &MatchResult, preference_score: f64, weights: &ScoringWeights) -> f64 {
    weights.coverage_weight * result.coverage + weights.preference_weight * preference_score
}

/// Score a match, picking the formula by whether a preference score exists.
#[must_use]
pub fn score(
    result: &MatchResult,
    weights: &ScoringWeights,
    preference_score: Option<f64>,
) -> (f64, ScoringMode) {
    match preference_score {
        Some(p) => (boosted_score(result, p, weights), ScoringMode::PreferenceBoosted),
        None => (local_score(result, weights), ScoringMode::Local),
    }
}

/// A match together with its ranking score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub result: MatchResult,

    pub score: f64,

    pub mode: ScoringMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_score: Option<f64>,

    /// Freshness boost flag from the recommendation provider, passed through
    pub is_boosted: bool,
}

impl ScoredRecipe {
    pub fn new(
        result: MatchResult,
        weights: &ScoringWeights,
        preference_score: Option<f64>,
        is_boosted: bool,
    ) -> Self {
        let (score, mode) = score(&result, weights, preference_score);
        Self {
            result,
            score,
            mode,
            preference_score,
            is_boosted,
        }
    }

    /// Score in local mode with no provider signals
    pub fn local(result: MatchResult, weights: &ScoringWeights) -> Self {
        Self::new(result, weights, None, false)
    }

    pub fn title(&self) -> &str {
        &self.result.recipe.title
    }

    pub fn missing_count(&self) -> usize {
        self.result.missing.len()
    }
}
