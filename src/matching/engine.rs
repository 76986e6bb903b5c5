use crate::catalog::store::RecipeCatalog;
use crate::core::ingredient::Normalizer;
use crate::core::pantry::Pantry;
use crate::core::recipe::{MissingIngredient, Recipe, RecipeId};
use crate::core::types::{ScoringMode, SortKey};
use crate::matching::matcher::{match_recipe, MatchResult};
use crate::matching::preference::{Preferences, RecommendationSignal};
use crate::matching::ranking::{rank, RecipeFilter};
use crate::matching::scoring::{ScoredRecipe, ScoringWeights};
use crate::matching::staples::StaplesPolicy;

/// Configuration for the matching engine
#[derive(Debug, Clone, Default)]
pub struct MatchingConfig {
    /// Weights for both scoring formulas
    pub weights: ScoringWeights,
    /// Ingredients assumed always on hand
    pub staples: StaplesPolicy,
    /// Canonicalization used for pantry, recipes, staples, and filters
    pub normalizer: Normalizer,
}

impl MatchingConfig {
    /// Defaults with no staples assumed
    pub fn without_staples() -> Self {
        Self {
            staples: StaplesPolicy::none(),
            ..Self::default()
        }
    }
}

/// The main matching engine
///
/// Holds no state between calls; every pass recomputes matches from the
/// pantry snapshot it is given.
pub struct MatchingEngine<'a> {
    catalog: &'a RecipeCatalog,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(catalog: &'a RecipeCatalog) -> Self {
        Self {
            catalog,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(catalog: &'a RecipeCatalog, config: MatchingConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.config.normalizer
    }

    /// Match one recipe without scoring it
    pub fn match_one(&self, recipe: &Recipe, pantry: &Pantry) -> MatchResult {
        match_recipe(recipe, pantry, &self.config.staples, &self.config.normalizer)
    }

    /// Look up a catalog recipe by id and match it
    pub fn match_by_id(&self, id: &RecipeId, pantry: &Pantry) -> Option<MatchResult> {
        self.catalog.get(id).map(|recipe| self.match_one(recipe, pantry))
    }

    /// Match and score every catalog recipe, in catalog order
    pub fn score_all(&self, pantry: &Pantry, preferences: &Preferences) -> Vec<ScoredRecipe> {
        let scored: Vec<ScoredRecipe> = self
            .catalog
            .iter()
            .map(|recipe| self.score_one(recipe, pantry, preferences))
            .collect();

        let boosted = scored
            .iter()
            .filter(|s| s.mode == ScoringMode::PreferenceBoosted)
            .count();
        tracing::debug!(
            "scored {} recipes against {} pantry items ({} preference-boosted)",
            scored.len(),
            pantry.len(),
            boosted
        );
        scored
    }

    fn score_one(&self, recipe: &Recipe, pantry: &Pantry, preferences: &Preferences) -> ScoredRecipe {
        let mut result = self.match_one(recipe, pantry);
        if let Some(signal) = preferences.signal(&recipe.id) {
            attach_reported_shortages(&mut result.missing, signal, &self.config.normalizer);
        }
        ScoredRecipe::new(
            result,
            &self.config.weights,
            preferences.preference_score_for(recipe),
            preferences.is_boosted(&recipe.id),
        )
    }

    /// Run the whole pipeline: match, score, filter, sort, limit
    pub fn suggest(
        &self,
        pantry: &Pantry,
        preferences: &Preferences,
        filter: &RecipeFilter,
        sort: SortKey,
    ) -> Vec<ScoredRecipe> {
        let scored = self.score_all(pantry, preferences);
        let ranked = rank(&scored, filter, sort, &self.config.normalizer);
        tracing::debug!("returning {} suggestions", ranked.len());
        ranked
    }
}

/// Fill unknown shortage amounts from what the provider reported
fn attach_reported_shortages(
    missing: &mut [MissingIngredient],
    signal: &RecommendationSignal,
    normalizer: &Normalizer,
) {
    if signal.missing.is_empty() {
        return;
    }
    for entry in missing.iter_mut().filter(|m| m.shortage_amount.is_none()) {
        let reported = signal
            .missing
            .iter()
            .find(|r| r.shortage_amount.is_some() && normalizer.normalize(r.name.as_str()) == entry.name)
            .and_then(|r| r.shortage_amount);
        entry.shortage_amount = reported;
    }
}
