use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::ingredient::{fold, IngredientName, Normalizer};
use crate::core::types::SortKey;
use crate::matching::scoring::ScoredRecipe;
use crate::utils::validation::{clamp_max_missing, clamp_unit};

/// User-selected filters. All predicates are AND-combined; unset ones pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeFilter {
    /// Substring of the title or of any ingredient name
    pub keyword: Option<String>,

    /// Drop recipes that use any of these (required or optional)
    #[serde(alias = "excludeIngredients")]
    pub exclude_ingredients: Vec<String>,

    #[serde(alias = "canMakeOnly")]
    pub can_make_only: bool,

    /// Inclusive upper bound on missing ingredients; negative clamps to 0
    #[serde(alias = "maxMissing")]
    pub max_missing: Option<i64>,

    #[serde(alias = "maxPrepMinutes")]
    pub max_prep_minutes: Option<u32>,

    #[serde(alias = "maxCalories")]
    pub max_calories: Option<u32>,

    /// Minimum coverage, clamped to [0, 1]
    #[serde(alias = "minCoverage")]
    pub min_coverage: Option<f64>,

    /// Keep at most this many results after sorting
    pub limit: Option<usize>,
}

impl RecipeFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Resolve raw filter inputs once for a whole ranking pass
    fn prepare(&self, normalizer: &Normalizer) -> PreparedFilter {
        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| {
                let folded = fold(k);
                let resolved = normalizer.normalize(k).as_str().to_string();
                let mut needles = vec![folded];
                if !needles.contains(&resolved) {
                    needles.push(resolved);
                }
                needles
            });

        let excluded = self
            .exclude_ingredients
            .iter()
            .map(|n| normalizer.normalize(n))
            .filter(|n| !n.is_empty())
            .collect();

        PreparedFilter {
            keyword,
            excluded,
            can_make_only: self.can_make_only,
            max_missing: self.max_missing.map(clamp_max_missing),
            max_prep_minutes: self.max_prep_minutes,
            max_calories: self.max_calories,
            min_coverage: self.min_coverage.map(clamp_unit),
        }
    }
}

struct PreparedFilter {
    keyword: Option<Vec<String>>,
    excluded: Vec<IngredientName>,
    can_make_only: bool,
    max_missing: Option<usize>,
    max_prep_minutes: Option<u32>,
    max_calories: Option<u32>,
    min_coverage: Option<f64>,
}

impl PreparedFilter {
    fn accepts(&self, scored: &ScoredRecipe) -> bool {
        let result = &scored.result;

        if self.can_make_only && !result.can_make {
            return false;
        }
        if self
            .max_missing
            .is_some_and(|max| result.missing.len() > max)
        {
            return false;
        }
        if self.min_coverage.is_some_and(|min| result.coverage < min) {
            return false;
        }
        if !self.excluded.is_empty() && result.uses_any(&self.excluded) {
            return false;
        }
        // Recipes that don't state a time or calorie count pass
        if let (Some(max), Some(minutes)) = (self.max_prep_minutes, result.recipe.prep_time_minutes) {
            if minutes > max {
                return false;
            }
        }
        if let (Some(max), Some(kcal)) = (self.max_calories, result.recipe.calories) {
            if kcal > max {
                return false;
            }
        }
        if let Some(needles) = &self.keyword {
            if !matches_keyword(scored, needles) {
                return false;
            }
        }
        true
    }
}

fn matches_keyword(scored: &ScoredRecipe, needles: &[String]) -> bool {
    let title = fold(&scored.result.recipe.title);
    needles.iter().any(|needle| {
        title.contains(needle.as_str())
            || scored
                .result
                .required
                .iter()
                .chain(&scored.result.optional)
                .any(|name| name.as_str().contains(needle.as_str()))
    })
}

/// Filter, sort, then apply the limit. The input is left untouched; the sort is stable, so
/// equal keys keep their input order.
pub fn rank(
    scored: &[ScoredRecipe],
    filter: &RecipeFilter,
    sort: SortKey,
    normalizer: &Normalizer,
) -> Vec<ScoredRecipe> {
    let prepared = filter.prepare(normalizer);
    let mut kept: Vec<ScoredRecipe> = scored
        .iter()
        .filter(|s| prepared.accepts(s))
        .cloned()
        .collect();

    tracing::debug!(
        "filter kept {} of {} recipes; sorting by {}",
        kept.len(),
        scored.len(),
        sort
    );

    sort_recipes(&mut kept, sort);
    if let Some(limit) = filter.limit {
        kept.truncate(limit);
    }
    kept
}

/// Stable in-place sort by one key
pub fn sort_recipes(recipes: &mut [ScoredRecipe], sort: SortKey) {
    match sort {
        SortKey::Score => recipes.sort_by(|a, b| descending(a.score, b.score)),
        SortKey::Coverage => {
            recipes.sort_by(|a, b| descending(a.result.coverage, b.result.coverage));
        }
        SortKey::Missing => recipes.sort_by_key(ScoredRecipe::missing_count),
        SortKey::Title => recipes.sort_by_cached_key(|r| title_key(r.title())),
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Comparison key for titles: width- and case-folded, compared by code
/// point. There is no reading-based collation for kanji.
fn title_key(title: &str) -> String {
    fold(title)
}
