//! Preference signals supplied by an external recommender.
//!
//! A recommender may provide a user preference vector with one label per
//! dimension, per-recipe signals, or both. Either one switches a recipe to
//! preference-boosted scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::store::RecipeCatalog;
use crate::core::recipe::{MissingIngredient, Recipe, RecipeId};

/// Decay rate per day for history-derived profiles
pub const HISTORY_DECAY_PER_DAY: f64 = 0.05;

/// Feature labels used by the embedded catalog
pub const FEATURE_LABELS: [&str; 12] = [
    "和食",
    "洋食",
    "中華",
    "主菜",
    "副菜",
    "肉類",
    "魚介類",
    "ベジタリアン",
    "複合",
    "辛味",
    "煮込み",
    "揚げ物",
];

/// [`FEATURE_LABELS`] as owned strings
pub fn default_labels() -> Vec<String> {
    FEATURE_LABELS.iter().map(|s| (*s).to_string()).collect()
}

/// A user's taste profile, one weight per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub labels: Vec<String>,
    pub vector: Vec<f64>,
}

impl PreferenceProfile {
    /// Pair labels with weights by index. Entries past the shorter side are
    /// dropped.
    pub fn new(labels: Vec<String>, vector: Vec<f64>) -> Self {
        let len = labels.len().min(vector.len());
        if labels.len() != vector.len() {
            tracing::warn!(
                "preference labels ({}) and vector ({}) differ in length; using first {}",
                labels.len(),
                vector.len(),
                len
            );
        }
        let mut labels = labels;
        let mut vector = vector;
        labels.truncate(len);
        vector.truncate(len);
        Self { labels, vector }
    }

    /// The recipe's features read in label order
    pub fn recipe_vector(&self, recipe: &Recipe) -> Vec<f64> {
        self.labels
            .iter()
            .map(|label| recipe.features.get(label).copied().unwrap_or(0.0))
            .collect()
    }

    /// Cosine similarity between the profile and the recipe's features
    pub fn score_recipe(&self, recipe: &Recipe) -> f64 {
        cosine_similarity(&self.vector, &self.recipe_vector(recipe))
    }

    /// Build a profile from cooking history.
    ///
    /// Each cooked recipe contributes its feature vector weighted by
    /// `exp(-0.05 * days_ago)`. Returns `None` when no record resolves to a
    /// catalog recipe.
    pub fn from_history(
        labels: Vec<String>,
        history: &[CookingRecord],
        catalog: &RecipeCatalog,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let mut total = vec![0.0; labels.len()];
        let mut total_weight = 0.0;
        let shape = Self {
            labels,
            vector: Vec::new(),
        };

        for record in history {
            let Some(recipe) = catalog.get(&record.recipe_id) else {
                continue;
            };
            #[allow(clippy::cast_precision_loss)] // Seconds since an event fit f64
            let days = (now - record.completed_at).num_seconds() as f64 / 86_400.0;
            let weight = (-HISTORY_DECAY_PER_DAY * days).exp();
            for (slot, value) in total.iter_mut().zip(shape.recipe_vector(recipe)) {
                *slot += value * weight;
            }
            total_weight += weight;
        }

        if total_weight <= 0.0 {
            return None;
        }

        let vector = total.into_iter().map(|v| v / total_weight).collect();
        Some(Self {
            labels: shape.labels,
            vector,
        })
    }
}

/// One completed cooking of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingRecord {
    pub recipe_id: RecipeId,
    pub completed_at: DateTime<Utc>,
}

/// Per-recipe output of the recommendation provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSignal {
    pub recipe_id: RecipeId,

    /// Explicit preference score; overrides a profile-derived one
    pub preference_score: Option<f64>,

    /// Freshness boost flag, carried through unchanged
    pub is_boosted: bool,

    /// Shortages the provider reported
    pub missing: Vec<MissingIngredient>,
}

impl RecommendationSignal {
    pub fn new(recipe_id: RecipeId) -> Self {
        Self {
            recipe_id,
            preference_score: None,
            is_boosted: false,
            missing: Vec::new(),
        }
    }
}

/// Everything the recommender told us for one scoring pass
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    pub profile: Option<PreferenceProfile>,
    pub signals: HashMap<RecipeId, RecommendationSignal>,
}

impl Preferences {
    pub fn with_profile(profile: PreferenceProfile) -> Self {
        Self {
            profile: Some(profile),
            signals: HashMap::new(),
        }
    }

    pub fn add_signal(&mut self, signal: RecommendationSignal) {
        self.signals.insert(signal.recipe_id.clone(), signal);
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.signals.is_empty()
    }

    /// Signal score first, then the profile; `None` means local mode
    pub fn preference_score_for(&self, recipe: &Recipe) -> Option<f64> {
        self.signals
            .get(&recipe.id)
            .and_then(|s| s.preference_score)
            .or_else(|| self.profile.as_ref().map(|p| p.score_recipe(recipe)))
    }

    pub fn is_boosted(&self, id: &RecipeId) -> bool {
        self.signals.get(id).is_some_and(|s| s.is_boosted)
    }

    pub fn signal(&self, id: &RecipeId) -> Option<&RecommendationSignal> {
        self.signals.get(id)
    }
}

/// Cosine similarity of two equal-length vectors; 0.0 if either norm is 0.
/// Extra entries in the longer vector are ignored.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let len = a.len().min(b.len());
    let norm_a = a[..len].iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b[..len].iter().map(|x| x * x).sum::<f64>().sqrt();
    let denominator = norm_a * norm_b;
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}
