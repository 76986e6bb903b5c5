//! Pantry-to-recipe matching, scoring, and ranking.
//!
//! This module provides the core pipeline:
//!
//! - [`MatchingEngine`]: Main entry point running match, score, filter, sort
//! - [`MatchResult`]: Which required ingredients a recipe is missing
//! - [`ScoredRecipe`]: A match together with its ranking score
//! - [`RecipeFilter`]: User-selected filters applied before sorting
//!
//! ## Matching
//!
//! Every name (pantry, recipe, staple, filter) goes through the same
//! [`Normalizer`](crate::core::ingredient::Normalizer). A required
//! ingredient is satisfied when its canonical name is in the pantry or in
//! the [`StaplesPolicy`]. Optional ingredients never affect makeability.
//!
//! ## Scoring
//!
//! Two formulas, chosen per recipe:
//!
//! - **Local**: `coverage + optional_weight * optional_have - missing_penalty * missing`
//! - **Preference-boosted**: `coverage_weight * coverage + preference_weight * preference`
//!
//! The boosted formula applies when the recommender supplies a preference
//! score for the recipe, directly or through a preference profile.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pantry_match::{MatchingEngine, Pantry, RecipeCatalog, RecipeFilter, SortKey};
//! use pantry_match::matching::preference::Preferences;
//!
//! let catalog = RecipeCatalog::load_embedded().unwrap();
//! let engine = MatchingEngine::new(&catalog);
//! let pantry = Pantry::from_names(["豚肉", "玉ねぎ", "生姜"], engine.normalizer());
//!
//! let results = engine.suggest(&pantry, &Preferences::default(), &RecipeFilter::default(), SortKey::Score);
//!
//! for r in &results {
//!     println!("{}: {:.2} (missing {})", r.title(), r.score, r.missing_count());
//! }
//! ```

pub mod engine;
pub mod matcher;
pub mod preference;
pub mod ranking;
pub mod scoring;
pub mod staples;

pub use engine::{MatchingConfig, MatchingEngine};
pub use matcher::MatchResult;
pub use ranking::RecipeFilter;
pub use scoring::{ScoredRecipe, ScoringWeights};
pub use staples::StaplesPolicy;
