//! # pantry-match
//!
//! A library for matching a household pantry against a recipe catalog.
//!
//! Given what is on hand and a set of candidate recipes, it works out which
//! recipes can be cooked right now, which are one or two items short, and
//! ranks them so the most useful suggestions come first.
//!
//! ## Features
//!
//! - **Name normalization**: Width, case, parenthetical notes and spelling
//!   variants (玉ねぎ/たまねぎ/タマネギ) collapse to one canonical name
//! - **Staples**: Seasonings like salt and soy sauce never count as missing
//! - **Coverage scoring**: Bonus for optional ingredients, penalty per gap
//! - **Preference boost**: Blends in a recommender's preference vector or
//!   per-recipe scores when available
//! - **Filtering and sorting**: Keyword, exclusions, makeable-only, missing
//!   count, time, calories; sort by score, coverage, missing or title
//!
//! ## Example
//!
//! ```rust,no_run
//! use pantry_match::{MatchingEngine, Normalizer, Pantry, Preferences, RecipeCatalog, RecipeFilter, SortKey};
//!
//! let catalog = RecipeCatalog::load_embedded().unwrap();
//! let pantry = Pantry::from_names(["豚肉", "たまねぎ", "生姜"], &Normalizer::default());
//!
//! let engine = MatchingEngine::new(&catalog);
//! let ranked = engine.suggest(&pantry, &Preferences::default(), &RecipeFilter::default(), SortKey::Score);
//!
//! for s in ranked.iter().take(3) {
//!     println!("{}: {:.2} ({} missing)", s.title(), s.score, s.missing_count());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Ingredient names, pantry snapshots, recipes
//! - [`matching`]: Staples, matcher, scorer, ranking, and the engine
//! - [`catalog`]: Recipe catalog storage
//! - [`parsing`]: Pantry files and loosely-typed provider payloads
//! - [`providers`]: Inventory, recipe, and preference sources
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: JSON API server

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod providers;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::store::RecipeCatalog;
pub use core::ingredient::{IngredientName, Normalizer};
pub use core::pantry::{Pantry, PantryEntry};
pub use core::recipe::{MissingIngredient, Recipe, RecipeId};
pub use core::types::*;
pub use matching::preference::{PreferenceProfile, Preferences, RecommendationSignal};
pub use matching::{
    MatchResult, MatchingConfig, MatchingEngine, RecipeFilter, ScoredRecipe, ScoringWeights,
    StaplesPolicy,
};
