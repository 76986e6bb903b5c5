//! Core data types for pantry-to-recipe matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`IngredientName`]: A canonical ingredient name produced by the [`Normalizer`]
//! - [`PantryEntry`], [`Pantry`]: The user's inventory and its normalized snapshot
//! - [`Recipe`], [`RecipeId`]: A candidate recipe from the catalog
//! - [`MissingIngredient`]: A required ingredient the pantry lacks
//! - [`SortKey`], [`ScoringMode`]: Ranking and scoring classification types
//!
//! ## Ingredient Names
//!
//! Inventories and recipe sources spell the same food in different ways:
//!
//! | Raw input        | Normalized |
//! |------------------|------------|
//! | `タマネギ`         | `玉ねぎ`     |
//! | `玉葱（大）`        | `玉ねぎ`     |
//! | `  Onions `      | `onion`    |
//! | `ＳＡＬＴ`         | `salt`     |
//!
//! Normalization folds width and case, strips parenthetical notes, and then
//! consults a static alias table. Names are only ever compared in normalized
//! form.
//!
//! [`IngredientName`]: ingredient::IngredientName
//! [`Normalizer`]: ingredient::Normalizer
//! [`PantryEntry`]: pantry::PantryEntry
//! [`Pantry`]: pantry::Pantry
//! [`Recipe`]: recipe::Recipe
//! [`RecipeId`]: recipe::RecipeId
//! [`MissingIngredient`]: recipe::MissingIngredient
//! [`SortKey`]: types::SortKey
//! [`ScoringMode`]: types::ScoringMode

pub mod ingredient;
pub mod pantry;
pub mod recipe;
pub mod types;
