//! Seams to the external collaborators.
//!
//! The engine never performs I/O itself. Inventory, recipes, and
//! recommender output arrive through these traits, so callers can plug in
//! files, inline request bodies, or test doubles.

pub mod file;
pub mod memory;

use thiserror::Error;

use crate::catalog::store::{CatalogError, RecipeCatalog};
use crate::core::pantry::PantryEntry;
use crate::matching::preference::Preferences;
use crate::parsing::ParseError;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to read provider data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid provider JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Source of the user's current inventory
pub trait InventoryProvider: Send + Sync {
    fn inventory(&self) -> Result<Vec<PantryEntry>, ProviderError>;
}

/// Source of candidate recipes
pub trait RecipeProvider: Send + Sync {
    fn recipes(&self) -> Result<RecipeCatalog, ProviderError>;
}

/// Source of preference signals. The catalog is available for profiles
/// derived from cooking history.
pub trait PreferenceProvider: Send + Sync {
    fn preferences(&self, catalog: &RecipeCatalog) -> Result<Preferences, ProviderError>;
}
