//! File-backed providers used by the CLI.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::catalog::store::RecipeCatalog;
use crate::core::ingredient::Normalizer;
use crate::core::pantry::PantryEntry;
use crate::matching::preference::Preferences;
use crate::parsing::pantry::parse_pantry_file;
use crate::parsing::payload::parse_preferences_document;
use crate::providers::{InventoryProvider, PreferenceProvider, ProviderError, RecipeProvider};

/// Inventory read from a JSON, TSV, CSV, or plain-list file
#[derive(Debug, Clone)]
pub struct PantryFile {
    path: PathBuf,
}

impl PantryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventoryProvider for PantryFile {
    fn inventory(&self) -> Result<Vec<PantryEntry>, ProviderError> {
        Ok(parse_pantry_file(&self.path)?)
    }
}

/// Recipes from a catalog JSON file, or the embedded catalog when no path
/// is given
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    path: Option<PathBuf>,
}

impl CatalogSource {
    pub fn embedded() -> Self {
        Self { path: None }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// From an optional CLI path
    pub fn from_option(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl RecipeProvider for CatalogSource {
    fn recipes(&self) -> Result<RecipeCatalog, ProviderError> {
        let catalog = match &self.path {
            Some(path) => RecipeCatalog::load_from_file(path)?,
            None => RecipeCatalog::load_embedded()?,
        };
        tracing::debug!("loaded {} recipes", catalog.len());
        Ok(catalog)
    }
}

/// Recommender output saved as JSON
#[derive(Debug, Clone)]
pub struct PreferencesFile {
    path: PathBuf,
    normalizer: Normalizer,
}

impl PreferencesFile {
    pub fn new(path: impl Into<PathBuf>, normalizer: Normalizer) -> Self {
        Self {
            path: path.into(),
            normalizer,
        }
    }
}

impl PreferenceProvider for PreferencesFile {
    fn preferences(&self, catalog: &RecipeCatalog) -> Result<Preferences, ProviderError> {
        let content = std::fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Ok(parse_preferences_document(
            &value,
            catalog,
            &self.normalizer,
            Utc::now(),
        )?)
    }
}
