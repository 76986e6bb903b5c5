use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::recipe::{Recipe, RecipeId};
use crate::utils::validation::check_recipe_limit;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("{0}")]
    TooManyEntries(String),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    pub recipes: Vec<Recipe>,
}

/// The recipe catalog, in insertion order, indexed by id
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,

    /// Index: recipe ID -> index in recipes vec
    id_to_index: HashMap<RecipeId, usize>,
}

impl RecipeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }

    /// Load the embedded default catalog
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/recipes.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            tracing::warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION,
                data.version
            );
        }

        Self::from_recipes(data.recipes)
    }

    /// Build a catalog from already-parsed recipes, enforcing the size limit
    pub fn from_recipes(recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for recipe in recipes {
            if let Some(msg) = check_recipe_limit(catalog.len()) {
                return Err(CatalogError::TooManyEntries(msg));
            }
            catalog.add_recipe(recipe);
        }
        Ok(catalog)
    }

    /// Add a recipe. A recipe whose id is already present is skipped.
    pub fn add_recipe(&mut self, recipe: Recipe) -> bool {
        if self.id_to_index.contains_key(&recipe.id) {
            tracing::warn!("Duplicate recipe id '{}' skipped", recipe.id);
            return false;
        }
        self.id_to_index.insert(recipe.id.clone(), self.recipes.len());
        self.recipes.push(recipe);
        true
    }

    /// Get a recipe by ID
    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.id_to_index.get(id).map(|&idx| &self.recipes[idx])
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    /// Export catalog to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            recipes: self.recipes.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of recipes in catalog
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl Default for RecipeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a RecipeCatalog {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = RecipeCatalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_catalog_get_by_id() {
        let catalog = RecipeCatalog::load_embedded().unwrap();

        let recipe = catalog.get(&RecipeId::new("buta_shogayaki"));
        assert!(recipe.is_some());
        let recipe = recipe.unwrap();
        assert_eq!(recipe.title, "豚の生姜焼き");
        assert!(!recipe.required_ingredients.is_empty());
    }

    #[test]
    fn test_catalog_get_nonexistent() {
        let catalog = RecipeCatalog::load_embedded().unwrap();
        assert!(catalog.get(&RecipeId::new("nonexistent_recipe")).is_none());
    }

    #[test]
    fn test_catalog_to_json() {
        let catalog = RecipeCatalog::load_embedded().unwrap();
        let json = catalog.to_json().unwrap();

        assert!(json.contains("\"version\""));
        assert!(json.contains("\"recipes\""));
        assert!(json.contains("buta_shogayaki"));

        let reloaded = RecipeCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), catalog.len());
    }

    #[test]
    fn test_add_recipe_skips_duplicates() {
        let mut catalog = RecipeCatalog::new();
        assert_eq!(catalog.len(), 0);

        assert!(catalog.add_recipe(Recipe::new("a", "First")));
        assert!(!catalog.add_recipe(Recipe::new("a", "Second")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&RecipeId::new("a")).unwrap().title, "First");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let catalog = RecipeCatalog::from_recipes(vec![
            Recipe::new("z", "Z"),
            Recipe::new("a", "A"),
            Recipe::new("m", "M"),
        ])
        .unwrap();
        let ids: Vec<&str> = catalog.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_recipe_without_ingredient_lists() {
        let json = r#"{"version": "1.0.0", "recipes": [{"id": "x", "title": "X"}]}"#;
        let catalog = RecipeCatalog::from_json(json).unwrap();
        let recipe = catalog.get(&RecipeId::new("x")).unwrap();
        assert!(recipe.required_ingredients.is_empty());
        assert!(recipe.optional_ingredients.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            RecipeCatalog::from_json("{not json"),
            Err(CatalogError::ParseError(_))
        ));
    }
}
