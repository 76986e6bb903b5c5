//! Providers over request-body JSON, used by the web API.

use chrono::Utc;
use serde_json::Value;

use crate::catalog::store::RecipeCatalog;
use crate::core::ingredient::Normalizer;
use crate::core::pantry::PantryEntry;
use crate::core::recipe::Recipe;
use crate::matching::preference::Preferences;
use crate::parsing::payload::{parse_inventory_payload, parse_preferences_document};
use crate::providers::{InventoryProvider, PreferenceProvider, ProviderError, RecipeProvider};

/// Inventory rows as sent by a client: names or loose objects
#[derive(Debug, Clone, Default)]
pub struct InlineInventory(pub Vec<Value>);

impl InventoryProvider for InlineInventory {
    fn inventory(&self) -> Result<Vec<PantryEntry>, ProviderError> {
        Ok(parse_inventory_payload(&self.0)?)
    }
}

/// A recipe list sent with the request; the recipe limit still applies
#[derive(Debug, Clone, Default)]
pub struct InlineRecipes(pub Vec<Recipe>);

impl RecipeProvider for InlineRecipes {
    fn recipes(&self) -> Result<RecipeCatalog, ProviderError> {
        Ok(RecipeCatalog::from_recipes(self.0.clone())?)
    }
}

/// A recommender document sent with the request
#[derive(Debug, Clone)]
pub struct InlinePreferences {
    document: Value,
    normalizer: Normalizer,
}

impl InlinePreferences {
    pub fn new(document: Value, normalizer: Normalizer) -> Self {
        Self {
            document,
            normalizer,
        }
    }
}

impl PreferenceProvider for InlinePreferences {
    fn preferences(&self, catalog: &RecipeCatalog) -> Result<Preferences, ProviderError> {
        Ok(parse_preferences_document(
            &self.document,
            catalog,
            &self.normalizer,
            Utc::now(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::RecipeId;

    #[test]
    fn test_inline_inventory() {
        let rows = serde_json::json!(["egg", {"food_name": "milk", "quantity": 200}, 42]);
        let inventory = InlineInventory(rows.as_array().unwrap().clone())
            .inventory()
            .unwrap();
        // Non-name rows are skipped
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory[1].name, "milk");
        assert!((inventory[1].quantity - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_inline_recipes_drop_duplicate_ids() {
        let recipes = InlineRecipes(vec![Recipe::new("a", "A"), Recipe::new("a", "dup")]);
        let catalog = recipes.recipes().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&RecipeId::new("a")).unwrap().title, "A");
    }

    #[test]
    fn test_inline_preferences() {
        let catalog = RecipeCatalog::load_embedded().unwrap();
        let document = serde_json::json!({"results": [
            {"recipe_id": "nikujaga", "preference_score": 0.9, "is_boosted": true}
        ]});
        let prefs = InlinePreferences::new(document, Normalizer::default())
            .preferences(&catalog)
            .unwrap();
        assert!(prefs.is_boosted(&RecipeId::new("nikujaga")));
    }
}
