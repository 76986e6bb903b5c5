use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::ingredient::IngredientName;

/// Unique identifier for a recipe in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate recipe from the catalog or recommendation provider.
///
/// A recipe without a `required_ingredients` list deserializes with an empty
/// one and is trivially makeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,

    pub title: String,

    /// Raw ingredient names, in recipe order. Repeats are kept.
    #[serde(default)]
    pub required_ingredients: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_ingredients: Vec<String>,

    /// Amount needed per required ingredient, keyed by raw name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub required_quantities: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,

    /// Taste/category features for preference scoring, keyed by label
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: RecipeId::new(id),
            title: title.into(),
            required_ingredients: Vec::new(),
            optional_ingredients: Vec::new(),
            required_quantities: BTreeMap::new(),
            prep_time_minutes: None,
            calories: None,
            features: BTreeMap::new(),
            image_url: None,
        }
    }

    #[must_use]
    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_ingredients = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_ingredients = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, name: impl Into<String>, amount: f64) -> Self {
        self.required_quantities.insert(name.into(), amount);
        self
    }

    #[must_use]
    pub fn with_feature(mut self, label: impl Into<String>, value: f64) -> Self {
        self.features.insert(label.into(), value);
        self
    }

    #[must_use]
    pub fn with_prep_time(mut self, minutes: u32) -> Self {
        self.prep_time_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_calories(mut self, kcal: u32) -> Self {
        self.calories = Some(kcal);
        self
    }
}

/// A required ingredient the pantry does not have.
///
/// Inventory and recommendation payloads report shortages in several shapes;
/// they are all folded into this one at the parsing boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingIngredient {
    pub name: IngredientName,

    /// Amount still needed, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortage_amount: Option<f64>,
}

impl MissingIngredient {
    pub fn new(name: IngredientName) -> Self {
        Self {
            name,
            shortage_amount: None,
        }
    }

    #[must_use]
    pub fn with_shortage(mut self, amount: f64) -> Self {
        self.shortage_amount = Some(amount);
        self
    }
}

impl std::fmt::Display for MissingIngredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shortage_amount {
            Some(amount) => write!(f, "{} ({amount:.1} short)", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
