use std::collections::HashSet;

use crate::core::ingredient::{IngredientName, Normalizer};

/// Pantry staples assumed on hand in every kitchen.
pub const DEFAULT_STAPLES: &[&str] = &[
    "塩",
    "こしょう",
    "砂糖",
    "醤油",
    "みりん",
    "酒",
    "水",
    "油",
    "オリーブオイル",
    "だし",
    "salt",
    "pepper",
    "sugar",
    "soy sauce",
    "mirin",
    "sake",
    "water",
    "oil",
    "olive oil",
    "dashi",
];

/// Ingredients never reported as missing.
///
/// A required staple still counts toward a recipe's need and have counts; it
/// simply can't end up in the missing set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaplesPolicy {
    names: HashSet<IngredientName>,
}

impl StaplesPolicy {
    /// No staples: every absent ingredient is missing
    pub fn none() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    /// Build from raw names, normalized with `normalizer`
    pub fn from_names<I, S>(normalizer: &Normalizer, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| normalizer.normalize(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// The built-in staples, normalized with `normalizer`
    pub fn defaults(normalizer: &Normalizer) -> Self {
        Self::from_names(normalizer, DEFAULT_STAPLES)
    }

    /// Add more staples
    pub fn extend<I, S>(&mut self, normalizer: &Normalizer, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names.extend(
            names
                .into_iter()
                .map(|n| normalizer.normalize(n.as_ref()))
                .filter(|n| !n.is_empty()),
        );
    }

    pub fn contains(&self, name: &IngredientName) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StaplesPolicy {
    fn default() -> Self {
        Self::defaults(&Normalizer::default())
    }
}
