use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::core::ingredient::{IngredientName, Normalizer};

/// One item of the user's food inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryEntry {
    /// Raw item name as the inventory reports it
    pub name: String,

    /// Remaining amount, in `unit`
    #[serde(default)]
    pub quantity: f64,

    #[serde(default)]
    pub unit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl PantryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 0.0,
            unit: String::new(),
            expiration_date: None,
        }
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_expiration(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    /// True if the item expires on or before `today + days`
    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        self.expiration_date
            .is_some_and(|d| (d - today).num_days() <= days)
    }
}

/// A normalized snapshot of the inventory for one scoring pass.
#[derive(Debug, Clone, Default)]
pub struct Pantry {
    entries: Vec<PantryEntry>,
    names: HashSet<IngredientName>,
    stock: HashMap<IngredientName, f64>,
}

impl Pantry {
    /// Normalize every entry name once
    pub fn from_entries(entries: Vec<PantryEntry>, normalizer: &Normalizer) -> Self {
        let mut names = HashSet::with_capacity(entries.len());
        let mut stock: HashMap<IngredientName, f64> = HashMap::new();
        for entry in &entries {
            let name = normalizer.normalize(&entry.name);
            if name.is_empty() {
                continue;
            }
            if entry.quantity > 0.0 {
                *stock.entry(name.clone()).or_insert(0.0) += entry.quantity;
            }
            names.insert(name);
        }
        Self {
            entries,
            names,
            stock,
        }
    }

    /// Build from bare names
    pub fn from_names<I, S>(names: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names.into_iter().map(PantryEntry::new).collect();
        Self::from_entries(entries, normalizer)
    }

    pub fn contains(&self, name: &IngredientName) -> bool {
        self.names.contains(name)
    }

    /// Total stocked amount across entries with this name. `None` when no
    /// entry reports a positive quantity, i.e. the amount is unknown.
    pub fn quantity(&self, name: &IngredientName) -> Option<f64> {
        self.stock.get(name).copied()
    }

    pub fn names(&self) -> &HashSet<IngredientName> {
        &self.names
    }

    pub fn entries(&self) -> &[PantryEntry] {
        &self.entries
    }

    /// Normalized names of entries expiring on or before `today + days`
    pub fn expiring_within(
        &self,
        today: NaiveDate,
        days: i64,
        normalizer: &Normalizer,
    ) -> HashSet<IngredientName> {
        self.entries
            .iter()
            .filter(|e| e.expires_within(today, days))
            .map(|e| normalizer.normalize(&e.name))
            .collect()
    }

    /// Number of distinct normalized ingredients
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
