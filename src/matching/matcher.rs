use serde::Serialize;

use crate::core::ingredient::{IngredientName, Normalizer};
use crate::core::pantry::Pantry;
use crate::core::recipe::{MissingIngredient, Recipe};
use crate::matching::staples::StaplesPolicy;
use crate::utils::validation::count_to_f64;

/// How well one recipe is covered by the pantry.
///
/// Always satisfies `have_count + missing.len() == need_count` and
/// `can_make == missing.is_empty()`. Built fresh on every pass.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub recipe: Recipe,

    /// Normalized required ingredients, in recipe order
    #[serde(skip)]
    pub required: Vec<IngredientName>,

    /// Normalized optional ingredients, in recipe order
    #[serde(skip)]
    pub optional: Vec<IngredientName>,

    /// One entry per missing required occurrence, in recipe order
    pub missing: Vec<MissingIngredient>,

    /// Required ingredients in the pantry but below the recipe amount, with
    /// `required - stock` as the shortage. Does not affect `can_make`.
    pub understocked: Vec<MissingIngredient>,

    pub have_count: usize,

    pub need_count: usize,

    /// `have_count / need_count`, or 1.0 when nothing is required
    pub coverage: f64,

    pub optional_have_count: usize,

    pub can_make: bool,
}

impl MatchResult {
    /// Distinct missing names, in first-seen order
    pub fn missing_names(&self) -> Vec<&IngredientName> {
        let mut names: Vec<&IngredientName> = Vec::new();
        for m in &self.missing {
            if !names.contains(&&m.name) {
                names.push(&m.name);
            }
        }
        names
    }

    /// True if any required or optional ingredient is in `names`
    pub fn uses_any<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a IngredientName>,
    {
        names
            .into_iter()
            .any(|n| self.required.contains(n) || self.optional.contains(n))
    }
}

/// Match a recipe against a pantry snapshot.
///
/// Recipe names are normalized here; the pantry is normalized when the
/// [`Pantry`] is built. Repeated required ingredients each count toward
/// `need_count`.
pub fn match_recipe(
    recipe: &Recipe,
    pantry: &Pantry,
    staples: &StaplesPolicy,
    normalizer: &Normalizer,
) -> MatchResult {
    let required: Vec<IngredientName> = recipe
        .required_ingredients
        .iter()
        .map(|raw| normalizer.normalize(raw))
        .collect();
    let optional: Vec<IngredientName> = recipe
        .optional_ingredients
        .iter()
        .map(|raw| normalizer.normalize(raw))
        .collect();

    let missing: Vec<MissingIngredient> = recipe
        .required_ingredients
        .iter()
        .zip(&required)
        .filter(|(_, name)| !pantry.contains(name) && !staples.contains(name))
        .map(|(raw, name)| {
            let entry = MissingIngredient::new(name.clone());
            match required_amount(recipe, raw, name, normalizer) {
                Some(amount) => entry.with_shortage(amount),
                None => entry,
            }
        })
        .collect();

    let mut understocked: Vec<MissingIngredient> = Vec::new();
    for (raw, name) in recipe.required_ingredients.iter().zip(&required) {
        if !pantry.contains(name)
            || staples.contains(name)
            || understocked.iter().any(|u| &u.name == name)
        {
            continue;
        }
        let (Some(needed), Some(stock)) = (
            required_amount(recipe, raw, name, normalizer),
            pantry.quantity(name),
        ) else {
            continue;
        };
        if stock < needed {
            understocked.push(MissingIngredient::new(name.clone()).with_shortage(needed - stock));
        }
    }

    let need_count = required.len();
    let have_count = need_count - missing.len();
    let coverage = if need_count == 0 {
        1.0
    } else {
        count_to_f64(have_count) / count_to_f64(need_count)
    };
    let optional_have_count = optional.iter().filter(|n| pantry.contains(n)).count();
    let can_make = missing.is_empty();

    MatchResult {
        recipe: recipe.clone(),
        required,
        optional,
        missing,
        understocked,
        have_count,
        need_count,
        coverage,
        optional_have_count,
        can_make,
    }
}

/// Look up the required amount by raw key first, then by normalized key
fn required_amount(
    recipe: &Recipe,
    raw: &str,
    name: &IngredientName,
    normalizer: &Normalizer,
) -> Option<f64> {
    if recipe.required_quantities.is_empty() {
        return None;
    }
    recipe.required_quantities.get(raw).copied().or_else(|| {
        recipe
            .required_quantities
            .iter()
            .find(|(key, _)| normalizer.normalize(key) == *name)
            .map(|(_, amount)| *amount)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pantry::PantryEntry;

    fn run(recipe: &Recipe, pantry: &[&str], staples: &[&str]) -> MatchResult {
        let normalizer = Normalizer::default();
        let pantry = Pantry::from_names(pantry.iter().copied(), &normalizer);
        let staples = StaplesPolicy::from_names(&normalizer, staples);
        match_recipe(recipe, &pantry, &staples, &normalizer)
    }

    fn assert_invariants(result: &MatchResult) {
        assert_eq!(result.have_count + result.missing.len(), result.need_count);
        assert_eq!(result.can_make, result.missing.is_empty());
        assert!((0.0..=1.0).contains(&result.coverage));
    }

    #[test]
    fn test_one_missing_of_four() {
        let recipe = Recipe::new("stew", "Stew")
            .with_required(["onion", "carrot", "potato", "consomme"]);
        let result = run(&recipe, &["onion", "carrot", "potato"], &[]);

        assert_invariants(&result);
        assert_eq!(result.missing_names(), vec![&crate::core::ingredient::normalize("consomme")]);
        assert!((result.coverage - 0.75).abs() < 1e-9);
        assert!(!result.can_make);
        assert_eq!(result.have_count, 3);
        assert_eq!(result.need_count, 4);
    }

    #[test]
    fn test_all_staples() {
        let recipe = Recipe::new("seasoning", "Seasoning").with_required(["salt", "pepper"]);
        let result = run(&recipe, &[], &["salt", "pepper"]);

        assert_invariants(&result);
        assert!(result.missing.is_empty());
        assert!((result.coverage - 1.0).abs() < 1e-9);
        assert!(result.can_make);
        assert_eq!(result.need_count, 2);
        assert_eq!(result.have_count, 2);
    }

    #[test]
    fn test_no_required_ingredients() {
        let recipe = Recipe::new("air", "Nothing").with_optional(["parsley"]);
        let result = run(&recipe, &["parsley"], &[]);

        assert_invariants(&result);
        assert_eq!(result.need_count, 0);
        assert!((result.coverage - 1.0).abs() < 1e-9);
        assert!(result.can_make);
        assert_eq!(result.optional_have_count, 1);
    }

    #[test]
    fn test_empty_pantry_misses_everything_but_staples() {
        let recipe = Recipe::new("r", "R").with_required(["豚肉", "玉ねぎ", "醤油"]);
        let result = run(&recipe, &[], &["醤油"]);

        assert_invariants(&result);
        assert_eq!(result.missing.len(), 2);
        assert!((result.coverage - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicates_count_toward_need() {
        let recipe = Recipe::new("r", "R").with_required(["onion", "onion", "carrot"]);

        let absent = run(&recipe, &["carrot"], &[]);
        assert_invariants(&absent);
        assert_eq!(absent.need_count, 3);
        assert_eq!(absent.missing.len(), 2);
        assert_eq!(absent.missing_names().len(), 1);

        let present = run(&recipe, &["onion"], &[]);
        assert_invariants(&present);
        assert_eq!(present.have_count, 2);
    }

    #[test]
    fn test_aliases_match_across_spellings() {
        let recipe = Recipe::new("shogayaki", "豚の生姜焼き").with_required(["豚肉", "玉ねぎ", "生姜"]);
        let result = run(&recipe, &["豚肉", "タマネギ", "しょうが（チューブ）"], &[]);

        assert_invariants(&result);
        assert!(result.can_make);
    }

    #[test]
    fn test_optional_only_counts_pantry_hits() {
        let recipe = Recipe::new("r", "R")
            .with_required(["egg"])
            .with_optional(["cheese", "ham", "salt"]);
        let result = run(&recipe, &["egg", "cheese"], &["salt"]);

        // Staples don't count as optional hits; only the pantry does
        assert_eq!(result.optional_have_count, 1);
    }

    #[test]
    fn test_shortage_from_required_quantities() {
        let recipe = Recipe::new("pasta", "シーフードパスタ")
            .with_required(["エビ", "パスタ", "トマト"])
            .with_quantity("パスタ", 200.0)
            .with_quantity("えび", 100.0);
        let result = run(&recipe, &["トマト"], &[]);

        assert_invariants(&result);
        let shrimp = result
            .missing
            .iter()
            .find(|m| m.name.as_str() == "エビ")
            .unwrap();
        // Found through the normalized key
        assert_eq!(shrimp.shortage_amount, Some(100.0));
        let pasta = result
            .missing
            .iter()
            .find(|m| m.name.as_str() == "パスタ")
            .unwrap();
        assert_eq!(pasta.shortage_amount, Some(200.0));
    }

    #[test]
    fn test_understocked_reports_remaining_amount() {
        let normalizer = Normalizer::default();
        let recipe = Recipe::new("pasta", "シーフードパスタ")
            .with_required(["エビ", "パスタ", "トマト", "塩"])
            .with_quantity("エビ", 100.0)
            .with_quantity("パスタ", 200.0)
            .with_quantity("トマト", 150.0)
            .with_quantity("塩", 5.0);
        let pantry = Pantry::from_entries(
            vec![
                PantryEntry::new("えび").with_quantity(60.0, "g"),
                PantryEntry::new("パスタ").with_quantity(300.0, "g"),
                PantryEntry::new("トマト"),
                PantryEntry::new("塩").with_quantity(1.0, "g"),
            ],
            &normalizer,
        );
        let staples = StaplesPolicy::from_names(&normalizer, ["塩"]);
        let result = match_recipe(&recipe, &pantry, &staples, &normalizer);

        assert_invariants(&result);
        assert!(result.can_make);
        assert!(result.missing.is_empty());
        // Enough pasta, unmeasured tomato, and staples are never short
        assert_eq!(result.understocked.len(), 1);
        assert_eq!(result.understocked[0].name.as_str(), "エビ");
        assert_eq!(result.understocked[0].shortage_amount, Some(40.0));
    }

    #[test]
    fn test_absent_items_are_not_understocked() {
        let recipe = Recipe::new("r", "R")
            .with_required(["エビ", "エビ"])
            .with_quantity("エビ", 100.0);
        let result = run(&recipe, &[], &[]);
        assert!(result.understocked.is_empty());
        assert_eq!(result.missing[0].shortage_amount, Some(100.0));
    }

    #[test]
    fn test_uses_any() {
        let normalizer = Normalizer::default();
        let recipe = Recipe::new("r", "R")
            .with_required(["egg"])
            .with_optional(["carrots"]);
        let result = run(&recipe, &[], &[]);
        let carrot = normalizer.normalize("carrot");
        let rice = normalizer.normalize("rice");
        assert!(result.uses_any([&carrot]));
        assert!(!result.uses_any([&rice]));
    }
}
