use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use serde::Serialize;

use crate::cli::{load_pantry, percent, EngineArgs, OutputFormat};
use crate::core::ingredient::IngredientName;
use crate::core::pantry::Pantry;
use crate::core::recipe::RecipeId;
use crate::matching::engine::{MatchingConfig, MatchingEngine};
use crate::matching::matcher::MatchResult;
use crate::matching::scoring::{ScoredRecipe, ScoringWeights};

#[derive(Args)]
pub struct MatchArgs {
    /// Recipe ID from the catalog
    #[arg(required = true)]
    pub recipe: String,

    /// Pantry file (JSON, TSV, CSV, or one name per line)
    /// Use '-' for a list on stdin
    #[arg(required = true)]
    pub pantry: PathBuf,

    /// Flag pantry items expiring within this many days
    #[arg(long, default_value_t = 3)]
    pub expiring_days: i64,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Where a required or optional ingredient comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Availability {
    Pantry,
    Staple,
    Missing,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pantry => write!(f, "pantry"),
            Self::Staple => write!(f, "staple"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Serialize)]
struct IngredientRow<'a> {
    raw: &'a str,
    normalized: &'a IngredientName,
    optional: bool,
    availability: Availability,
    expires_soon: bool,
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if the catalog or pantry cannot be read, or the recipe
/// id is not in the catalog.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = args.engine.load_catalog()?;
    let config = args.engine.config(ScoringWeights::default());

    let entries = load_pantry(&args.pantry, args.engine.pantry_format)?;
    let pantry = Pantry::from_entries(entries, &config.normalizer);

    if verbose {
        eprintln!(
            "Loaded catalog with {} recipes; pantry has {} distinct ingredients",
            catalog.len(),
            pantry.len()
        );
    }

    let engine = MatchingEngine::with_config(&catalog, config);
    let result = engine
        .match_by_id(&RecipeId::new(&args.recipe), &pantry)
        .ok_or_else(|| anyhow::anyhow!("Recipe '{}' not found", args.recipe))?;

    let expiring = pantry.expiring_within(
        Local::now().date_naive(),
        args.expiring_days,
        &engine.config().normalizer,
    );
    let rows = ingredient_rows(&result, &pantry, &expiring, engine.config());

    match format {
        OutputFormat::Text => print_text_result(&result, &rows, engine.config()),
        OutputFormat::Json => {
            let scored = ScoredRecipe::local(result.clone(), &engine.config().weights);
            let output = serde_json::json!({
                "result": scored,
                "ingredients": rows,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("ingredient\tnormalized\toptional\tavailability\texpires_soon");
            for row in &rows {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    row.raw, row.normalized, row.optional, row.availability, row.expires_soon
                );
            }
        }
    }

    Ok(())
}

fn ingredient_rows<'a>(
    result: &'a MatchResult,
    pantry: &Pantry,
    expiring: &HashSet<IngredientName>,
    config: &MatchingConfig,
) -> Vec<IngredientRow<'a>> {
    let availability = |name: &IngredientName, optional: bool| {
        if pantry.contains(name) {
            Availability::Pantry
        } else if !optional && config.staples.contains(name) {
            Availability::Staple
        } else {
            Availability::Missing
        }
    };

    let required = result
        .recipe
        .required_ingredients
        .iter()
        .zip(&result.required)
        .map(|(raw, name)| IngredientRow {
            raw,
            normalized: name,
            optional: false,
            availability: availability(name, false),
            expires_soon: expiring.contains(name),
        });
    let optional = result
        .recipe
        .optional_ingredients
        .iter()
        .zip(&result.optional)
        .map(|(raw, name)| IngredientRow {
            raw,
            normalized: name,
            optional: true,
            availability: availability(name, true),
            expires_soon: expiring.contains(name),
        });
    required.chain(optional).collect()
}

fn print_text_result(result: &MatchResult, rows: &[IngredientRow<'_>], config: &MatchingConfig) {
    let scored = ScoredRecipe::local(result.clone(), &config.weights);
    let status = if result.can_make { "CAN MAKE" } else { "MISSING" };

    println!("Recipe: {} ({})\n", result.recipe.title, status);
    println!("ID:       {}", result.recipe.id);
    println!(
        "Coverage: {}/{} ({})",
        result.have_count,
        result.need_count,
        percent(result.coverage)
    );
    println!("Score:    {:.3}", scored.score);
    if let Some(minutes) = result.recipe.prep_time_minutes {
        println!("Time:     {minutes} min");
    }
    if let Some(kcal) = result.recipe.calories {
        println!("Calories: {kcal} kcal");
    }

    println!("\nIngredients:");
    println!("{:<24} {:<10} {}", "Name", "Source", "Normalized");
    println!("{}", "-".repeat(60));
    for row in rows {
        let marker = match row.availability {
            Availability::Pantry | Availability::Staple => "✓",
            Availability::Missing if row.optional => "·",
            Availability::Missing => "✗",
        };
        let label = if row.optional {
            format!("{} (optional)", row.raw)
        } else {
            row.raw.to_string()
        };
        let note = if row.expires_soon { "  [expires soon]" } else { "" };
        println!(
            "{marker} {:<22} {:<10} {}{note}",
            label, row.availability, row.normalized
        );
    }

    let shortages: Vec<String> = result
        .missing
        .iter()
        .filter(|m| m.shortage_amount.is_some())
        .map(ToString::to_string)
        .collect();
    if !shortages.is_empty() {
        println!("\nShortages: {}", shortages.join(", "));
    }
    if !result.understocked.is_empty() {
        let low: Vec<String> = result.understocked.iter().map(ToString::to_string).collect();
        println!("Running low: {}", low.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::RecipeCatalog;
    use crate::core::pantry::PantryEntry;
    use crate::core::recipe::Recipe;
    use chrono::NaiveDate;

    #[test]
    fn test_rows_flag_expiring_pantry_items() {
        let config = MatchingConfig::default();
        let catalog = RecipeCatalog::from_recipes(vec![Recipe::new("omelette", "オムレツ")
            .with_required(["卵", "牛乳", "塩"])
            .with_optional(["チーズ"])])
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let pantry = Pantry::from_entries(
            vec![
                PantryEntry::new("たまご")
                    .with_expiration(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()),
                PantryEntry::new("牛乳")
                    .with_expiration(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()),
            ],
            &config.normalizer,
        );
        let expiring = pantry.expiring_within(today, 3, &config.normalizer);
        let engine = MatchingEngine::with_config(&catalog, config);
        let result = engine
            .match_by_id(&RecipeId::new("omelette"), &pantry)
            .unwrap();
        let rows = ingredient_rows(&result, &pantry, &expiring, engine.config());

        let flags: Vec<(&str, Availability, bool)> = rows
            .iter()
            .map(|r| (r.raw, r.availability, r.expires_soon))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("卵", Availability::Pantry, true),
                ("牛乳", Availability::Pantry, false),
                ("塩", Availability::Staple, false),
                ("チーズ", Availability::Missing, false),
            ]
        );
    }
}
