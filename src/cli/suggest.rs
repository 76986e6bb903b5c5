use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_pantry, percent, EngineArgs, OutputFormat};
use crate::core::pantry::Pantry;
use crate::core::types::{ScoringMode, SortKey};
use crate::matching::engine::MatchingEngine;
use crate::matching::preference::Preferences;
use crate::matching::ranking::RecipeFilter;
use crate::matching::scoring::{ScoredRecipe, ScoringWeights};
use crate::providers::file::PreferencesFile;
use crate::providers::PreferenceProvider;

#[derive(Args)]
pub struct SuggestArgs {
    /// Pantry file (JSON, TSV, CSV, or one name per line)
    /// Use '-' for a list on stdin
    #[arg(required = true)]
    pub pantry: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Recommender output (preference vector, per-recipe signals, or history)
    #[arg(long)]
    pub preferences: Option<PathBuf>,

    /// Only recipes whose title or ingredients contain this text
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Drop recipes using this ingredient (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Only recipes with nothing missing
    #[arg(long)]
    pub can_make: bool,

    /// Maximum number of missing ingredients (negative means 0)
    #[arg(long, allow_negative_numbers = true)]
    pub max_missing: Option<i64>,

    /// Maximum preparation time in minutes
    #[arg(long)]
    pub max_time: Option<u32>,

    /// Maximum calories
    #[arg(long)]
    pub max_calories: Option<u32>,

    /// Minimum coverage of required ingredients (0.0-1.0)
    #[arg(long)]
    pub min_coverage: Option<f64>,

    /// Sort order
    #[arg(long, value_enum, default_value = "score")]
    pub sort: SortKey,

    /// Number of recipes to show
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    // === Scoring weight options ===
    /// Bonus per optional ingredient on hand (default 0.05)
    #[arg(long)]
    pub optional_weight: Option<f64>,

    /// Penalty per missing ingredient (default 0.01)
    #[arg(long)]
    pub missing_penalty: Option<f64>,

    /// Weight of coverage when preferences are available (default 0.7)
    #[arg(long)]
    pub coverage_weight: Option<f64>,

    /// Weight of the preference score (default 0.3)
    #[arg(long)]
    pub preference_weight: Option<f64>,
}

impl SuggestArgs {
    fn weights(&self) -> ScoringWeights {
        let defaults = ScoringWeights::default();
        ScoringWeights {
            optional_weight: self.optional_weight.unwrap_or(defaults.optional_weight),
            missing_penalty: self.missing_penalty.unwrap_or(defaults.missing_penalty),
            coverage_weight: self.coverage_weight.unwrap_or(defaults.coverage_weight),
            preference_weight: self.preference_weight.unwrap_or(defaults.preference_weight),
        }
    }

    fn filter(&self) -> RecipeFilter {
        RecipeFilter {
            keyword: self.keyword.clone(),
            exclude_ingredients: self.exclude.clone(),
            can_make_only: self.can_make,
            max_missing: self.max_missing,
            max_prep_minutes: self.max_time,
            max_calories: self.max_calories,
            min_coverage: self.min_coverage,
            limit: self.max_results,
        }
    }
}

/// Execute suggest subcommand
///
/// # Errors
///
/// Returns an error if the catalog, pantry, or preferences cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SuggestArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = args.engine.load_catalog()?;
    let config = args.engine.config(args.weights());

    if verbose {
        eprintln!(
            "Loaded catalog with {} recipes; {} staples assumed",
            catalog.len(),
            config.staples.len()
        );
    }

    if catalog.is_empty() {
        eprintln!("Warning: Catalog is empty, no recipes to match against.");
        return Ok(());
    }

    let entries = load_pantry(&args.pantry, args.engine.pantry_format)?;
    let pantry = Pantry::from_entries(entries, &config.normalizer);

    let preferences = match &args.preferences {
        Some(path) => PreferencesFile::new(path, config.normalizer.clone()).preferences(&catalog)?,
        None => Preferences::default(),
    };

    if verbose {
        eprintln!(
            "Pantry has {} distinct ingredients; {} preference signals{}",
            pantry.len(),
            preferences.signals.len(),
            if preferences.profile.is_some() {
                " plus a profile"
            } else {
                ""
            }
        );
    }

    let engine = MatchingEngine::with_config(&catalog, config);
    let results = engine.suggest(&pantry, &preferences, &args.filter(), args.sort);

    match format {
        OutputFormat::Text => {
            if results.is_empty() {
                eprintln!("No recipes match the given filters.");
            } else {
                print_text_results(&results, verbose);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Tsv => print_tsv_results(&results),
    }

    Ok(())
}

fn print_text_results(results: &[ScoredRecipe], verbose: bool) {
    for (i, s) in results.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }
        let m = &s.result;

        let status = if m.can_make { "CAN MAKE" } else { "MISSING" };
        println!("\n#{} {} ({})", i + 1, m.recipe.title, status);
        println!("   ID: {}", m.recipe.id);

        let mode = match s.mode {
            ScoringMode::Local => "local".to_string(),
            ScoringMode::PreferenceBoosted => format!(
                "preference {:.2}",
                s.preference_score.unwrap_or_default()
            ),
        };
        println!("   Score: {:.3} ({mode})", s.score);
        if s.is_boosted {
            println!("   Boosted: flagged by the recommender");
        }
        println!(
            "   Coverage: {}/{} required ({})",
            m.have_count,
            m.need_count,
            percent(m.coverage)
        );
        if !m.optional.is_empty() {
            println!(
                "   Optional: {}/{} on hand",
                m.optional_have_count,
                m.optional.len()
            );
        }

        if !m.missing.is_empty() {
            let missing: Vec<String> = m.missing.iter().map(ToString::to_string).collect();
            println!("   Missing: {}", missing.join(", "));
        }
        if !m.understocked.is_empty() {
            let low: Vec<String> = m.understocked.iter().map(ToString::to_string).collect();
            println!("   Running low: {}", low.join(", "));
        }

        if verbose {
            let mut details = Vec::new();
            if let Some(minutes) = m.recipe.prep_time_minutes {
                details.push(format!("{minutes} min"));
            }
            if let Some(kcal) = m.recipe.calories {
                details.push(format!("{kcal} kcal"));
            }
            if !details.is_empty() {
                println!("   Details: {}", details.join(", "));
            }
        }
    }
}

fn print_tsv_results(results: &[ScoredRecipe]) {
    println!("rank\tid\ttitle\tscore\tmode\tcoverage\thave\tneed\toptional_have\tcan_make\tis_boosted\tmissing");
    for (i, s) in results.iter().enumerate() {
        let m = &s.result;
        let missing: Vec<&str> = m.missing_names().into_iter().map(|n| n.as_str()).collect();
        println!(
            "{}\t{}\t{}\t{:.4}\t{}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{}",
            i + 1,
            m.recipe.id,
            m.recipe.title,
            s.score,
            s.mode,
            m.coverage,
            m.have_count,
            m.need_count,
            m.optional_have_count,
            m.can_make,
            s.is_boosted,
            missing.join(","),
        );
    }
}
