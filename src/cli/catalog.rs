use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::RecipeCatalog;
use crate::cli::OutputFormat;
use crate::core::ingredient::{fold, Normalizer};
use crate::core::recipe::{Recipe, RecipeId};
use crate::providers::file::CatalogSource;
use crate::providers::RecipeProvider;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all recipes in the catalog
    List {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only recipes whose title or ingredients contain this text
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Show details of a specific recipe
    Show {
        /// Recipe ID
        #[arg(required = true)]
        id: String,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the recipe is not
/// found, or the export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { catalog, keyword } => {
            run_list(catalog, keyword.as_deref(), format, verbose)
        }
        CatalogCommands::Show { id, catalog } => run_show(&id, catalog, format),
        CatalogCommands::Export { output, catalog } => run_export(output, catalog),
    }
}

fn load(catalog_path: Option<PathBuf>) -> anyhow::Result<RecipeCatalog> {
    let source = match catalog_path {
        Some(path) => CatalogSource::file(path),
        None => CatalogSource::embedded(),
    };
    Ok(source.recipes()?)
}

fn mentions(recipe: &Recipe, keyword: &str, normalizer: &Normalizer) -> bool {
    let folded = fold(keyword);
    let canonical = normalizer.normalize(keyword);
    fold(&recipe.title).contains(&folded)
        || recipe
            .required_ingredients
            .iter()
            .chain(&recipe.optional_ingredients)
            .any(|raw| normalizer.normalize(raw).as_str().contains(canonical.as_str()))
}

fn run_list(
    catalog_path: Option<PathBuf>,
    keyword: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load(catalog_path)?;

    if verbose {
        eprintln!("Loaded catalog with {} recipes", catalog.len());
    }

    let normalizer = Normalizer::default();
    let filtered: Vec<&Recipe> = catalog
        .iter()
        .filter(|r| keyword.map_or(true, |k| mentions(r, k, &normalizer)))
        .collect();

    match format {
        OutputFormat::Text => {
            let id_width = filtered
                .iter()
                .map(|r| r.id.0.chars().count())
                .max()
                .unwrap_or(2)
                .max(2);
            let title_width = filtered
                .iter()
                .map(|r| r.title.chars().count().min(30))
                .max()
                .unwrap_or(5)
                .max(5);

            let total_width = id_width + title_width + 10 + 6 + 6 + 4;

            println!("Recipe Catalog ({} recipes)\n", filtered.len());
            println!(
                "{:<id_w$} {:<title_w$} {:>10} {:>6} {:>6}",
                "ID",
                "Title",
                "Required",
                "Min",
                "kcal",
                id_w = id_width,
                title_w = title_width,
            );
            println!("{}", "-".repeat(total_width));

            for r in &filtered {
                println!(
                    "{:<id_w$} {:<title_w$} {:>10} {:>6} {:>6}",
                    r.id.0,
                    truncate(&r.title, title_width),
                    r.required_ingredients.len(),
                    optional_number(r.prep_time_minutes),
                    optional_number(r.calories),
                    id_w = id_width,
                    title_w = title_width,
                );
                if verbose {
                    println!("  └─ {}", r.required_ingredients.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = filtered
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id.0,
                        "title": r.title,
                        "required_count": r.required_ingredients.len(),
                        "optional_count": r.optional_ingredients.len(),
                        "prep_time_minutes": r.prep_time_minutes,
                        "calories": r.calories,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\ttitle\trequired\toptional\tprep_time_minutes\tcalories");
            for r in &filtered {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    r.id.0,
                    r.title,
                    r.required_ingredients.join(","),
                    r.optional_ingredients.join(","),
                    optional_number(r.prep_time_minutes),
                    optional_number(r.calories),
                );
            }
        }
    }

    Ok(())
}

fn run_show(id: &str, catalog_path: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = load(catalog_path)?;
    let recipe = catalog
        .get(&RecipeId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Recipe '{id}' not found"))?;

    match format {
        OutputFormat::Text => {
            println!("Recipe: {}\n", recipe.title);
            println!("ID:       {}", recipe.id);
            if let Some(minutes) = recipe.prep_time_minutes {
                println!("Time:     {minutes} min");
            }
            if let Some(kcal) = recipe.calories {
                println!("Calories: {kcal} kcal");
            }

            println!("\nRequired:");
            for name in &recipe.required_ingredients {
                match recipe.required_quantities.get(name) {
                    Some(amount) => println!("  {name} ({amount})"),
                    None => println!("  {name}"),
                }
            }
            if !recipe.optional_ingredients.is_empty() {
                println!("\nOptional:");
                for name in &recipe.optional_ingredients {
                    println!("  {name}");
                }
            }
            if !recipe.features.is_empty() {
                let features: Vec<String> = recipe
                    .features
                    .iter()
                    .map(|(label, value)| format!("{label}={value}"))
                    .collect();
                println!("\nFeatures: {}", features.join(", "));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(recipe)?);
        }
        OutputFormat::Tsv => {
            println!("ingredient\toptional\tquantity");
            for name in &recipe.required_ingredients {
                let quantity = recipe
                    .required_quantities
                    .get(name)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                println!("{name}\tfalse\t{quantity}");
            }
            for name in &recipe.optional_ingredients {
                println!("{name}\ttrue\t");
            }
        }
    }

    Ok(())
}

fn run_export(output: PathBuf, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = load(catalog_path)?;

    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;

    println!(
        "Exported {} recipes to {}",
        catalog.len(),
        output.display()
    );

    Ok(())
}

fn optional_number(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
