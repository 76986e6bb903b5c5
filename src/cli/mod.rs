//! Command-line interface for pantry-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **suggest**: Rank catalog recipes against a pantry file
//! - **match**: Show how one recipe is covered by a pantry
//! - **normalize**: Print the canonical form of ingredient names
//! - **catalog**: List, show, or export recipes from the catalog
//! - **serve**: Start the JSON API server
//!
//! ## Usage
//!
//! ```text
//! # Suggest recipes for what's in the fridge
//! pantry-match suggest pantry.txt
//!
//! # Pipe a list in
//! printf '豚肉\n玉ねぎ\n' | pantry-match suggest -
//!
//! # Only makeable recipes, JSON output
//! pantry-match suggest pantry.tsv --can-make --format json
//!
//! # Why can't I make nikujaga?
//! pantry-match match nikujaga pantry.txt
//!
//! # Start the API
//! pantry-match serve --port 8080
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::catalog::store::RecipeCatalog;
use crate::core::ingredient::Normalizer;
use crate::core::pantry::PantryEntry;
use crate::matching::engine::MatchingConfig;
use crate::matching::scoring::ScoringWeights;
use crate::matching::staples::StaplesPolicy;
use crate::parsing::pantry::{parse_pantry_text, PantryFormat};
use crate::providers::file::{CatalogSource, PantryFile};
use crate::providers::{InventoryProvider, RecipeProvider};

pub mod catalog;
pub mod match_cmd;
pub mod normalize;
pub mod suggest;

#[derive(Parser)]
#[command(name = "pantry-match")]
#[command(author = "Pantry Match Developers")]
#[command(version)]
#[command(about = "Match your pantry against a recipe catalog and rank what you can cook")]
#[command(
    long_about = "pantry-match compares the ingredients you have on hand with a catalog of recipes.\n\nIngredient names are normalized (width, case, parenthetical notes, spelling variants) before matching, common seasonings are assumed available, and recipes are ranked by:\n- Coverage of required ingredients\n- A bonus for optional ingredients you have\n- A penalty per missing ingredient\n- An optional preference boost from a recommender"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank recipes by how well the pantry covers them
    Suggest(suggest::SuggestArgs),

    /// Show the detailed match of one recipe
    Match(match_cmd::MatchArgs),

    /// Print normalized ingredient names
    Normalize(normalize::NormalizeArgs),

    /// Manage the recipe catalog
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Options shared by commands that run the matcher
#[derive(clap::Args, Debug, Clone)]
pub struct EngineArgs {
    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Pantry file format (detected from the extension by default; stdin reads a list)
    #[arg(long, value_enum)]
    pub pantry_format: Option<PantryFormat>,

    /// Additional staple assumed on hand (repeatable)
    #[arg(long = "staple", value_name = "NAME")]
    pub staples: Vec<String>,

    /// Assume no staples at all
    #[arg(long, conflicts_with = "staples")]
    pub no_staples: bool,

    /// Disable the built-in spelling variant table
    #[arg(long)]
    pub no_aliases: bool,
}

impl EngineArgs {
    pub fn normalizer(&self) -> Normalizer {
        if self.no_aliases {
            Normalizer::without_aliases()
        } else {
            Normalizer::default()
        }
    }

    /// Engine configuration from the flags, with the given weights
    pub fn config(&self, weights: ScoringWeights) -> MatchingConfig {
        let normalizer = self.normalizer();
        let staples = if self.no_staples {
            StaplesPolicy::none()
        } else {
            let mut staples = StaplesPolicy::defaults(&normalizer);
            staples.extend(&normalizer, &self.staples);
            staples
        };
        MatchingConfig {
            weights,
            staples,
            normalizer,
        }
    }

    pub fn load_catalog(&self) -> anyhow::Result<RecipeCatalog> {
        Ok(CatalogSource::from_option(self.catalog.as_deref()).recipes()?)
    }
}

/// Read pantry entries from a file, or from stdin when the path is `-`
pub fn load_pantry(path: &Path, format: Option<PantryFormat>) -> anyhow::Result<Vec<PantryEntry>> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(parse_pantry_text(&buffer, format.unwrap_or(PantryFormat::Lines))?);
    }

    match format {
        Some(format) => {
            let content = std::fs::read_to_string(path)?;
            Ok(parse_pantry_text(&content, format)?)
        }
        None => Ok(PantryFile::new(path).inventory()?),
    }
}

/// Plain-text percentage for ratios in [0, 1]
fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
