use clap::Args;

use crate::cli::OutputFormat;
use crate::core::ingredient::{fold, Normalizer};
use crate::matching::staples::StaplesPolicy;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Ingredient names to normalize
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Skip the spelling variant table (width, case, and notes only)
    #[arg(long)]
    pub no_aliases: bool,
}

/// Execute normalize subcommand
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: NormalizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let normalizer = if args.no_aliases {
        Normalizer::without_aliases()
    } else {
        Normalizer::default()
    };
    let staples = StaplesPolicy::defaults(&normalizer);

    if verbose {
        eprintln!("Alias table has {} entries", normalizer.aliases().len());
    }

    let rows: Vec<(&str, String, String, bool)> = args
        .names
        .iter()
        .map(|raw| {
            let name = normalizer.normalize(raw);
            let is_staple = staples.contains(&name);
            (raw.as_str(), fold(raw), name.as_str().to_string(), is_staple)
        })
        .collect();

    match format {
        OutputFormat::Text => {
            for (raw, folded, normalized, is_staple) in &rows {
                let staple = if *is_staple { "  [staple]" } else { "" };
                if verbose && folded != normalized {
                    println!("{raw} → {folded} → {normalized}{staple}");
                } else {
                    println!("{raw} → {normalized}{staple}");
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = rows
                .iter()
                .map(|(raw, folded, normalized, is_staple)| {
                    serde_json::json!({
                        "input": raw,
                        "folded": folded,
                        "normalized": normalized,
                        "is_staple": is_staple,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\tfolded\tnormalized\tis_staple");
            for (raw, folded, normalized, is_staple) in &rows {
                println!("{raw}\t{folded}\t{normalized}\t{is_staple}");
            }
        }
    }

    Ok(())
}
