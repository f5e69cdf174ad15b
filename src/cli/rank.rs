use std::io::{self, Read};
use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::matching::engine::{MatchEngine, MatchingConfig, RankOptions, RankedVariant};
use crate::utils::validation::parse_variants;

#[derive(Args)]
pub struct RankArgs {
    /// Query as typed (at least two characters)
    #[arg(required = true)]
    pub pattern: String,

    /// File with one candidate per line
    /// Use '-' for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Number of results to show
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Drop candidates that score worse than this string
    #[arg(long)]
    pub no_worse_than: Option<String>,
}

/// Execute rank subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read, exceeds the batch limits, or
/// the pattern is too short.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: RankArgs,
    config: MatchingConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let variants = read_input(&args)?;
    if verbose {
        eprintln!("Read {} candidates", variants.len());
    }

    let engine = MatchEngine::with_config(config);
    let options = RankOptions {
        limit: args.max_results,
        no_worse_than: args.no_worse_than.clone(),
    };
    let ranked = engine.rank(&args.pattern, &variants, &options)?;

    if verbose {
        eprintln!(
            "{} of {} candidates matched '{}'",
            ranked.len(),
            variants.len(),
            args.pattern
        );
    }

    match format {
        OutputFormat::Text => print_text_results(&ranked),
        OutputFormat::Json => print_json_results(&args, variants.len(), &ranked)?,
        OutputFormat::Tsv => print_tsv_results(&ranked),
    }

    Ok(())
}

fn read_input(args: &RankArgs) -> anyhow::Result<Vec<String>> {
    let text = if args.input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(&args.input).map_err(|e| {
            anyhow::anyhow!("Failed to read '{}': {e}", args.input.display())
        })?
    };
    Ok(parse_variants(&text)?)
}

fn print_text_results(ranked: &[RankedVariant]) {
    if ranked.is_empty() {
        println!("No matches found.");
        return;
    }
    for (rank, result) in ranked.iter().enumerate() {
        println!("{:>4}  {:>8.4}  {}", rank + 1, result.weight, result.variant);
    }
}

fn print_json_results(
    args: &RankArgs,
    candidates: usize,
    ranked: &[RankedVariant],
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "pattern": args.pattern,
        "candidates": candidates,
        "results": ranked,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(ranked: &[RankedVariant]) {
    println!("rank\tindex\tweight\tvariant");
    for (rank, result) in ranked.iter().enumerate() {
        println!(
            "{}\t{}\t{:.4}\t{}",
            rank + 1,
            result.index,
            result.weight,
            result.variant
        );
    }
}
