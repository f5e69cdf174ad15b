//! Score command - weigh one candidate against a pattern.
//!
//! With `--explain` the text output lists where every pattern character
//! landed, the clusters found and each recorded contribution.

use clap::Args;

use crate::cli::{format_weight, OutputFormat};
use crate::matching::cluster::ClusterSet;
use crate::matching::engine::{Evaluation, MatchEngine, MatchingConfig};
use crate::matching::positions::Slot;
use crate::matching::weight::{count_to_f64, Contribution};

/// Arguments for the score command
#[derive(Args)]
pub struct ScoreArgs {
    /// Query as typed (at least two characters)
    #[arg(required = true)]
    pub pattern: String,

    /// Candidate string to score
    #[arg(required = true)]
    pub variant: String,

    /// Show positions, clusters and every contribution
    #[arg(long)]
    pub explain: bool,
}

/// Execute the score command
///
/// # Errors
///
/// Returns an error if the pattern is too short or output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ScoreArgs,
    config: MatchingConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let engine = MatchEngine::with_config(config);
    let evaluation = engine.evaluate(&args.pattern, &args.variant)?;

    if verbose {
        eprintln!(
            "Evaluated '{}' against '{}': {}",
            args.pattern, args.variant, evaluation.outcome
        );
    }

    match format {
        OutputFormat::Text => print_text_result(&args, &evaluation),
        OutputFormat::Json => print_json_result(&args, &evaluation)?,
        OutputFormat::Tsv => print_tsv_result(&args, &evaluation),
    }

    Ok(())
}

fn print_text_result(args: &ScoreArgs, evaluation: &Evaluation) {
    let score = evaluation.score();
    println!("Pattern: {}", args.pattern);
    println!("Variant: {}", args.variant);
    println!(
        "Weight:  {} ({})",
        format_weight(score.weight, score.is_bad),
        evaluation.verdict
    );

    if !args.explain {
        return;
    }

    println!("Outcome: {}", evaluation.outcome);

    println!("\nPositions:");
    let pattern: Vec<char> = args.pattern.chars().collect();
    for (i, slot) in evaluation.positions.iter().enumerate() {
        let c = pattern.get(i).copied().unwrap_or('?');
        match (slot, evaluation.found_by[i]) {
            (Slot::At(pos), Some(step)) => println!("   {c} -> {pos:<4} {step}"),
            (Slot::At(pos), None) => println!("   {c} -> {pos}"),
            _ => println!("   {c} -> missed"),
        }
    }

    print_clusters(&evaluation.clusters);

    println!("\nContributions:");
    let n = count_to_f64(pattern.len().max(1));
    for (tag, total) in grouped(evaluation) {
        println!("   {:<22} {:>+8.4}", tag.to_string(), total / n);
    }
    println!(
        "   {:<22} {:>+8.4}",
        "total",
        evaluation.contributions.value()
    );
}

fn print_clusters(clusters: &ClusterSet) {
    if clusters.clusters().is_empty() {
        println!("\nClusters: none");
        return;
    }
    println!("\nClusters:");
    for cluster in clusters.clusters() {
        println!(
            "   [{}..{}) len {} {} order_diff {:?}{}",
            cluster.start(),
            cluster.end(),
            cluster.len(),
            cluster.state(),
            cluster.order_diff(),
            if cluster.torn().is_empty() {
                String::new()
            } else {
                format!(", torn {}", cluster.torn().len())
            }
        );
    }
}

/// Contribution totals by tag, in order of first appearance
fn grouped(evaluation: &Evaluation) -> Vec<(Contribution, f64)> {
    let mut totals: Vec<(Contribution, f64)> = Vec::new();
    for entry in evaluation.contributions.entries() {
        match totals.iter_mut().find(|(tag, _)| *tag == entry.tag) {
            Some((_, total)) => *total += entry.value,
            None => totals.push((entry.tag, entry.value)),
        }
    }
    totals
}

fn print_json_result(args: &ScoreArgs, evaluation: &Evaluation) -> anyhow::Result<()> {
    let score = evaluation.score();
    let output = if args.explain {
        serde_json::json!({
            "pattern": args.pattern,
            "variant": args.variant,
            "weight": score.weight,
            "is_bad": score.is_bad,
            "evaluation": evaluation,
        })
    } else {
        serde_json::json!({
            "pattern": args.pattern,
            "variant": args.variant,
            "weight": score.weight,
            "is_bad": score.is_bad,
        })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(args: &ScoreArgs, evaluation: &Evaluation) {
    let score = evaluation.score();
    println!("pattern\tvariant\tweight\tverdict\toutcome");
    println!(
        "{}\t{}\t{:.4}\t{}\t{}",
        args.pattern, args.variant, score.weight, evaluation.verdict, evaluation.outcome
    );
}
