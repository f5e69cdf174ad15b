//! Command-line interface for fuzzweight.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **score**: Score one candidate against a pattern, optionally explaining every contribution
//! - **rank**: Rank candidates from a file or stdin, best first
//!
//! ## Usage
//!
//! ```text
//! # Score a single pair
//! fuzzweight score pf PathFinder --explain
//!
//! # Rank file names from another tool
//! git ls-files | fuzzweight rank mainrs -n 10
//!
//! # JSON output for scripting
//! fuzzweight rank report files.txt --format json
//!
//! # Trace the position search and cluster analysis
//! fuzzweight score report xrepotrx --trace search,cluster
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::matching::engine::MatchingConfig;
use crate::matching::trace::TraceChannels;

pub mod rank;
pub mod score;

#[derive(Parser)]
#[command(name = "fuzzweight")]
#[command(version)]
#[command(about = "Score and rank candidate strings against a short fuzzy query")]
#[command(
    long_about = "fuzzweight scores how well a short typed query matches candidate strings such as file paths, command names or titles.\n\nIt resolves each query character to a position in the candidate and judges the mapping by:\n- Contiguous clusters and their internal order\n- Placement at word and path boundaries\n- Initials, acronyms and scattered characters\n\nLower weights are better; candidates over the badness threshold are rejected."
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

    /// Diagnostic channels to trace (comma-separated: search, cluster, base, all)
    #[arg(long, global = true)]
    pub trace: Option<TraceChannels>,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Engine configuration from `--config`, with `--trace` overriding its channels
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn matching_config(&self) -> anyhow::Result<MatchingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read config '{}': {e}", path.display())
                })?;
                serde_json::from_str(&text).map_err(|e| {
                    anyhow::anyhow!("Invalid config '{}': {e}", path.display())
                })?
            }
            None => MatchingConfig::default(),
        };
        if let Some(trace) = self.trace {
            config.trace = trace;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one candidate against a pattern
    Score(score::ScoreArgs),

    /// Rank candidates read from a file or stdin
    Rank(rank::RankArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Weight as shown to users; rejected weights print as `rejected`
pub(crate) fn format_weight(weight: f64, is_bad: bool) -> String {
    if is_bad {
        "rejected".to_string()
    } else {
        format!("{weight:.4}")
    }
}
