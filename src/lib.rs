//! # fuzzweight
//!
//! A library for scoring how well a short typed query matches candidate
//! strings, for ranking results in type-ahead search.
//!
//! A query like `pf` should find `PathFinder`, `rpt` should find
//! `monthly_report.csv`, and a slip like `repotr` should still find `report`.
//! `fuzzweight` resolves every query character to a position in the
//! candidate, judges whether that mapping is a real match or coincidental
//! scatter, and reduces the judgment to one comparable weight.
//!
//! ## Features
//!
//! - **Word awareness**: case transitions, digits, path and text separators
//! - **Graduated search**: adjacent runs first, then typo tolerance, then voting
//! - **Order analysis**: swapped and shifted characters are forgiven, not ignored
//! - **Boundary placement**: whole words and path elements score best
//! - **Explanations**: every contribution to a weight is named
//!
//! ## Example
//!
//! ```rust
//! use fuzzweight::{MatchEngine, RankOptions};
//!
//! let engine = MatchEngine::new();
//!
//! // Score a single pair; lower is better
//! let score = engine.score("pf", "PathFinder").unwrap();
//! assert!(!score.is_bad);
//!
//! // Rank a batch, best first
//! let files = ["pathofinder.rs", "PathFinder.rs", "README.md"];
//! let ranked = engine.rank("pf", &files, &RankOptions::default()).unwrap();
//! assert_eq!(ranked[0].variant, "PathFinder.rs");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Pattern validation and variant segmentation into words
//! - [`matching`]: Position search, clusters, placement and the engine
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Batch input validation

pub mod cli;
pub mod core;
pub mod matching;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::pattern::{Pattern, ScoreError, MIN_PATTERN_LEN};
pub use crate::core::types::*;
pub use crate::core::variant::Variant;
pub use crate::matching::engine::{
    Evaluation, MatchEngine, MatchingConfig, Outcome, RankOptions, RankedVariant, Score,
};
pub use crate::matching::trace::TraceChannels;
pub use crate::matching::weight::{is_bad, is_good, Contribution, Weight};
