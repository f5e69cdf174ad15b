//! Scoring engine for (pattern, variant) pairs.
//!
//! - [`MatchEngine`]: main entry point, single-pair scoring and batch ranking
//! - [`PositionMap`]: which variant position each pattern character landed on
//! - [`ClusterSet`]: contiguous runs of matched positions and their order analysis
//! - [`Weight`]: named contributions summed into one comparable number
//!
//! ## Pipeline
//!
//! 1. **Equality**: a case-insensitive equal variant short-circuits
//! 2. **Substring**: an exact contiguous occurrence fills positions directly
//! 3. **Position search**: graduated steps resolve the remaining characters
//! 4. **Clusters**: matched positions are grouped and checked for order
//! 5. **Placement**: clusters at word and path boundaries earn a bonus
//! 6. **Word quality**: initials, acronyms, gaps and scatter
//!
//! Lower weights are better. A normalized weight at or above
//! [`constants::BAD_THRESHOLD`] is replaced by [`constants::REJECTED`].
//!
//! ## Example
//!
//! ```rust
//! use fuzzweight::MatchEngine;
//!
//! let engine = MatchEngine::new();
//! let score = engine.score("pf", "PathFinder").unwrap();
//! assert!(!score.is_bad);
//! ```

pub mod cluster;
pub mod constants;
pub mod engine;
pub(crate) mod placement;
pub mod positions;
pub(crate) mod search;
pub mod trace;
pub mod weight;
pub(crate) mod word_quality;

pub use cluster::{Cluster, ClusterSet, ClusterState};
pub use engine::{
    Evaluation, MatchEngine, MatchingConfig, Outcome, RankOptions, RankedVariant, Score,
};
pub use positions::{PositionMap, SearchStep, Slot};
pub use trace::TraceChannels;
pub use weight::{Contribution, Entry, Weight};
