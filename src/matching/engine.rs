use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::pattern::{Pattern, ScoreError};
use crate::core::types::Verdict;
use crate::core::variant::Variant;
use crate::matching::cluster::{self, ClusterSet};
use crate::matching::constants::{
    BAD_THRESHOLD, CLUSTER_CHAR_REWARD, CLUSTER_LINK_REWARD, EQUALITY_REWARD, FOUND_DIRECT,
    FOUND_FALLBACK, FOUND_LOOSE_TYPO, FOUND_SALVAGE, FOUND_SUBSTRING, FOUND_TYPO, MERGE_PENALTY,
    MISSED_PENALTY, MISSED_RATIO_LIMIT, REJECTED, SUBSTRING_BONUS, SUBSTRING_MARGIN,
    UNMATCHED_LENGTH_PENALTY,
};
use crate::matching::placement;
use crate::matching::positions::{PositionMap, SearchStep, Slot};
use crate::matching::search::{fill_substring, search};
use crate::matching::trace::{TraceChannels, BASE_TARGET};
use crate::matching::weight::{count_to_f64, is_bad, verdict, Contribution, Weight};
use crate::matching::word_quality;

/// Weight and verdict for one pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    /// Normalized weight, `-EQUALITY_REWARD` per character for an equal
    /// variant, or [`REJECTED`]; lower is better
    pub weight: f64,
    pub is_bad: bool,
}

/// How an evaluation reached its weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Case-insensitive equality
    Equal,
    /// Full pipeline over an exact substring match
    Substring,
    /// Full pipeline over the position search
    Searched,
    /// Too many pattern characters missed
    TooManyMissed,
    /// Clusters exist but the search alone is already too weak
    WeakSearch,
    /// Aggregated weight crossed the threshold
    OverThreshold,
}

impl Outcome {
    #[must_use]
    pub fn is_rejection(self) -> bool {
        matches!(self, Self::TooManyMissed | Self::WeakSearch | Self::OverThreshold)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Substring => write!(f, "substring"),
            Self::Searched => write!(f, "searched"),
            Self::TooManyMissed => write!(f, "too many missed"),
            Self::WeakSearch => write!(f, "weak search"),
            Self::OverThreshold => write!(f, "over threshold"),
        }
    }
}

/// Full breakdown of one evaluation
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub variant: String,
    /// Same scale as [`Score::weight`]
    pub weight: f64,
    pub verdict: Verdict,
    pub outcome: Outcome,
    /// Per pattern character
    pub positions: Vec<Slot>,
    /// Per pattern character
    pub found_by: Vec<Option<SearchStep>>,
    pub clusters: ClusterSet,
    /// Every recorded contribution, including those of rejected evaluations
    pub contributions: Weight,
}

impl Evaluation {
    #[must_use]
    pub fn score(&self) -> Score {
        Score {
            weight: self.weight,
            is_bad: self.verdict == Verdict::Bad,
        }
    }

    #[must_use]
    pub fn missed(&self) -> usize {
        self.positions.iter().filter(|s| **s == Slot::NotFound).count()
    }
}

/// Options for [`MatchEngine::rank`]
#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    /// Keep at most this many results
    pub limit: Option<usize>,
    /// Drop candidates scoring worse than this reference string
    pub no_worse_than: Option<String>,
}

/// One kept candidate of a ranked batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVariant {
    /// Position in the input batch
    pub index: usize,
    pub variant: String,
    pub weight: f64,
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Diagnostic channels that emit events
    pub trace: TraceChannels,
    /// Result limit for [`MatchEngine::rank`] when the options give none
    pub default_limit: Option<usize>,
}

/// Scores (pattern, variant) pairs
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchingConfig,
}

impl MatchEngine {
    /// Create a new engine with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }

    /// Create a new engine with custom configuration
    #[must_use]
    pub fn with_config(config: MatchingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Weight and verdict of `variant` for `pattern`
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::PatternTooShort` for patterns under two characters.
    pub fn score(&self, pattern: &str, variant: &str) -> Result<Score, ScoreError> {
        Ok(self.evaluate(pattern, variant)?.score())
    }

    /// Weight of `variant` for `pattern`, `None` when rejected
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::PatternTooShort` for patterns under two characters.
    pub fn weigh(&self, pattern: &str, variant: &str) -> Result<Option<f64>, ScoreError> {
        let score = self.score(pattern, variant)?;
        Ok((!score.is_bad).then_some(score.weight))
    }

    /// Score with a full breakdown of positions, clusters and contributions
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::PatternTooShort` for patterns under two characters.
    pub fn evaluate(&self, pattern: &str, variant: &str) -> Result<Evaluation, ScoreError> {
        let pattern = Pattern::new(pattern)?;
        Ok(self.evaluate_prepared(&pattern, variant))
    }

    /// Score a batch, drop bad candidates and sort the rest best first
    ///
    /// Ties keep input order. With `no_worse_than`, candidates weighing more
    /// than that string are dropped too; a reference that is itself bad sets
    /// no ceiling.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::PatternTooShort` for patterns under two characters.
    pub fn rank<S: AsRef<str>>(
        &self,
        pattern: &str,
        variants: &[S],
        options: &RankOptions,
    ) -> Result<Vec<RankedVariant>, ScoreError> {
        let pattern = Pattern::new(pattern)?;

        let ceiling = options
            .no_worse_than
            .as_deref()
            .map(|reference| self.evaluate_prepared(&pattern, reference).weight)
            .filter(|&w| !is_bad(w));

        let mut ranked: Vec<RankedVariant> = variants
            .iter()
            .enumerate()
            .filter_map(|(index, variant)| {
                let variant = variant.as_ref();
                let weight = self.evaluate_prepared(&pattern, variant).weight;
                (!is_bad(weight)).then(|| RankedVariant {
                    index,
                    variant: variant.to_string(),
                    weight,
                })
            })
            .filter(|r| ceiling.map_or(true, |c| r.weight <= c))
            .collect();

        ranked.sort_by(|a, b| {
            a.weight
                .partial_cmp(&b.weight)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });

        if let Some(limit) = options.limit.or(self.config.default_limit) {
            ranked.truncate(limit);
        }

        if self.config.trace.base {
            debug!(
                target: BASE_TARGET,
                pattern = pattern.as_str(),
                candidates = variants.len(),
                kept = ranked.len(),
                ceiling = ?ceiling,
                "batch ranked"
            );
        }
        Ok(ranked)
    }

    fn evaluate_prepared(&self, pattern: &Pattern, text: &str) -> Evaluation {
        let variant = Variant::new(text);
        let trace = self.config.trace;
        let n = pattern.len();
        let mut weight = Weight::new(n);

        if variant.equals(pattern.chars()) {
            weight.add_global(Contribution::Equality, -EQUALITY_REWARD);
            let map = fill_substring(pattern, &variant, 0);
            return self.finish(pattern, text, map, ClusterSet::default(), weight, Outcome::Equal);
        }

        let (map, mut outcome) = match variant.find_substring(pattern.chars()) {
            Some(start) => {
                weight.add_global(Contribution::Substring, -SUBSTRING_BONUS);
                (fill_substring(pattern, &variant, start), Outcome::Substring)
            }
            None => (search(pattern, &variant, trace), Outcome::Searched),
        };

        for step in (0..n).filter_map(|i| map.found_by(i)) {
            weight.add(Contribution::Found(step), found_reward(step));
        }
        weight.add(Contribution::Missed, MISSED_PENALTY * count_to_f64(map.missed()));
        weight.add(Contribution::MergedNearMatch, MERGE_PENALTY * count_to_f64(map.merges()));

        let pairs = map.matched();
        if count_to_f64(map.missed()) / count_to_f64(n) >= MISSED_RATIO_LIMIT {
            return self.finish(pattern, text, map, ClusterSet::default(), weight, Outcome::TooManyMissed);
        }
        if !cluster::detect(&pairs, &variant).is_empty() && weight.search_value() >= BAD_THRESHOLD {
            return self.finish(pattern, text, map, ClusterSet::default(), weight, Outcome::WeakSearch);
        }

        let clusters = cluster::analyze(&pairs, &variant, &mut weight, trace);
        let bonus = placement::score(&clusters, &variant, map.missed(), n);
        weight.add_global(Contribution::Placement, -bonus);
        word_quality::apply(pattern, &variant, &map, &clusters, &mut weight);

        if outcome == Outcome::Searched && needed_resolution(&map) {
            let cap = weakest_substring(n, variant.len()) + SUBSTRING_MARGIN;
            let value = weight.value();
            if value < cap {
                weight.add_global(Contribution::ResolutionCap, cap - value);
            }
        }

        if is_bad(weight.value()) {
            outcome = Outcome::OverThreshold;
        }
        self.finish(pattern, text, map, clusters, weight, outcome)
    }

    fn finish(
        &self,
        pattern: &Pattern,
        text: &str,
        map: PositionMap,
        clusters: ClusterSet,
        contributions: Weight,
        outcome: Outcome,
    ) -> Evaluation {
        let weight = match outcome {
            _ if outcome.is_rejection() => REJECTED,
            // left unnormalized so longer exact matches rank higher
            Outcome::Equal => contributions.sum(),
            _ => contributions.value(),
        };

        if self.config.trace.base {
            debug!(
                target: BASE_TARGET,
                pattern = pattern.as_str(),
                variant = text,
                outcome = %outcome,
                raw = contributions.value(),
                weight,
                missed = map.missed(),
                clusters = clusters.effective_count(),
                "pair evaluated"
            );
        }

        Evaluation {
            variant: text.to_string(),
            weight,
            verdict: verdict(weight),
            outcome,
            positions: map.slots().to_vec(),
            found_by: (0..map.len()).map(|i| map.found_by(i)).collect(),
            clusters,
            contributions,
        }
    }
}

/// Anything short of a complete, in-order reading by step 1 alone
fn needed_resolution(map: &PositionMap) -> bool {
    !map.is_in_order() || (0..map.len()).any(|i| map.found_by(i) != Some(SearchStep::Direct))
}

/// Weight of an exact substring match that earns no placement, initial or
/// single-word credit; every substring match scores at or below it
fn weakest_substring(pattern_len: usize, variant_len: usize) -> f64 {
    let n = count_to_f64(pattern_len);
    let cluster = CLUSTER_CHAR_REWARD * n + CLUSTER_LINK_REWARD * (n - 1.0);
    let unmatched = count_to_f64(variant_len.saturating_sub(pattern_len))
        / count_to_f64(variant_len.max(1));
    FOUND_SUBSTRING - SUBSTRING_BONUS - cluster / n + UNMATCHED_LENGTH_PENALTY * unmatched
}

fn found_reward(step: SearchStep) -> f64 {
    match step {
        SearchStep::Substring => FOUND_SUBSTRING,
        SearchStep::Direct => FOUND_DIRECT,
        SearchStep::Typo => FOUND_TYPO,
        SearchStep::LooseTypo => FOUND_LOOSE_TYPO,
        SearchStep::Fallback => FOUND_FALLBACK,
        SearchStep::Salvage => FOUND_SALVAGE,
    }
}
