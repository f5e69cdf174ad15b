use serde::Serialize;

use crate::core::types::Verdict;
use crate::matching::constants::BAD_THRESHOLD;
use crate::matching::positions::SearchStep;

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Named source of one weight entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Contribution {
    /// Variant equals the pattern
    Equality,
    /// Position resolved by a search step
    Found(SearchStep),
    /// Pattern character left unresolved
    Missed,
    /// Near-match merged into a direct run
    MergedNearMatch,
    /// Exact contiguous substring
    Substring,
    /// Consistent or forgiven cluster
    Cluster,
    /// Cluster displacement forgiven as a swap, triple or shift
    ForgivenOrder,
    /// Tolerated residual order deviation
    ResidualOrder,
    /// Characters demoted from a cluster
    Teardown,
    /// Cluster rejected outright
    RejectedCluster,
    /// Boundary placement of clusters
    Placement,
    /// Non-clustered character on an independent word start
    IndependentStart,
    /// Non-clustered character on a dependent word start
    DependentStart,
    /// Non-clustered character on a word end
    WordEnd,
    /// Non-clustered character in the middle of a word
    Scatter,
    /// Any matched character on a word start
    Initials,
    /// Pattern reads as initials of consecutive words
    Acronym,
    /// Skipped characters between consecutive pattern characters in one word
    InWordGap,
    /// Consecutive pattern characters matched right-to-left
    Inversion,
    /// Variant characters left unmatched
    UnmatchedLength,
    /// Doubled pattern character on a doubled variant character
    DuplicateChar,
    /// Single-word pattern starts on a word start
    StartChar,
    /// Single-word pattern ends on a word end
    EndChar,
    /// Resolved mapping held above the weakest exact substring
    ResolutionCap,
}

impl Contribution {
    /// Entries that make up the position-search sub-weight
    #[must_use]
    pub fn is_search(self) -> bool {
        matches!(
            self,
            Self::Found(_) | Self::Missed | Self::MergedNearMatch | Self::Substring
        )
    }
}

impl std::fmt::Display for Contribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equality => write!(f, "equality"),
            Self::Found(step) => write!(f, "found_{step}"),
            Self::Missed => write!(f, "missed"),
            Self::MergedNearMatch => write!(f, "merged_near_match"),
            Self::Substring => write!(f, "substring"),
            Self::Cluster => write!(f, "cluster"),
            Self::ForgivenOrder => write!(f, "forgiven_order"),
            Self::ResidualOrder => write!(f, "residual_order"),
            Self::Teardown => write!(f, "teardown"),
            Self::RejectedCluster => write!(f, "rejected_cluster"),
            Self::Placement => write!(f, "placement"),
            Self::IndependentStart => write!(f, "independent_start"),
            Self::DependentStart => write!(f, "dependent_start"),
            Self::WordEnd => write!(f, "word_end"),
            Self::Scatter => write!(f, "scatter"),
            Self::Initials => write!(f, "initials"),
            Self::Acronym => write!(f, "acronym"),
            Self::InWordGap => write!(f, "in_word_gap"),
            Self::Inversion => write!(f, "inversion"),
            Self::UnmatchedLength => write!(f, "unmatched_length"),
            Self::DuplicateChar => write!(f, "duplicate_char"),
            Self::StartChar => write!(f, "start_char"),
            Self::EndChar => write!(f, "end_char"),
            Self::ResolutionCap => write!(f, "resolution_cap"),
        }
    }
}

/// One weight entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Entry {
    pub tag: Contribution,
    pub value: f64,
}

/// Running sum of named contributions for one evaluation.
///
/// Entries are raw sums over pattern characters; [`Weight::value`] normalizes
/// by pattern length so that weights of different variants for the same
/// pattern compare directly and the badness threshold is length independent.
#[derive(Debug, Clone, Serialize)]
pub struct Weight {
    pattern_len: usize,
    entries: Vec<Entry>,
    sum: f64,
}

impl Weight {
    #[must_use]
    pub fn new(pattern_len: usize) -> Self {
        Self {
            pattern_len: pattern_len.max(1),
            entries: Vec::new(),
            sum: 0.0,
        }
    }

    /// Add a raw contribution; zero values are not recorded
    pub fn add(&mut self, tag: Contribution, value: f64) {
        if value == 0.0 {
            return;
        }
        self.entries.push(Entry { tag, value });
        self.sum += value;
    }

    /// Add a contribution that applies to the match as a whole, expressed per
    /// pattern character
    pub fn add_global(&mut self, tag: Contribution, per_char: f64) {
        self.add(tag, per_char * count_to_f64(self.pattern_len));
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Raw sum of all entries
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Sum normalized by pattern length
    #[must_use]
    pub fn value(&self) -> f64 {
        self.sum / count_to_f64(self.pattern_len)
    }

    /// Normalized sum of the position-search entries only
    #[must_use]
    pub fn search_value(&self) -> f64 {
        let search: f64 = self
            .entries
            .iter()
            .filter(|e| e.tag.is_search())
            .map(|e| e.value)
            .sum();
        search / count_to_f64(self.pattern_len)
    }

    /// Total raw value recorded under `tag`
    #[must_use]
    pub fn total_for(&self, tag: Contribution) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.tag == tag)
            .map(|e| e.value)
            .sum()
    }
}

/// Rejected: the weight is at or above the badness threshold
#[must_use]
pub fn is_bad(weight: f64) -> bool {
    weight >= BAD_THRESHOLD
}

/// Exact complement of [`is_bad`]
#[must_use]
pub fn is_good(weight: f64) -> bool {
    !is_bad(weight)
}

#[must_use]
pub fn verdict(weight: f64) -> Verdict {
    if is_bad(weight) {
        Verdict::Bad
    } else {
        Verdict::Good
    }
}
