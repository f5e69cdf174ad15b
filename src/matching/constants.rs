//! Scoring constants.
//!
//! All weights are expressed per pattern character: a contribution of `-0.25`
//! for every matched character moves the normalized weight by `-0.25`
//! regardless of pattern length. Negative values reward, positive penalize.

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Normalized weights at or above this value are rejected
pub const BAD_THRESHOLD: f64 = -0.05;

/// Weight reported for a rejected match
pub const REJECTED: f64 = 1.0e6;

/// Reward per pattern character for case-insensitive equality
pub const EQUALITY_REWARD: f64 = 2.5;

/// Missed characters at or above this fraction of the pattern reject early
pub const MISSED_RATIO_LIMIT: f64 = 0.32;

// ---------------------------------------------------------------------------
// Position search
// ---------------------------------------------------------------------------

/// How far past a run's extremity a near-match may sit
pub const TYPO_WINDOW: usize = 2;

/// Shortest pattern that gets the strict typo pass
pub const TYPO_MIN_PATTERN_LEN: usize = 4;

/// Shortest pattern that gets the loose typo pass
pub const LOOSE_TYPO_MIN_PATTERN_LEN: usize = 3;

/// Variant offsets examined around a resolved pattern neighbour
pub const TYPO_NEIGHBOR_REACH: isize = 3;

/// Two positions closer than this count as tied
pub const TIE_DISTANCE: usize = 2;

/// Characters examined by the in-word forward scan
pub const IN_WORD_SCAN_LIMIT: usize = 8;

/// The in-word scan is noise below this many matches
pub const IN_WORD_SCAN_MIN_MATCHES: usize = 2;

/// Window for the local clustering count of the fallback vote
pub const LOCAL_CLUSTER_REACH: usize = 2;

/// Reward per character filled from an exact substring
pub const FOUND_SUBSTRING: f64 = -0.25;
/// Reward per character resolved by a direct run or unique save
pub const FOUND_DIRECT: f64 = -0.25;
/// Reward per character resolved by the typo step
pub const FOUND_TYPO: f64 = -0.15;
/// Reward per character resolved by the loose typo step
pub const FOUND_LOOSE_TYPO: f64 = -0.10;
/// Reward per character resolved by fallback voting
pub const FOUND_FALLBACK: f64 = -0.05;
/// Salvaged characters earn nothing; they only escape the miss penalty
pub const FOUND_SALVAGE: f64 = 0.0;

/// Penalty per pattern character left unresolved
pub const MISSED_PENALTY: f64 = 0.35;

/// Penalty per near-match merged into a direct run
pub const MERGE_PENALTY: f64 = 0.15;

/// Reward (global) for exact substring containment
pub const SUBSTRING_BONUS: f64 = 0.30;

/// Least gap between the weakest exact substring and any mapping that needed
/// typo, candidate or salvage resolution in a variant of the same length
pub const SUBSTRING_MARGIN: f64 = 0.05;

// ---------------------------------------------------------------------------
// Clusters
// ---------------------------------------------------------------------------

/// Reward per clustered character
pub const CLUSTER_CHAR_REWARD: f64 = 0.30;

/// Reward per link between consecutive clustered characters
pub const CLUSTER_LINK_REWARD: f64 = 0.05;

/// Penalty per cluster member whose displacement was forgiven
pub const FORGIVEN_PENALTY: f64 = 0.075;

/// Penalty per unit of tolerated residual order deviation
pub const RESIDUAL_PENALTY: f64 = 0.10;

/// Penalty per torn-down character
pub const TEARDOWN_PENALTY: f64 = 0.10;

/// Penalty per rejected cluster
pub const REJECTED_CLUSTER_PENALTY: f64 = 0.20;

/// Residual order deviation a cluster of `len` members tolerates
#[must_use]
pub fn residual_tolerance(len: usize) -> usize {
    match len {
        0..=2 => 0,
        3 => 1,
        4 | 5 => 2,
        6..=8 => 3,
        _ => len / 3,
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Upper bound of the placement bonus (global)
pub const PLACEMENT_MAX: f64 = 0.5;

/// Clustered share of the variant that counts as a majority
pub const MAJORITY_RATIO: f64 = 0.66;

pub const MAJORITY_BONUS: f64 = 0.2;

/// Share of the placement score kept by packed ("as-one") clusters
pub const AS_ONE_SHARE: f64 = 0.2;

/// Share of the placement score given to the boundary average of many clusters
pub const MANY_CLUSTERS_SHARE: f64 = 0.8;

/// Discount per separator between clusters beyond the expected count
pub const EXCESS_SEPARATOR_DISCOUNT: f64 = 0.5;

// ---------------------------------------------------------------------------
// Word quality
// ---------------------------------------------------------------------------

pub const INDEPENDENT_START_CREDIT: f64 = 0.35;
pub const DEPENDENT_START_CREDIT: f64 = 0.30;
pub const WORD_END_CREDIT: f64 = 0.05;
pub const SCATTER_PENALTY: f64 = 0.10;

/// Reward per matched character sitting on a word start
pub const INITIAL_CREDIT: f64 = 0.25;

/// Reward (global) when the pattern reads as the initials of consecutive words
pub const ACRONYM_BONUS: f64 = 0.30;

pub const IN_WORD_GAP_PENALTY: f64 = 0.07;
pub const IN_WORD_GAP_CAP: usize = 3;

/// Penalty per consecutive pattern pair matched in reverse order
pub const INVERSION_PENALTY: f64 = 0.15;

/// Penalty (global) scaled by the unmatched share of the variant
pub const UNMATCHED_LENGTH_PENALTY: f64 = 0.25;

/// Credit per doubled pattern character matched on a doubled variant character
pub const DUPLICATE_CREDIT: f64 = 0.10;

/// Reward (global) when a single-word pattern starts on a word start
pub const START_CHAR_BONUS: f64 = 0.20;

/// Reward (global) when a single-word pattern ends on a word end
pub const END_CHAR_BONUS: f64 = 0.20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_rewards_follow_step_order() {
        let steps = [
            FOUND_DIRECT,
            FOUND_TYPO,
            FOUND_LOOSE_TYPO,
            FOUND_FALLBACK,
            FOUND_SALVAGE,
        ];
        assert!(steps.windows(2).all(|w| w[0] < w[1]));
        assert!((FOUND_SUBSTRING - FOUND_DIRECT).abs() < f64::EPSILON);
        assert!(FOUND_SALVAGE.abs() < f64::EPSILON);
    }

    #[test]
    fn test_residual_tolerance_grows_with_length() {
        let mut prev = 0;
        for len in 2..30 {
            let tol = residual_tolerance(len);
            assert!(tol >= prev, "tolerance must not shrink at len {len}");
            prev = tol;
        }
        assert_eq!(residual_tolerance(2), 0);
        assert_eq!(residual_tolerance(12), 4);
    }
}
