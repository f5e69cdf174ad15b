//! Boundary placement bonus.
//!
//! Rewards clusters that sit at natural boundaries: the start and end of the
//! string, of words, and of path or text elements. The result is a bonus in
//! `[0, PLACEMENT_MAX]` per pattern character.

use crate::core::types::Placing;
use crate::core::variant::Variant;
use crate::matching::cluster::ClusterSet;
use crate::matching::constants::{
    AS_ONE_SHARE, EXCESS_SEPARATOR_DISCOUNT, MAJORITY_BONUS, MAJORITY_RATIO, MANY_CLUSTERS_SHARE,
    PLACEMENT_MAX,
};
use crate::matching::weight::count_to_f64;

/// Where a cluster sits relative to the boundary separators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    /// Entirely before the first separator
    Leading,
    /// Entirely after the last separator
    Trailing,
    Interior,
}

/// Placement bonus for the effective clusters of one evaluation
pub(crate) fn score(clusters: &ClusterSet, variant: &Variant, missed: usize, pattern_len: usize) -> f64 {
    let mut spans: Vec<(usize, usize)> = clusters.effective().filter_map(|c| c.span()).collect();
    spans.sort_unstable();
    bonus(&spans, clusters.clustered_len(), variant, missed, pattern_len)
}

/// Placement bonus for cluster spans sorted by start
pub(crate) fn bonus(
    spans: &[(usize, usize)],
    clustered_len: usize,
    variant: &Variant,
    missed: usize,
    pattern_len: usize,
) -> f64 {
    if spans.is_empty() || variant.is_empty() {
        return 0.0;
    }
    let separators = variant.boundary_separators();

    let mut base = if let [(start, end)] = spans {
        if separators.is_empty() {
            single_without_separators(variant, *start, *end)
        } else {
            with_separators(variant, separators, *start, *end)
        }
    } else {
        let weighted: f64 = spans
            .iter()
            .map(|&(start, end)| {
                let b = if separators.is_empty() {
                    start_score(variant, start)
                } else {
                    with_separators(variant, separators, start, end)
                };
                b * count_to_f64(end - start)
            })
            .sum();
        let width: usize = spans.iter().map(|&(s, e)| e - s).sum();
        let average = weighted / count_to_f64(width.max(1));
        let as_one = spans.windows(2).all(|w| w[1].0 == w[0].1 + 1);
        average * MANY_CLUSTERS_SHARE + if as_one { AS_ONE_SHARE } else { 0.0 }
    };

    if count_to_f64(clustered_len) / count_to_f64(variant.len()) >= MAJORITY_RATIO {
        base += MAJORITY_BONUS;
    }

    let found = 1.0 - count_to_f64(missed) / count_to_f64(pattern_len.max(1));
    let excess = excess_separators(spans, separators);
    base.min(1.0) * PLACEMENT_MAX * found.max(0.0)
        / (1.0 + EXCESS_SEPARATOR_DISCOUNT * count_to_f64(excess))
}

fn single_without_separators(variant: &Variant, start: usize, end: usize) -> f64 {
    let at_end = end == variant.len();
    match (start == 0, at_end) {
        (true, true) => 1.0,
        (true, false) => 0.8,
        (false, true) => 0.6,
        (false, false) if variant.is_word_start(start) => 0.5,
        (false, false) => 0.15,
    }
}

/// Start quality of one of several clusters in a separator-free variant
fn start_score(variant: &Variant, start: usize) -> f64 {
    if start == 0 {
        return 1.0;
    }
    match variant.word_start_placing(start) {
        Some(Placing::Independent) => 0.8,
        Some(Placing::Dependent) => 0.6,
        None => 0.15,
    }
}

fn with_separators(variant: &Variant, separators: &[usize], start: usize, end: usize) -> f64 {
    let (Some(&first), Some(&last)) = (separators.first(), separators.last()) else {
        return single_without_separators(variant, start, end);
    };
    let region = if end <= first {
        Region::Leading
    } else if start > last {
        Region::Trailing
    } else {
        Region::Interior
    };
    let aligned_start = variant.starts_at_boundary(start);
    let aligned_end = variant.ends_at_boundary(end);
    let end_bonus = |value: f64| if aligned_end { value } else { 0.0 };

    match region {
        Region::Leading if start == 0 => 0.8 + end_bonus(0.2),
        Region::Leading if variant.is_word_start(start) => 0.5,
        Region::Leading => 0.15,
        Region::Trailing if aligned_start => 0.85 + end_bonus(0.15),
        Region::Trailing if variant.is_word_start(start) => 0.55,
        Region::Trailing => 0.2,
        Region::Interior if separators.iter().any(|&s| start <= s && s < end) => 0.2,
        Region::Interior if aligned_start => 0.7 + end_bonus(0.2),
        Region::Interior if variant.is_word_start(start) => 0.45,
        Region::Interior => 0.15,
    }
}

/// Separators between consecutive clusters beyond one per gap
fn excess_separators(spans: &[(usize, usize)], separators: &[usize]) -> usize {
    let between = spans
        .windows(2)
        .map(|w| separators.iter().filter(|&&s| w[0].1 <= s && s < w[1].0).count())
        .sum::<usize>();
    between.saturating_sub(spans.len().saturating_sub(1))
}
