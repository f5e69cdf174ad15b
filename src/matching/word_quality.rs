//! Word-level quality of a mapping: credit for characters outside clusters,
//! initials and acronyms, in-word gaps, inversions, unmatched length, and the
//! single-word pattern heuristics.

use std::collections::HashMap;

use crate::core::pattern::Pattern;
use crate::core::types::Placing;
use crate::core::variant::Variant;
use crate::matching::cluster::ClusterSet;
use crate::matching::constants::{
    ACRONYM_BONUS, DEPENDENT_START_CREDIT, DUPLICATE_CREDIT, END_CHAR_BONUS, INDEPENDENT_START_CREDIT,
    INITIAL_CREDIT, INVERSION_PENALTY, IN_WORD_GAP_CAP, IN_WORD_GAP_PENALTY, SCATTER_PENALTY,
    START_CHAR_BONUS, UNMATCHED_LENGTH_PENALTY, WORD_END_CREDIT,
};
use crate::matching::positions::PositionMap;
use crate::matching::weight::{count_to_f64, Contribution, Weight};

pub(crate) fn apply(
    pattern: &Pattern,
    variant: &Variant,
    map: &PositionMap,
    clusters: &ClusterSet,
    weight: &mut Weight,
) {
    let matched = map.matched();
    let cluster_of = cluster_membership(clusters);

    non_clustered_credit(variant, &matched, &cluster_of, weight);
    initials(variant, &matched, weight);
    acronym(variant, map, clusters, weight);
    in_word_gaps(variant, map, weight);
    inversions(map, &cluster_of, weight);
    unmatched_length(variant, matched.len(), weight);

    if pattern.is_single_word() {
        single_word(pattern, variant, map, weight);
    }
}

/// Pattern index -> index of the effective cluster keeping it
fn cluster_membership(clusters: &ClusterSet) -> HashMap<usize, usize> {
    clusters
        .clusters()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_effective())
        .flat_map(|(id, c)| c.kept().map(move |(pi, _)| (pi, id)))
        .collect()
}

fn non_clustered_credit(
    variant: &Variant,
    matched: &[(usize, usize)],
    cluster_of: &HashMap<usize, usize>,
    weight: &mut Weight,
) {
    for &(pi, pos) in matched {
        if cluster_of.contains_key(&pi) {
            continue;
        }
        match variant.word_start_placing(pos) {
            Some(Placing::Independent) => {
                weight.add(Contribution::IndependentStart, -INDEPENDENT_START_CREDIT);
            }
            Some(Placing::Dependent) => {
                weight.add(Contribution::DependentStart, -DEPENDENT_START_CREDIT);
            }
            None if variant.is_word_last(pos) => weight.add(Contribution::WordEnd, -WORD_END_CREDIT),
            None => weight.add(Contribution::Scatter, SCATTER_PENALTY),
        }
    }
}

fn initials(variant: &Variant, matched: &[(usize, usize)], weight: &mut Weight) {
    for &(_, pos) in matched {
        if variant.is_word_start(pos) {
            weight.add(Contribution::Initials, -INITIAL_CREDIT);
        }
    }
}

/// Every character found in pattern order, each on a word start or inside a
/// cluster that starts one, walking two or more consecutive words
fn acronym(variant: &Variant, map: &PositionMap, clusters: &ClusterSet, weight: &mut Weight) {
    let matched = map.matched();
    if map.missed() > 0 || matched.is_empty() || !map.is_in_order() {
        return;
    }
    let anchored_clusters: Vec<(usize, usize)> = clusters
        .effective()
        .filter_map(|c| c.span())
        .filter(|&(start, _)| variant.is_word_start(start))
        .collect();
    let on_initials = matched.iter().all(|&(_, pos)| {
        variant.is_word_start(pos) || anchored_clusters.iter().any(|&(s, e)| s <= pos && pos < e)
    });
    if !on_initials {
        return;
    }

    // positions increase, so word indices never go back
    let mut words: Vec<usize> = matched
        .iter()
        .filter_map(|&(_, pos)| variant.word_of(pos).map(|w| w.index))
        .collect();
    words.dedup();
    let consecutive = words.windows(2).all(|w| w[1] == w[0] + 1);
    if words.len() >= 2 && consecutive {
        weight.add_global(Contribution::Acronym, -ACRONYM_BONUS);
    }
}

/// Characters skipped between consecutive pattern characters in one word
fn in_word_gaps(variant: &Variant, map: &PositionMap, weight: &mut Weight) {
    for i in 1..map.len() {
        let (Some(prev), Some(cur)) = (map.position(i - 1), map.position(i)) else {
            continue;
        };
        if cur <= prev + 1 {
            continue;
        }
        let same_word = match (variant.word_of(prev), variant.word_of(cur)) {
            (Some(a), Some(b)) => a.index == b.index,
            _ => false,
        };
        if same_word {
            let gap = (cur - prev - 1).min(IN_WORD_GAP_CAP);
            weight.add(Contribution::InWordGap, IN_WORD_GAP_PENALTY * count_to_f64(gap));
        }
    }
}

/// Consecutive pattern characters read right to left, unless a cluster
/// already accounted for the swap
fn inversions(map: &PositionMap, cluster_of: &HashMap<usize, usize>, weight: &mut Weight) {
    for i in 1..map.len() {
        let (Some(prev), Some(cur)) = (map.position(i - 1), map.position(i)) else {
            continue;
        };
        if cur >= prev {
            continue;
        }
        let same_cluster = matches!(
            (cluster_of.get(&(i - 1)), cluster_of.get(&i)),
            (Some(a), Some(b)) if a == b
        );
        if !same_cluster {
            weight.add(Contribution::Inversion, INVERSION_PENALTY);
        }
    }
}

fn unmatched_length(variant: &Variant, matched: usize, weight: &mut Weight) {
    if variant.is_empty() {
        return;
    }
    let unmatched = variant.len().saturating_sub(matched);
    let fraction = count_to_f64(unmatched) / count_to_f64(variant.len());
    weight.add_global(Contribution::UnmatchedLength, UNMATCHED_LENGTH_PENALTY * fraction);
}

/// Abbreviation-style single tokens get little out of clustering, so reward
/// doubled letters and matching first and last characters directly
fn single_word(pattern: &Pattern, variant: &Variant, map: &PositionMap, weight: &mut Weight) {
    for i in 1..pattern.len() {
        if pattern.at(i) != pattern.at(i - 1) {
            continue;
        }
        if let (Some(prev), Some(cur)) = (map.position(i - 1), map.position(i)) {
            if cur == prev + 1 {
                weight.add(Contribution::DuplicateChar, -DUPLICATE_CREDIT);
            }
        }
    }

    // first and last only count when the rest reads left to right between them
    if !map.is_in_order() {
        return;
    }
    if map.position(0).is_some_and(|pos| variant.is_word_start(pos)) {
        weight.add_global(Contribution::StartChar, -START_CHAR_BONUS);
    }
    let last = pattern.len() - 1;
    if map.position(last).is_some_and(|pos| variant.is_word_last(pos)) {
        weight.add_global(Contribution::EndChar, -END_CHAR_BONUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::cluster;
    use crate::matching::positions::SearchStep;
    use crate::matching::trace::TraceChannels;

    fn quality(pattern: &str, variant: &str, positions: &[Option<usize>]) -> Weight {
        let p = Pattern::new(pattern).unwrap();
        let v = Variant::new(variant);
        let mut map = PositionMap::new(p.len(), v.len());
        for (i, pos) in positions.iter().enumerate() {
            if let Some(pos) = pos {
                map.set(i, *pos, SearchStep::Direct);
            }
        }
        map.finish();
        let mut weight = Weight::new(p.len());
        let clusters = cluster::analyze(&map.matched(), &v, &mut weight, TraceChannels::default());
        let mut quality = Weight::new(p.len());
        apply(&p, &v, &map, &clusters, &mut quality);
        quality
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_initials_and_acronym() {
        let w = quality("pf", "PathFinder", &[Some(0), Some(4)]);
        assert!(close(w.total_for(Contribution::IndependentStart), -0.35));
        assert!(close(w.total_for(Contribution::DependentStart), -0.30));
        assert!(close(w.total_for(Contribution::Initials), -0.5));
        assert!(close(w.total_for(Contribution::Acronym), -0.6));
        assert!(close(w.total_for(Contribution::StartChar), -0.4));
        assert!(close(w.total_for(Contribution::UnmatchedLength), 0.4));
        assert_eq!(w.total_for(Contribution::InWordGap), 0.0);
    }

    #[test]
    fn test_scatter_inside_one_word() {
        let w = quality("pf", "pathofinder", &[Some(0), Some(5)]);
        assert!(close(w.total_for(Contribution::Scatter), 0.1));
        assert!(close(w.total_for(Contribution::InWordGap), 0.21));
        assert_eq!(w.total_for(Contribution::Acronym), 0.0);
    }

    #[test]
    fn test_no_acronym_with_missed_character() {
        let w = quality("pfx", "PathFinder", &[Some(0), Some(4), None]);
        assert_eq!(w.total_for(Contribution::Acronym), 0.0);
    }

    #[test]
    fn test_reversed_initials_earn_no_acronym() {
        let forward = quality("abc", "A_B_C", &[Some(0), Some(2), Some(4)]);
        assert!(close(forward.total_for(Contribution::Acronym), -0.9));
        assert!(close(forward.total_for(Contribution::StartChar), -0.6));
        assert!(close(forward.total_for(Contribution::EndChar), -0.6));

        let reversed = quality("abc", "C_B_A", &[Some(4), Some(2), Some(0)]);
        assert_eq!(reversed.total_for(Contribution::Acronym), 0.0);
        assert_eq!(reversed.total_for(Contribution::StartChar), 0.0);
        assert_eq!(reversed.total_for(Contribution::EndChar), 0.0);
        assert!(close(reversed.total_for(Contribution::Inversion), 0.3));
        assert!(reversed.value() > forward.value() + 0.5);
    }

    #[test]
    fn test_start_and_end_need_left_to_right_reading() {
        // 'a' starts the variant and 'c' starts a word, but 'b' comes after 'c'
        let w = quality("abc", "adcc_cB", &[Some(0), Some(6), Some(5)]);
        assert_eq!(w.total_for(Contribution::StartChar), 0.0);
        assert_eq!(w.total_for(Contribution::EndChar), 0.0);
        assert_eq!(w.total_for(Contribution::Acronym), 0.0);
    }

    #[test]
    fn test_inversion_outside_cluster() {
        let w = quality("ab", "b_a", &[Some(2), Some(0)]);
        assert!(close(w.total_for(Contribution::Inversion), 0.15));
    }

    #[test]
    fn test_swap_inside_cluster_is_not_inversion() {
        let w = quality("report", "xrepotrx", &[Some(1), Some(2), Some(3), Some(4), Some(6), Some(5)]);
        assert_eq!(w.total_for(Contribution::Inversion), 0.0);
    }

    #[test]
    fn test_single_word_duplicates_and_end() {
        let w = quality("hello", "hello_world", &[Some(0), Some(1), Some(2), Some(3), Some(4)]);
        assert!(close(w.total_for(Contribution::DuplicateChar), -0.1));
        assert!(close(w.total_for(Contribution::StartChar), -1.0));
        assert!(close(w.total_for(Contribution::EndChar), -1.0));
    }

    #[test]
    fn test_multi_word_pattern_skips_single_word_rules() {
        let w = quality("pa fi", "PathFinder", &[Some(0), Some(1), None, Some(4), Some(5)]);
        assert_eq!(w.total_for(Contribution::StartChar), 0.0);
    }
}
