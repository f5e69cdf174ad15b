//! Steps 2 and 3: typo clustering.
//!
//! Looks around already resolved neighbours for transposition and insertion
//! style typos, and scans forward inside the neighbour's word for a short
//! abbreviation run.

use std::cmp::Ordering;

use tracing::trace;

use super::{contest, SearchContext};
use crate::matching::constants::{
    IN_WORD_SCAN_LIMIT, IN_WORD_SCAN_MIN_MATCHES, TIE_DISTANCE, TYPO_NEIGHBOR_REACH,
};
use crate::matching::positions::{PositionMap, SearchStep};
use crate::matching::trace::SEARCH_TARGET;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    pairs: Vec<(usize, usize)>,
    /// Resolved pattern neighbours sitting close to the candidate pairs
    ties: usize,
    /// Deviation of the assessed character from where its neighbours expect it
    deviation: usize,
    boundary: bool,
    duplicates: usize,
    /// Variant position of the assessed character
    position: usize,
}

impl Candidate {
    fn build(ctx: &SearchContext<'_>, map: &PositionMap, i: usize, pairs: Vec<(usize, usize)>) -> Option<Self> {
        let position = pairs.iter().find(|&&(pi, _)| pi == i).map(|&(_, pos)| pos)?;
        let in_pairs = |k: usize| pairs.iter().any(|&(pi, _)| pi == k);

        let mut ties = 0;
        for &(pi, pos) in &pairs {
            for k in [pi.checked_sub(1), Some(pi + 1)].into_iter().flatten() {
                if in_pairs(k) {
                    continue;
                }
                if map.position(k).is_some_and(|q| q != pos && q.abs_diff(pos) <= TIE_DISTANCE) {
                    ties += 1;
                }
            }
        }

        let variant = ctx.variant;
        let last = pairs.iter().map(|&(_, pos)| pos).max().unwrap_or(position);
        let boundary = variant.is_word_start(position) || variant.is_word_last(last);

        let duplicates = pairs
            .iter()
            .filter(|&&(pi, pos)| {
                pi > 0
                    && pos > 0
                    && ctx.pattern.at(pi) == ctx.pattern.at(pi - 1)
                    && variant.at(pos) == variant.at(pos - 1)
            })
            .count();

        Some(Self {
            deviation: map.neighbor_deviation(i, position),
            pairs,
            ties,
            boundary,
            duplicates,
            position,
        })
    }

    /// `Greater` means `self` is the better candidate
    fn rank(&self, other: &Self) -> Ordering {
        self.ties
            .cmp(&other.ties)
            .then(self.pairs.len().cmp(&other.pairs.len()))
            .then(other.deviation.cmp(&self.deviation))
            .then(self.boundary.cmp(&other.boundary))
            .then(self.duplicates.cmp(&other.duplicates))
            .then(other.position.cmp(&self.position))
    }
}

pub(super) fn resolve(ctx: &SearchContext<'_>, map: &mut PositionMap, step: SearchStep) {
    for i in 0..ctx.pattern.len() {
        if !map.is_unresolved(i) {
            continue;
        }

        let mut found = neighbourhood(ctx, map, i);
        found.extend(in_word_scan(ctx, map, i));
        let mut ranked: Vec<Candidate> = found
            .into_iter()
            .filter_map(|pairs| Candidate::build(ctx, map, i, pairs))
            .collect();
        ranked.sort_by(|a, b| b.rank(a));

        for best in ranked {
            // the assessed pair may contest an owner; the rest are free
            if !contest(ctx, map, i, best.position, step).won() {
                continue;
            }
            if ctx.trace.search {
                trace!(
                    target: SEARCH_TARGET,
                    %step,
                    pattern_index = i,
                    position = best.position,
                    matched = best.pairs.len(),
                    ties = best.ties,
                    deviation = best.deviation,
                    "typo candidate accepted"
                );
            }
            for (pi, pos) in best.pairs.into_iter().filter(|&(pi, _)| pi != i) {
                map.claim(pi, pos, step);
            }
            break;
        }
    }
}

/// Positions within reach of the resolved pattern neighbours of `i`, each
/// extended contiguously in both directions
fn neighbourhood(ctx: &SearchContext<'_>, map: &PositionMap, i: usize) -> Vec<Vec<(usize, usize)>> {
    let anchors = [i.checked_sub(1), Some(i + 1)]
        .into_iter()
        .flatten()
        .filter_map(|k| map.position(k));

    let mut seen = Vec::new();
    let mut found = Vec::new();
    for anchor in anchors {
        for offset in -TYPO_NEIGHBOR_REACH..=TYPO_NEIGHBOR_REACH {
            if offset == 0 {
                continue;
            }
            let Some(pos) = anchor.checked_add_signed(offset) else {
                continue;
            };
            if seen.contains(&pos) || !ctx.contestable(map, i, pos) {
                continue;
            }
            seen.push(pos);
            found.push(extend(ctx, map, i, pos));
        }
    }
    found
}

fn extend(ctx: &SearchContext<'_>, map: &PositionMap, i: usize, pos: usize) -> Vec<(usize, usize)> {
    let mut pairs = vec![(i, pos)];
    let (mut pi, mut p) = (i, pos);
    while pi > 0 && p > 0 && ctx.usable(map, pi - 1, p - 1) {
        pi -= 1;
        p -= 1;
        pairs.push((pi, p));
    }
    let (mut pi, mut p) = (i, pos);
    while ctx.usable(map, pi + 1, p + 1) {
        pi += 1;
        p += 1;
        pairs.push((pi, p));
    }
    pairs.sort_unstable();
    pairs
}

/// Greedy forward scan inside the word of the previous pattern character.
/// A single match is noise and yields nothing.
fn in_word_scan(ctx: &SearchContext<'_>, map: &PositionMap, i: usize) -> Option<Vec<(usize, usize)>> {
    let anchor = map.position(i.checked_sub(1)?)?;
    let word = ctx.variant.word_of(anchor)?;
    let end = word.end.min(anchor + 1 + IN_WORD_SCAN_LIMIT);

    let mut pairs = Vec::new();
    let mut pi = i;
    for pos in anchor + 1..end {
        if ctx.usable(map, pi, pos) {
            pairs.push((pi, pos));
            pi += 1;
        }
    }
    (pairs.len() >= IN_WORD_SCAN_MIN_MATCHES).then_some(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pattern::Pattern;
    use crate::core::variant::Variant;
    use crate::matching::trace::TraceChannels;

    fn with_ctx<T>(pattern: &str, variant: &str, f: impl FnOnce(&SearchContext<'_>) -> T) -> T {
        let p = Pattern::new(pattern).unwrap();
        let v = Variant::new(variant);
        let ctx = SearchContext {
            pattern: &p,
            variant: &v,
            trace: TraceChannels::default(),
        };
        f(&ctx)
    }

    #[test]
    fn test_in_word_scan_needs_two_matches() {
        with_ctx("main", "maqqiqn", |ctx| {
            let mut map = PositionMap::new(4, 7);
            map.set(0, 0, SearchStep::Direct);
            map.set(1, 1, SearchStep::Direct);
            assert_eq!(in_word_scan(ctx, &map, 2), Some(vec![(2, 4), (3, 6)]));
        });
        with_ctx("main", "maqqiqq", |ctx| {
            let mut map = PositionMap::new(4, 7);
            map.set(0, 0, SearchStep::Direct);
            map.set(1, 1, SearchStep::Direct);
            assert_eq!(in_word_scan(ctx, &map, 2), None);
        });
    }

    #[test]
    fn test_in_word_scan_stays_in_word() {
        with_ctx("main", "ma_in", |ctx| {
            let mut map = PositionMap::new(4, 5);
            map.set(0, 0, SearchStep::Direct);
            map.set(1, 1, SearchStep::Direct);
            assert_eq!(in_word_scan(ctx, &map, 2), None);
        });
    }

    #[test]
    fn test_neighbourhood_extends_candidates() {
        with_ctx("abcd", "abxcd", |ctx| {
            let mut map = PositionMap::new(4, 5);
            map.set(1, 1, SearchStep::Direct);
            let found = neighbourhood(ctx, &map, 2);
            assert_eq!(found, vec![vec![(2, 3), (3, 4)]]);
        });
    }

    #[test]
    fn test_ties_outrank_length() {
        let near = Candidate {
            pairs: vec![(2, 3)],
            ties: 1,
            deviation: 1,
            boundary: false,
            duplicates: 0,
            position: 3,
        };
        let long = Candidate {
            pairs: vec![(2, 9), (3, 10)],
            ties: 0,
            deviation: 6,
            boundary: true,
            duplicates: 0,
            position: 9,
        };
        assert_eq!(near.rank(&long), Ordering::Greater);
    }

    #[test]
    fn test_closer_neighbour_displaces_owner() {
        // index 1 took the last 'b', which sits right after the 'c' of index 2
        with_ctx("abcb", "qacb", |ctx| {
            let mut map = PositionMap::new(4, 4);
            map.set(0, 1, SearchStep::Direct);
            map.set(1, 3, SearchStep::Direct);
            map.set(2, 2, SearchStep::Direct);
            resolve(ctx, &mut map, SearchStep::Typo);
            assert_eq!(map.position(3), Some(3));
            assert_eq!(map.found_by(3), Some(SearchStep::Typo));
            assert!(map.is_unresolved(1));
            assert!(map.is_garbage(1, 3));
        });
    }

    #[test]
    fn test_better_fitting_owner_keeps_slot() {
        with_ctx("abcb", "qabc", |ctx| {
            let mut map = PositionMap::new(4, 4);
            map.set(0, 1, SearchStep::Direct);
            map.set(1, 2, SearchStep::Direct);
            map.set(2, 3, SearchStep::Direct);
            resolve(ctx, &mut map, SearchStep::Typo);
            assert_eq!(map.position(1), Some(2));
            assert!(map.is_unresolved(3));
            assert!(map.is_garbage(3, 2));
        });
    }

    #[test]
    fn test_typo_before_anchor() {
        with_ctx("abdc", "cabdxxxc", |ctx| {
            let mut map = PositionMap::new(4, 8);
            map.set(0, 1, SearchStep::Direct);
            map.set(1, 2, SearchStep::Direct);
            map.set(2, 3, SearchStep::Direct);
            resolve(ctx, &mut map, SearchStep::Typo);
            assert_eq!(map.position(3), Some(0));
            assert_eq!(map.found_by(3), Some(SearchStep::Typo));
        });
    }

    #[test]
    fn test_loose_typo_for_three_characters() {
        let p = Pattern::new("abc").unwrap();
        let v = Variant::new("cabxxxc");
        let map = super::super::search(&p, &v, TraceChannels::default());
        assert_eq!(map.position(2), Some(0));
        assert_eq!(map.found_by(2), Some(SearchStep::LooseTypo));
    }
}
