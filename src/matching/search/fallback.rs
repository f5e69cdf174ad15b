//! Step 4: candidate voting.
//!
//! No more typo search. Each remaining character takes the single best free
//! occurrence according to how well it sits among what is already resolved.

use std::cmp::Ordering;

use tracing::trace;

use super::{contest, SearchContext};
use crate::matching::constants::LOCAL_CLUSTER_REACH;
use crate::matching::positions::{PositionMap, SearchStep};
use crate::matching::trace::SEARCH_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Vote {
    position: usize,
    /// Resolved positions in the same word
    intersections: usize,
    /// Exactly one position off from where a resolved neighbour expects it
    adjacent: bool,
    /// Resolved positions within the local reach
    local: usize,
    /// Distance to the nearest resolved position
    distance: usize,
    separator_adjacent: bool,
}

impl Vote {
    fn cast(ctx: &SearchContext<'_>, map: &PositionMap, i: usize, position: usize) -> Self {
        let resolved: Vec<usize> = map.matched().into_iter().map(|(_, pos)| pos).collect();
        let word = ctx.variant.word_of(position);

        let intersections = word.map_or(0, |w| resolved.iter().filter(|&&q| w.contains(q)).count());
        let local = resolved
            .iter()
            .filter(|&&q| q.abs_diff(position) <= LOCAL_CLUSTER_REACH)
            .count();
        let distance = resolved
            .iter()
            .map(|&q| q.abs_diff(position))
            .min()
            .unwrap_or(usize::MAX);

        Self {
            position,
            intersections,
            adjacent: map.neighbor_deviation(i, position) == 1,
            local,
            distance,
            separator_adjacent: ctx.variant.starts_at_boundary(position)
                || ctx.variant.ends_at_boundary(position + 1),
        }
    }

    /// `Greater` means `self` is the better vote
    fn rank(&self, other: &Self) -> Ordering {
        self.intersections
            .cmp(&other.intersections)
            .then(self.adjacent.cmp(&other.adjacent))
            .then(self.local.cmp(&other.local))
            .then(other.distance.cmp(&self.distance))
            .then(self.separator_adjacent.cmp(&other.separator_adjacent))
            .then(other.position.cmp(&self.position))
    }
}

pub(super) fn resolve(ctx: &SearchContext<'_>, map: &mut PositionMap) {
    for i in 0..ctx.pattern.len() {
        if !map.is_unresolved(i) {
            continue;
        }
        let best = ctx
            .remaining(map, i)
            .into_iter()
            .map(|pos| Vote::cast(ctx, map, i, pos))
            .fold(None::<Vote>, |best, vote| match best {
                Some(b) if vote.rank(&b) != Ordering::Greater => Some(b),
                _ => Some(vote),
            });

        if let Some(vote) = best {
            if ctx.trace.search {
                trace!(
                    target: SEARCH_TARGET,
                    pattern_index = i,
                    position = vote.position,
                    intersections = vote.intersections,
                    distance = vote.distance,
                    "fallback vote"
                );
            }
            contest(ctx, map, i, vote.position, SearchStep::Fallback);
        }
    }
}
