//! Step 1: direct clustering.
//!
//! Every occurrence of an unresolved pattern character anchors a candidate
//! run: the adjacent match is extended in both directions while pattern and
//! variant keep agreeing, then a near-match just past each extremity is
//! merged in and followed for as long as it stays contiguous.

use std::cmp::Ordering;

use tracing::trace;

use super::{contest, SearchContext};
use crate::matching::constants::TYPO_WINDOW;
use crate::matching::positions::{PositionMap, SearchStep};
use crate::matching::trace::SEARCH_TARGET;

/// A merged near-match chain: (pattern index, variant position) pairs
type Chain = Vec<(usize, usize)>;

/// One occurrence-anchored candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Run {
    /// (pattern index, variant position) the run was built from
    anchor: (usize, usize),
    /// Pattern index of the core start
    pattern_start: usize,
    /// Variant position of the core start
    start: usize,
    /// Length of the exactly adjacent core
    len: usize,
    merges: Vec<Chain>,
    touches_boundary: bool,
}

impl Run {
    /// Core plus one per merged near-match
    fn effective_len(&self) -> usize {
        self.len + self.merges.len()
    }

    fn total(&self) -> usize {
        self.len + self.merges.iter().map(Vec::len).sum::<usize>()
    }

    fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len)
            .map(move |k| (self.pattern_start + k, self.start + k))
            .chain(self.merges.iter().flatten().copied())
    }

    /// Longer effective length, then more matched characters, then touching a
    /// word boundary, then leftmost
    fn rank(&self, other: &Self) -> Ordering {
        self.effective_len()
            .cmp(&other.effective_len())
            .then(self.total().cmp(&other.total()))
            .then(self.touches_boundary.cmp(&other.touches_boundary))
            .then(other.start.cmp(&self.start))
    }
}

pub(super) fn resolve(ctx: &SearchContext<'_>, map: &mut PositionMap) {
    let n = ctx.pattern.len();
    for i in 0..n {
        if !map.is_unresolved(i) {
            continue;
        }
        let c = ctx.pattern.at(i);
        let candidates = ctx.candidates(map, i);

        let mut runs: Vec<Run> = candidates
            .iter()
            .map(|&pos| build_run(ctx, map, i, pos))
            .filter(|run| run.effective_len() >= 2)
            .collect();
        runs.sort_by(|a, b| b.rank(a));

        let committed = runs.iter().any(|run| commit(ctx, map, run));
        if !committed
            && candidates.len() == 1
            && ctx.variant.count(c) == 1
            && ctx.pattern.count(c) == 1
        {
            contest(ctx, map, i, candidates[0], SearchStep::Direct);
        }
    }
}

/// Claim the anchor, then the rest of the run; nothing is taken when the
/// anchor loses its contest
fn commit(ctx: &SearchContext<'_>, map: &mut PositionMap, run: &Run) -> bool {
    let (i, pos) = run.anchor;
    if !contest(ctx, map, i, pos, SearchStep::Direct).won() {
        return false;
    }
    if ctx.trace.search {
        trace!(
            target: SEARCH_TARGET,
            anchor = i,
            start = run.start,
            core = run.len,
            merges = run.merges.len(),
            "direct run"
        );
    }
    for (pi, p) in run.pairs().filter(|&pair| pair != run.anchor) {
        map.claim(pi, p, SearchStep::Direct);
    }
    for _ in &run.merges {
        map.note_merge();
    }
    true
}

/// Build the run anchored on `p[i]` matched at `pos`
pub(super) fn build_run(ctx: &SearchContext<'_>, map: &PositionMap, i: usize, pos: usize) -> Run {
    let (mut l, mut s) = (i, pos);
    while l > 0 && s > 0 && ctx.usable(map, l - 1, s - 1) {
        l -= 1;
        s -= 1;
    }
    let (mut r, mut e) = (i, pos);
    while ctx.usable(map, r + 1, e + 1) {
        r += 1;
        e += 1;
    }

    let mut merges = Vec::new();
    if let Some(chain) = merge_left(ctx, map, l, s) {
        merges.push(chain);
    }
    if let Some(chain) = merge_right(ctx, map, r, e) {
        merges.push(chain);
    }

    let variant = ctx.variant;
    let touches_boundary =
        variant.is_word_start(s) || variant.is_word_last(e) || variant.ends_at_boundary(e + 1);

    Run {
        anchor: (i, pos),
        pattern_start: l,
        start: s,
        len: r - l + 1,
        merges,
        touches_boundary,
    }
}

/// Near-match after the core ending at pattern `r`, variant `e`
fn merge_right(ctx: &SearchContext<'_>, map: &PositionMap, r: usize, e: usize) -> Option<Chain> {
    if !map.is_unresolved(r + 1) {
        return None;
    }
    // The variant has extra characters before the next pattern character
    let skipped_variant = (1..=TYPO_WINDOW)
        .map(|d| e + 1 + d)
        .find(|&pos| ctx.usable(map, r + 1, pos))
        .map(|pos| (r + 1, pos));
    // The pattern has extra characters before the next variant character
    let skipped_pattern = || {
        (1..=TYPO_WINDOW)
            .map(|d| r + 1 + d)
            .find(|&pi| ctx.usable(map, pi, e + 1))
            .map(|pi| (pi, e + 1))
    };

    skipped_variant
        .or_else(skipped_pattern)
        .map(|(pi, pos)| chain_right(ctx, map, pi, pos))
}

/// Near-match before the core starting at pattern `l`, variant `s`
fn merge_left(ctx: &SearchContext<'_>, map: &PositionMap, l: usize, s: usize) -> Option<Chain> {
    if l == 0 || s == 0 || !map.is_unresolved(l - 1) {
        return None;
    }
    let skipped_variant = (1..=TYPO_WINDOW)
        .filter(|&d| s > d)
        .map(|d| s - 1 - d)
        .find(|&pos| ctx.usable(map, l - 1, pos))
        .map(|pos| (l - 1, pos));
    let skipped_pattern = || {
        (1..=TYPO_WINDOW)
            .filter(|&d| l > d)
            .map(|d| l - 1 - d)
            .find(|&pi| ctx.usable(map, pi, s - 1))
            .map(|pi| (pi, s - 1))
    };

    skipped_variant
        .or_else(skipped_pattern)
        .map(|(pi, pos)| chain_left(ctx, map, pi, pos))
}

fn chain_right(ctx: &SearchContext<'_>, map: &PositionMap, pi: usize, pos: usize) -> Chain {
    let mut chain = vec![(pi, pos)];
    let (mut pi, mut pos) = (pi, pos);
    while ctx.usable(map, pi + 1, pos + 1) {
        pi += 1;
        pos += 1;
        chain.push((pi, pos));
    }
    chain
}

fn chain_left(ctx: &SearchContext<'_>, map: &PositionMap, pi: usize, pos: usize) -> Chain {
    let mut chain = vec![(pi, pos)];
    let (mut pi, mut pos) = (pi, pos);
    while pi > 0 && pos > 0 && ctx.usable(map, pi - 1, pos - 1) {
        pi -= 1;
        pos -= 1;
        chain.push((pi, pos));
    }
    chain
}
