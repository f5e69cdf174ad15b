//! Position search: resolve every pattern character to a variant position.
//!
//! The search is a small state machine over strictly ordered steps. Each step
//! only looks at the pattern indices the previous steps left unresolved:
//!
//! 1. **Direct**: occurrence-anchored adjacent runs with near-match merging
//!    ([`direct`])
//! 2. **Typo**: widened neighbourhood and in-word scan, patterns of 4+
//!    characters ([`typo`])
//! 3. **Loose typo**: the same search for patterns of 3+ characters
//! 4. **Fallback**: candidate voting, no typo search ([`fallback`])
//! 5. **Salvage**: a letter occurring exactly once in the variant is forced in
//!
//! Every step commits through [`PositionMap::claim`]. Direct runs, typo
//! candidates and salvage may name a position another pattern character
//! already owns; the claim settles the contest and the loser's pair is never
//! offered again. Fallback only votes over free occurrences. Whatever is still
//! unresolved afterwards is `NotFound` and counts as missed.

mod direct;
mod fallback;
mod typo;

use tracing::debug;

use crate::core::pattern::Pattern;
use crate::core::variant::Variant;
use crate::matching::constants::{LOOSE_TYPO_MIN_PATTERN_LEN, TYPO_MIN_PATTERN_LEN};
use crate::matching::positions::{PositionMap, SearchStep, Slot};
use crate::matching::trace::{TraceChannels, SEARCH_TARGET};

/// Read-only inputs shared by every search step
pub(crate) struct SearchContext<'a> {
    pub pattern: &'a Pattern,
    pub variant: &'a Variant,
    pub trace: TraceChannels,
}

impl SearchContext<'_> {
    /// `p[i]` can be matched at the free variant position `pos`
    pub fn usable(&self, map: &PositionMap, i: usize, pos: usize) -> bool {
        i < self.pattern.len()
            && pos < self.variant.len()
            && map.is_unresolved(i)
            && map.is_free(pos)
            && !map.is_garbage(i, pos)
            && self.pattern.at(i) == self.variant.at(pos)
    }

    /// `p[i]` can claim `pos`, contesting its owner if there is one
    pub fn contestable(&self, map: &PositionMap, i: usize, pos: usize) -> bool {
        i < self.pattern.len()
            && pos < self.variant.len()
            && map.is_unresolved(i)
            && !map.is_garbage(i, pos)
            && self.pattern.at(i) == self.variant.at(pos)
    }

    /// Non-garbage occurrences of `p[i]`, owned ones included
    pub fn candidates(&self, map: &PositionMap, i: usize) -> Vec<usize> {
        self.variant
            .occurrences(self.pattern.at(i))
            .into_iter()
            .filter(|&pos| !map.is_garbage(i, pos))
            .collect()
    }

    /// Free, non-garbage occurrences of `p[i]`
    pub fn remaining(&self, map: &PositionMap, i: usize) -> Vec<usize> {
        self.candidates(map, i)
            .into_iter()
            .filter(|&pos| map.is_free(pos))
            .collect()
    }
}

/// Claim `pos` for `i` and log the contest when the slot was owned
pub(crate) fn contest(
    ctx: &SearchContext<'_>,
    map: &mut PositionMap,
    i: usize,
    pos: usize,
    step: SearchStep,
) -> ClaimResult {
    let owner = map.owner(pos);
    let won = map.claim(i, pos, step);
    if let (Some(owner), true) = (owner, ctx.trace.search) {
        debug!(
            target: SEARCH_TARGET,
            %step,
            pattern_index = i,
            position = pos,
            owner,
            won,
            "position contested"
        );
    }
    match (won, owner) {
        (false, _) => ClaimResult::Lost,
        (true, Some(owner)) => ClaimResult::Displaced(owner),
        (true, None) => ClaimResult::Taken,
    }
}

/// Outcome of [`contest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClaimResult {
    /// The position was free
    Taken,
    /// The previous owner lost and is unresolved again
    Displaced(usize),
    /// The pair is garbage now
    Lost,
}

impl ClaimResult {
    #[must_use]
    pub fn won(self) -> bool {
        self != Self::Lost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Direct,
    Typo,
    LooseTypo,
    Fallback,
    Salvage,
    Done,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Self::Direct => Self::Typo,
            Self::Typo => Self::LooseTypo,
            Self::LooseTypo => Self::Fallback,
            Self::Fallback => Self::Salvage,
            Self::Salvage | Self::Done => Self::Done,
        }
    }
}

/// Run the full search for one pair
pub(crate) fn search(pattern: &Pattern, variant: &Variant, trace: TraceChannels) -> PositionMap {
    let ctx = SearchContext {
        pattern,
        variant,
        trace,
    };
    let mut map = PositionMap::new(pattern.len(), variant.len());
    let mut phase = Phase::Direct;

    while phase != Phase::Done {
        if map.unresolved_count() == 0 {
            break;
        }
        let before = map.unresolved_count();
        match phase {
            Phase::Direct => direct::resolve(&ctx, &mut map),
            Phase::Typo => {
                if pattern.len() >= TYPO_MIN_PATTERN_LEN {
                    typo::resolve(&ctx, &mut map, SearchStep::Typo);
                }
            }
            Phase::LooseTypo => {
                if pattern.len() >= LOOSE_TYPO_MIN_PATTERN_LEN {
                    typo::resolve(&ctx, &mut map, SearchStep::LooseTypo);
                }
            }
            Phase::Fallback => fallback::resolve(&ctx, &mut map),
            Phase::Salvage => salvage(&ctx, &mut map),
            Phase::Done => {}
        }
        if trace.search {
            debug!(
                target: SEARCH_TARGET,
                phase = ?phase,
                resolved = before - map.unresolved_count(),
                remaining = map.unresolved_count(),
                "search step finished"
            );
        }
        phase = phase.next();
    }

    map.finish();
    debug_assert!(
        map.slots().iter().all(|s| *s != Slot::Uninitialized),
        "search left an uninitialized slot"
    );
    map
}

/// Fill positions sequentially from a substring match at `start`
pub(crate) fn fill_substring(pattern: &Pattern, variant: &Variant, start: usize) -> PositionMap {
    let mut map = PositionMap::new(pattern.len(), variant.len());
    for i in 0..pattern.len() {
        map.set(i, start + i, SearchStep::Substring);
    }
    map.finish();
    map
}

/// Force in letters that occur exactly once in the variant
fn salvage(ctx: &SearchContext<'_>, map: &mut PositionMap) {
    for i in map.unresolved() {
        let c = ctx.pattern.at(i);
        if ctx.variant.count(c) != 1 {
            continue;
        }
        let occurrences = ctx.variant.occurrences(c);
        let Some(&pos) = occurrences.first() else {
            continue;
        };
        let result = contest(ctx, map, i, pos, SearchStep::Salvage);
        if ctx.trace.search {
            debug!(
                target: SEARCH_TARGET,
                pattern_index = i,
                position = pos,
                won = result.won(),
                "salvage claim"
            );
        }
    }
}
