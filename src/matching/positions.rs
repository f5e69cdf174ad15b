use std::collections::HashSet;

use serde::Serialize;

/// Resolution state of one pattern character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Uninitialized,
    NotFound,
    At(usize),
}

/// Which part of the search resolved a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStep {
    /// Exact substring containment, filled before any search
    Substring,
    /// Step 1: adjacent runs anchored on occurrences
    Direct,
    /// Step 2: widened neighbourhood typo search
    Typo,
    /// Step 3: typo search under the looser length gate
    LooseTypo,
    /// Step 4: candidate voting
    Fallback,
    /// Unique occurrence forced in after all steps
    Salvage,
}

impl std::fmt::Display for SearchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Direct => write!(f, "direct"),
            Self::Typo => write!(f, "typo"),
            Self::LooseTypo => write!(f, "loose_typo"),
            Self::Fallback => write!(f, "fallback"),
            Self::Salvage => write!(f, "salvage"),
        }
    }
}

/// Pattern index → variant position mapping for one evaluation
#[derive(Debug, Clone)]
pub struct PositionMap {
    slots: Vec<Slot>,
    found_by: Vec<Option<SearchStep>>,
    /// Pattern index owning each variant position
    owner: Vec<Option<usize>>,
    /// (pattern index, variant position) pairs that lost a conflict
    garbage: HashSet<(usize, usize)>,
    merges: usize,
}

impl PositionMap {
    #[must_use]
    pub fn new(pattern_len: usize, variant_len: usize) -> Self {
        Self {
            slots: vec![Slot::Uninitialized; pattern_len],
            found_by: vec![None; pattern_len],
            owner: vec![None; variant_len],
            garbage: HashSet::new(),
            merges: 0,
        }
    }

    /// Pattern length
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, i: usize) -> Slot {
        self.slots[i]
    }

    /// Matched position of pattern index `i`
    #[must_use]
    pub fn position(&self, i: usize) -> Option<usize> {
        match self.slots.get(i) {
            Some(Slot::At(pos)) => Some(*pos),
            _ => None,
        }
    }

    #[must_use]
    pub fn found_by(&self, i: usize) -> Option<SearchStep> {
        self.found_by[i]
    }

    #[must_use]
    pub fn is_unresolved(&self, i: usize) -> bool {
        matches!(self.slots.get(i), Some(Slot::Uninitialized))
    }

    #[must_use]
    pub fn is_resolved(&self, i: usize) -> bool {
        self.position(i).is_some()
    }

    /// Variant position not owned by any pattern index
    #[must_use]
    pub fn is_free(&self, pos: usize) -> bool {
        matches!(self.owner.get(pos), Some(None))
    }

    #[must_use]
    pub fn owner(&self, pos: usize) -> Option<usize> {
        self.owner.get(pos).copied().flatten()
    }

    #[must_use]
    pub fn is_garbage(&self, i: usize, pos: usize) -> bool {
        self.garbage.contains(&(i, pos))
    }

    #[must_use]
    pub fn unresolved(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.is_unresolved(i)).collect()
    }

    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Uninitialized))
            .count()
    }

    /// Record a resolution. Both sides must be free.
    pub fn set(&mut self, i: usize, pos: usize, step: SearchStep) {
        debug_assert!(self.is_unresolved(i), "pattern slot {i} already resolved");
        debug_assert!(self.is_free(pos), "variant position {pos} already owned");
        self.slots[i] = Slot::At(pos);
        self.found_by[i] = Some(step);
        self.owner[pos] = Some(i);
    }

    /// Claim `pos` for `i`, resolving a collision with the current owner.
    ///
    /// The side whose position deviates less from its resolved neighbours
    /// keeps the slot; the current owner wins ties. The losing pair is marked
    /// garbage and never offered again. Returns whether `i` got the slot.
    pub fn claim(&mut self, i: usize, pos: usize, step: SearchStep) -> bool {
        if !self.is_unresolved(i) || self.is_garbage(i, pos) || pos >= self.owner.len() {
            return false;
        }
        let Some(current) = self.owner(pos) else {
            self.set(i, pos, step);
            return true;
        };

        let challenger = self.neighbor_deviation(i, pos);
        let incumbent = self.neighbor_deviation(current, pos);
        if challenger < incumbent {
            self.release(current);
            self.set(i, pos, step);
            true
        } else {
            self.garbage.insert((i, pos));
            false
        }
    }

    /// Undo the resolution of `i`, marking its pair garbage
    fn release(&mut self, i: usize) {
        if let Slot::At(pos) = self.slots[i] {
            self.garbage.insert((i, pos));
            self.owner[pos] = None;
            self.slots[i] = Slot::Uninitialized;
            self.found_by[i] = None;
        }
    }

    /// Distance between `pos` and the position implied by the nearest resolved
    /// pattern neighbour on either side; `usize::MAX` without neighbours
    #[must_use]
    pub fn neighbor_deviation(&self, i: usize, pos: usize) -> usize {
        let left = (0..i)
            .rev()
            .find_map(|k| self.position(k).map(|p| (k, p)));
        let right = (i + 1..self.len()).find_map(|k| self.position(k).map(|p| (k, p)));

        [left, right]
            .into_iter()
            .flatten()
            .filter(|&(_, p)| p != pos)
            .map(|(k, p)| {
                let expected = p as isize + (i as isize - k as isize);
                (pos as isize - expected).unsigned_abs()
            })
            .min()
            .unwrap_or(usize::MAX)
    }

    /// Count a near-match merged into a direct run
    pub fn note_merge(&mut self) {
        self.merges += 1;
    }

    #[must_use]
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// Close the search: every still-uninitialized slot becomes `NotFound`
    pub fn finish(&mut self) {
        for slot in &mut self.slots {
            if *slot == Slot::Uninitialized {
                *slot = Slot::NotFound;
            }
        }
    }

    /// Resolved (pattern index, variant position) pairs in pattern order
    #[must_use]
    pub fn matched(&self) -> Vec<(usize, usize)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                Slot::At(pos) => Some((i, *pos)),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn missed(&self) -> usize {
        self.slots.iter().filter(|s| !matches!(s, Slot::At(_))).count()
    }

    /// Matched positions strictly increase along the pattern
    #[must_use]
    pub fn is_in_order(&self) -> bool {
        self.matched().windows(2).all(|w| w[0].1 < w[1].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_finish() {
        let mut map = PositionMap::new(3, 5);
        map.set(0, 2, SearchStep::Direct);
        assert_eq!(map.position(0), Some(2));
        assert!(!map.is_free(2));
        assert_eq!(map.owner(2), Some(0));
        assert_eq!(map.unresolved(), vec![1, 2]);

        map.finish();
        assert_eq!(map.slot(1), Slot::NotFound);
        assert_eq!(map.slot(2), Slot::NotFound);
        assert_eq!(map.unresolved_count(), 0);
        assert_eq!(map.missed(), 2);
        assert_eq!(map.matched(), vec![(0, 2)]);
    }

    #[test]
    fn test_neighbor_deviation() {
        let mut map = PositionMap::new(4, 10);
        map.set(0, 3, SearchStep::Direct);
        // Pattern index 1 is expected right after position 3
        assert_eq!(map.neighbor_deviation(1, 4), 0);
        assert_eq!(map.neighbor_deviation(1, 6), 2);
        // No neighbours at all
        let empty = PositionMap::new(2, 4);
        assert_eq!(empty.neighbor_deviation(0, 1), usize::MAX);
    }

    #[test]
    fn test_claim_conflict_challenger_wins() {
        // pattern "abc" where index 2 grabbed position 1, but index 1 sits next to index 0
        let mut map = PositionMap::new(3, 6);
        map.set(0, 0, SearchStep::Direct);
        map.set(2, 1, SearchStep::Fallback);
        assert!(map.claim(1, 1, SearchStep::Salvage));
        assert_eq!(map.position(1), Some(1));
        assert!(map.is_unresolved(2));
        assert!(map.is_garbage(2, 1));
    }

    #[test]
    fn test_claim_conflict_incumbent_wins() {
        let mut map = PositionMap::new(3, 6);
        map.set(0, 0, SearchStep::Direct);
        map.set(1, 1, SearchStep::Direct);
        assert!(!map.claim(2, 1, SearchStep::Salvage));
        assert_eq!(map.position(1), Some(1));
        assert!(map.is_garbage(2, 1));
        // A garbage pair is never retried
        assert!(!map.claim(2, 1, SearchStep::Salvage));
    }

    #[test]
    fn test_in_order_skips_missed() {
        let mut map = PositionMap::new(3, 6);
        map.set(0, 1, SearchStep::Direct);
        map.set(2, 4, SearchStep::Direct);
        map.finish();
        assert!(map.is_in_order());

        let mut map = PositionMap::new(3, 6);
        map.set(0, 4, SearchStep::Direct);
        map.set(1, 2, SearchStep::Direct);
        map.set(2, 0, SearchStep::Direct);
        assert!(!map.is_in_order());
    }
}
