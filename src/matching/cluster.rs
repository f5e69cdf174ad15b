//! Cluster detection and order-consistency analysis.
//!
//! Matched positions are walked in variant order and split into maximal
//! soft-contiguous runs. Each run of two or more characters is a cluster; its
//! order-diff measures how far the pattern indices read along the variant
//! deviate from the pattern slice most members agree on. Self-cancelling
//! deviations are forgiven, anything left beyond a length-relative tolerance
//! tears the cluster down or rejects it.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::core::variant::Variant;
use crate::matching::constants::{
    residual_tolerance, CLUSTER_CHAR_REWARD, CLUSTER_LINK_REWARD, FORGIVEN_PENALTY,
    REJECTED_CLUSTER_PENALTY, RESIDUAL_PENALTY, TEARDOWN_PENALTY,
};
use crate::matching::trace::{TraceChannels, CLUSTER_TARGET};
use crate::matching::weight::{count_to_f64, Contribution, Weight};

/// Outcome of the order analysis for one cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterState {
    /// Pattern order read straight along the variant
    Consistent,
    /// Only self-cancelling deviations
    Forgiven,
    /// Unexplained deviation within tolerance
    Residual,
    /// Unexplained members demoted to non-clustered credit
    TornDown,
    /// Teardown lifted by a mutually compensating cluster
    Exempt,
    /// Whole cluster demoted
    Rejected,
}

impl std::fmt::Display for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consistent => write!(f, "consistent"),
            Self::Forgiven => write!(f, "forgiven"),
            Self::Residual => write!(f, "residual"),
            Self::TornDown => write!(f, "torn_down"),
            Self::Exempt => write!(f, "exempt"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Result of scanning an order-diff for self-cancelling patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OrderAnalysis {
    /// Members explained by swaps, triples or repeated-value runs
    pub forgiven: usize,
    /// Sum of absolute deviation over unexplained members
    pub residual: usize,
    /// Length of the longest forgiven repeated-value run
    pub repeat_quantity: usize,
    /// Offsets (within the cluster) of unexplained members
    pub unexplained: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    /// (pattern index, variant position) in variant order
    members: Vec<(usize, usize)>,
    order_diff: Vec<isize>,
    state: ClusterState,
    forgiven: usize,
    residual: usize,
    repeat_quantity: usize,
    /// Pattern indices demoted out of the cluster
    torn: Vec<usize>,
}

impl Cluster {
    fn new(members: Vec<(usize, usize)>) -> Self {
        debug_assert!(members.len() >= 2, "a cluster needs at least two members");
        let indices: Vec<usize> = members.iter().map(|&(pi, _)| pi).collect();
        Self {
            order_diff: order_diff(&indices),
            members,
            state: ClusterState::Consistent,
            forgiven: 0,
            residual: 0,
            repeat_quantity: 0,
            torn: Vec::new(),
        }
    }

    #[must_use]
    pub fn members(&self) -> &[(usize, usize)] {
        &self.members
    }

    #[must_use]
    pub fn order_diff(&self) -> &[isize] {
        &self.order_diff
    }

    #[must_use]
    pub fn state(&self) -> ClusterState {
        self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// First variant position
    #[must_use]
    pub fn start(&self) -> usize {
        self.members.first().map_or(0, |&(_, pos)| pos)
    }

    /// One past the last variant position
    #[must_use]
    pub fn end(&self) -> usize {
        self.members.last().map_or(0, |&(_, pos)| pos + 1)
    }

    #[must_use]
    pub fn order_sum(&self) -> isize {
        self.order_diff.iter().sum()
    }

    #[must_use]
    pub fn torn(&self) -> &[usize] {
        &self.torn
    }

    /// Members still credited as clustered
    pub fn kept(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.members
            .iter()
            .copied()
            .filter(|(pi, _)| !self.torn.contains(pi))
    }

    #[must_use]
    pub fn kept_len(&self) -> usize {
        self.members.len() - self.torn.len()
    }

    /// Still counts as a cluster after teardown and rejection
    #[must_use]
    pub fn is_effective(&self) -> bool {
        self.state != ClusterState::Rejected && self.kept_len() >= 2
    }

    /// Variant span of the kept members
    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        let start = self.kept().map(|(_, pos)| pos).min()?;
        let end = self.kept().map(|(_, pos)| pos).max()? + 1;
        Some((start, end))
    }

    fn tear_down(&mut self, offsets: &[usize]) {
        self.torn = offsets.iter().map(|&k| self.members[k].0).collect();
        if self.kept_len() < 2 {
            self.tear_down_all();
        }
    }

    fn tear_down_all(&mut self) {
        self.torn = self.members.iter().map(|&(pi, _)| pi).collect();
    }
}

/// All clusters of one evaluation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
    /// Pattern indices demoted from clusters, sorted
    demoted: Vec<usize>,
}

impl ClusterSet {
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn effective(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| c.is_effective())
    }

    #[must_use]
    pub fn effective_count(&self) -> usize {
        self.effective().count()
    }

    /// Characters credited as clustered
    #[must_use]
    pub fn clustered_len(&self) -> usize {
        self.effective().map(Cluster::kept_len).sum()
    }

    #[must_use]
    pub fn is_clustered(&self, pattern_index: usize) -> bool {
        self.effective()
            .any(|c| c.kept().any(|(pi, _)| pi == pattern_index))
    }

    #[must_use]
    pub fn demoted(&self) -> &[usize] {
        &self.demoted
    }
}

/// `next` continues the run ending at `cur`: directly adjacent, or one
/// skipped non-separator character that repeats a flanking character
pub(crate) fn is_soft_contiguous(variant: &Variant, cur: usize, next: usize) -> bool {
    if next == cur + 1 {
        return true;
    }
    if next != cur + 2 || variant.is_separator(cur + 1) {
        return false;
    }
    let gap = variant.at(cur + 1);
    gap == variant.at(cur) || gap == variant.at(next)
}

/// Split matched pairs into maximal soft-contiguous runs of two or more
pub(crate) fn detect(pairs: &[(usize, usize)], variant: &Variant) -> Vec<Vec<(usize, usize)>> {
    let mut ordered = pairs.to_vec();
    ordered.sort_unstable_by_key(|&(_, pos)| pos);

    let mut runs: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut current: Vec<(usize, usize)> = Vec::new();
    for pair in ordered {
        let continues = current
            .last()
            .is_some_and(|&(_, last)| is_soft_contiguous(variant, last, pair.1));
        if !continues && !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
        current.push(pair);
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs.retain(|run| run.len() >= 2);
    runs
}

/// Deviation of each member's pattern index from the slice most members
/// agree on; without a majority slice the smallest index anchors it
pub(crate) fn order_diff(indices: &[usize]) -> Vec<isize> {
    let offsets: Vec<isize> = indices
        .iter()
        .enumerate()
        .map(|(k, &pi)| pi as isize - k as isize)
        .collect();

    let mut counts: HashMap<isize, usize> = HashMap::new();
    for &o in &offsets {
        *counts.entry(o).or_default() += 1;
    }
    let majority = counts
        .iter()
        .filter(|&(_, &count)| count >= 2)
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&o, _)| o);
    let base = majority.unwrap_or_else(|| indices.iter().min().map_or(0, |&m| m as isize));

    offsets.iter().map(|&o| o - base).collect()
}

/// Scan for adjacent +1/-1 swaps, +2/0/-2 triples and runs of a repeated
/// non-zero value; everything else is residual
pub(crate) fn analyze_order(diff: &[isize]) -> OrderAnalysis {
    let mut analysis = OrderAnalysis::default();
    let mut k = 0;
    while k < diff.len() {
        if diff[k] == 0 {
            k += 1;
            continue;
        }
        if diff[k] == 1 && diff.get(k + 1) == Some(&-1) {
            analysis.forgiven += 2;
            k += 2;
            continue;
        }
        if diff[k] == 2 && diff.get(k + 1) == Some(&0) && diff.get(k + 2) == Some(&-2) {
            analysis.forgiven += 3;
            k += 3;
            continue;
        }
        let run = diff[k..].iter().take_while(|&&d| d == diff[k]).count();
        if run >= 2 {
            analysis.forgiven += run;
            analysis.repeat_quantity = analysis.repeat_quantity.max(run);
            k += run;
            continue;
        }
        analysis.residual += diff[k].unsigned_abs();
        analysis.unexplained.push(k);
        k += 1;
    }
    analysis
}

/// Detect, analyze and weigh the clusters of one evaluation
pub(crate) fn analyze(
    pairs: &[(usize, usize)],
    variant: &Variant,
    weight: &mut Weight,
    trace: TraceChannels,
) -> ClusterSet {
    let matched: HashSet<usize> = pairs.iter().map(|&(_, pos)| pos).collect();
    let mut clusters: Vec<Cluster> = detect(pairs, variant).into_iter().map(Cluster::new).collect();

    for cluster in &mut clusters {
        classify(cluster, variant, &matched);
    }
    exempt_compensating(&mut clusters);

    for cluster in &clusters {
        if trace.cluster {
            debug!(
                target: CLUSTER_TARGET,
                start = cluster.start(),
                len = cluster.len(),
                order_diff = ?cluster.order_diff,
                state = %cluster.state,
                torn = cluster.torn.len(),
                "cluster analyzed"
            );
        }
        weigh(cluster, weight);
    }

    let demoted: BTreeSet<usize> = clusters.iter().flat_map(|c| c.torn.iter().copied()).collect();
    ClusterSet {
        clusters,
        demoted: demoted.into_iter().collect(),
    }
}

fn classify(cluster: &mut Cluster, variant: &Variant, matched: &HashSet<usize>) {
    let analysis = analyze_order(&cluster.order_diff);
    cluster.forgiven = analysis.forgiven;
    cluster.residual = analysis.residual;
    cluster.repeat_quantity = analysis.repeat_quantity;

    if cluster.order_diff.iter().all(|&d| d == 0) {
        cluster.state = ClusterState::Consistent;
        return;
    }

    let (start, end) = (cluster.start(), cluster.end());
    let own: Vec<usize> = cluster.members.iter().map(|&(_, pos)| pos).collect();
    let anchors: Vec<usize> = variant
        .words()
        .iter()
        .filter(|w| w.start < end && w.end > start && matched.contains(&w.start))
        .map(|w| w.start)
        .collect();
    let anchored = !anchors.is_empty();
    let salvageable = cluster.len() == 2
        && (variant.is_word_start(start)
            || variant.is_word_last(end - 1)
            || variant.ends_at_boundary(end));
    let supported = anchored || salvageable;

    if analysis.residual == 0 {
        // A lone reversed pair needs a word start matched by someone else
        if cluster.len() == 2 && anchors.iter().all(|a| own.contains(a)) {
            cluster.state = ClusterState::Rejected;
            cluster.tear_down_all();
        } else {
            cluster.state = ClusterState::Forgiven;
        }
    } else if analysis.residual <= residual_tolerance(cluster.len()) {
        cluster.state = ClusterState::Residual;
    } else if supported {
        cluster.state = ClusterState::TornDown;
        cluster.tear_down(&analysis.unexplained);
    } else {
        cluster.state = ClusterState::Rejected;
        cluster.tear_down_all();
    }
}

/// Two torn-down clusters whose order-diff sums cancel exactly and that share
/// a repeat quantity keep their members
fn exempt_compensating(clusters: &mut [Cluster]) {
    for a in 0..clusters.len() {
        for b in a + 1..clusters.len() {
            let (left, right) = clusters.split_at_mut(b);
            let (x, y) = (&mut left[a], &mut right[0]);
            if x.state != ClusterState::TornDown || y.state != ClusterState::TornDown {
                continue;
            }
            let (sx, sy) = (x.order_sum(), y.order_sum());
            if sx != 0 && sx == -sy && x.repeat_quantity == y.repeat_quantity {
                for c in [x, y] {
                    c.state = ClusterState::Exempt;
                    c.torn.clear();
                }
            }
        }
    }
}

fn weigh(cluster: &Cluster, weight: &mut Weight) {
    if cluster.state == ClusterState::Rejected {
        weight.add(Contribution::RejectedCluster, REJECTED_CLUSTER_PENALTY);
        return;
    }
    let kept = cluster.kept_len();
    if kept >= 2 {
        weight.add(
            Contribution::Cluster,
            -(CLUSTER_CHAR_REWARD * count_to_f64(kept) + CLUSTER_LINK_REWARD * count_to_f64(kept - 1)),
        );
    }
    weight.add(Contribution::ForgivenOrder, FORGIVEN_PENALTY * count_to_f64(cluster.forgiven));
    if matches!(cluster.state, ClusterState::Residual | ClusterState::Exempt) {
        weight.add(Contribution::ResidualOrder, RESIDUAL_PENALTY * count_to_f64(cluster.residual));
    }
    weight.add(Contribution::Teardown, TEARDOWN_PENALTY * count_to_f64(cluster.torn.len()));
}
