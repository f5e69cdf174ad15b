//! Scoring Property Tests
//!
//! End-to-end checks of the engine's ordering guarantees: reflexivity,
//! substring dominance, monotonic penalties, threshold consistency and
//! independence from batch order, plus the reference scenarios every change
//! to the weighting has to keep.

use fuzzweight::matching::positions::{SearchStep, Slot};
use fuzzweight::{is_bad, is_good, Evaluation, MatchEngine, Outcome, RankOptions, ScoreError};

fn weight(pattern: &str, variant: &str) -> f64 {
    MatchEngine::new()
        .score(pattern, variant)
        .expect("pattern is long enough")
        .weight
}

fn bad(pattern: &str, variant: &str) -> bool {
    MatchEngine::new()
        .score(pattern, variant)
        .expect("pattern is long enough")
        .is_bad
}

/// Initials of a camel-case compound are a strong match
#[test]
fn test_initials_of_compound() {
    let w = weight("pf", "PathFinder");
    assert!((w - (-1.125)).abs() < 1e-6, "got {w}");
    assert!(!bad("pf", "PathFinder"));
}

/// The same letters scattered inside one word are a weaker, still good match
#[test]
fn test_scattered_letters_rank_below_initials() {
    assert!(!bad("pf", "pathofinder"));
    assert!(weight("pf", "pathofinder") > weight("pf", "PathFinder"));
}

/// Consonant abbreviations of a compound are good but below its initials
#[test]
fn test_abbreviation() {
    let w = weight("pthfnd", "PathFinder");
    assert!(!bad("pthfnd", "PathFinder"));
    assert!(w > weight("pf", "PathFinder"));
    assert!(w < -0.5, "got {w}");
}

/// A whole word between separators beats a word prefix
#[test]
fn test_whole_word_beats_prefix() {
    let whole = weight("report", "monthly_report_final.csv");
    let prefix = weight("report", "reports_monthly.csv");
    assert!(!bad("report", "monthly_report_final.csv"));
    assert!(!bad("report", "reports_monthly.csv"));
    assert!(whole < prefix, "{whole} should beat {prefix}");
}

/// Nothing in common is rejected before any clustering
#[test]
fn test_no_common_letters() {
    assert!(bad("xyz", "abc"));
    let eval = MatchEngine::new().evaluate("xyz", "abc").unwrap();
    assert_eq!(eval.outcome, Outcome::TooManyMissed);
    assert!(eval.clusters.clusters().is_empty());
}

#[test]
fn test_short_pattern_is_an_error() {
    assert_eq!(
        MatchEngine::new().score("x", "x"),
        Err(ScoreError::PatternTooShort { len: 1 })
    );
}

/// Equality is the best any variant can do
#[test]
fn test_reflexivity() {
    for pattern in ["pf", "report", "src/main.rs", "PathFinder"] {
        let own = weight(pattern, pattern);
        assert!(!bad(pattern, pattern));
        for other in ["PathFinder", "monthly_report_final.csv", "src/main.rs.bak", "xreportx"] {
            if other.eq_ignore_ascii_case(pattern) {
                continue;
            }
            assert!(
                own < weight(pattern, other),
                "{pattern} against itself should beat {other}"
            );
        }
    }
    assert_eq!(weight("Report", "rePORT"), weight("report", "report"));
}

/// An exact substring beats the same letters with a transposition
#[test]
fn test_substring_dominance() {
    let exact = weight("report", "xreportx");
    let swapped = weight("report", "xrepotrx");
    assert!(!bad("report", "xreportx"));
    assert!(!bad("report", "xrepotrx"));
    assert!(exact < swapped, "{exact} should beat {swapped}");
}

/// Anything short of an in-order reading by direct runs alone
fn needed_resolution(eval: &Evaluation) -> bool {
    let positions: Vec<usize> = eval
        .positions
        .iter()
        .filter_map(|slot| match slot {
            Slot::At(pos) => Some(*pos),
            _ => None,
        })
        .collect();
    eval.found_by.iter().any(|step| *step != Some(SearchStep::Direct))
        || positions.windows(2).any(|w| w[0] >= w[1])
        || eval.missed() > 0
}

fn padded(core: &str) -> Vec<String> {
    let mut out = Vec::new();
    for left in ["", "x", "xx", "q_", "Xq"] {
        for right in ["", "y", "yy", "_y", "Zz_q"] {
            out.push(format!("{left}{core}{right}"));
        }
    }
    out
}

/// The pattern itself, with adjacent swaps, with an inserted character, and
/// as reversed or spread-out initials, each padded on both sides
fn candidates(pattern: &str) -> Vec<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut cores = vec![pattern.to_string()];
    for k in 0..chars.len() - 1 {
        let mut swapped = chars.clone();
        swapped.swap(k, k + 1);
        cores.push(swapped.into_iter().collect());
    }
    for k in 1..chars.len() {
        let mut inserted = chars.clone();
        inserted.insert(k, 'w');
        cores.push(inserted.into_iter().collect());
    }
    let upper: Vec<String> = chars.iter().map(|c| c.to_ascii_uppercase().to_string()).collect();
    cores.push(upper.join("_"));
    cores.push(upper.iter().rev().cloned().collect::<Vec<_>>().join("_"));
    cores.push(upper.concat().chars().rev().collect());
    cores.iter().flat_map(|core| padded(core)).collect()
}

/// An exact substring beats every same-length variant that needed typo,
/// fallback or salvage resolution
#[test]
fn test_substring_dominance_same_length() {
    let engine = MatchEngine::new();
    for pattern in ["abc", "abcd", "cat", "report"] {
        let evals: Vec<Evaluation> = candidates(pattern)
            .iter()
            .map(|v| engine.evaluate(pattern, v).unwrap())
            .collect();
        let substrings: Vec<&Evaluation> =
            evals.iter().filter(|e| e.outcome == Outcome::Substring).collect();
        let resolved: Vec<&Evaluation> = evals
            .iter()
            .filter(|e| e.outcome != Outcome::Substring && e.outcome != Outcome::Equal)
            .filter(|e| needed_resolution(e))
            .collect();
        assert!(!substrings.is_empty() && !resolved.is_empty(), "{pattern}");

        for exact in &substrings {
            for other in &resolved {
                if exact.variant.chars().count() != other.variant.chars().count() {
                    continue;
                }
                assert!(
                    exact.weight < other.weight,
                    "{pattern}: {} ({}) should beat {} ({})",
                    exact.variant,
                    exact.weight,
                    other.variant,
                    other.weight
                );
            }
        }
    }

    assert!(weight("abcd", "xxabcdxx") < weight("abcd", "abdc_xxx"));
    assert!(weight("abc", "aaaabca") < weight("abc", "adcc_cB"));
}

/// Initials read backwards are not an acronym
#[test]
fn test_reversed_initials() {
    let forward = weight("abc", "A_B_C");
    let reversed = weight("abc", "C_B_A");
    assert!(!bad("abc", "A_B_C"));
    assert!(reversed > forward + 0.5, "{reversed} against {forward}");
}

/// Breaking a cluster apart only ever costs
#[test]
fn test_monotonic_penalty() {
    let clustered = weight("cat", "xcatxx_yyy_zz");
    let scattered = weight("cat", "xcxx_yay_ztzz");
    assert!(!bad("cat", "xcatxx_yyy_zz"));
    assert!(clustered < scattered);
    assert!(bad("cat", "xcxx_yay_ztzz"));
}

/// `is_bad` and `is_good` split every weight exactly
#[test]
fn test_threshold_consistency() {
    let engine = MatchEngine::new();
    let pairs = [
        ("pf", "PathFinder"),
        ("pf", "pathofinder"),
        ("cat", "xcxx_yay_ztzz"),
        ("xyz", "abc"),
        ("report", "xrepotrx"),
    ];
    for (pattern, variant) in pairs {
        let score = engine.score(pattern, variant).unwrap();
        assert_eq!(score.is_bad, is_bad(score.weight));
        assert_ne!(is_bad(score.weight), is_good(score.weight));
        assert_eq!(engine.weigh(pattern, variant).unwrap().is_none(), score.is_bad);
    }
}

/// A variant's weight does not depend on what else is in the batch
#[test]
fn test_order_independence() {
    let engine = MatchEngine::new();
    let forward = vec![
        "PathFinder",
        "pathofinder",
        "src/path/finder.rs",
        "abc",
        "PathFinderTest",
    ];
    let mut backward = forward.clone();
    backward.reverse();

    let a = engine.rank("pf", &forward, &RankOptions::default()).unwrap();
    let b = engine.rank("pf", &backward, &RankOptions::default()).unwrap();
    assert_eq!(a.len(), b.len());
    for ranked in &a {
        let twin = b.iter().find(|r| r.variant == ranked.variant).unwrap();
        assert_eq!(ranked.weight, twin.weight);
        assert_eq!(ranked.weight, weight("pf", &ranked.variant));
    }
}

#[test]
fn test_rank_is_sorted_and_filtered() {
    let engine = MatchEngine::new();
    let variants = ["abc", "pathofinder", "PathFinder", "xyz"];
    let ranked = engine.rank("pf", &variants, &RankOptions::default()).unwrap();
    assert_eq!(ranked.len(), 2);
    assert!(ranked.windows(2).all(|w| w[0].weight <= w[1].weight));
    assert!(ranked.iter().all(|r| is_good(r.weight)));
}
