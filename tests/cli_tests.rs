//! Command-Line Interface Tests
//!
//! Runs the `fuzzweight` binary against small candidate lists and checks the
//! text, JSON and TSV output of both subcommands.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn fuzzweight() -> Command {
    Command::cargo_bin("fuzzweight").expect("binary is built")
}

fn candidates(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{line}").expect("Failed to write candidate");
    }
    file
}

#[test]
fn test_score_text() {
    fuzzweight()
        .args(["score", "pf", "PathFinder"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight:  -1.1250 (good)"));
}

#[test]
fn test_score_rejected() {
    fuzzweight()
        .args(["score", "xyz", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rejected (bad)"));
}

#[test]
fn test_score_explain() {
    fuzzweight()
        .args(["score", "pf", "PathFinder", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Positions:"))
        .stdout(predicate::str::contains("p -> 0"))
        .stdout(predicate::str::contains("acronym"))
        .stdout(predicate::str::contains("Clusters: none"));
}

#[test]
fn test_score_json() {
    let output = fuzzweight()
        .args(["score", "report", "xreportx", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pattern"], "report");
    assert_eq!(json["is_bad"], false);
    assert!(json["weight"].as_f64().unwrap() < 0.0);
}

#[test]
fn test_score_json_explain_includes_breakdown() {
    let output = fuzzweight()
        .args(["score", "report", "xrepotrx", "--format", "json", "--explain"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["evaluation"]["positions"].as_array().unwrap().len(), 6);
    assert!(!json["evaluation"]["clusters"]["clusters"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn test_score_tsv() {
    fuzzweight()
        .args(["score", "pf", "PathFinder", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pattern\tvariant\tweight\tverdict"))
        .stdout(predicate::str::contains("pf\tPathFinder\t-1.1250\tgood"));
}

#[test]
fn test_pattern_too_short() {
    fuzzweight()
        .args(["score", "p", "PathFinder"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pattern too short"));
}

#[test]
fn test_rank_file() {
    let file = candidates(&["abc", "pathofinder", "PathFinder"]);
    let output = fuzzweight()
        .args(["rank", "pf"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("PathFinder"));
    assert!(lines[1].ends_with("pathofinder"));
}

#[test]
fn test_rank_stdin_with_limit() {
    fuzzweight()
        .args(["rank", "pf", "-", "-n", "1"])
        .write_stdin("pathofinder\nPathFinder\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("PathFinder"))
        .stdout(predicate::str::contains("pathofinder").not());
}

#[test]
fn test_rank_no_worse_than() {
    fuzzweight()
        .args(["rank", "pf", "--no-worse-than", "PathFinder"])
        .write_stdin("pathofinder\nPathFinder\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("pathofinder").not());
}

#[test]
fn test_rank_no_matches() {
    fuzzweight()
        .args(["rank", "pf"])
        .write_stdin("abc\nxyz\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found."));
}

#[test]
fn test_rank_tsv_and_json() {
    fuzzweight()
        .args(["rank", "pf", "--format", "tsv"])
        .write_stdin("abc\nPathFinder\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rank\tindex\tweight\tvariant"))
        .stdout(predicate::str::contains("1\t1\t-1.1250\tPathFinder"));

    let output = fuzzweight()
        .args(["rank", "pf", "--format", "json"])
        .write_stdin("abc\nPathFinder\n")
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["candidates"], 2);
    assert_eq!(json["results"][0]["variant"], "PathFinder");
    assert_eq!(json["results"][0]["index"], 1);
}

#[test]
fn test_missing_input_file() {
    fuzzweight()
        .args(["rank", "pf", "/nonexistent/candidates.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_unknown_trace_channel() {
    fuzzweight()
        .args(["score", "pf", "PathFinder", "--trace", "everything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown trace channel"));
}

#[test]
fn test_trace_goes_to_stderr() {
    fuzzweight()
        .args(["score", "report", "xrepotrx", "--trace", "cluster"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster analyzed").not())
        .stderr(predicate::str::contains("cluster analyzed"));
}

#[test]
fn test_config_default_limit() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, r#"{{"default_limit": 1}}"#).unwrap();
    let output = fuzzweight()
        .args(["rank", "pf", "--config"])
        .arg(config.path())
        .write_stdin("pathofinder\nPathFinder\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 1);
}

#[test]
fn test_invalid_config() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, "not json").unwrap();
    fuzzweight()
        .args(["score", "pf", "PathFinder", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}
