use std::time::Duration;

use tempfile::TempDir;

use super::console::preview;
use super::*;
use crate::backend::{BackendOutcome, RerankResult, ScoredDocument};
use crate::compare::compare;
use crate::fixture::TestCase;

fn success(pairs: &[(&str, f64)]) -> BackendOutcome {
    let documents = pairs
        .iter()
        .map(|(doc, score)| ScoredDocument::new(None, *doc, *score))
        .collect();
    BackendOutcome::success(RerankResult::new("q", documents), Duration::from_millis(20))
}

fn entry(name: &str, served: BackendOutcome, reference: BackendOutcome) -> ComparisonEntry {
    let comparison = compare(&served, &reference);
    ComparisonEntry {
        test_case: TestCase::new(name, "q", vec!["d1".into(), "d2".into()]),
        served,
        reference,
        comparison,
    }
}

fn sample_report() -> ComparisonReport {
    let mut report = ComparisonReport::new();
    report.insert(
        "test_match".into(),
        entry(
            "test_match",
            success(&[("d1", 0.9), ("d2", 0.1)]),
            success(&[("d1", 5.0), ("d2", 1.0)]),
        ),
    );
    report.insert(
        "test_swap".into(),
        entry(
            "test_swap",
            success(&[("d1", 0.9), ("d2", 0.5), ("d3", 0.1)]),
            success(&[("d2", 0.9), ("d1", 0.1), ("d3", 0.1)]),
        ),
    );
    report.insert(
        "test_failed".into(),
        entry(
            "test_failed",
            BackendOutcome::failure("timeout", Duration::from_secs(10)),
            success(&[("d1", 0.9)]),
        ),
    );
    report
}

#[test]
fn test_summary_counts() {
    let summary = RunSummary::from_report(&sample_report());

    assert_eq!(summary.total_tests, 3);
    assert_eq!(summary.successful_tests, 2);
    assert_eq!(summary.ranking_matches, 1);
    assert!((summary.success_rate - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(summary.ranking_match_rate, Some(0.5));

    // test_swap: normalized [1, 0.5, 0] vs [1, 0, 0] -> 1 - 0.5/3.
    let expected = (1.0 + (1.0 - 0.5 / 3.0)) / 2.0;
    let mean = summary.mean_score_similarity.unwrap();
    assert!((mean - expected).abs() < 1e-9, "mean: {mean}");
}

#[test]
fn test_summary_empty_report() {
    let summary = RunSummary::from_report(&ComparisonReport::new());

    assert_eq!(summary.total_tests, 0);
    assert_eq!(summary.success_rate, 0.0);
    assert!(summary.ranking_match_rate.is_none());
    assert!(summary.mean_score_similarity.is_none());
}

#[test]
fn test_summary_timestamp_is_rfc3339() {
    let summary = RunSummary::from_report(&ComparisonReport::new());

    assert!(chrono::DateTime::parse_from_rfc3339(&summary.generated_at).is_ok());
}

#[test]
fn test_backend_run_stats() {
    let mut run = BackendRun::new();
    run.insert(
        "test_a".into(),
        BackendRunEntry {
            test_case: TestCase::new("test_a", "q", vec![]),
            result: success(&[("d1", 1.0)]),
        },
    );
    run.insert(
        "test_b".into(),
        BackendRunEntry {
            test_case: TestCase::new("test_b", "q", vec![]),
            result: BackendOutcome::failure("boom", Duration::ZERO),
        },
    );

    let stats = BackendRunStats::from_run(&run);

    assert_eq!(stats.total_tests, 2);
    assert_eq!(stats.successful_tests, 1);
    assert_eq!(stats.success_rate(), 0.5);
}

#[test]
fn test_write_and_load_comparison_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("comparison_results.json");
    let report = sample_report();

    write_json(&path, &report).unwrap();
    let loaded = load_comparison_report(&path).unwrap().expect("file exists");

    assert_eq!(loaded.len(), 3);
    let failed = &loaded["test_failed"];
    assert_eq!(failed.served.error(), Some("timeout"));
    assert_eq!(
        failed.comparison.errors.as_ref().unwrap().served.as_deref(),
        Some("timeout")
    );
    assert_eq!(
        loaded["test_match"].comparison.served_ranking,
        vec!["d1".to_string(), "d2".to_string()]
    );
}

#[test]
fn test_report_is_keyed_by_test_case_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("comparison_results.json");

    write_json(&path, &sample_report()).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    let object = raw.as_object().unwrap();
    assert!(object.contains_key("test_match"));
    assert!(object["test_match"]["comparison"]["ranking_match"].as_bool().unwrap());
    assert_eq!(object["test_failed"]["served"]["success"], false);
}

#[test]
fn test_load_backend_run_missing_file() {
    let dir = TempDir::new().unwrap();

    let loaded = load_backend_run(&dir.path().join("served_results.json")).unwrap();

    assert!(loaded.is_none());
}

#[test]
fn test_load_backend_run_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("served_results.json");
    std::fs::write(&path, "{ truncated").unwrap();

    let result = load_backend_run(&path);

    assert!(matches!(result, Err(ReportError::Parse { .. })));
}

#[test]
fn test_load_backend_run_from_flat_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("served_results.json");
    std::fs::write(
        &path,
        r#"{
            "test_basic": {
                "test_case": {"name": "test_basic", "file": "fixtures/test_basic.json", "query": "q", "documents": ["d1"]},
                "result": {"success": true, "results": [{"document": "d1", "relevance_score": 0.7}], "time": 0.1, "error": null}
            }
        }"#,
    )
    .unwrap();

    let run = load_backend_run(&path).unwrap().unwrap();

    assert!(run["test_basic"].result.is_success());
}

#[test]
fn test_preview_truncates_on_char_boundary() {
    assert_eq!(preview("short", 10), "short");
    assert_eq!(preview("abcdef", 3), "abc...");
    assert_eq!(preview("日本語のテキスト", 3), "日本語...");
}
