use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::backend::{RerankResult, ScoredDocument};

/// Returns a fixed ranking per test case; unknown cases fail.
struct ScriptedBackend {
    rankings: HashMap<String, Vec<(&'static str, f64)>>,
}

impl ScriptedBackend {
    fn new(rankings: &[(&str, Vec<(&'static str, f64)>)]) -> Self {
        Self {
            rankings: rankings
                .iter()
                .map(|(name, ranking)| (name.to_string(), ranking.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl RerankBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn rerank(&self, case: &TestCase) -> BackendOutcome {
        match self.rankings.get(&case.name) {
            Some(ranking) => {
                let documents = ranking
                    .iter()
                    .map(|(doc, score)| ScoredDocument::new(None, *doc, *score))
                    .collect();
                BackendOutcome::success(
                    RerankResult::new(case.query.clone(), documents),
                    Duration::from_millis(10),
                )
            }
            None => BackendOutcome::failure("no script", Duration::from_millis(1)),
        }
    }
}

fn case(name: &str) -> TestCase {
    TestCase::new(name, "query", vec!["d1".to_string(), "d2".to_string()])
}

#[tokio::test]
async fn test_run_backend_records_every_case() {
    let backend = ScriptedBackend::new(&[("test_a", vec![("d1", 0.9), ("d2", 0.1)])]);
    let cases = vec![case("test_a"), case("test_b")];

    let run = run_backend(&backend, &cases).await;

    assert_eq!(run.len(), 2);
    assert!(run["test_a"].result.is_success());
    assert_eq!(run["test_b"].result.error(), Some("no script"));
    assert_eq!(run["test_a"].test_case.name, "test_a");
}

#[tokio::test]
async fn test_run_backend_accepts_trait_objects() {
    let backend: Box<dyn RerankBackend> =
        Box::new(ScriptedBackend::new(&[("test_a", vec![("d1", 1.0)])]));

    let run = run_backend(backend.as_ref(), &[case("test_a")]).await;

    assert!(run["test_a"].result.is_success());
}

#[test]
fn test_failed_run_marks_every_case() {
    let cases = vec![case("test_a"), case("test_b")];

    let run = failed_run(&cases, "model load failed");

    assert_eq!(run.len(), 2);
    for entry in run.values() {
        assert_eq!(entry.result.error(), Some("model load failed"));
        assert_eq!(entry.result.elapsed(), Duration::ZERO);
    }
}

#[tokio::test]
async fn test_compare_runs_joins_by_name() {
    let served = ScriptedBackend::new(&[
        ("test_a", vec![("d1", 0.9), ("d2", 0.1)]),
        ("test_b", vec![("d1", 0.9), ("d2", 0.1)]),
    ]);
    let reference = ScriptedBackend::new(&[
        ("test_a", vec![("d1", 4.0), ("d2", -2.0)]),
        ("test_b", vec![("d2", 4.0), ("d1", -2.0)]),
    ]);
    let cases = vec![case("test_a"), case("test_b")];

    let served_run = run_backend(&served, &cases).await;
    let reference_run = run_backend(&reference, &cases).await;
    let report = compare_runs(&cases, &served_run, &reference_run);

    assert_eq!(report.len(), 2);
    assert!(report["test_a"].comparison.ranking_match);
    assert!(!report["test_b"].comparison.ranking_match);
    assert!((report["test_b"].comparison.score_similarity - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_compare_runs_skips_cases_missing_from_a_run() {
    let backend = ScriptedBackend::new(&[("test_a", vec![("d1", 1.0)])]);
    let cases = vec![case("test_a"), case("test_b")];

    let served_run = run_backend(&backend, &cases).await;
    let reference_run = run_backend(&backend, &cases[..1]).await;
    let report = compare_runs(&cases, &served_run, &reference_run);

    assert_eq!(report.len(), 1);
    assert!(report.contains_key("test_a"));
}

#[tokio::test]
async fn test_compare_runs_with_failed_reference() {
    let backend = ScriptedBackend::new(&[("test_a", vec![("d1", 1.0)])]);
    let cases = vec![case("test_a")];

    let served_run = run_backend(&backend, &cases).await;
    let reference_run = failed_run(&cases, "no model");
    let report = compare_runs(&cases, &served_run, &reference_run);

    let entry = &report["test_a"];
    assert!(!entry.is_successful());
    assert!(!entry.comparison.ranking_match);
    let errors = entry.comparison.errors.as_ref().unwrap();
    assert_eq!(errors.reference.as_deref(), Some("no model"));
}
