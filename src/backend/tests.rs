use std::time::Duration;

use super::*;
use crate::embedding::Reranker;
use crate::fixture::TestCase;

fn capital_case() -> TestCase {
    TestCase::new(
        "test_capital",
        "What is the capital of China?",
        vec![
            "China is a large country in Asia.".to_string(),
            "The capital of China is Beijing.".to_string(),
            "Paris is the capital of France.".to_string(),
        ],
    )
}

#[test]
fn test_success_outcome_wire_shape() {
    let outcome = BackendOutcome::success(
        RerankResult::new(
            "q",
            vec![ScoredDocument::new(Some(1), "doc", 0.75)],
        ),
        Duration::from_millis(1500),
    );

    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["query"], "q");
    assert_eq!(json["time"], 1.5);
    assert!(json["error"].is_null());
    assert_eq!(json["results"][0]["document"], "doc");
    assert_eq!(json["results"][0]["index"], 1);
    assert_eq!(json["results"][0]["relevance_score"], 0.75);
}

#[test]
fn test_failure_outcome_wire_shape() {
    let outcome = BackendOutcome::failure("connection refused", Duration::ZERO);

    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "connection refused");
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
    assert!(json.get("query").is_none());
}

#[test]
fn test_outcome_reads_flat_records() {
    let success: BackendOutcome = serde_json::from_str(
        r#"{"success": true, "results": [{"document": "d1", "relevance_score": 0.9}], "time": 0.25, "error": null}"#,
    )
    .unwrap();

    assert!(success.is_success());
    assert_eq!(success.elapsed(), Duration::from_millis(250));
    let result = success.result().unwrap();
    assert_eq!(result.ranking(), vec!["d1"]);
    assert_eq!(result.documents[0].index, None);

    let failure: BackendOutcome =
        serde_json::from_str(r#"{"success": false, "results": [], "time": 0, "error": "boom"}"#)
            .unwrap();

    assert!(!failure.is_success());
    assert_eq!(failure.error(), Some("boom"));
    assert_eq!(failure.status_label(), "FAILED");
}

#[test]
fn test_failure_without_message_gets_placeholder() {
    let failure: BackendOutcome = serde_json::from_str(r#"{"success": false}"#).unwrap();

    assert!(failure.error().is_some_and(|e| !e.is_empty()));
}

#[test]
fn test_negative_time_reads_as_zero() {
    let outcome: BackendOutcome =
        serde_json::from_str(r#"{"success": true, "results": [], "time": -1.0}"#).unwrap();

    assert_eq!(outcome.elapsed(), Duration::ZERO);
}

#[test]
fn test_rank_case_sorts_and_keeps_indices() {
    let reranker = Reranker::stub().unwrap();

    let result = rank_case(&reranker, &capital_case()).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.documents[0].document, "The capital of China is Beijing.");
    assert_eq!(result.documents[0].index, Some(1));
    let scores = result.scores();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_rank_case_applies_top_n() {
    let reranker = Reranker::stub().unwrap();

    let result = rank_case(&reranker, &capital_case().with_top_n(1)).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.query, "What is the capital of China?");
}

#[tokio::test]
async fn test_reference_backend_success() {
    let backend = ReferenceBackend::new(Reranker::stub().unwrap());

    let outcome = backend.rerank(&capital_case()).await;

    assert!(outcome.is_success());
    assert_eq!(backend.name(), "reference");
    assert_eq!(outcome.result().unwrap().len(), 3);
}

#[tokio::test]
async fn test_reference_backend_reports_reranker_scores() {
    let backend = ReferenceBackend::new(Reranker::stub().unwrap());
    let case = capital_case();

    let outcome = backend.rerank(&case).await;

    assert!(!backend.reranker().is_model_loaded());
    for doc in &outcome.result().unwrap().documents {
        let direct = backend.reranker().score(&case.query, &doc.document).unwrap();
        assert_eq!(doc.relevance_score, f64::from(direct));
    }
}

#[tokio::test]
async fn test_reference_backend_empty_documents() {
    let backend = ReferenceBackend::new(Reranker::stub().unwrap());
    let case = TestCase::new("test_empty", "anything", vec![]);

    let outcome = backend.rerank(&case).await;

    assert!(outcome.is_success());
    assert!(outcome.result().unwrap().is_empty());
}

#[test]
fn test_served_config_defaults() {
    let config = ServedConfig::default();

    assert_eq!(config.url, DEFAULT_SERVED_URL);
    assert_eq!(config.model, DEFAULT_MODEL_NAME);
    assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
}

#[test]
fn test_served_model_prefers_test_case() {
    let backend = ServedBackend::new(ServedConfig::default().with_model("default-model")).unwrap();

    assert_eq!(backend.model_for(&capital_case()), "default-model");

    let custom = capital_case().with_model("custom-model");
    assert_eq!(backend.model_for(&custom), "custom-model");
}
