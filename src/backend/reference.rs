//! Reference backend: the in-process cross-encoder.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::BackendError;
use super::outcome::{BackendOutcome, RerankResult, ScoredDocument};
use super::RerankBackend;
use crate::embedding::{Reranker, RerankerConfig, RerankerError};
use crate::fixture::TestCase;

/// Scores every document locally, sorts descending and applies `top_n`.
#[derive(Debug, Clone)]
pub struct ReferenceBackend {
    reranker: Arc<Reranker>,
}

impl ReferenceBackend {
    pub const NAME: &'static str = "reference";

    pub fn new(reranker: Reranker) -> Self {
        Self {
            reranker: Arc::new(reranker),
        }
    }

    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        Ok(Self::new(Reranker::load(config)?))
    }

    pub fn reranker(&self) -> &Reranker {
        &self.reranker
    }
}

/// Ranks one test case synchronously.
pub fn rank_case(reranker: &Reranker, case: &TestCase) -> Result<RerankResult, RerankerError> {
    let documents: Vec<&str> = case.documents.iter().map(String::as_str).collect();

    let ranked = match case.top_n {
        Some(top_n) => reranker.rerank_top_n(&case.query, &documents, top_n)?,
        None => reranker.rerank(&case.query, &documents)?,
    };

    let scored = ranked
        .into_iter()
        .map(|(idx, score)| ScoredDocument::new(Some(idx), documents[idx], f64::from(score)))
        .collect();

    Ok(RerankResult::new(case.query.clone(), scored))
}

#[async_trait]
impl RerankBackend for ReferenceBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn rerank(&self, case: &TestCase) -> BackendOutcome {
        let reranker = Arc::clone(&self.reranker);
        let owned_case = case.clone();

        let start = Instant::now();
        let joined =
            tokio::task::spawn_blocking(move || rank_case(&reranker, &owned_case)).await;
        let elapsed = start.elapsed();

        let result = match joined {
            Ok(inner) => inner.map_err(BackendError::from),
            Err(e) => Err(BackendError::TaskFailed {
                reason: e.to_string(),
            }),
        };

        match result {
            Ok(result) => {
                debug!(
                    test_case = %case.name,
                    results = result.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Reference ranking complete"
                );
                BackendOutcome::success(result, elapsed)
            }
            Err(e) => {
                warn!(test_case = %case.name, error = %e, "Reference backend failed");
                BackendOutcome::failure(e.to_string(), elapsed)
            }
        }
    }
}
