//! Served backend: a reranker reached over HTTP.
//!
//! ```ascii
//! ┌───────────────┐  POST {model, query, documents, ...}  ┌────────────────┐
//! │ ServedBackend │ ───────────────────────────────────►  │ /api/rerank    │
//! │               │ ◄───────────────────────────────────  │ (served model) │
//! └───────────────┘  {results: [{document, score}, ...]}  └────────────────┘
//! ```
//!
//! The endpoint's result order is taken as its ranking and is not re-sorted.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::BackendError;
use super::outcome::{BackendOutcome, RerankResult, ScoredDocument};
use super::RerankBackend;
use crate::fixture::TestCase;

/// Default rerank endpoint (a local Ollama-style server).
pub const DEFAULT_SERVED_URL: &str = "http://localhost:11434/api/rerank";

/// Default model name sent when a test case does not name one.
pub const DEFAULT_MODEL_NAME: &str = "qwen_reranker_v2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ServedConfig {
    pub url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ServedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVED_URL.to_string(),
            model: DEFAULT_MODEL_NAME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    instruction: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    #[serde(default)]
    results: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    index: Option<usize>,
    document: Option<DocumentField>,
    relevance_score: f64,
}

/// Endpoints return the document either inline or as `{"text": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentField {
    Text(String),
    Object { text: String },
}

impl DocumentField {
    fn into_text(self) -> String {
        match self {
            DocumentField::Text(text) | DocumentField::Object { text } => text,
        }
    }
}

pub struct ServedBackend {
    client: Client,
    config: ServedConfig,
}

impl std::fmt::Debug for ServedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServedBackend")
            .field("config", &self.config)
            .finish()
    }
}

impl ServedBackend {
    pub const NAME: &'static str = "served";

    pub fn new(config: ServedConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServedConfig {
        &self.config
    }

    /// Model name sent for `case`: the fixture's own, else the configured default.
    pub fn model_for<'a>(&'a self, case: &'a TestCase) -> &'a str {
        case.model.as_deref().unwrap_or(&self.config.model)
    }

    async fn call(&self, case: &TestCase) -> Result<RerankResult, BackendError> {
        let request = RerankRequest {
            model: self.model_for(case),
            query: &case.query,
            documents: &case.documents,
            instruction: case.instruction.as_deref(),
            top_n: case.top_n,
        };

        debug!(
            url = %self.config.url,
            model = request.model,
            num_documents = case.documents.len(),
            "Sending rerank request"
        );

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: RerankResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::MalformedResponse {
                reason: e.to_string(),
            })?;

        if parsed.results.is_empty() {
            warn!(test_case = %case.name, "Rerank endpoint returned no results");
        }

        let documents = parsed
            .results
            .into_iter()
            .map(|hit| resolve_hit(hit, &case.documents))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RerankResult::new(case.query.clone(), documents))
    }
}

fn resolve_hit(hit: RawHit, request_documents: &[String]) -> Result<ScoredDocument, BackendError> {
    let document = match (hit.document, hit.index) {
        (Some(field), _) => field.into_text(),
        (None, Some(idx)) => request_documents.get(idx).cloned().ok_or_else(|| {
            BackendError::MalformedResponse {
                reason: format!(
                    "result index {} out of range for {} documents",
                    idx,
                    request_documents.len()
                ),
            }
        })?,
        (None, None) => {
            return Err(BackendError::MalformedResponse {
                reason: "result has neither document nor index".to_string(),
            });
        }
    };

    Ok(ScoredDocument::new(hit.index, document, hit.relevance_score))
}

#[async_trait]
impl RerankBackend for ServedBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn rerank(&self, case: &TestCase) -> BackendOutcome {
        let start = Instant::now();
        let result = self.call(case).await;
        let elapsed = start.elapsed();

        match result {
            Ok(result) => BackendOutcome::success(result, elapsed),
            Err(e) => {
                warn!(test_case = %case.name, error = %e, "Served backend call failed");
                BackendOutcome::failure(e.to_string(), elapsed)
            }
        }
    }
}
