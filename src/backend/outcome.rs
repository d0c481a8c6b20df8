use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A document with the score a backend assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Position of the document in the request, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub document: String,
    pub relevance_score: f64,
}

impl ScoredDocument {
    pub fn new(index: Option<usize>, document: impl Into<String>, relevance_score: f64) -> Self {
        Self {
            index,
            document: document.into(),
            relevance_score,
        }
    }
}

/// Ordered output of one backend for one query. Order is the backend's ranking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RerankResult {
    pub query: String,
    pub documents: Vec<ScoredDocument>,
}

impl RerankResult {
    pub fn new(query: impl Into<String>, documents: Vec<ScoredDocument>) -> Self {
        Self {
            query: query.into(),
            documents,
        }
    }

    /// Document identifiers in ranking order.
    pub fn ranking(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.document.as_str()).collect()
    }

    /// Raw relevance scores in ranking order.
    pub fn scores(&self) -> Vec<f64> {
        self.documents.iter().map(|d| d.relevance_score).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Result of a single backend call.
///
/// Serialized in the flat `{success, query, results, time, error}` shape so
/// result files stay readable by other tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OutcomeRecord", into = "OutcomeRecord")]
pub enum BackendOutcome {
    Success {
        result: RerankResult,
        elapsed: Duration,
    },
    Failure {
        error: String,
        elapsed: Duration,
    },
}

impl BackendOutcome {
    pub fn success(result: RerankResult, elapsed: Duration) -> Self {
        BackendOutcome::Success { result, elapsed }
    }

    pub fn failure(error: impl Into<String>, elapsed: Duration) -> Self {
        BackendOutcome::Failure {
            error: error.into(),
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BackendOutcome::Success { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            BackendOutcome::Success { elapsed, .. } | BackendOutcome::Failure { elapsed, .. } => {
                *elapsed
            }
        }
    }

    pub fn result(&self) -> Option<&RerankResult> {
        match self {
            BackendOutcome::Success { result, .. } => Some(result),
            BackendOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BackendOutcome::Success { .. } => None,
            BackendOutcome::Failure { error, .. } => Some(error),
        }
    }

    /// Returns a short status label for console output.
    pub fn status_label(&self) -> &'static str {
        match self {
            BackendOutcome::Success { .. } => "SUCCESS",
            BackendOutcome::Failure { .. } => "FAILED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutcomeRecord {
    success: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    query: String,
    #[serde(default)]
    results: Vec<ScoredDocument>,
    #[serde(default)]
    time: f64,
    #[serde(default)]
    error: Option<String>,
}

impl From<BackendOutcome> for OutcomeRecord {
    fn from(outcome: BackendOutcome) -> Self {
        match outcome {
            BackendOutcome::Success { result, elapsed } => OutcomeRecord {
                success: true,
                query: result.query,
                results: result.documents,
                time: elapsed.as_secs_f64(),
                error: None,
            },
            BackendOutcome::Failure { error, elapsed } => OutcomeRecord {
                success: false,
                query: String::new(),
                results: Vec::new(),
                time: elapsed.as_secs_f64(),
                error: Some(error),
            },
        }
    }
}

impl From<OutcomeRecord> for BackendOutcome {
    fn from(record: OutcomeRecord) -> Self {
        let elapsed = Duration::try_from_secs_f64(record.time).unwrap_or_default();

        if record.success {
            BackendOutcome::Success {
                result: RerankResult::new(record.query, record.results),
                elapsed,
            }
        } else {
            BackendOutcome::Failure {
                error: record
                    .error
                    .unwrap_or_else(|| "backend reported failure without a message".to_string()),
                elapsed,
            }
        }
    }
}
