use thiserror::Error;

use crate::embedding::RerankerError;

/// Errors raised inside a backend call.
///
/// These never escape [`RerankBackend::rerank`](super::RerankBackend::rerank);
/// they are folded into a [`BackendOutcome::Failure`](super::BackendOutcome::Failure).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error(transparent)]
    Inference(#[from] RerankerError),

    #[error("inference task failed: {reason}")]
    TaskFailed { reason: String },
}
