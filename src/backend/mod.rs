//! Reranking backends under comparison.
//!
//! | Backend | Transport | Ranking |
//! |---------|-----------|---------|
//! | [`ServedBackend`] | HTTP POST to a served model | order returned by the endpoint |
//! | [`ReferenceBackend`] | in-process cross-encoder | scores sorted descending, then `top_n` |
//!
//! A backend call never returns an error. Transport, status, parsing and
//! inference failures are captured in [`BackendOutcome::Failure`] together with
//! the time spent before failing.

pub mod error;
pub mod outcome;
pub mod reference;
pub mod served;

#[cfg(test)]
mod tests;

pub use error::BackendError;
pub use outcome::{BackendOutcome, RerankResult, ScoredDocument};
pub use reference::{ReferenceBackend, rank_case};
pub use served::{
    DEFAULT_MODEL_NAME, DEFAULT_SERVED_URL, DEFAULT_TIMEOUT_SECS, ServedBackend, ServedConfig,
};

use async_trait::async_trait;

use crate::fixture::TestCase;

#[async_trait]
pub trait RerankBackend: Send + Sync {
    /// Short name used in report file names and log fields.
    fn name(&self) -> &str;

    async fn rerank(&self, case: &TestCase) -> BackendOutcome;
}
