//! Rerank parity harness (used by the `rerank-parity` binary and integration tests).
//!
//! Runs a served reranker (HTTP) and a reference cross-encoder (in-process)
//! over shared JSON fixtures, then compares their rankings and normalized
//! score curves per test case.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - environment-backed settings
//! - [`TestCase`], [`load_test_cases`] - fixture loading
//! - [`RerankBackend`], [`ServedBackend`], [`ReferenceBackend`], [`BackendOutcome`] - backends
//! - [`Reranker`], [`RerankerConfig`] - cross-encoder used by the reference backend
//! - [`compare`], [`ComparisonOutcome`] - the result comparator
//! - [`runner`] and [`report`] - orchestration and JSON output

pub mod backend;
pub mod cli;
pub mod compare;
pub mod config;
pub mod embedding;
pub mod fixture;
pub mod report;
pub mod runner;

pub use backend::{
    BackendError, BackendOutcome, RerankBackend, RerankResult, ReferenceBackend, ScoredDocument,
    ServedBackend, ServedConfig,
};
pub use compare::{
    BackendErrors, ComparisonOutcome, Performance, compare, min_max_normalize, rankings_match,
    score_similarity,
};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, Reranker, RerankerConfig, RerankerError};
pub use fixture::{FixtureError, TestCase, load_test_cases};
pub use report::{
    BackendRun, BackendRunEntry, ComparisonEntry, ComparisonReport, ReportError, RunSummary,
};
pub use runner::{compare_runs, failed_run, run_backend};
