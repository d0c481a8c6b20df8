//! In-process inference for the reference backend.
//!
//! - [`reranker`] scores `(query, document)` pairs with a cross-encoder.
//! - [`bert`] holds the sequence-classification model it runs.

/// BERT-family sequence classifier.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Cross-encoder reranker.
pub mod reranker;
/// Model directory and tokenizer helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use reranker::{MAX_SEQ_LEN, Reranker, RerankerConfig, RerankerError};
