use thiserror::Error;

/// Errors from model-loading utilities shared by inference backends.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to load tokenizer: {reason}")]
    TokenizerLoadFailed { reason: String },
}
