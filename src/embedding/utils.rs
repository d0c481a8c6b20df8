use std::path::Path;

use tokenizers::{Tokenizer, TruncationParams};

use super::error::EmbeddingError;

/// File names a cross-encoder model directory must contain.
pub const MODEL_CONFIG_FILE: &str = "config.json";
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Returns the first required model file missing from `model_dir`, if any.
pub fn missing_model_file(model_dir: &Path) -> Option<&'static str> {
    [MODEL_CONFIG_FILE, MODEL_WEIGHTS_FILE, TOKENIZER_FILE]
        .into_iter()
        .find(|file| !model_dir.join(file).is_file())
}

/// Loads `tokenizer.json` from `model_dir`, truncating pair inputs to `max_len` tokens.
pub fn load_pair_tokenizer(model_dir: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let path = model_dir.join(TOKENIZER_FILE);

    let mut tokenizer =
        Tokenizer::from_file(&path).map_err(|e| EmbeddingError::TokenizerLoadFailed {
            reason: format!("{}: {}", path.display(), e),
        })?;

    // Default strategy is longest-first: both halves of the pair get truncated.
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::TokenizerLoadFailed {
            reason: format!("truncation setup failed: {e}"),
        })?;

    Ok(tokenizer)
}
