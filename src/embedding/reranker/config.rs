use std::path::PathBuf;

/// Maximum tokens per `(query, document)` pair fed to the cross-encoder.
pub const MAX_SEQ_LEN: usize = 512;

#[derive(Debug, Clone, Default)]
pub struct RerankerConfig {
    /// Model directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    /// `None` runs the reranker in stub mode.
    pub model_path: Option<PathBuf>,

    pub max_seq_len: Option<usize>,
}

impl RerankerConfig {
    pub const ENV_RERANKER_PATH: &'static str = "PARITY_RERANKER_PATH";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            max_seq_len: None,
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = Some(max_seq_len);
        self
    }

    pub fn effective_max_seq_len(&self) -> usize {
        self.max_seq_len.unwrap_or(MAX_SEQ_LEN)
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        if self.max_seq_len == Some(0) {
            return Err("max_seq_len must be greater than 0".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_RERANKER_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_path,
            max_seq_len: None,
        }
    }
}
