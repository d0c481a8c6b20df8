pub mod config;
pub mod error;


pub use config::{MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use std::cmp::Ordering;
use std::collections::HashSet;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::bert::SequenceClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::{load_pair_tokenizer, missing_model_file};

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "to",
    "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "about", "how", "what",
    "which", "who", "why", "when", "where", "and", "but", "or", "if", "not", "no", "so", "than",
    "too", "very", "this", "that", "these", "those", "it", "its", "i", "my", "me",
];

struct LoadedModel {
    classifier: SequenceClassifier,
    tokenizer: Tokenizer,
}

/// Cross-encoder reranker backing the reference backend.
///
/// With a model directory configured, every `(query, document)` pair goes
/// through a BERT-family sequence classifier and the relevance logit is the
/// score. Without one, a deterministic lexical-overlap score in `[0, 1]` is
/// used so the harness runs without model files.
pub struct Reranker {
    device: Device,
    config: RerankerConfig,
    model: Option<LoadedModel>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        config
            .validate()
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for reranker");

        let Some(model_path) = config.model_path.clone() else {
            info!("No reranker model path configured, operating in stub mode");
            return Ok(Self {
                device,
                config,
                model: None,
            });
        };

        if !model_path.is_dir() {
            return Err(RerankerError::ModelNotFound { path: model_path });
        }

        if let Some(file) = missing_model_file(&model_path) {
            return Err(RerankerError::ModelLoadFailed {
                reason: format!("missing {} in {}", file, model_path.display()),
            });
        }

        info!(model_path = %model_path.display(), "Loading reranker model");

        let classifier = SequenceClassifier::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("failed to load classifier: {e}"),
            }
        })?;
        let tokenizer = load_pair_tokenizer(&model_path, config.effective_max_seq_len())?;

        info!(
            num_labels = classifier.num_labels(),
            "Reranker model loaded successfully"
        );

        Ok(Self {
            device,
            config,
            model: Some(LoadedModel {
                classifier,
                tokenizer,
            }),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    /// Scores one `(query, document)` pair. Higher is more relevant.
    pub fn score(&self, query: &str, document: &str) -> Result<f32, RerankerError> {
        let Some(model) = &self.model else {
            return Ok(lexical_overlap_score(query, document));
        };

        let encoding = model.tokenizer.encode((query, document), true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        Ok(model
            .classifier
            .relevance(&input_ids, &type_ids, Some(&attention_mask))?)
    }

    /// Scores every document and returns `(input index, score)` sorted by score, descending.
    ///
    /// Ties keep input order.
    pub fn rerank(
        &self,
        query: &str,
        documents: &[&str],
    ) -> Result<Vec<(usize, f32)>, RerankerError> {
        debug!(
            query_len = query.len(),
            num_documents = documents.len(),
            model_loaded = self.is_model_loaded(),
            "Reranking documents"
        );

        let mut scored = documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| Ok((idx, self.score(query, doc)?)))
            .collect::<Result<Vec<_>, RerankerError>>()?;

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        debug!(
            top_score = scored.first().map(|(_, s)| *s),
            "Reranking complete"
        );

        Ok(scored)
    }

    /// [`rerank`](Self::rerank) truncated to the first `top_n` entries.
    pub fn rerank_top_n(
        &self,
        query: &str,
        documents: &[&str],
        top_n: usize,
    ) -> Result<Vec<(usize, f32)>, RerankerError> {
        let mut ranked = self.rerank(query, documents)?;
        ranked.truncate(top_n);
        Ok(ranked)
    }
}

fn content_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Stub relevance: recall and Jaccard overlap of content words, squashed by a sigmoid.
fn lexical_overlap_score(query: &str, document: &str) -> f32 {
    let query_words = content_words(query);
    let document_words = content_words(document);

    if query_words.is_empty() {
        let shorter = query.len().min(document.len()) as f32;
        let longer = query.len().max(document.len()).max(1) as f32;
        return (shorter / longer) * 0.3;
    }

    let matches = query_words.intersection(&document_words).count() as f32;
    let recall = matches / query_words.len() as f32;
    let union = query_words.union(&document_words).count() as f32;
    let jaccard = if union > 0.0 { matches / union } else { 0.0 };

    let base = 0.6 * recall + 0.4 * jaccard;
    let squashed = 1.0 / (1.0 + (-8.0 * (base - 0.5)).exp());

    squashed.clamp(0.0, 1.0)
}
