//! BERT-family sequence-classification model used as a cross-encoder.

use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, IndexOp, Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;

use super::utils::{MODEL_CONFIG_FILE, MODEL_WEIGHTS_FILE};

/// Label fields of a Hugging Face `config.json` (absent for single-logit heads).
#[derive(Debug, Default, Deserialize)]
struct LabelConfig {
    num_labels: Option<usize>,
    id2label: Option<std::collections::HashMap<String, String>>,
}

impl LabelConfig {
    fn num_labels(&self) -> usize {
        self.num_labels
            .or_else(|| self.id2label.as_ref().map(|m| m.len()))
            .filter(|n| *n > 0)
            .unwrap_or(1)
    }
}

/// Classification head variants found in published cross-encoders.
enum Head {
    /// `classifier` linear layer over the CLS token (BERT checkpoints).
    Linear(Linear),
    /// `classifier.dense` -> tanh -> `classifier.out_proj` (RoBERTa checkpoints).
    Projected { dense: Linear, out_proj: Linear },
}

impl Head {
    fn load(vb: VarBuilder, hidden_size: usize, num_labels: usize) -> Result<Self> {
        let vb = vb.pp("classifier");
        if vb.contains_tensor("out_proj.weight") {
            Ok(Head::Projected {
                dense: candle_nn::linear(hidden_size, hidden_size, vb.pp("dense"))?,
                out_proj: candle_nn::linear(hidden_size, num_labels, vb.pp("out_proj"))?,
            })
        } else {
            Ok(Head::Linear(candle_nn::linear(hidden_size, num_labels, vb)?))
        }
    }

    fn forward(&self, cls: &Tensor) -> Result<Tensor> {
        match self {
            Head::Linear(linear) => linear.forward(cls),
            Head::Projected { dense, out_proj } => out_proj.forward(&dense.forward(cls)?.tanh()?),
        }
    }
}

struct Inner {
    encoder: BertModel,
    head: Head,
    num_labels: usize,
}

/// Cross-encoder: encodes a tokenized `(query, document)` pair and returns its logits.
#[derive(Clone)]
pub struct SequenceClassifier(Arc<Inner>);

impl SequenceClassifier {
    /// Loads `config.json` + `model.safetensors` from `model_dir`.
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self> {
        let raw_config = std::fs::read_to_string(model_dir.join(MODEL_CONFIG_FILE))?;
        let config: Config = serde_json::from_str(&raw_config)
            .map_err(|e| candle_core::Error::Msg(format!("invalid {MODEL_CONFIG_FILE}: {e}")))?;
        let labels: LabelConfig = serde_json::from_str(&raw_config).unwrap_or_default();
        let num_labels = labels.num_labels();

        let weights = model_dir.join(MODEL_WEIGHTS_FILE);
        // SAFETY: the weights file is memory-mapped read-only and not modified while loaded.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device)? };

        let encoder = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), &config)?
        } else {
            BertModel::load(vb.clone(), &config)?
        };
        let head = Head::load(vb, config.hidden_size, num_labels)?;

        Ok(Self(Arc::new(Inner {
            encoder,
            head,
            num_labels,
        })))
    }

    pub fn num_labels(&self) -> usize {
        self.0.num_labels
    }

    /// Returns logits of shape `(batch, num_labels)`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let hidden = self
            .0
            .encoder
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls = hidden.i((.., 0, ..))?;
        self.0.head.forward(&cls)
    }

    /// Relevance logit for a single pair: the last label's logit.
    pub fn relevance(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<f32> {
        let logits = self.forward(input_ids, token_type_ids, attention_mask)?;
        let logits = logits.flatten_all()?.to_vec1::<f32>()?;
        logits
            .last()
            .copied()
            .ok_or_else(|| candle_core::Error::Msg("classifier produced no logits".to_string()))
    }
}
