//! Named-entity recognition: pluggable token classifier behind a trait.
//!
//! Default: `DisabledClassifier` (no model configured, regex fallbacks only).
//! With `NER_MODEL_DIR` set: `BertTokenClassifier`, a fine-tuned BERT
//! token-classification checkpoint run with candle on the CPU.
//!
//! `AppState` holds an `Arc<dyn TokenClassifier>`, chosen at startup via config.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::Deserialize;
use thiserror::Error;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::extraction::entities::{reconstruct_entities, Entities, TaggedToken};
use crate::extraction::heuristics::extract_name;

#[derive(Debug, Error)]
pub enum NerError {
    #[error("Model file missing: {0}")]
    MissingFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid label map: {0}")]
    Labels(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Inference error: {0}")]
    Inference(#[from] candle_core::Error),

    #[error("Inference worker failed: {0}")]
    Worker(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Labels each word piece of `text`. Implement this to swap model backends
/// without touching the screening pipeline or handlers.
#[async_trait]
pub trait TokenClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<TaggedToken>, NerError>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

/// Runs the classifier, rebuilds entities and fills a missing name from the
/// rule-based extractor.
pub async fn predict_entities(
    classifier: &dyn TokenClassifier,
    text: &str,
) -> Result<Entities, NerError> {
    let tokens = classifier.classify(text).await?;
    let mut entities = reconstruct_entities(&tokens);
    if !entities.name_found() {
        entities.name = extract_name(text);
    }
    Ok(entities)
}

// ────────────────────────────────────────────────────────────────────────────
// DisabledClassifier: no model configured
// ────────────────────────────────────────────────────────────────────────────

/// Tags nothing, so every entity falls through to the regex extractors.
pub struct DisabledClassifier;

#[async_trait]
impl TokenClassifier for DisabledClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<TaggedToken>, NerError> {
        Ok(Vec::new())
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// BertTokenClassifier
// ────────────────────────────────────────────────────────────────────────────

/// The slice of a Hugging Face `config.json` needed on top of the BERT encoder config.
#[derive(Debug, Deserialize)]
struct ClassifierHeadConfig {
    hidden_size: usize,
    id2label: HashMap<String, String>,
}

/// Turns the `id2label` map (string keys) into a dense lookup table.
/// Gaps in the id range read as `O`.
fn label_table(id2label: &HashMap<String, String>) -> Result<Vec<String>, NerError> {
    let mut indexed = Vec::with_capacity(id2label.len());
    for (id, label) in id2label {
        let id: usize = id
            .parse()
            .map_err(|_| NerError::Labels(format!("non-numeric label id '{id}'")))?;
        indexed.push((id, label.clone()));
    }

    let size = indexed.iter().map(|(id, _)| id + 1).max().unwrap_or(0);
    let mut table = vec!["O".to_string(); size];
    for (id, label) in indexed {
        table[id] = label;
    }
    Ok(table)
}

fn label_for(labels: &[String], id: u32) -> &str {
    labels.get(id as usize).map(String::as_str).unwrap_or("O")
}

struct BertInner {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

impl BertInner {
    fn classify_blocking(&self, text: &str) -> Result<Vec<TaggedToken>, NerError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| NerError::Tokenizer(e.to_string()))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))?;
        let logits = self.classifier.forward(&hidden)?;
        let predictions = logits.argmax(D::Minus1)?.squeeze(0)?.to_vec1::<u32>()?;

        debug!("Classified {} word pieces", predictions.len());

        Ok(encoding
            .get_tokens()
            .iter()
            .zip(predictions)
            .map(|(token, id)| TaggedToken::new(token.as_str(), label_for(&self.labels, id)))
            .collect())
    }
}

/// A fine-tuned BERT token classifier (`BertForTokenClassification` weights).
#[derive(Clone)]
pub struct BertTokenClassifier {
    inner: Arc<BertInner>,
}

impl BertTokenClassifier {
    /// Loads `config.json`, `tokenizer.json` and `model.safetensors`
    /// (or `pytorch_model.bin`) from `model_dir`.
    pub fn load(model_dir: &Path, max_tokens: usize) -> Result<Self, NerError> {
        info!("Loading NER model from {}", model_dir.display());
        let device = Device::Cpu;

        let config_path = require_file(model_dir.join("config.json"))?;
        let raw_config = std::fs::read_to_string(&config_path)?;
        let bert_config: BertConfig = serde_json::from_str(&raw_config)?;
        let head: ClassifierHeadConfig = serde_json::from_str(&raw_config)?;
        let labels = label_table(&head.id2label)?;

        let mut tokenizer = Tokenizer::from_file(require_file(model_dir.join("tokenizer.json"))?)
            .map_err(|e| NerError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_tokens,
                ..Default::default()
            }))
            .map_err(|e| NerError::Tokenizer(e.to_string()))?;

        let safetensors = model_dir.join("model.safetensors");
        let vb = if safetensors.exists() {
            // SAFETY: the weights file is memory-mapped read-only and not modified while loaded.
            unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, &device)? }
        } else {
            let pth = require_file(model_dir.join("pytorch_model.bin"))?;
            VarBuilder::from_pth(pth, DType::F32, &device)?
        };

        let model = BertModel::load(vb.clone(), &bert_config)?;
        let classifier = linear(head.hidden_size, labels.len(), vb.pp("classifier"))?;

        info!("NER model ready ({} labels)", labels.len());

        Ok(Self {
            inner: Arc::new(BertInner {
                model,
                classifier,
                tokenizer,
                labels,
                device,
            }),
        })
    }
}

fn require_file(path: PathBuf) -> Result<PathBuf, NerError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(NerError::MissingFile(path))
    }
}

#[async_trait]
impl TokenClassifier for BertTokenClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<TaggedToken>, NerError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || inner.classify_blocking(&text))
            .await
            .map_err(|e| NerError::Worker(e.to_string()))?
    }

    fn backend(&self) -> &'static str {
        "bert"
    }
}
