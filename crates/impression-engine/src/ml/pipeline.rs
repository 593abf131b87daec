//! Transformer pipeline backend (BERT-family sequence classifier on Candle)

use super::loader::{
    batch_tensor, create_device, encode, load_tokenizer, parse_json_config, to_probabilities,
};
use super::InferenceBackend;
use crate::config::{DeviceSpec, ModelSourceSpec};
use candle_core::{DType, Device, IndexOp};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use impression_core::{Error, Result};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

pub struct PipelineBackend {
    name: String,
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
    device: Device,
    max_length: usize,
}

impl PipelineBackend {
    pub fn load(
        source: &ModelSourceSpec,
        num_labels: usize,
        max_length: usize,
        device: DeviceSpec,
    ) -> Result<Self> {
        let model_path = resolve_model_path(source)?;
        let tokenizer = load_tokenizer(&model_path)?;
        let bert_config: BertConfig = parse_json_config(&model_path.join("config.json"))?;

        let device = create_device(device)?;
        let vb = load_var_builder(&model_path, &device)?;

        let model = load_bert_backbone(&vb, &bert_config, &["bert", "roberta", ""])?;
        let pooler = load_pooler(&vb, bert_config.hidden_size);
        let classifier = load_classification_head(&vb, bert_config.hidden_size, num_labels)?;

        tracing::info!(
            "✓ Sentiment pipeline loaded from {} ({} labels, pooler: {})",
            model_path.display(),
            num_labels,
            pooler.is_some()
        );

        Ok(Self {
            name: format!("pipeline:{}", model_path.display()),
            tokenizer,
            model,
            pooler,
            classifier,
            device,
            max_length,
        })
    }
}

impl InferenceBackend for PipelineBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let input = encode(&self.tokenizer, text, self.max_length)?;
        let input_ids = batch_tensor(&input.ids, &self.device)?;
        let token_type_ids = batch_tensor(&input.type_ids, &self.device)?;
        let attention_mask = batch_tensor(&input.attention_mask, &self.device)?;

        let hidden_states = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| Error::classifier(format!("Model forward pass failed: {}", e)))?;

        let mut pooled = hidden_states
            .i((0, 0, ..))
            .map_err(|e| Error::classifier(format!("Failed to get CLS token: {}", e)))?
            .unsqueeze(0)
            .map_err(|e| Error::classifier(format!("Failed to unsqueeze CLS: {}", e)))?;

        if let Some(pooler) = &self.pooler {
            pooled = pooler
                .forward(&pooled)
                .and_then(|t| t.tanh())
                .map_err(|e| Error::classifier(format!("Pooler failed: {}", e)))?;
        }

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::classifier(format!("Classification head failed: {}", e)))?;

        to_probabilities(&logits)
    }
}

fn resolve_model_path(source: &ModelSourceSpec) -> Result<PathBuf> {
    match source {
        ModelSourceSpec::Local { path } => {
            if !path.exists() {
                return Err(Error::classifier(format!(
                    "Model path does not exist: {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSourceSpec::HuggingFace { repo, revision } => {
            download_from_huggingface(repo, revision.as_deref())
        }
    }
}

#[cfg(feature = "ml-models")]
fn download_from_huggingface(repo: &str, revision: Option<&str>) -> Result<PathBuf> {
    tracing::info!("Downloading model from HuggingFace: {}", repo);

    let api = hf_hub::api::sync::Api::new()
        .map_err(|e| Error::classifier(format!("Failed to initialize HuggingFace API: {}", e)))?;

    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.unwrap_or("main").to_string(),
    ));

    repo_obj.get("model.safetensors").map_err(|e| {
        Error::classifier(format!("Failed to download model.safetensors: {}", e))
    })?;

    let found_tokenizer = ["tokenizer.json", "vocab.txt"]
        .iter()
        .any(|file| match repo_obj.get(file) {
            Ok(_) => {
                tracing::debug!("Found tokenizer file: {}", file);
                true
            }
            Err(_) => false,
        });
    if !found_tokenizer {
        return Err(Error::classifier(
            "No tokenizer found (tried tokenizer.json, vocab.txt)",
        ));
    }

    let config_path = repo_obj
        .get("config.json")
        .map_err(|e| Error::classifier(format!("Failed to download config.json: {}", e)))?;

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::classifier("Invalid cache path"))?;

    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir.to_path_buf())
}

#[cfg(not(feature = "ml-models"))]
fn download_from_huggingface(repo: &str, _revision: Option<&str>) -> Result<PathBuf> {
    Err(Error::classifier(format!(
        "Cannot download '{}': built without the ml-models feature",
        repo
    )))
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join("model.safetensors");
    if !weights_path.exists() {
        return Err(Error::classifier(format!(
            "model.safetensors not found in {}",
            model_path.display()
        )));
    }

    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::classifier(format!("Failed to load weights: {}", e)))?
    };

    Ok(vb)
}

fn prefix_name(prefix: &str) -> &str {
    if prefix.is_empty() {
        "<root>"
    } else {
        prefix
    }
}

fn load_bert_backbone(vb: &VarBuilder, config: &BertConfig, prefixes: &[&str]) -> Result<BertModel> {
    let mut errors = Vec::new();

    for prefix in prefixes {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match BertModel::load(vb_prefix, config) {
            Ok(model) => {
                tracing::debug!("Loaded BERT backbone from '{}'", prefix_name(prefix));
                return Ok(model);
            }
            Err(e) => errors.push(format!("{}: {}", prefix_name(prefix), e)),
        }
    }

    Err(Error::classifier(format!(
        "Failed to load BERT backbone with tried prefixes [{}]",
        errors.join(" | ")
    )))
}

/// The optional `[CLS]` pooler of sequence-classification checkpoints
fn load_pooler(vb: &VarBuilder, hidden_size: usize) -> Option<Linear> {
    ["bert.pooler.dense", "roberta.pooler.dense", "pooler.dense"]
        .iter()
        .find_map(|prefix| candle_nn::linear(hidden_size, hidden_size, vb.pp(prefix)).ok())
}

fn load_classification_head(vb: &VarBuilder, hidden_size: usize, num_labels: usize) -> Result<Linear> {
    for prefix in ["classifier", "classifier.out_proj", "score"] {
        if let Ok(linear) = candle_nn::linear(hidden_size, num_labels, vb.pp(prefix)) {
            tracing::debug!(
                "Loaded classification head from '{}' (hidden_size={}, num_labels={})",
                prefix,
                hidden_size,
                num_labels
            );
            return Ok(linear);
        }
    }

    Err(Error::classifier(format!(
        "No classification head with {} labels found in checkpoint",
        num_labels
    )))
}
