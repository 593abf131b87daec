//! Shared model loading helpers

use crate::config::DeviceSpec;
use candle_core::{Device, Tensor, D};
use impression_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationDirection};

pub(crate) fn create_device(spec: DeviceSpec) -> Result<Device> {
    match spec {
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda { index } => Device::new_cuda(index.unwrap_or(0))
            .map_err(|e| Error::classifier(format!("Failed to create CUDA device: {}", e))),
        DeviceSpec::Metal { index } => Device::new_metal(index.unwrap_or(0))
            .map_err(|e| Error::classifier(format!("Failed to create Metal device: {}", e))),
    }
}

pub(crate) fn parse_json_config<T: DeserializeOwned>(config_path: &Path) -> Result<T> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        Error::classifier(format!(
            "Failed to read config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&config_str).map_err(|e| {
        Error::classifier(format!(
            "Failed to parse config {}: {}",
            config_path.display(),
            e
        ))
    })
}

/// `tokenizer.json`, or a WordPiece tokenizer rebuilt from `vocab.txt`
pub(crate) fn load_tokenizer(model_path: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = model_path.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(|e| Error::classifier(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab_path = model_path.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building tokenizer from vocab.txt");

        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| Error::classifier(format!("Failed to build WordPiece model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::default()));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));

        let sep = ("[SEP]".to_string(), 102);
        let cls = ("[CLS]".to_string(), 101);
        tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));

        return Ok(tokenizer);
    }

    Err(Error::classifier(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
        model_path.display()
    )))
}

/// Token ids, type ids and attention mask, cut to `max_length` tokens
pub(crate) struct EncodedInput {
    pub ids: Vec<u32>,
    pub type_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

pub(crate) fn encode(tokenizer: &Tokenizer, text: &str, max_length: usize) -> Result<EncodedInput> {
    let mut encoding = tokenizer
        .encode(text, true)
        .map_err(|e| Error::classifier(format!("Tokenization failed: {}", e)))?;

    encoding.truncate(max_length, 0, TruncationDirection::Right);

    if encoding.get_ids().is_empty() {
        return Err(Error::classifier("Tokenizer produced no tokens"));
    }

    Ok(EncodedInput {
        ids: encoding.get_ids().to_vec(),
        type_ids: encoding.get_type_ids().to_vec(),
        attention_mask: encoding.get_attention_mask().to_vec(),
    })
}

/// Batch-of-one tensor from token values
pub(crate) fn batch_tensor<T: candle_core::WithDType>(values: &[T], device: &Device) -> Result<Tensor> {
    Tensor::new(values, device)
        .map_err(|e| Error::classifier(format!("Failed to create input tensor: {}", e)))?
        .unsqueeze(0)
        .map_err(|e| Error::classifier(format!("Failed to unsqueeze: {}", e)))
}

/// Softmax over a `[1, num_labels]` logits tensor
pub(crate) fn to_probabilities(logits: &Tensor) -> Result<Vec<f32>> {
    candle_nn::ops::softmax(logits, D::Minus1)
        .map_err(|e| Error::classifier(format!("Softmax failed: {}", e)))?
        .squeeze(0)
        .map_err(|e| Error::classifier(format!("Squeeze failed: {}", e)))?
        .to_vec1()
        .map_err(|e| Error::classifier(format!("Failed to convert to vec: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_sum_to_one() {
        let logits = Tensor::new(&[[1.0f32, 2.0, 0.5]], &Device::Cpu).unwrap();
        let probs = to_probabilities(&logits).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(probs[1] > probs[0] && probs[0] > probs[2]);
    }

    #[test]
    fn test_missing_tokenizer_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_tokenizer(dir.path()).is_err());
    }

    #[test]
    fn test_cpu_device() {
        assert!(create_device(DeviceSpec::Cpu).unwrap().is_cpu());
    }
}
