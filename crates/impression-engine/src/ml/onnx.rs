//! Compiled-graph backend: an exported ONNX classifier evaluated with candle-onnx

use super::loader::{batch_tensor, encode, load_tokenizer, to_probabilities};
use super::InferenceBackend;
use candle_core::{Device, Tensor};
use candle_onnx::onnx::ModelProto;
use impression_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tokenizers::Tokenizer;

const INPUT_IDS: &str = "input_ids";
const ATTENTION_MASK: &str = "attention_mask";
const TOKEN_TYPE_IDS: &str = "token_type_ids";

pub struct OnnxBackend {
    name: String,
    model: ModelProto,
    tokenizer: Tokenizer,
    inputs: Vec<String>,
    output: String,
    max_length: usize,
}

impl OnnxBackend {
    /// Load `model.onnx` and the tokenizer from `dir`
    pub fn load(dir: &Path, max_length: usize) -> Result<Self> {
        let model_path = dir.join("model.onnx");
        if !model_path.exists() {
            return Err(Error::classifier(format!(
                "model.onnx not found in {}",
                dir.display()
            )));
        }

        let model = candle_onnx::read_file(&model_path)
            .map_err(|e| Error::classifier(format!("Failed to read ONNX model: {}", e)))?;
        let tokenizer = load_tokenizer(dir)?;

        let graph = model
            .graph
            .as_ref()
            .ok_or_else(|| Error::classifier("ONNX model has no graph"))?;

        let inputs: Vec<String> = graph
            .input
            .iter()
            .map(|i| i.name.clone())
            .filter(|name| matches!(name.as_str(), INPUT_IDS | ATTENTION_MASK | TOKEN_TYPE_IDS))
            .collect();
        if !inputs.iter().any(|name| name == INPUT_IDS) {
            return Err(Error::classifier("ONNX graph has no 'input_ids' input"));
        }

        let output = graph
            .output
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| Error::classifier("ONNX graph has no outputs"))?;

        tracing::info!("✓ ONNX sentiment model loaded from {}", dir.display());

        Ok(Self {
            name: format!("onnx:{}", dir.display()),
            model,
            tokenizer,
            inputs,
            output,
            max_length,
        })
    }
}

fn as_i64(values: &[u32]) -> Vec<i64> {
    values.iter().map(|&v| i64::from(v)).collect()
}

impl InferenceBackend for OnnxBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let encoded = encode(&self.tokenizer, text, self.max_length)?;

        let mut feeds: HashMap<String, Tensor> = HashMap::new();
        for name in &self.inputs {
            let values = match name.as_str() {
                INPUT_IDS => &encoded.ids,
                ATTENTION_MASK => &encoded.attention_mask,
                _ => &encoded.type_ids,
            };
            feeds.insert(name.clone(), batch_tensor(&as_i64(values), &Device::Cpu)?);
        }

        let mut outputs = candle_onnx::simple_eval(&self.model, feeds)
            .map_err(|e| Error::classifier(format!("ONNX inference failed: {}", e)))?;

        let logits = outputs
            .remove(&self.output)
            .ok_or_else(|| Error::classifier(format!("ONNX output '{}' missing", self.output)))?;

        to_probabilities(&logits)
    }
}
