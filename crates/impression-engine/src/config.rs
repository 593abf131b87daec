//! Engine configuration

use crate::morphology::DEFAULT_CACHE_CAPACITY;
use crate::scoring::ScoringStrategy;
use impression_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the whole analysis engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub lexicon: LexiconConfig,

    #[serde(default)]
    pub morphology: MorphologyConfig,

    /// How the overall sentiment score is chosen
    #[serde(default)]
    pub scoring: ScoringStrategy,

    #[serde(default)]
    pub ml: MlConfig,
}

impl EngineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Invalid engine configuration: {}", e)))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::config(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// General sentiment dictionary; `None` disables it
    #[serde(default = "default_general_lexicon_path")]
    pub general_lexicon_path: Option<PathBuf>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            general_lexicon_path: default_general_lexicon_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphologyConfig {
    /// Upper bound of the lemma memo table
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// ML fallback classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlConfig {
    /// Directory holding `model.onnx` and `tokenizer.json`
    #[serde(default)]
    pub onnx_dir: Option<PathBuf>,

    /// Transformer model used when the ONNX model is unavailable
    #[serde(default)]
    pub pipeline: Option<ModelSourceSpec>,

    /// Token budget; longer input is truncated
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Output labels in logit order
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    #[serde(default)]
    pub device: DeviceSpec,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            onnx_dir: None,
            pipeline: None,
            max_length: default_max_length(),
            labels: default_labels(),
            device: DeviceSpec::default(),
        }
    }
}

impl MlConfig {
    /// Whether any backend is configured
    pub fn has_backend(&self) -> bool {
        self.onnx_dir.is_some() || self.pipeline.is_some()
    }
}

/// Model source specification (for config files)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSourceSpec {
    /// Local directory with `config.json`, tokenizer and `model.safetensors`
    Local { path: PathBuf },

    /// Hugging Face Hub repository
    #[serde(rename = "huggingface")]
    HuggingFace {
        repo: String,
        #[serde(default)]
        revision: Option<String>,
    },
}

/// Device specification (for config files)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda {
        index: Option<usize>,
    },
    Metal {
        index: Option<usize>,
    },
}

fn default_general_lexicon_path() -> Option<PathBuf> {
    Some(PathBuf::from("data/general_lexicon.txt"))
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_max_length() -> usize {
    512
}

fn default_labels() -> Vec<String> {
    vec![
        "neutral".to_string(),
        "positive".to_string(),
        "negative".to_string(),
    ]
}
