use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use veriscan_core::MIN_MASK_SIZE;

use crate::extractors::DEFAULT_FORM_LABEL_MAX_LEN;
use crate::normalize::{Normalizer, DEFAULT_NOISE_WORDS};
use crate::redact::{RedactionDeriver, DEFAULT_SENSITIVE_PATTERN};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid sensitive_pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Deployment tuning for a [`DocumentPipeline`](crate::DocumentPipeline).
/// Every key is optional in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Replaces the built-in noise set when present.
    pub noise_words: Option<Vec<String>>,
    pub extra_noise_words: Vec<String>,
    pub sensitive_pattern: String,
    pub min_mask_size: f32,
    pub form_label_max_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            noise_words: None,
            extra_noise_words: Vec::new(),
            sensitive_pattern: DEFAULT_SENSITIVE_PATTERN.to_string(),
            min_mask_size: MIN_MASK_SIZE,
            form_label_max_len: DEFAULT_FORM_LABEL_MAX_LEN,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn normalizer(&self) -> Normalizer {
        let base = match &self.noise_words {
            Some(words) => Normalizer::new(words),
            None => Normalizer::new(DEFAULT_NOISE_WORDS.iter().copied()),
        };
        base.extended(&self.extra_noise_words)
    }

    pub fn redaction(&self) -> Result<RedactionDeriver, ConfigError> {
        Ok(RedactionDeriver::with_pattern(&self.sensitive_pattern, self.min_mask_size)?)
    }
}
