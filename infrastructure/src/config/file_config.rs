//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use redline_application::{
    ClassifierParams, EnsembleParams, ExtractionThresholds, PipelineParams,
};
use redline_domain::{ExecutorParams, ExtractorConfig, ReasoningEffort};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("dedup_threshold {0} out of range (0, 1]")]
    InvalidThreshold(f64),
}

/// Raw reasoning-service configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    /// Endpoint base URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Default model for classification and arbitration
    pub model: String,
    /// Whole-request HTTP timeout in seconds
    pub timeout_seconds: Option<u64>,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            model: "anthropic/claude-sonnet-4.5".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Raw classifier configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClassifierConfig {
    /// Chunks per classification request
    pub batch_size: usize,
    /// Per-chunk byte budget in the prompt
    pub max_chunk_chars: usize,
    /// Model override for classification
    pub model: Option<String>,
}

impl Default for FileClassifierConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_chunk_chars: 1200,
            model: None,
        }
    }
}

/// Raw executor configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Total attempts per plugin
    pub max_attempts: u32,
    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout_seconds: 300,
            retry_delay_ms: 1000,
        }
    }
}

/// One extractor entry in the ensemble table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileExtractorConfig {
    /// Model identifier
    pub model: String,
    /// Fixed sampling temperature; provider default when absent
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Reasoning effort (uses domain type)
    #[serde(default)]
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
}

/// Raw ensemble configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEnsembleConfig {
    /// Configured extractors
    pub extractors: Vec<FileExtractorConfig>,
    /// Jaccard similarity threshold for dedup
    pub dedup_threshold: f64,
    /// Whether to arbitrate deduplicated candidates
    pub enable_judge: bool,
    /// Model override for arbitration
    pub judge_model: Option<String>,
    /// Minimum severity an issue must have to be reported
    pub min_severity: u8,
    /// Minimum extractor confidence for an issue to be reported
    pub min_confidence: u8,
}

impl Default for FileEnsembleConfig {
    fn default() -> Self {
        let thresholds = ExtractionThresholds::default();
        Self {
            extractors: Vec::new(),
            dedup_threshold: redline_domain::DEFAULT_DEDUP_THRESHOLD,
            enable_judge: false,
            judge_model: None,
            min_severity: thresholds.min_severity,
            min_confidence: thresholds.min_confidence,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Path of the JSONL run log; disabled when absent
    pub run_log: Option<String>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Reasoning-service settings
    pub service: FileServiceConfig,
    /// Classifier settings
    pub classifier: FileClassifierConfig,
    /// Executor settings
    pub executor: FileExecutorConfig,
    /// Ensemble settings
    pub ensemble: FileEnsembleConfig,
    /// Logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.service.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.executor.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.service.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        for extractor in &self.ensemble.extractors {
            if extractor.model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName);
            }
        }

        let threshold = self.ensemble.dedup_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigValidationError::InvalidThreshold(threshold));
        }

        Ok(())
    }

    /// Build the application-layer parameter container.
    pub fn pipeline_params(&self) -> PipelineParams {
        let mut classifier = ClassifierParams::default()
            .with_batch_size(self.classifier.batch_size)
            .with_max_chunk_chars(self.classifier.max_chunk_chars);
        if let Some(model) = &self.classifier.model {
            classifier = classifier.with_model(model.clone());
        }

        let executor = ExecutorParams::default()
            .with_max_attempts(self.executor.max_attempts)
            .with_timeout(Duration::from_secs(self.executor.timeout_seconds))
            .with_retry_delay(Duration::from_millis(self.executor.retry_delay_ms));

        let mut ensemble = EnsembleParams::default()
            .with_dedup_threshold(self.ensemble.dedup_threshold)
            .with_thresholds(ExtractionThresholds {
                min_severity: self.ensemble.min_severity,
                min_confidence: self.ensemble.min_confidence,
            });
        if self.ensemble.enable_judge {
            ensemble = ensemble.with_judge();
        }
        if let Some(model) = &self.ensemble.judge_model {
            ensemble = ensemble.with_judge_model(model.clone());
        }

        PipelineParams::new(classifier, executor, ensemble)
    }

    /// Build the domain extractor configs from the ensemble table.
    pub fn extractor_configs(&self) -> Vec<ExtractorConfig> {
        self.ensemble
            .extractors
            .iter()
            .map(|entry| {
                let mut config = ExtractorConfig::new(entry.model.clone());
                if let Some(temperature) = entry.temperature {
                    config = config.with_temperature(temperature);
                }
                if let Some(effort) = entry.reasoning_effort {
                    config = config.with_reasoning_effort(effort);
                }
                if let Some(label) = &entry.label {
                    config = config.with_label(label.clone());
                }
                config
            })
            .collect()
    }
}
