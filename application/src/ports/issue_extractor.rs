//! Issue extractor port
//!
//! One configured extraction attempt over a full document. The ensemble
//! coordinator runs several of these in parallel with different configs and
//! reconciles their overlapping output.

use super::reasoning_gateway::GatewayError;
use async_trait::async_trait;
use redline_domain::{ExtractedIssue, ExtractorConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during an extraction run
#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Extraction failed: {0}")]
    Failed(String),

    #[error("Malformed extractor output: {0}")]
    Malformed(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Reporting thresholds passed through to the extraction capability
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionThresholds {
    /// Minimum severity an issue must have to be reported, 0-100
    pub min_severity: u8,
    /// Minimum extractor confidence for an issue to be reported, 0-100
    pub min_confidence: u8,
}

impl Default for ExtractionThresholds {
    fn default() -> Self {
        Self {
            min_severity: 0,
            min_confidence: 30,
        }
    }
}

/// Input to one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// The full document text
    pub document_text: String,
    /// Model and sampling parameters for this attempt
    pub config: ExtractorConfig,
    /// Reporting thresholds
    pub thresholds: ExtractionThresholds,
}

impl ExtractionRequest {
    pub fn new(document_text: impl Into<String>, config: ExtractorConfig) -> Self {
        Self {
            document_text: document_text.into(),
            config,
            thresholds: ExtractionThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: ExtractionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// Output of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    /// Issues found
    pub issues: Vec<ExtractedIssue>,
    /// Cost in USD, when the provider reports it
    pub cost_usd: Option<f64>,
}

/// Extraction capability consumed by the ensemble coordinator
#[async_trait]
pub trait IssueExtractor: Send + Sync {
    /// Run one extraction attempt; errors are isolated per extractor by the
    /// coordinator and never abort sibling runs.
    async fn extract(&self, request: ExtractionRequest) -> Result<ExtractionOutput, ExtractorError>;
}
