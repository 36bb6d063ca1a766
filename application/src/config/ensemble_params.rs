//! Ensemble parameters — dedup threshold and arbitration control.

use crate::ports::issue_extractor::ExtractionThresholds;
use redline_domain::DEFAULT_DEDUP_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Static parameters of the ensemble reconciliation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleParams {
    /// Jaccard similarity at or above which two issues merge
    pub dedup_threshold: f64,
    /// Whether to run the arbitration pass over deduplicated candidates
    pub enable_judge: bool,
    /// Model override for arbitration calls
    pub judge_model: Option<String>,
    /// Reporting thresholds passed through to each extractor
    pub thresholds: ExtractionThresholds,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            enable_judge: false,
            judge_model: None,
            thresholds: ExtractionThresholds::default(),
        }
    }
}

impl EnsembleParams {
    // ==================== Builder Methods ====================

    pub fn with_dedup_threshold(mut self, threshold: f64) -> Self {
        self.dedup_threshold = threshold.clamp(f64::MIN_POSITIVE, 1.0);
        self
    }

    pub fn with_judge(mut self) -> Self {
        self.enable_judge = true;
        self
    }

    pub fn with_judge_model(mut self, model: impl Into<String>) -> Self {
        self.judge_model = Some(model.into());
        self
    }

    pub fn with_thresholds(mut self, thresholds: ExtractionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}
