//! Pipeline parameter container.
//!
//! [`PipelineParams`] groups the three parameter sets so callers can hold
//! one value and hand each use case only the slice it needs.

use super::classifier_params::ClassifierParams;
use super::ensemble_params::EnsembleParams;
use redline_domain::ExecutorParams;
use serde::{Deserialize, Serialize};

/// Configuration container for one pipeline invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    classifier: ClassifierParams,
    executor: ExecutorParams,
    ensemble: EnsembleParams,
}

impl PipelineParams {
    pub fn new(
        classifier: ClassifierParams,
        executor: ExecutorParams,
        ensemble: EnsembleParams,
    ) -> Self {
        Self {
            classifier,
            executor,
            ensemble,
        }
    }

    // ==================== Accessors ====================

    /// Classifier batching and prompt-size parameters.
    pub fn classifier(&self) -> &ClassifierParams {
        &self.classifier
    }

    /// Retry, timeout, and backoff parameters for plugin execution.
    pub fn executor(&self) -> &ExecutorParams {
        &self.executor
    }

    /// Dedup threshold and arbitration parameters.
    pub fn ensemble(&self) -> &EnsembleParams {
        &self.ensemble
    }

    // ==================== Builder Methods ====================

    pub fn with_classifier(mut self, classifier: ClassifierParams) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorParams) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_ensemble(mut self, ensemble: EnsembleParams) -> Self {
        self.ensemble = ensemble;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default() {
        let params = PipelineParams::default();
        assert_eq!(params.classifier().batch_size, 10);
        assert_eq!(params.executor().max_attempts, 2);
        assert!(!params.ensemble().enable_judge);
    }

    #[test]
    fn test_builders_compose() {
        let params = PipelineParams::default()
            .with_classifier(ClassifierParams::default().with_batch_size(5))
            .with_executor(ExecutorParams::default().with_timeout(Duration::from_secs(60)))
            .with_ensemble(EnsembleParams::default().with_judge());

        assert_eq!(params.classifier().batch_size, 5);
        assert_eq!(params.executor().timeout, Duration::from_secs(60));
        assert!(params.ensemble().enable_judge);
    }
}
