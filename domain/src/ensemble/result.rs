//! Ensemble run results - per-extractor outcomes and the aggregate.

use super::config::{ExtractorConfig, ExtractorId};
use super::issue::ExtractedIssue;
use serde::{Deserialize, Serialize};

/// Outcome of one extractor in an ensemble run
///
/// A failed extractor contributes zero issues and carries its error string;
/// it never aborts siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorResult {
    /// Unique id within the run
    pub extractor_id: ExtractorId,
    /// The configuration this extractor ran with
    pub config: ExtractorConfig,
    /// Issues found (empty on failure)
    pub issues: Vec<ExtractedIssue>,
    /// Wall-clock duration of this extraction, in milliseconds
    pub duration_ms: u64,
    /// Cost in USD, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
    /// Error string when the extraction failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractorResult {
    /// Result for an extraction that completed.
    pub fn completed(
        extractor_id: ExtractorId,
        config: ExtractorConfig,
        issues: Vec<ExtractedIssue>,
        duration_ms: u64,
        cost_usd: Option<f64>,
    ) -> Self {
        Self {
            extractor_id,
            config,
            issues,
            duration_ms,
            cost_usd,
            error: None,
        }
    }

    /// Result for an extraction that failed.
    pub fn failed(
        extractor_id: ExtractorId,
        config: ExtractorConfig,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            extractor_id,
            config,
            issues: Vec::new(),
            duration_ms,
            cost_usd: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate outcome of an ensemble coordinator run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiExtractorResult {
    /// One result per configured extractor, in configuration order
    pub extractor_results: Vec<ExtractorResult>,
    /// Total wall-clock duration of the parallel run, in milliseconds
    pub total_duration_ms: u64,
    /// Sum of per-extractor issue counts, before deduplication
    pub total_issues_found: usize,
}

impl MultiExtractorResult {
    pub fn new(extractor_results: Vec<ExtractorResult>, total_duration_ms: u64) -> Self {
        let total_issues_found = extractor_results.iter().map(|r| r.issues.len()).sum();
        Self {
            extractor_results,
            total_duration_ms,
            total_issues_found,
        }
    }

    /// Iterator over extractors that completed.
    pub fn successes(&self) -> impl Iterator<Item = &ExtractorResult> {
        self.extractor_results.iter().filter(|r| r.is_success())
    }

    /// Iterator over extractors that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ExtractorResult> {
        self.extractor_results.iter().filter(|r| !r.is_success())
    }

    /// Union of all issues across extractors, tagged with their source id.
    pub fn all_issues(&self) -> impl Iterator<Item = (&ExtractorId, &ExtractedIssue)> {
        self.extractor_results
            .iter()
            .flat_map(|r| r.issues.iter().map(move |i| (&r.extractor_id, i)))
    }

    /// Total cost across extractors that reported one.
    pub fn total_cost_usd(&self) -> f64 {
        self.extractor_results
            .iter()
            .filter_map(|r| r.cost_usd)
            .sum()
    }
}
