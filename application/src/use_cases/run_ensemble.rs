//! Run Ensemble use case.
//!
//! Orchestrates N independently-configured extraction attempts over the same
//! input: all extractors launch concurrently, every failure is caught and
//! recorded per-extractor, and the coordinator settles all of them before
//! returning - wait-for-all, never fail-fast. Reconciliation (dedup,
//! provenance, optional arbitration) runs single-threaded afterwards.

use crate::config::EnsembleParams;
use crate::ports::issue_extractor::{
    ExtractionRequest, ExtractionThresholds, IssueExtractor,
};
use crate::ports::progress::PipelineProgress;
use crate::use_cases::judge_findings::FindingsJudge;
use redline_domain::{
    ExtractedIssue, ExtractorConfig, ExtractorId, ExtractorResult, IssueProvenance, JudgeOutput,
    MultiExtractorResult, assign_extractor_ids, cluster_issues,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur when starting an ensemble run
#[derive(Error, Debug)]
pub enum RunEnsembleError {
    #[error("No extractors configured")]
    NoExtractors,
}

/// Final reconciled output of an ensemble run
#[derive(Debug)]
pub struct ReconciledFindings {
    /// Raw per-extractor results (pre-deduplication)
    pub extraction: MultiExtractorResult,
    /// Deduplicated candidates with provenance, in first-seen cluster order
    pub candidates: Vec<IssueProvenance>,
    /// Issues merged away during deduplication
    pub duplicates_removed: usize,
    /// Malformed issues dropped before deduplication
    pub malformed_removed: usize,
    /// Arbitration output, when arbitration ran and succeeded
    pub judgment: Option<JudgeOutput>,
    /// True when arbitration was requested but failed; `candidates` is then
    /// the authoritative final set
    pub judge_degraded: bool,
}

impl ReconciledFindings {
    /// The final issue set a caller should present: arbitration-filtered
    /// when available, the deduplicated candidates otherwise.
    pub fn final_issues(&self) -> Vec<&ExtractedIssue> {
        match &self.judgment {
            Some(judgment) => judgment.accepted.iter().map(|j| &j.issue).collect(),
            None => self.candidates.iter().map(|c| &c.issue).collect(),
        }
    }
}

/// Use case for running an extraction ensemble
pub struct RunEnsembleUseCase<E: IssueExtractor + 'static> {
    extractor: Arc<E>,
}

impl<E: IssueExtractor + 'static> RunEnsembleUseCase<E> {
    pub fn new(extractor: Arc<E>) -> Self {
        Self { extractor }
    }

    /// Launch all configured extractions concurrently and settle every one.
    ///
    /// Results are reported in configuration order regardless of completion
    /// order. A failed extraction contributes an error-carrying result, not
    /// an error return.
    pub async fn run(
        &self,
        document_text: &str,
        configs: &[ExtractorConfig],
        thresholds: ExtractionThresholds,
        progress: Arc<dyn PipelineProgress>,
    ) -> Result<MultiExtractorResult, RunEnsembleError> {
        if configs.is_empty() {
            return Err(RunEnsembleError::NoExtractors);
        }

        let ids = assign_extractor_ids(configs);
        info!("Starting ensemble with {} extractors", configs.len());

        let started = Instant::now();
        let mut join_set = JoinSet::new();

        for (index, (config, id)) in configs.iter().zip(ids).enumerate() {
            let extractor = Arc::clone(&self.extractor);
            let config = config.clone();
            let request =
                ExtractionRequest::new(document_text, config.clone()).with_thresholds(thresholds);

            join_set.spawn(async move {
                let run_started = Instant::now();
                let outcome = extractor.extract(request).await;
                let duration_ms = run_started.elapsed().as_millis() as u64;

                let result = match outcome {
                    Ok(output) => {
                        debug!("Extractor {} found {} issues", id, output.issues.len());
                        ExtractorResult::completed(
                            id,
                            config,
                            output.issues,
                            duration_ms,
                            output.cost_usd,
                        )
                    }
                    Err(e) => {
                        warn!("Extractor {} failed: {}", id, e);
                        ExtractorResult::failed(id, config, duration_ms, e.to_string())
                    }
                };
                (index, result)
            });
        }

        // Settle everything; completion order is arbitrary, so results go
        // back into their configuration slots.
        let mut slots: Vec<Option<ExtractorResult>> = Vec::new();
        slots.resize_with(configs.len(), || None);

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    progress.on_extractor_complete(&result);
                    slots[index] = Some(result);
                }
                Err(e) => {
                    warn!("Extractor task join error: {}", e);
                }
            }
        }

        let results: Vec<ExtractorResult> = slots.into_iter().flatten().collect();
        let aggregate =
            MultiExtractorResult::new(results, started.elapsed().as_millis() as u64);
        info!(
            "Ensemble complete: {} issues from {} extractors in {} ms",
            aggregate.total_issues_found,
            aggregate.extractor_results.len(),
            aggregate.total_duration_ms
        );
        Ok(aggregate)
    }

    /// Run the ensemble, deduplicate the unioned findings, and optionally
    /// arbitrate the candidates.
    ///
    /// When arbitration is enabled but fails, the deduplicated candidate set
    /// stands and the output is flagged `judge_degraded` - adjudication
    /// failure must not lose all findings.
    pub async fn run_reconciled(
        &self,
        document_text: &str,
        configs: &[ExtractorConfig],
        params: &EnsembleParams,
        judge: Option<&dyn FindingsJudge>,
        progress: Arc<dyn PipelineProgress>,
    ) -> Result<ReconciledFindings, RunEnsembleError> {
        let extraction = self
            .run(document_text, configs, params.thresholds, Arc::clone(&progress))
            .await?;

        // Union of all issues, tagged with their producer.
        let tagged: Vec<(ExtractorId, ExtractedIssue)> = extraction
            .all_issues()
            .map(|(id, issue)| (id.clone(), issue.clone()))
            .collect();

        let clustered = cluster_issues(
            tagged.iter().map(|(_, issue)| issue.clone()).collect(),
            params.dedup_threshold,
        );
        if clustered.malformed_removed > 0 {
            warn!(
                "Dropped {} malformed issues (missing text span) before dedup",
                clustered.malformed_removed
            );
        }
        debug!(
            "Dedup kept {} of {} issues",
            clustered.clusters.len(),
            tagged.len()
        );

        let candidates: Vec<IssueProvenance> = clustered
            .clusters
            .into_iter()
            .map(|cluster| {
                let mut sources: Vec<ExtractorId> = Vec::new();
                for index in &cluster.member_indices {
                    let source = &tagged[*index].0;
                    if !sources.contains(source) {
                        sources.push(source.clone());
                    }
                }
                IssueProvenance::new(cluster.representative, sources)
            })
            .collect();

        let (judgment, judge_degraded) = match (params.enable_judge, judge) {
            (true, Some(judge)) if !candidates.is_empty() => {
                match judge.judge(&candidates, document_text).await {
                    Ok(output) => {
                        progress.on_judge_complete(output.accepted.len(), output.rejected.len());
                        (Some(output), false)
                    }
                    Err(e) => {
                        warn!(
                            "Arbitration failed ({}), falling back to deduplicated candidates",
                            e
                        );
                        (None, true)
                    }
                }
            }
            _ => (None, false),
        };

        Ok(ReconciledFindings {
            extraction,
            candidates,
            duplicates_removed: clustered.duplicates_removed,
            malformed_removed: clustered.malformed_removed,
            judgment,
            judge_degraded,
        })
    }
}
