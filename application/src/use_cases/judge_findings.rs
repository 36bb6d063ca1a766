//! Judge Findings use case.
//!
//! Optional arbitration pass: submits the deduplicated candidate set (with
//! provenance of which extractors proposed each) to the reasoning service
//! for accept/merge/reject verdicts. The verdicts are advisory telemetry
//! plus a filter - rejected candidates are dropped from the final result but
//! kept for audit.

use crate::ports::reasoning_gateway::{GatewayError, ReasoningGateway, ReasoningRequest};
use async_trait::async_trait;
use redline_domain::{
    IssueProvenance, JudgeDecision, JudgeOutput, JudgePromptTemplate, JudgedIssue,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during arbitration
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Unparseable verdicts: {0}")]
    UnparseableVerdicts(String),
}

/// Arbitration capability over deduplicated candidates
///
/// Trait seam so the ensemble pipeline can hold `Option<&dyn FindingsJudge>`
/// and tests can stub the arbitrator without a gateway.
#[async_trait]
pub trait FindingsJudge: Send + Sync {
    /// Judge every candidate; failure is recoverable by the caller (fall
    /// back to the pre-arbitration set).
    async fn judge(
        &self,
        candidates: &[IssueProvenance],
        document_text: &str,
    ) -> Result<JudgeOutput, JudgeError>;
}

/// Use case for arbitrating deduplicated candidates via the reasoning service
pub struct JudgeFindingsUseCase<G: ReasoningGateway> {
    gateway: Arc<G>,
    model: Option<String>,
}

/// One row of the structured verdict response
#[derive(Debug, Deserialize)]
struct VerdictRow {
    index: usize,
    decision: JudgeDecision,
    #[serde(default)]
    reasoning: String,
}

#[derive(Debug, Deserialize)]
struct VerdictRows {
    verdicts: Vec<VerdictRow>,
}

impl<G: ReasoningGateway> JudgeFindingsUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// JSON schema for the structured verdict response.
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "verdicts": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "index": { "type": "integer" },
                            "decision": {
                                "type": "string",
                                "enum": ["accepted", "merged", "rejected"]
                            },
                            "reasoning": { "type": "string" }
                        },
                        "required": ["index", "decision"]
                    }
                }
            },
            "required": ["verdicts"]
        })
    }
}

#[async_trait]
impl<G: ReasoningGateway> FindingsJudge for JudgeFindingsUseCase<G> {
    async fn judge(
        &self,
        candidates: &[IssueProvenance],
        document_text: &str,
    ) -> Result<JudgeOutput, JudgeError> {
        let started = Instant::now();
        if candidates.is_empty() {
            return Ok(JudgeOutput::new(Vec::new(), 0, None));
        }

        let mut request = ReasoningRequest::new(
            JudgePromptTemplate::system(),
            JudgePromptTemplate::user(candidates, document_text),
            Self::response_schema(),
        );
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let response = self.gateway.complete_structured(request).await?;
        let rows: VerdictRows = serde_json::from_value(response.content)
            .map_err(|e| JudgeError::UnparseableVerdicts(e.to_string()))?;

        // Index verdicts; out-of-range indices are dropped with a warning.
        let mut verdicts: Vec<Option<(JudgeDecision, String)>> = vec![None; candidates.len()];
        for row in rows.verdicts {
            if row.index < candidates.len() {
                verdicts[row.index] = Some((row.decision, row.reasoning));
            } else {
                warn!("Arbitrator returned out-of-range index {}, dropping", row.index);
            }
        }

        // Candidates the arbitrator did not rule on default to accepted:
        // dropping a finding requires an explicit rejection.
        let judged: Vec<JudgedIssue> = candidates
            .iter()
            .zip(verdicts)
            .map(|(candidate, verdict)| match verdict {
                Some((decision, reasoning)) => {
                    JudgedIssue::new(candidate.clone(), decision, reasoning)
                }
                None => JudgedIssue::new(
                    candidate.clone(),
                    JudgeDecision::Accepted,
                    "no verdict returned",
                ),
            })
            .collect();

        let output = JudgeOutput::new(
            judged,
            started.elapsed().as_millis() as u64,
            response.cost_usd,
        );
        info!(
            "Arbitration kept {} and rejected {} candidates",
            output.accepted.len(),
            output.rejected.len()
        );
        Ok(output)
    }
}
