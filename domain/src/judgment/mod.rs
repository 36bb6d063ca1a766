//! Judgment subdomain - arbitration verdicts over deduplicated candidates.
//!
//! When arbitration is enabled, each deduplicated candidate is submitted to a
//! reasoning service for an accept/merge/reject decision. The decision is
//! advisory telemetry plus a filter: rejected issues are dropped from the
//! final result, everything else is retained with full provenance back to the
//! extractors that proposed it.

use crate::ensemble::config::ExtractorId;
use crate::ensemble::issue::ExtractedIssue;
use serde::{Deserialize, Serialize};

/// Verdict for one candidate issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeDecision {
    /// Kept as-is
    Accepted,
    /// Kept, judged to subsume one or more other candidates
    Merged,
    /// Dropped from the final result
    Rejected,
}

impl JudgeDecision {
    pub fn is_retained(&self) -> bool {
        matches!(self, JudgeDecision::Accepted | JudgeDecision::Merged)
    }
}

impl std::fmt::Display for JudgeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgeDecision::Accepted => write!(f, "accepted"),
            JudgeDecision::Merged => write!(f, "merged"),
            JudgeDecision::Rejected => write!(f, "rejected"),
        }
    }
}

/// A deduplicated candidate plus the extractors that proposed it
///
/// Built by the coordinator pipeline before judging: every extractor whose
/// issue fell into the candidate's cluster is recorded as a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueProvenance {
    /// The cluster representative
    pub issue: ExtractedIssue,
    /// Extractors that proposed an issue in this cluster
    pub source_extractors: Vec<ExtractorId>,
}

impl IssueProvenance {
    pub fn new(issue: ExtractedIssue, source_extractors: Vec<ExtractorId>) -> Self {
        Self {
            issue,
            source_extractors,
        }
    }
}

/// One judged candidate with its verdict and provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgedIssue {
    /// The candidate issue
    pub issue: ExtractedIssue,
    /// Extractors that proposed it
    pub source_extractors: Vec<ExtractorId>,
    /// The arbitrator's verdict
    pub decision: JudgeDecision,
    /// Free-text reasoning from the arbitrator
    pub reasoning: String,
}

impl JudgedIssue {
    pub fn new(
        provenance: IssueProvenance,
        decision: JudgeDecision,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            issue: provenance.issue,
            source_extractors: provenance.source_extractors,
            decision,
            reasoning: reasoning.into(),
        }
    }
}

/// Complete output of one arbitration pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeOutput {
    /// Retained candidates (accepted or merged)
    pub accepted: Vec<JudgedIssue>,
    /// Dropped candidates, kept for audit
    pub rejected: Vec<JudgedIssue>,
    /// Wall-clock duration of the arbitration call, in milliseconds
    pub duration_ms: u64,
    /// Arbitration cost in USD, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
}

impl JudgeOutput {
    pub fn new(judged: Vec<JudgedIssue>, duration_ms: u64, cost_usd: Option<f64>) -> Self {
        let (accepted, rejected): (Vec<JudgedIssue>, Vec<JudgedIssue>) = judged
            .into_iter()
            .partition(|j| j.decision.is_retained());
        Self {
            accepted,
            rejected,
            duration_ms,
            cost_usd,
        }
    }
}
