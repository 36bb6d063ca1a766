//! Plugin analysis outputs and terminal execution results.
//!
//! An [`ExecutionResult`] is created once per plugin per run and is terminal:
//! the executor never retries a plugin after returning its result. Failure is
//! represented as data (`success == false` plus the last error) so that one
//! plugin's exhaustion never aborts its siblings.

use crate::core::chunk::ChunkId;
use crate::routing::PluginName;
use serde::{Deserialize, Serialize};

/// One finding produced by a checker plugin
///
/// The pipeline treats finding content as opaque payload; what counts as
/// "wrong" is the plugin's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Human-readable description of the problem
    pub description: String,
    /// Chunk the finding refers to, when the plugin attributes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<ChunkId>,
    /// Quoted text the finding refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

impl Finding {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            chunk_id: None,
            quote: None,
        }
    }

    pub fn with_chunk(mut self, chunk_id: impl Into<ChunkId>) -> Self {
        self.chunk_id = Some(chunk_id.into());
        self
    }

    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = Some(quote.into());
        self
    }
}

/// What a plugin's `analyze` call returns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// One-line summary of the analysis
    pub summary: String,
    /// Longer analysis text
    pub analysis: String,
    /// Individual findings
    #[serde(default)]
    pub findings: Vec<Finding>,
    /// Cost of the analysis in USD, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
}

impl AnalysisOutput {
    pub fn new(summary: impl Into<String>, analysis: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            analysis: analysis.into(),
            findings: Vec::new(),
            cost_usd: None,
        }
    }

    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }

    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = Some(cost_usd);
        self
    }
}

/// Payload of a terminal execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionOutcome {
    /// Analysis completed
    Completed(AnalysisOutput),
    /// All attempts exhausted; the last error, with an empty payload
    Failed { error: String },
}

/// Terminal result of executing one plugin over its assigned chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The plugin that was executed
    pub plugin_name: PluginName,
    /// Whether any attempt succeeded
    pub success: bool,
    /// Number of attempts made
    pub attempts: u32,
    /// Wall-clock duration across all attempts, in milliseconds
    pub duration_ms: u64,
    /// Analysis output or the final error
    pub outcome: ExecutionOutcome,
}

impl ExecutionResult {
    /// Result for a plugin whose analysis succeeded.
    pub fn success(
        plugin_name: impl Into<PluginName>,
        attempts: u32,
        duration_ms: u64,
        output: AnalysisOutput,
    ) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            success: true,
            attempts,
            duration_ms,
            outcome: ExecutionOutcome::Completed(output),
        }
    }

    /// Result for a plugin that exhausted its attempt budget.
    pub fn failure(
        plugin_name: impl Into<PluginName>,
        attempts: u32,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            success: false,
            attempts,
            duration_ms,
            outcome: ExecutionOutcome::Failed {
                error: error.into(),
            },
        }
    }

    /// The analysis output, if the execution succeeded.
    pub fn output(&self) -> Option<&AnalysisOutput> {
        match &self.outcome {
            ExecutionOutcome::Completed(output) => Some(output),
            ExecutionOutcome::Failed { .. } => None,
        }
    }

    /// The final error, if the execution failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ExecutionOutcome::Completed(_) => None,
            ExecutionOutcome::Failed { error } => Some(error),
        }
    }
}
