//! Checker plugin port
//!
//! An explicit trait for pluggable checkers: the routing-facing descriptor
//! plus the one operation the pipeline calls on the hot path, `analyze`.
//! What a checker considers "wrong" is its own business; the pipeline only
//! assigns chunks, executes under a retry budget, and collects output.

use super::reasoning_gateway::GatewayError;
use async_trait::async_trait;
use redline_domain::{AnalysisOutput, Chunk, PluginDescriptor, PluginName};
use thiserror::Error;

/// Errors a plugin's analysis can produce
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// A pluggable checker that consumes chunks and produces findings
#[async_trait]
pub trait CheckerPlugin: Send + Sync {
    /// Routing-facing description: name, usage criteria, example judgments,
    /// and the always-run flag.
    fn descriptor(&self) -> &PluginDescriptor;

    /// Analyze the assigned chunks in the context of the full document.
    async fn analyze(
        &self,
        chunks: &[Chunk],
        document_text: &str,
    ) -> Result<AnalysisOutput, PluginError>;

    /// The plugin's name.
    fn name(&self) -> &PluginName {
        &self.descriptor().name
    }

    /// Whether the plugin bypasses classification and sees every chunk.
    fn always_run(&self) -> bool {
        self.descriptor().always_run
    }
}
