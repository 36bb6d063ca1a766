//! Analyze Document use case.
//!
//! The full routing-and-execution pipeline: dispatch chunks to plugins, then
//! execute every actionable decision concurrently. Degradation-only surface:
//! classifier failure falls back deterministically and plugin failure is
//! per-plugin data, so this use case itself never errors.

use crate::ports::checker_plugin::CheckerPlugin;
use crate::ports::progress::PipelineProgress;
use crate::ports::reasoning_gateway::ReasoningGateway;
use crate::use_cases::classify_chunks::ChunkClassifier;
use crate::use_cases::dispatch::DispatchUseCase;
use crate::use_cases::execute_plugins::ExecutePluginsUseCase;
use redline_domain::{Chunk, ExecutionResult, ExecutorParams, RoutingResult};
use std::sync::Arc;

/// Complete output of one document-analysis run
#[derive(Debug)]
pub struct DocumentAnalysis {
    /// Routing decisions, cost, and timing
    pub routing: RoutingResult,
    /// One terminal result per executed plugin
    pub executions: Vec<ExecutionResult>,
}

impl DocumentAnalysis {
    /// Total cost across routing and successful plugin analyses.
    pub fn total_cost_usd(&self) -> f64 {
        self.routing.total_cost_usd
            + self
                .executions
                .iter()
                .filter_map(|e| e.output().and_then(|o| o.cost_usd))
                .sum::<f64>()
    }
}

/// Use case for running the whole chunk-routing and plugin-execution pipeline
pub struct AnalyzeDocumentUseCase<G: ReasoningGateway> {
    dispatch: DispatchUseCase<G>,
    executor: ExecutePluginsUseCase,
}

impl<G: ReasoningGateway> AnalyzeDocumentUseCase<G> {
    pub fn new(classifier: Arc<ChunkClassifier<G>>) -> Self {
        Self {
            dispatch: DispatchUseCase::new(classifier),
            executor: ExecutePluginsUseCase::new(),
        }
    }

    /// Route, then execute. Returns best-effort results with per-plugin
    /// success flags; partial failure is the caller's call to make.
    pub async fn execute(
        &self,
        plugins: &[Arc<dyn CheckerPlugin>],
        chunks: &[Chunk],
        document_text: &str,
        params: &ExecutorParams,
        progress: Arc<dyn PipelineProgress>,
    ) -> DocumentAnalysis {
        progress.on_routing_start(chunks.len(), plugins.len());
        let routing = self.dispatch.dispatch(plugins, chunks).await;
        progress.on_routing_complete(&routing);

        let executions = self
            .executor
            .execute_many(plugins, &routing, document_text, params, progress)
            .await;

        DocumentAnalysis {
            routing,
            executions,
        }
    }
}
