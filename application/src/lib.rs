//! Application layer for redline
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ClassifierParams, EnsembleParams, PipelineParams};
pub use ports::{
    checker_plugin::{CheckerPlugin, PluginError},
    issue_extractor::{
        ExtractionOutput, ExtractionRequest, ExtractionThresholds, ExtractorError, IssueExtractor,
    },
    progress::{NoPipelineProgress, PipelineProgress},
    reasoning_gateway::{GatewayError, ReasoningGateway, ReasoningRequest, ReasoningResponse},
};
pub use use_cases::analyze_document::{AnalyzeDocumentUseCase, DocumentAnalysis};
pub use use_cases::classify_chunks::{
    Assignments, ChunkClassifier, ClassificationOutcome, fallback_assignments,
};
pub use use_cases::dispatch::DispatchUseCase;
pub use use_cases::execute_plugins::ExecutePluginsUseCase;
pub use use_cases::judge_findings::{FindingsJudge, JudgeError, JudgeFindingsUseCase};
pub use use_cases::run_ensemble::{ReconciledFindings, RunEnsembleError, RunEnsembleUseCase};
