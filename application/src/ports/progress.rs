//! Progress notification port
//!
//! Defines the interface for reporting pipeline progress. Implementations
//! live in the presentation boundary (the CLI's console reporter) and every
//! method defaults to a no-op, so use cases can notify unconditionally.

use redline_domain::{ExecutionResult, ExtractorResult, PluginName, RoutingResult};

/// Callback for progress updates during a pipeline run
pub trait PipelineProgress: Send + Sync {
    /// Called when routing starts
    fn on_routing_start(&self, _total_chunks: usize, _total_plugins: usize) {}

    /// Called when routing completes
    fn on_routing_complete(&self, _result: &RoutingResult) {}

    /// Called when a plugin's execution starts
    fn on_plugin_start(&self, _plugin: &PluginName, _chunk_count: usize) {}

    /// Called at the start of each attempt (1-indexed)
    fn on_plugin_attempt(&self, _plugin: &PluginName, _attempt: u32) {}

    /// Called when a plugin's execution terminates (success or exhaustion)
    fn on_plugin_complete(&self, _result: &ExecutionResult) {}

    /// Called when an ensemble extractor terminates
    fn on_extractor_complete(&self, _result: &ExtractorResult) {}

    /// Called after the arbitration pass
    fn on_judge_complete(&self, _accepted: usize, _rejected: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoPipelineProgress;

impl PipelineProgress for NoPipelineProgress {}
