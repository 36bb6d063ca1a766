//! Console progress reporting.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use redline_application::PipelineProgress;
use redline_domain::{ExecutionResult, ExtractorResult, PluginName, RoutingResult};
use std::sync::Arc;
use std::time::Duration;

/// Progress reporter that prints colored status lines with a spinner.
pub struct ConsoleProgressReporter {
    spinner: ProgressBar,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("static template is valid"),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    /// Stop the spinner, leaving printed lines intact.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ConsoleProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineProgress for ConsoleProgressReporter {
    fn on_routing_start(&self, total_chunks: usize, total_plugins: usize) {
        self.spinner.set_message(format!(
            "routing {} chunks across {} plugins",
            total_chunks, total_plugins
        ));
    }

    fn on_routing_complete(&self, result: &RoutingResult) {
        self.spinner.println(format!(
            "{} routed {} plugins in {} ms (${:.4})",
            "✓".green(),
            result.decisions.len(),
            result.routing_time_ms,
            result.total_cost_usd
        ));
    }

    fn on_plugin_start(&self, plugin: &PluginName, chunk_count: usize) {
        self.spinner
            .set_message(format!("{} analyzing {} chunks", plugin, chunk_count));
    }

    fn on_plugin_attempt(&self, plugin: &PluginName, attempt: u32) {
        if attempt > 1 {
            self.spinner
                .println(format!("{} {} retry (attempt {})", "↻".yellow(), plugin, attempt));
        }
    }

    fn on_plugin_complete(&self, result: &ExecutionResult) {
        if result.success {
            self.spinner.println(format!(
                "{} {} done in {} ms",
                "✓".green(),
                result.plugin_name,
                result.duration_ms
            ));
        } else {
            self.spinner.println(format!(
                "{} {} failed after {} attempts: {}",
                "✗".red(),
                result.plugin_name,
                result.attempts,
                result.error().unwrap_or("unknown error")
            ));
        }
    }

    fn on_extractor_complete(&self, result: &ExtractorResult) {
        match &result.error {
            None => self.spinner.println(format!(
                "{} extractor {} found {} issues in {} ms",
                "✓".green(),
                result.extractor_id,
                result.issues.len(),
                result.duration_ms
            )),
            Some(error) => self.spinner.println(format!(
                "{} extractor {} failed: {}",
                "✗".red(),
                result.extractor_id,
                error
            )),
        }
    }

    fn on_judge_complete(&self, accepted: usize, rejected: usize) {
        self.spinner.println(format!(
            "{} judge kept {} and rejected {} candidates",
            "✓".green(),
            accepted,
            rejected
        ));
    }
}

/// Fan progress events out to several reporters (e.g. console + run log).
pub struct CompositeProgress {
    reporters: Vec<Arc<dyn PipelineProgress>>,
}

impl CompositeProgress {
    pub fn new(reporters: Vec<Arc<dyn PipelineProgress>>) -> Self {
        Self { reporters }
    }
}

impl PipelineProgress for CompositeProgress {
    fn on_routing_start(&self, total_chunks: usize, total_plugins: usize) {
        for reporter in &self.reporters {
            reporter.on_routing_start(total_chunks, total_plugins);
        }
    }

    fn on_routing_complete(&self, result: &RoutingResult) {
        for reporter in &self.reporters {
            reporter.on_routing_complete(result);
        }
    }

    fn on_plugin_start(&self, plugin: &PluginName, chunk_count: usize) {
        for reporter in &self.reporters {
            reporter.on_plugin_start(plugin, chunk_count);
        }
    }

    fn on_plugin_attempt(&self, plugin: &PluginName, attempt: u32) {
        for reporter in &self.reporters {
            reporter.on_plugin_attempt(plugin, attempt);
        }
    }

    fn on_plugin_complete(&self, result: &ExecutionResult) {
        for reporter in &self.reporters {
            reporter.on_plugin_complete(result);
        }
    }

    fn on_extractor_complete(&self, result: &ExtractorResult) {
        for reporter in &self.reporters {
            reporter.on_extractor_complete(result);
        }
    }

    fn on_judge_complete(&self, accepted: usize, rejected: usize) {
        for reporter in &self.reporters {
            reporter.on_judge_complete(accepted, rejected);
        }
    }
}
