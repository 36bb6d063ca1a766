//! Execute Plugins use case.
//!
//! Runs each plugin over its assigned chunks with a bounded attempt budget,
//! a per-attempt timeout, and linear backoff between attempts. Failure is
//! terminal data, not an error: a plugin that exhausts its budget yields a
//! `success == false` result and its siblings run on unaffected.
//!
//! Each attempt races the plugin's analysis against a timer. On expiry the
//! in-flight future is dropped; unlike the promise-racing original, dropping
//! the future here does cancel the pipeline's own work, though a collaborator
//! holding its own tasks may still run to completion and be discarded.

use crate::ports::checker_plugin::CheckerPlugin;
use crate::ports::progress::PipelineProgress;
use redline_domain::{Chunk, ExecutionResult, ExecutorParams, RoutingResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Use case for executing routed plugins under fault tolerance
#[derive(Debug, Default)]
pub struct ExecutePluginsUseCase;

impl ExecutePluginsUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Execute one plugin over its chunks, retrying up to the budget.
    ///
    /// State machine: `Attempting(n) -> Success | Timeout | Error`, where
    /// timeout and error advance to `Attempting(n+1)` until `max_attempts`
    /// is exhausted. Never returns an error.
    pub async fn execute_one(
        &self,
        plugin: Arc<dyn CheckerPlugin>,
        chunks: &[Chunk],
        document_text: &str,
        params: &ExecutorParams,
        progress: &dyn PipelineProgress,
    ) -> ExecutionResult {
        let name = plugin.name().clone();
        let started = Instant::now();
        let mut last_error = String::new();

        for attempt in 1..=params.max_attempts {
            progress.on_plugin_attempt(&name, attempt);
            debug!("Plugin {} attempt {}/{}", name, attempt, params.max_attempts);

            match tokio::time::timeout(params.timeout, plugin.analyze(chunks, document_text))
                .await
            {
                Ok(Ok(output)) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    info!("Plugin {} succeeded on attempt {}", name, attempt);
                    return ExecutionResult::success(name, attempt, duration_ms, output);
                }
                Ok(Err(e)) => {
                    warn!("Plugin {} attempt {} failed: {}", name, attempt, e);
                    last_error = e.to_string();
                }
                Err(_) => {
                    warn!(
                        "Plugin {} attempt {} timed out after {:?}",
                        name, attempt, params.timeout
                    );
                    last_error = format!("analysis timed out after {:?}", params.timeout);
                }
            }

            if attempt < params.max_attempts {
                tokio::time::sleep(params.backoff_after(attempt)).await;
            }
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        ExecutionResult::failure(name, params.max_attempts, duration_ms, last_error)
    }

    /// Execute every actionable routing decision concurrently.
    ///
    /// Returns once all executions have terminated (success or exhaustion);
    /// completion order is arbitrary. Plugins whose decision carries no
    /// chunks are not executed and produce no result.
    pub async fn execute_many(
        &self,
        plugins: &[Arc<dyn CheckerPlugin>],
        routing: &RoutingResult,
        document_text: &str,
        params: &ExecutorParams,
        progress: Arc<dyn PipelineProgress>,
    ) -> Vec<ExecutionResult> {
        let by_name: HashMap<_, _> = plugins
            .iter()
            .map(|p| (p.name().clone(), Arc::clone(p)))
            .collect();

        let document_text: Arc<str> = Arc::from(document_text);
        let mut join_set = JoinSet::new();

        for decision in routing.actionable() {
            let Some(plugin) = by_name.get(&decision.plugin_name) else {
                warn!(
                    "Routing decision for unknown plugin {:?}, skipping",
                    decision.plugin_name
                );
                continue;
            };

            progress.on_plugin_start(&decision.plugin_name, decision.chunks.len());

            let plugin = Arc::clone(plugin);
            let chunks = decision.chunks.clone();
            let document_text = Arc::clone(&document_text);
            let params = params.clone();
            let progress = Arc::clone(&progress);

            join_set.spawn(async move {
                ExecutePluginsUseCase
                    .execute_one(plugin, &chunks, &document_text, &params, progress.as_ref())
                    .await
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => {
                    progress.on_plugin_complete(&result);
                    results.push(result);
                }
                Err(e) => {
                    warn!("Plugin task join error: {}", e);
                }
            }
        }

        info!(
            "Executed {} plugins ({} succeeded)",
            results.len(),
            results.iter().filter(|r| r.success).count()
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::checker_plugin::PluginError;
    use crate::ports::progress::NoPipelineProgress;
    use async_trait::async_trait;
    use redline_domain::{
        AnalysisOutput, PluginDescriptor, PluginName, RoutingDecision,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Plugin that fails a configured number of times, then succeeds,
    /// optionally sleeping per attempt.
    struct FlakyPlugin {
        descriptor: PluginDescriptor,
        failures_remaining: AtomicU32,
        attempt_count: AtomicU32,
        delay: Duration,
    }

    impl FlakyPlugin {
        fn new(name: &str, failures: u32, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                descriptor: PluginDescriptor::new(name, "test plugin").with_always_run(),
                failures_remaining: AtomicU32::new(failures),
                attempt_count: AtomicU32::new(0),
                delay,
            })
        }

        fn attempts(&self) -> u32 {
            self.attempt_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CheckerPlugin for FlakyPlugin {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.descriptor
        }

        async fn analyze(
            &self,
            _chunks: &[Chunk],
            _document_text: &str,
        ) -> Result<AnalysisOutput, PluginError> {
            self.attempt_count.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                return Err(PluginError::AnalysisFailed("simulated failure".into()));
            }
            Ok(AnalysisOutput::new("ok", "analysis complete"))
        }
    }

    fn fast_params() -> ExecutorParams {
        ExecutorParams::default()
            .with_timeout(Duration::from_millis(500))
            .with_retry_delay(Duration::from_millis(5))
    }

    fn chunks() -> Vec<Chunk> {
        vec![Chunk::new("c0", "body")]
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let plugin = FlakyPlugin::new("spelling", 0, Duration::ZERO);
        let result = ExecutePluginsUseCase
            .execute_one(
                Arc::clone(&plugin) as Arc<dyn CheckerPlugin>,
                &chunks(),
                "doc",
                &fast_params(),
                &NoPipelineProgress,
            )
            .await;

        assert!(result.success);
        assert_eq!(result.attempts, 1);
        assert_eq!(plugin.attempts(), 1);
    }

    #[tokio::test]
    async fn test_retry_then_succeed() {
        let plugin = FlakyPlugin::new("math", 1, Duration::ZERO);
        let result = ExecutePluginsUseCase
            .execute_one(
                Arc::clone(&plugin) as Arc<dyn CheckerPlugin>,
                &chunks(),
                "doc",
                &fast_params(),
                &NoPipelineProgress,
            )
            .await;

        assert!(result.success);
        assert_eq!(result.attempts, 2);
        assert_eq!(plugin.attempts(), 2);
    }

    #[tokio::test]
    async fn test_always_failing_plugin_attempted_exactly_max_times() {
        let plugin = FlakyPlugin::new("math", u32::MAX, Duration::ZERO);
        let params = fast_params().with_max_attempts(3);

        let result = ExecutePluginsUseCase
            .execute_one(
                Arc::clone(&plugin) as Arc<dyn CheckerPlugin>,
                &chunks(),
                "doc",
                &params,
                &NoPipelineProgress,
            )
            .await;

        assert!(!result.success);
        assert_eq!(result.attempts, 3);
        assert_eq!(plugin.attempts(), 3);
        assert_eq!(result.error(), Some("simulated failure"));
    }

    #[tokio::test]
    async fn test_timeout_bounds_each_attempt() {
        // Analysis sleeps far longer than the timeout; the attempt must fail
        // at roughly the timeout, not when the sleep would finish.
        let plugin = FlakyPlugin::new("slow", 0, Duration::from_secs(30));
        let params = fast_params()
            .with_timeout(Duration::from_millis(50))
            .with_max_attempts(1);

        let started = Instant::now();
        let result = ExecutePluginsUseCase
            .execute_one(
                plugin as Arc<dyn CheckerPlugin>,
                &chunks(),
                "doc",
                &params,
                &NoPipelineProgress,
            )
            .await;

        assert!(!result.success);
        assert!(result.error().unwrap().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_execute_many_runs_in_parallel() {
        // Four plugins sleeping ~80ms each should finish together, not
        // one after another.
        let plugins: Vec<Arc<dyn CheckerPlugin>> = (0..4)
            .map(|i| {
                FlakyPlugin::new(&format!("p{i}"), 0, Duration::from_millis(80))
                    as Arc<dyn CheckerPlugin>
            })
            .collect();

        let mut decisions = HashMap::new();
        for plugin in &plugins {
            decisions.insert(
                plugin.name().clone(),
                RoutingDecision::always_run(plugin.name().clone(), chunks()),
            );
        }
        let routing = RoutingResult::new(decisions, 0.0, 0);

        let started = Instant::now();
        let results = ExecutePluginsUseCase
            .execute_many(
                &plugins,
                &routing,
                "doc",
                &fast_params(),
                Arc::new(NoPipelineProgress),
            )
            .await;

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.success));
        assert!(started.elapsed() < Duration::from_millis(320));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_siblings() {
        let failing = FlakyPlugin::new("broken", u32::MAX, Duration::ZERO);
        let healthy = FlakyPlugin::new("healthy", 0, Duration::ZERO);
        let plugins: Vec<Arc<dyn CheckerPlugin>> = vec![
            Arc::clone(&failing) as Arc<dyn CheckerPlugin>,
            Arc::clone(&healthy) as Arc<dyn CheckerPlugin>,
        ];

        let mut decisions = HashMap::new();
        for plugin in &plugins {
            decisions.insert(
                plugin.name().clone(),
                RoutingDecision::always_run(plugin.name().clone(), chunks()),
            );
        }
        let routing = RoutingResult::new(decisions, 0.0, 0);

        let results = ExecutePluginsUseCase
            .execute_many(
                &plugins,
                &routing,
                "doc",
                &fast_params(),
                Arc::new(NoPipelineProgress),
            )
            .await;

        assert_eq!(results.len(), 2);
        let by_name: HashMap<&str, &ExecutionResult> = results
            .iter()
            .map(|r| (r.plugin_name.as_str(), r))
            .collect();
        assert!(!by_name["broken"].success);
        assert!(by_name["healthy"].success);
    }

    #[tokio::test]
    async fn test_skipped_decisions_are_not_executed() {
        let plugin = FlakyPlugin::new("math", 0, Duration::ZERO);
        let plugins: Vec<Arc<dyn CheckerPlugin>> =
            vec![Arc::clone(&plugin) as Arc<dyn CheckerPlugin>];

        let mut decisions = HashMap::new();
        decisions.insert(
            PluginName::new("math"),
            RoutingDecision::skipped("math"),
        );
        let routing = RoutingResult::new(decisions, 0.0, 0);

        let results = ExecutePluginsUseCase
            .execute_many(
                &plugins,
                &routing,
                "doc",
                &fast_params(),
                Arc::new(NoPipelineProgress),
            )
            .await;

        assert!(results.is_empty());
        assert_eq!(plugin.attempts(), 0);
    }
}
