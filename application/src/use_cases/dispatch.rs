//! Dispatch use case.
//!
//! Merges the two assignment paths into one routing record per plugin:
//! always-run plugins receive every chunk unconditionally, everything else
//! goes through the classifier. Classifier failure never surfaces here;
//! the classifier falls back deterministically and dispatch proceeds.

use crate::ports::checker_plugin::CheckerPlugin;
use crate::ports::reasoning_gateway::ReasoningGateway;
use crate::use_cases::classify_chunks::ChunkClassifier;
use redline_domain::{Chunk, PluginDescriptor, PluginName, RoutingDecision, RoutingResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Use case for routing chunks to plugins
pub struct DispatchUseCase<G: ReasoningGateway> {
    classifier: Arc<ChunkClassifier<G>>,
}

impl<G: ReasoningGateway> DispatchUseCase<G> {
    pub fn new(classifier: Arc<ChunkClassifier<G>>) -> Self {
        Self { classifier }
    }

    /// Produce one routing decision per plugin.
    ///
    /// The classifier is only invoked when there is at least one routable
    /// (non-always-run) plugin and at least one chunk; otherwise dispatch
    /// returns immediately at zero cost.
    pub async fn dispatch(
        &self,
        plugins: &[Arc<dyn CheckerPlugin>],
        chunks: &[Chunk],
    ) -> RoutingResult {
        let started = Instant::now();
        let mut decisions: HashMap<PluginName, RoutingDecision> = HashMap::new();

        let mut routable: Vec<&Arc<dyn CheckerPlugin>> = Vec::new();
        for plugin in plugins {
            if plugin.always_run() {
                decisions.insert(
                    plugin.name().clone(),
                    RoutingDecision::always_run(plugin.name().clone(), chunks.to_vec()),
                );
            } else {
                routable.push(plugin);
            }
        }

        if routable.is_empty() || chunks.is_empty() {
            for plugin in routable {
                decisions.insert(
                    plugin.name().clone(),
                    RoutingDecision::skipped(plugin.name().clone()),
                );
            }
            debug!("Dispatch skipped classification (nothing to route)");
            return RoutingResult::new(decisions, 0.0, elapsed_ms(started));
        }

        let descriptors: Vec<PluginDescriptor> = routable
            .iter()
            .map(|p| p.descriptor().clone())
            .collect();
        let outcome = self.classifier.classify(chunks, &descriptors).await;

        for plugin in routable {
            let name = plugin.name();
            // Filter the input chunk set, preserving input order; assignments
            // can never reference chunks outside it.
            let assigned: Vec<Chunk> = chunks
                .iter()
                .filter(|chunk| {
                    outcome
                        .assignments
                        .get(&chunk.id)
                        .is_some_and(|plugins| plugins.contains(name))
                })
                .cloned()
                .collect();

            let decision = if assigned.is_empty() {
                RoutingDecision::skipped(name.clone())
            } else {
                RoutingDecision::routed(name.clone(), assigned)
            };
            decisions.insert(name.clone(), decision);
        }

        info!(
            "Dispatched {} chunks to {} plugins (cost ${:.4}, fallback: {})",
            chunks.len(),
            decisions.len(),
            outcome.cost_usd,
            outcome.fallback_used
        );
        RoutingResult::new(decisions, outcome.cost_usd, elapsed_ms(started))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierParams;
    use crate::ports::checker_plugin::PluginError;
    use crate::ports::reasoning_gateway::{
        GatewayError, ReasoningRequest, ReasoningResponse,
    };
    use async_trait::async_trait;
    use redline_domain::{AnalysisOutput, RoutingExample, RoutingReason};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPlugin {
        descriptor: PluginDescriptor,
    }

    impl StubPlugin {
        fn routed(name: &str, criteria: &str) -> Arc<dyn CheckerPlugin> {
            Arc::new(Self {
                descriptor: PluginDescriptor::new(name, criteria)
                    .with_example(RoutingExample::new("sample", true, "example")),
            })
        }

        fn always_run(name: &str) -> Arc<dyn CheckerPlugin> {
            Arc::new(Self {
                descriptor: PluginDescriptor::new(name, "everything").with_always_run(),
            })
        }
    }

    #[async_trait]
    impl CheckerPlugin for StubPlugin {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.descriptor
        }

        async fn analyze(
            &self,
            _chunks: &[Chunk],
            _document_text: &str,
        ) -> Result<AnalysisOutput, PluginError> {
            Ok(AnalysisOutput::default())
        }
    }

    enum GatewayMode {
        Respond(serde_json::Value),
        Fail,
    }

    struct CountingGateway {
        mode: GatewayMode,
        calls: AtomicUsize,
    }

    impl CountingGateway {
        fn new(mode: GatewayMode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ReasoningGateway for CountingGateway {
        async fn complete_structured(
            &self,
            _request: ReasoningRequest,
        ) -> Result<ReasoningResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.mode {
                GatewayMode::Respond(content) => Ok(ReasoningResponse::new(content.clone())),
                GatewayMode::Fail => Err(GatewayError::Network("unreachable".into())),
            }
        }
    }

    fn use_case(gateway: Arc<CountingGateway>) -> DispatchUseCase<CountingGateway> {
        DispatchUseCase::new(Arc::new(ChunkClassifier::new(
            gateway,
            ClassifierParams::default(),
        )))
    }

    fn chunks() -> Vec<Chunk> {
        vec![
            Chunk::new("c0", "the first paragraph"),
            Chunk::new("c1", "the second paragraph"),
        ]
    }

    #[tokio::test]
    async fn test_always_run_gets_full_chunk_set() {
        let gateway = CountingGateway::new(GatewayMode::Respond(json!({ "assignments": [] })));
        let plugins = vec![
            StubPlugin::always_run("spelling"),
            StubPlugin::routed("math", "calculations"),
        ];

        let result = use_case(gateway).dispatch(&plugins, &chunks()).await;

        let spelling = &result.decisions[&PluginName::new("spelling")];
        assert_eq!(spelling.reason, RoutingReason::AlwaysRun);
        assert_eq!(spelling.chunks.len(), 2);
    }

    #[tokio::test]
    async fn test_routed_chunks_are_subset_of_input() {
        let gateway = CountingGateway::new(GatewayMode::Respond(json!({
            "assignments": [
                { "chunk_id": "c1", "plugins": ["math"] },
            ]
        })));
        let plugins = vec![StubPlugin::routed("math", "calculations")];

        let result = use_case(gateway).dispatch(&plugins, &chunks()).await;

        let math = &result.decisions[&PluginName::new("math")];
        assert_eq!(math.reason, RoutingReason::Routed);
        assert_eq!(math.chunks.len(), 1);
        assert_eq!(math.chunks[0].id.as_str(), "c1");
    }

    #[tokio::test]
    async fn test_unassigned_plugin_is_skipped() {
        let gateway = CountingGateway::new(GatewayMode::Respond(json!({ "assignments": [] })));
        let plugins = vec![StubPlugin::routed("math", "calculations")];

        let result = use_case(gateway).dispatch(&plugins, &chunks()).await;

        let math = &result.decisions[&PluginName::new("math")];
        assert_eq!(math.reason, RoutingReason::Skipped);
        assert!(math.chunks.is_empty());
    }

    #[tokio::test]
    async fn test_classifier_not_invoked_without_routable_plugins() {
        let gateway = CountingGateway::new(GatewayMode::Respond(json!({ "assignments": [] })));
        let plugins = vec![StubPlugin::always_run("spelling")];

        let result = use_case(Arc::clone(&gateway)).dispatch(&plugins, &chunks()).await;

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.total_cost_usd, 0.0);
        assert_eq!(result.decisions.len(), 1);
    }

    #[tokio::test]
    async fn test_classifier_not_invoked_without_chunks() {
        let gateway = CountingGateway::new(GatewayMode::Respond(json!({ "assignments": [] })));
        let plugins = vec![
            StubPlugin::always_run("spelling"),
            StubPlugin::routed("math", "calculations"),
        ];

        let result = use_case(Arc::clone(&gateway)).dispatch(&plugins, &[]).await;

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        let math = &result.decisions[&PluginName::new("math")];
        assert_eq!(math.reason, RoutingReason::Skipped);
        let spelling = &result.decisions[&PluginName::new("spelling")];
        assert_eq!(spelling.reason, RoutingReason::AlwaysRun);
        assert!(spelling.chunks.is_empty());
    }

    #[tokio::test]
    async fn test_classifier_failure_never_propagates() {
        // Service throws, dispatch still covers always-run plugins fully
        // and routes the rest via the fallback.
        let gateway = CountingGateway::new(GatewayMode::Fail);
        let plugins = vec![
            StubPlugin::always_run("spelling"),
            StubPlugin::routed("math", "chunks with equations present"),
        ];

        let result = use_case(gateway).dispatch(&plugins, &chunks()).await;

        assert_eq!(result.decisions.len(), 2);
        let spelling = &result.decisions[&PluginName::new("spelling")];
        assert_eq!(spelling.reason, RoutingReason::AlwaysRun);
        assert_eq!(spelling.chunks.len(), 2);
        // math had examples, no zero-example sibling: keyword tier applies,
        // and "equations" appears in no chunk, so it is skipped - not an error
        let math = &result.decisions[&PluginName::new("math")];
        assert_eq!(math.reason, RoutingReason::Skipped);
    }
}
