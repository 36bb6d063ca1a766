//! Classify Chunks use case.
//!
//! Asks the reasoning service which plugins should process each chunk,
//! batching chunks to bound request size. Classification never fails the
//! pipeline: when a batch call errors or returns an unparseable result, a
//! two-tier deterministic fallback assigns that batch instead.

use crate::config::ClassifierParams;
use crate::ports::reasoning_gateway::{GatewayError, ReasoningGateway, ReasoningRequest};
use redline_domain::{Chunk, ChunkId, ClassifierPromptTemplate, PluginDescriptor, PluginName};
use serde::Deserialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Chunk-to-plugins assignment map produced by classification
pub type Assignments = HashMap<ChunkId, HashSet<PluginName>>;

/// Result of classifying one chunk set against one plugin set
#[derive(Debug, Clone, Default)]
pub struct ClassificationOutcome {
    /// Per-chunk plugin assignments; chunks assigned nothing are absent
    pub assignments: Assignments,
    /// Total cost of the classification calls in USD
    pub cost_usd: f64,
    /// Whether any batch fell back to the deterministic policy
    pub fallback_used: bool,
}

/// Chunk classifier backed by a reasoning gateway.
///
/// Caller-owned handle: construct once, reuse across document versions. It
/// caches nothing and carries no data dependency between calls.
pub struct ChunkClassifier<G: ReasoningGateway> {
    gateway: Arc<G>,
    params: ClassifierParams,
}

/// One row of the structured classification response
#[derive(Debug, Deserialize)]
struct AssignmentRow {
    chunk_id: String,
    #[serde(default)]
    plugins: Vec<String>,
    #[serde(default)]
    #[allow(dead_code)]
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssignmentRows {
    assignments: Vec<AssignmentRow>,
}

impl<G: ReasoningGateway> ChunkClassifier<G> {
    pub fn new(gateway: Arc<G>, params: ClassifierParams) -> Self {
        Self { gateway, params }
    }

    /// Classify every chunk against the given plugin descriptors.
    ///
    /// Batches are processed sequentially in input order; results are merged
    /// by chunk id, so batch completion order cannot affect the outcome.
    /// Never returns an error: failed batches use the deterministic fallback.
    pub async fn classify(
        &self,
        chunks: &[Chunk],
        descriptors: &[PluginDescriptor],
    ) -> ClassificationOutcome {
        let mut outcome = ClassificationOutcome::default();
        if chunks.is_empty() || descriptors.is_empty() {
            return outcome;
        }

        let batch_size = self.params.batch_size.max(1);
        for batch in chunks.chunks(batch_size) {
            match self.classify_batch(batch, descriptors).await {
                Ok((assignments, cost)) => {
                    merge_assignments(&mut outcome.assignments, assignments);
                    outcome.cost_usd += cost;
                }
                Err(e) => {
                    warn!(
                        "Classification batch of {} chunks failed ({}), using deterministic fallback",
                        batch.len(),
                        e
                    );
                    outcome.fallback_used = true;
                    merge_assignments(
                        &mut outcome.assignments,
                        fallback_assignments(batch, descriptors),
                    );
                }
            }
        }

        debug!(
            "Classified {} chunks across {} plugins (fallback: {})",
            chunks.len(),
            descriptors.len(),
            outcome.fallback_used
        );
        outcome
    }

    /// Classify one batch with a single structured reasoning call.
    async fn classify_batch(
        &self,
        batch: &[Chunk],
        descriptors: &[PluginDescriptor],
    ) -> Result<(Assignments, f64), GatewayError> {
        let chunk_pairs: Vec<(String, String)> = batch
            .iter()
            .map(|c| (c.id.to_string(), c.text.clone()))
            .collect();

        let mut request = ReasoningRequest::new(
            ClassifierPromptTemplate::system(descriptors),
            ClassifierPromptTemplate::user(&chunk_pairs, self.params.max_chunk_chars),
            Self::response_schema(),
        );
        if let Some(model) = &self.params.model {
            request = request.with_model(model.clone());
        }

        let response = self.gateway.complete_structured(request).await?;
        let rows: AssignmentRows = serde_json::from_value(response.content)
            .map_err(|e| GatewayError::SchemaMismatch(e.to_string()))?;

        // Validate against the batch: no phantom chunks, no invented plugins.
        let known_chunks: HashSet<&str> = batch.iter().map(|c| c.id.as_str()).collect();
        let known_plugins: HashSet<&str> =
            descriptors.iter().map(|d| d.name.as_str()).collect();

        let mut assignments = Assignments::new();
        for row in rows.assignments {
            if !known_chunks.contains(row.chunk_id.as_str()) {
                warn!("Classifier returned unknown chunk id {:?}, dropping", row.chunk_id);
                continue;
            }
            let entry = assignments
                .entry(ChunkId::new(row.chunk_id.as_str()))
                .or_default();
            for plugin in row.plugins {
                if known_plugins.contains(plugin.as_str()) {
                    entry.insert(PluginName::new(plugin));
                } else {
                    warn!("Classifier invented plugin name {:?}, dropping", plugin);
                }
            }
        }

        Ok((assignments, response.cost_usd.unwrap_or(0.0)))
    }

    /// JSON schema for the structured classification response.
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "assignments": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "chunk_id": { "type": "string" },
                            "plugins": {
                                "type": "array",
                                "items": { "type": "string" }
                            },
                            "reasoning": { "type": "string" }
                        },
                        "required": ["chunk_id", "plugins"]
                    }
                }
            },
            "required": ["assignments"]
        })
    }
}

fn merge_assignments(target: &mut Assignments, source: Assignments) {
    for (chunk_id, plugins) in source {
        target.entry(chunk_id).or_default().extend(plugins);
    }
}

/// Two-tier deterministic fallback assignment.
///
/// Tier 1: plugins with zero routing examples are assumed safe on any text
/// and receive every chunk. Tier 2 (only when no such plugin exists):
/// keyword overlap between a plugin's usage criteria and the chunk text.
/// Never fails; may return an empty map.
pub fn fallback_assignments(
    chunks: &[Chunk],
    descriptors: &[PluginDescriptor],
) -> Assignments {
    let mut assignments = Assignments::new();

    let example_free: Vec<&PluginDescriptor> = descriptors
        .iter()
        .filter(|d| d.examples.is_empty())
        .collect();

    if !example_free.is_empty() {
        for chunk in chunks {
            let entry = assignments.entry(chunk.id.clone()).or_default();
            for descriptor in &example_free {
                entry.insert(descriptor.name.clone());
            }
        }
        return assignments;
    }

    // Last resort: coarse keyword heuristics over the usage criteria.
    for chunk in chunks {
        let chunk_words = significant_words(&chunk.text);
        for descriptor in descriptors {
            let hit = significant_words(&descriptor.usage_criteria)
                .iter()
                .any(|w| chunk_words.contains(w));
            if hit {
                assignments
                    .entry(chunk.id.clone())
                    .or_default()
                    .insert(descriptor.name.clone());
            }
        }
    }
    assignments
}

/// Lower-cased words longer than four characters, stripped of surrounding
/// punctuation. Short words are too common to discriminate on.
fn significant_words(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 4)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::reasoning_gateway::ReasoningResponse;
    use async_trait::async_trait;
    use redline_domain::RoutingExample;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Gateway that replays a scripted sequence of responses.
    struct ScriptedGateway {
        responses: Mutex<Vec<Result<ReasoningResponse, GatewayError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<ReasoningResponse, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReasoningGateway for ScriptedGateway {
        async fn complete_structured(
            &self,
            _request: ReasoningRequest,
        ) -> Result<ReasoningResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(GatewayError::RequestFailed("script exhausted".into()));
            }
            responses.remove(0)
        }
    }

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n)
            .map(|i| Chunk::new(format!("c{i}"), format!("chunk body {i}")))
            .collect()
    }

    fn descriptors() -> Vec<PluginDescriptor> {
        vec![
            PluginDescriptor::new("math", "Chunks containing numeric calculations")
                .with_example(RoutingExample::new("2+2=5", true, "arithmetic")),
            PluginDescriptor::new("facts", "Chunks making verifiable factual claims")
                .with_example(RoutingExample::new("Paris is in Spain", true, "claim")),
        ]
    }

    fn assignment_response(rows: serde_json::Value) -> ReasoningResponse {
        ReasoningResponse::new(json!({ "assignments": rows })).with_cost(0.01)
    }

    #[tokio::test]
    async fn test_classify_builds_assignment_map() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(assignment_response(json!([
            { "chunk_id": "c0", "plugins": ["math"] },
            { "chunk_id": "c1", "plugins": ["math", "facts"] },
        ])))]));
        let classifier = ChunkClassifier::new(gateway, ClassifierParams::default());

        let outcome = classifier.classify(&chunks(2), &descriptors()).await;

        assert!(!outcome.fallback_used);
        assert_eq!(outcome.assignments.len(), 2);
        assert!(outcome.assignments[&ChunkId::new("c1")].contains(&PluginName::new("facts")));
        assert!((outcome.cost_usd - 0.01).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_batches_are_sequential_and_merged() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok(assignment_response(json!([
                { "chunk_id": "c0", "plugins": ["math"] },
            ]))),
            Ok(assignment_response(json!([
                { "chunk_id": "c2", "plugins": ["facts"] },
            ]))),
        ]));
        let classifier = ChunkClassifier::new(
            Arc::clone(&gateway),
            ClassifierParams::default().with_batch_size(2),
        );

        let outcome = classifier.classify(&chunks(3), &descriptors()).await;

        assert_eq!(gateway.call_count(), 2);
        assert_eq!(outcome.assignments.len(), 2);
        assert!((outcome.cost_usd - 0.02).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_chunks_and_plugins_dropped() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(assignment_response(json!([
            { "chunk_id": "phantom", "plugins": ["math"] },
            { "chunk_id": "c0", "plugins": ["invented-plugin", "facts"] },
        ])))]));
        let classifier = ChunkClassifier::new(gateway, ClassifierParams::default());

        let outcome = classifier.classify(&chunks(1), &descriptors()).await;

        assert!(!outcome.assignments.contains_key(&ChunkId::new("phantom")));
        let assigned = &outcome.assignments[&ChunkId::new("c0")];
        assert_eq!(assigned.len(), 1);
        assert!(assigned.contains(&PluginName::new("facts")));
    }

    #[tokio::test]
    async fn test_gateway_failure_uses_fallback() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::Timeout)]));
        // "facts" has no examples -> tier-1 fallback target
        let descriptors = vec![
            PluginDescriptor::new("math", "numeric calculations")
                .with_example(RoutingExample::new("2+2", true, "arithmetic")),
            PluginDescriptor::new("facts", "verifiable factual claims"),
        ];
        let classifier = ChunkClassifier::new(gateway, ClassifierParams::default());

        let outcome = classifier.classify(&chunks(2), &descriptors).await;

        assert!(outcome.fallback_used);
        for chunk_id in ["c0", "c1"] {
            let assigned = &outcome.assignments[&ChunkId::new(chunk_id)];
            assert!(assigned.contains(&PluginName::new("facts")));
            assert!(!assigned.contains(&PluginName::new("math")));
        }
    }

    #[tokio::test]
    async fn test_unparseable_response_uses_fallback() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(ReasoningResponse::new(
            json!({ "unexpected": true }),
        ))]));
        let descriptors = vec![PluginDescriptor::new("facts", "claims")];
        let classifier = ChunkClassifier::new(gateway, ClassifierParams::default());

        let outcome = classifier.classify(&chunks(1), &descriptors).await;
        assert!(outcome.fallback_used);
        assert!(outcome.assignments[&ChunkId::new("c0")].contains(&PluginName::new("facts")));
    }

    #[tokio::test]
    async fn test_empty_inputs_cost_nothing() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let classifier = ChunkClassifier::new(Arc::clone(&gateway), ClassifierParams::default());

        let outcome = classifier.classify(&[], &descriptors()).await;
        assert!(outcome.assignments.is_empty());
        assert_eq!(gateway.call_count(), 0);

        let outcome = classifier.classify(&chunks(2), &[]).await;
        assert!(outcome.assignments.is_empty());
        assert_eq!(gateway.call_count(), 0);
    }

    #[test]
    fn test_keyword_fallback_matches_criteria_words() {
        // Both plugins carry examples, so tier 2 applies
        let descriptors = vec![
            PluginDescriptor::new("math", "Chunks with equations and calculations")
                .with_example(RoutingExample::new("1+1", true, "calc")),
            PluginDescriptor::new("quotes", "Chunks with quotations from sources")
                .with_example(RoutingExample::new("\"...\"", true, "quoted")),
        ];
        let chunks = vec![
            Chunk::new("c0", "these equations are wrong"),
            Chunk::new("c1", "nothing relevant here"),
        ];

        let assignments = fallback_assignments(&chunks, &descriptors);

        assert!(assignments[&ChunkId::new("c0")].contains(&PluginName::new("math")));
        assert!(!assignments.contains_key(&ChunkId::new("c1")));
    }

    #[test]
    fn test_fallback_never_assigns_outside_chunk_set() {
        let descriptors = vec![PluginDescriptor::new("facts", "claims")];
        let chunks = chunks(3);
        let assignments = fallback_assignments(&chunks, &descriptors);
        let known: HashSet<&ChunkId> = chunks.iter().map(|c| &c.id).collect();
        for chunk_id in assignments.keys() {
            assert!(known.contains(chunk_id));
        }
    }
}
