//! Routing decisions - which plugins process which chunks, and why.
//!
//! One [`RoutingDecision`] exists per plugin per pipeline run. The dispatcher
//! creates them, the executor consumes them. Invariant: a decision's chunks
//! are always a subset of the run's input chunk set, and an always-run plugin
//! always carries the full set with reason [`RoutingReason::AlwaysRun`].

use super::descriptor::PluginName;
use crate::core::chunk::Chunk;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Why a plugin received (or did not receive) its chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingReason {
    /// Plugin is marked always-run; it gets every chunk unconditionally
    AlwaysRun,
    /// Chunks were assigned by the classifier
    Routed,
    /// The classifier assigned no chunks to this plugin
    Skipped,
}

impl std::fmt::Display for RoutingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingReason::AlwaysRun => write!(f, "always-run"),
            RoutingReason::Routed => write!(f, "routed"),
            RoutingReason::Skipped => write!(f, "skipped"),
        }
    }
}

/// Chunk assignment for one plugin in one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// The plugin this decision is for
    pub plugin_name: PluginName,
    /// Chunks assigned to the plugin, in input order
    pub chunks: Vec<Chunk>,
    /// How the assignment came about
    pub reason: RoutingReason,
}

impl RoutingDecision {
    /// Decision for an always-run plugin: the full chunk set.
    pub fn always_run(plugin_name: impl Into<PluginName>, chunks: Vec<Chunk>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            chunks,
            reason: RoutingReason::AlwaysRun,
        }
    }

    /// Decision for a plugin that received classifier assignments.
    pub fn routed(plugin_name: impl Into<PluginName>, chunks: Vec<Chunk>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            chunks,
            reason: RoutingReason::Routed,
        }
    }

    /// Decision for a plugin the classifier assigned nothing to.
    pub fn skipped(plugin_name: impl Into<PluginName>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            chunks: Vec::new(),
            reason: RoutingReason::Skipped,
        }
    }

    /// Whether the plugin has any work to do.
    pub fn has_chunks(&self) -> bool {
        !self.chunks.is_empty()
    }
}

/// Complete routing output for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingResult {
    /// One decision per plugin
    pub decisions: HashMap<PluginName, RoutingDecision>,
    /// Classification cost in USD (0.0 when the classifier was not invoked)
    pub total_cost_usd: f64,
    /// Wall-clock routing time in milliseconds
    pub routing_time_ms: u64,
}

impl RoutingResult {
    pub fn new(
        decisions: HashMap<PluginName, RoutingDecision>,
        total_cost_usd: f64,
        routing_time_ms: u64,
    ) -> Self {
        Self {
            decisions,
            total_cost_usd,
            routing_time_ms,
        }
    }

    /// Routing output with no decisions and no cost (empty input early return).
    pub fn empty() -> Self {
        Self {
            decisions: HashMap::new(),
            total_cost_usd: 0.0,
            routing_time_ms: 0,
        }
    }

    /// Decisions that carry at least one chunk, i.e. actual work.
    pub fn actionable(&self) -> impl Iterator<Item = &RoutingDecision> {
        self.decisions.values().filter(|d| d.has_chunks())
    }
}
