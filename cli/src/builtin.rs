//! Built-in checker plugins.
//!
//! Stood up from [`PromptPlugin`] with routing descriptors and analysis
//! instructions; the actual checking is delegated to the reasoning service.

use redline_application::{CheckerPlugin, ReasoningGateway};
use redline_domain::{PluginDescriptor, RoutingExample};
use redline_infrastructure::PromptPlugin;
use std::sync::Arc;

/// The default plugin set: spelling (always-run), math, and facts.
pub fn default_plugins<G: ReasoningGateway + 'static>(
    gateway: &Arc<G>,
) -> Vec<Arc<dyn CheckerPlugin>> {
    vec![
        Arc::new(PromptPlugin::new(
            PluginDescriptor::new(
                "spelling",
                "Any prose chunk; checks spelling, grammar, and typos.",
            )
            .with_always_run(),
            "Check the assigned chunks for spelling and grammar problems. \
             Quote the misspelled text exactly.",
            Arc::clone(gateway),
        )),
        Arc::new(PromptPlugin::new(
            PluginDescriptor::new(
                "math",
                "Chunks containing calculations, equations, statistics, or numeric claims.",
            )
            .with_example(RoutingExample::new(
                "Revenue grew 40% from $2M to $2.4M.",
                true,
                "contains an arithmetic claim to verify",
            ))
            .with_example(RoutingExample::new(
                "The weather was lovely that afternoon.",
                false,
                "no numeric content",
            )),
            "Verify every calculation and numeric claim in the assigned chunks. \
             Recompute the arithmetic and flag anything inconsistent.",
            Arc::clone(gateway),
        )),
        Arc::new(PromptPlugin::new(
            PluginDescriptor::new(
                "facts",
                "Chunks making verifiable factual claims about the world.",
            )
            .with_example(RoutingExample::new(
                "The Eiffel Tower was completed in 1889.",
                true,
                "concrete historical claim",
            ))
            .with_example(RoutingExample::new(
                "I think rainy days feel cozy.",
                false,
                "subjective opinion, nothing to verify",
            )),
            "Identify factual claims in the assigned chunks and flag those \
             that are false or need a citation.",
            Arc::clone(gateway),
        )),
    ]
}
