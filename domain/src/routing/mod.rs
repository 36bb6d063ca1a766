//! Routing subdomain - plugin descriptors and chunk-assignment decisions.

pub mod decision;
pub mod descriptor;

pub use decision::{RoutingDecision, RoutingReason, RoutingResult};
pub use descriptor::{PluginDescriptor, PluginName, RoutingExample};
