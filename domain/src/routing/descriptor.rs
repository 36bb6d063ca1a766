//! Plugin descriptors - read-only routing input supplied by each checker.
//!
//! A [`PluginDescriptor`] tells the classifier what a checker is for: its
//! usage criteria in prose plus example judgments. Descriptors never change
//! during a run.

use serde::{Deserialize, Serialize};

/// Name of a checker plugin (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginName(String);

impl PluginName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PluginName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PluginName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PluginName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One example judgment attached to a plugin's usage criteria
///
/// Shown to the classifier so it can calibrate: "text like this should
/// (not) be processed by this plugin, because ...".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingExample {
    /// Sample chunk text
    pub sample_text: String,
    /// Whether the plugin should process text like the sample
    pub should_process: bool,
    /// Short explanation of the judgment
    pub reason: String,
}

impl RoutingExample {
    pub fn new(
        sample_text: impl Into<String>,
        should_process: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            sample_text: sample_text.into(),
            should_process,
            reason: reason.into(),
        }
    }
}

/// Routing-relevant description of a checker plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Plugin name, unique within a run
    pub name: PluginName,
    /// Prose criteria describing which chunks the plugin should see
    pub usage_criteria: String,
    /// Example judgments for classifier calibration
    #[serde(default)]
    pub examples: Vec<RoutingExample>,
    /// When true, the plugin receives every chunk and skips classification
    #[serde(default)]
    pub always_run: bool,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<PluginName>, usage_criteria: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage_criteria: usage_criteria.into(),
            examples: Vec::new(),
            always_run: false,
        }
    }

    /// Add an example judgment.
    pub fn with_example(mut self, example: RoutingExample) -> Self {
        self.examples.push(example);
        self
    }

    /// Mark the plugin as always-run (bypasses classification).
    pub fn with_always_run(mut self) -> Self {
        self.always_run = true;
        self
    }
}
