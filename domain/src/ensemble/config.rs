//! Extractor configuration value objects.
//!
//! An [`ExtractorConfig`] describes one independently-configured extraction
//! attempt in an ensemble run: which model, at what temperature, with what
//! reasoning effort. Configs are caller-supplied and immutable.

use serde::{Deserialize, Serialize};

/// Reasoning effort requested from the extraction model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
    /// Let the provider pick
    #[default]
    Default,
}

impl std::fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasoningEffort::Low => write!(f, "low"),
            ReasoningEffort::Medium => write!(f, "medium"),
            ReasoningEffort::High => write!(f, "high"),
            ReasoningEffort::Default => write!(f, "default"),
        }
    }
}

/// Sampling temperature: a fixed value or the provider default
///
/// Serialized as the string `"default"` or a bare number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Temperature {
    #[default]
    Default,
    Fixed(f32),
}

impl Temperature {
    /// The numeric value, if fixed.
    pub fn value(&self) -> Option<f32> {
        match self {
            Temperature::Default => None,
            Temperature::Fixed(t) => Some(*t),
        }
    }
}

impl Serialize for Temperature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Temperature::Default => serializer.serialize_str("default"),
            Temperature::Fixed(t) => serializer.serialize_f32(*t),
        }
    }
}

impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TemperatureVisitor;

        impl serde::de::Visitor<'_> for TemperatureVisitor {
            type Value = Temperature;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a number or the string \"default\"")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == "default" {
                    Ok(Temperature::Default)
                } else {
                    Err(E::custom(format!("expected \"default\", got {v:?}")))
                }
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Temperature::Fixed(v as f32))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Temperature::Fixed(v as f32))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Temperature::Fixed(v as f32))
            }
        }

        deserializer.deserialize_any(TemperatureVisitor)
    }
}

/// One configured extraction attempt in an ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Model identifier (provider-specific string)
    pub model: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Temperature,
    /// Reasoning effort
    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,
    /// Provider routing preferences, passed through opaquely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_preferences: Option<serde_json::Value>,
    /// Display label; falls back to the model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ExtractorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: Temperature::Default,
            reasoning_effort: ReasoningEffort::Default,
            provider_preferences: None,
            label: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Temperature::Fixed(temperature);
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = effort;
        self
    }

    pub fn with_provider_preferences(mut self, preferences: serde_json::Value) -> Self {
        self.provider_preferences = Some(preferences);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label when set, model identifier otherwise.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.model)
    }
}

/// Identifier of one extractor within an ensemble run (Value Object)
///
/// Generated by the coordinator from the config's display name, made unique
/// by index suffixing when labels collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractorId(String);

impl ExtractorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExtractorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assign a unique id to each config, suffixing duplicates by position.
///
/// The first occurrence of a name keeps it bare; later collisions get `-2`,
/// `-3`, and so on, so ids remain stable under reordering of other entries.
pub fn assign_extractor_ids(configs: &[ExtractorConfig]) -> Vec<ExtractorId> {
    let mut seen: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    configs
        .iter()
        .map(|config| {
            let name = config.display_name();
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count == 1 {
                ExtractorId::new(name)
            } else {
                ExtractorId::new(format!("{}-{}", name, count))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ExtractorConfig::new("claude-sonnet-4.5")
            .with_temperature(0.7)
            .with_reasoning_effort(ReasoningEffort::High)
            .with_label("thorough");

        assert_eq!(config.model, "claude-sonnet-4.5");
        assert_eq!(config.temperature.value(), Some(0.7));
        assert_eq!(config.reasoning_effort, ReasoningEffort::High);
        assert_eq!(config.display_name(), "thorough");
    }

    #[test]
    fn test_display_name_falls_back_to_model() {
        let config = ExtractorConfig::new("gpt-5-mini");
        assert_eq!(config.display_name(), "gpt-5-mini");
    }

    #[test]
    fn test_temperature_serde() {
        let default_json = serde_json::to_string(&Temperature::Default).unwrap();
        assert_eq!(default_json, "\"default\"");

        let fixed: Temperature = serde_json::from_str("0.3").unwrap();
        assert_eq!(fixed.value(), Some(0.3));

        let default_back: Temperature = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(default_back, Temperature::Default);
    }

    #[test]
    fn test_unique_ids_without_collision() {
        let configs = vec![
            ExtractorConfig::new("model-a"),
            ExtractorConfig::new("model-b"),
        ];
        let ids = assign_extractor_ids(&configs);
        assert_eq!(ids[0].as_str(), "model-a");
        assert_eq!(ids[1].as_str(), "model-b");
    }

    #[test]
    fn test_unique_ids_with_collision() {
        let configs = vec![
            ExtractorConfig::new("model-a"),
            ExtractorConfig::new("model-a"),
            ExtractorConfig::new("model-a"),
        ];
        let ids = assign_extractor_ids(&configs);
        assert_eq!(ids[0].as_str(), "model-a");
        assert_eq!(ids[1].as_str(), "model-a-2");
        assert_eq!(ids[2].as_str(), "model-a-3");
    }

    #[test]
    fn test_label_collision_across_models() {
        let configs = vec![
            ExtractorConfig::new("model-a").with_label("fast"),
            ExtractorConfig::new("model-b").with_label("fast"),
        ];
        let ids = assign_extractor_ids(&configs);
        assert_eq!(ids[0].as_str(), "fast");
        assert_eq!(ids[1].as_str(), "fast-2");
    }

    #[test]
    fn test_reasoning_effort_serde() {
        assert_eq!(
            serde_json::to_string(&ReasoningEffort::High).unwrap(),
            "\"high\""
        );
        let effort: ReasoningEffort = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(effort, ReasoningEffort::Low);
    }
}
