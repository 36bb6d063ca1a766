//! Reasoning gateway port
//!
//! Defines the interface for structured-output calls to an external
//! reasoning service, used by the classifier and the arbitrator. The
//! pipeline treats the service as opaque request/response with failure
//! modes: network error, schema mismatch, timeout.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during reasoning gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Response did not match schema: {0}")]
    SchemaMismatch(String),

    #[error("Timeout")]
    Timeout,
}

/// One structured-output request
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    /// System instruction
    pub system: String,
    /// User payload
    pub user: String,
    /// JSON schema the response content must conform to
    pub schema: serde_json::Value,
    /// Model override; adapters fall back to their configured default
    pub model: Option<String>,
}

impl ReasoningRequest {
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            schema,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Parsed structured response from the reasoning service
#[derive(Debug, Clone)]
pub struct ReasoningResponse {
    /// Response content, already parsed as JSON
    pub content: serde_json::Value,
    /// Cost of the call in USD, when the provider reports it
    pub cost_usd: Option<f64>,
}

impl ReasoningResponse {
    pub fn new(content: serde_json::Value) -> Self {
        Self {
            content,
            cost_usd: None,
        }
    }

    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = Some(cost_usd);
        self
    }
}

/// Gateway for structured reasoning calls
///
/// This port defines how the application layer reaches the reasoning
/// service. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ReasoningGateway: Send + Sync {
    /// Submit a structured request and get back parsed JSON content.
    async fn complete_structured(
        &self,
        request: ReasoningRequest,
    ) -> Result<ReasoningResponse, GatewayError>;
}
