//! Shared HTTP client for the reasoning service.
//!
//! Both the reasoning gateway and the issue extractor adapters post to the
//! same chat-completions endpoint; this client owns the connection pool,
//! authentication, and error mapping onto [`GatewayError`].

use super::protocol::{ChatRequest, ChatResponse};
use redline_application::GatewayError;
use redline_domain::util::truncate_str;
use std::time::Duration;
use tracing::debug;

/// Connection settings for the reasoning service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Endpoint base, e.g. `https://openrouter.ai/api/v1`
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(180),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the chat-completions endpoint
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterClient {
    /// Build a client with a pooled connection and the configured timeout.
    pub fn new(config: ServiceConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Post one chat-completion request.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} (model {})", url, request.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                truncate_str(&body, 400)
            )));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| GatewayError::SchemaMismatch(e.to_string()))
    }

    /// Post a request and parse the first choice's content as JSON.
    pub async fn chat_structured(
        &self,
        request: &ChatRequest,
    ) -> Result<(serde_json::Value, Option<f64>), GatewayError> {
        let response = self.chat(request).await?;
        let cost = response.cost_usd();
        let content = response
            .content()
            .ok_or_else(|| GatewayError::SchemaMismatch("response had no content".to_string()))?;

        let parsed = serde_json::from_str(strip_code_fences(content))
            .map_err(|e| GatewayError::SchemaMismatch(e.to_string()))?;
        Ok((parsed, cost))
    }
}

/// Some models wrap structured output in a markdown code fence despite the
/// response-format instruction; strip it before parsing.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
