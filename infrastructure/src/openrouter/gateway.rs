//! Reasoning gateway adapter over the chat-completions endpoint.

use super::client::OpenRouterClient;
use super::protocol::ChatRequest;
use async_trait::async_trait;
use redline_application::{
    GatewayError, ReasoningGateway, ReasoningRequest, ReasoningResponse,
};
use std::sync::Arc;

/// [`ReasoningGateway`] implementation for an OpenRouter-style API
pub struct OpenRouterReasoningGateway {
    client: Arc<OpenRouterClient>,
    default_model: String,
}

impl OpenRouterReasoningGateway {
    pub fn new(client: Arc<OpenRouterClient>, default_model: impl Into<String>) -> Self {
        Self {
            client,
            default_model: default_model.into(),
        }
    }
}

#[async_trait]
impl ReasoningGateway for OpenRouterReasoningGateway {
    async fn complete_structured(
        &self,
        request: ReasoningRequest,
    ) -> Result<ReasoningResponse, GatewayError> {
        let model = request
            .model
            .unwrap_or_else(|| self.default_model.clone());

        let chat_request =
            ChatRequest::structured(model, request.system, request.user, request.schema);

        let (content, cost) = self.client.chat_structured(&chat_request).await?;
        let mut response = ReasoningResponse::new(content);
        if let Some(cost) = cost {
            response = response.with_cost(cost);
        }
        Ok(response)
    }
}
