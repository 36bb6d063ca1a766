//! Wire types for the OpenRouter-style chat-completions endpoint.
//!
//! Only the fields the pipeline actually reads are modeled; everything else
//! in the provider's response is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// One chat-completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningOptions>,
    /// Provider routing preferences, passed through opaquely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    /// Ask the provider to include cost accounting in the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageOptions>,
}

impl ChatRequest {
    /// Request with structured JSON-schema output and cost accounting.
    pub fn structured(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage::system(system),
                ChatMessage::user(user),
            ],
            temperature: None,
            reasoning: None,
            provider: None,
            response_format: Some(ResponseFormat::json_schema(schema)),
            usage: Some(UsageOptions { include: true }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningOptions {
    pub effort: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageOptions {
    pub include: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub json_schema: JsonSchemaFormat,
}

impl ResponseFormat {
    pub fn json_schema(schema: serde_json::Value) -> Self {
        Self {
            kind: "json_schema".to_string(),
            json_schema: JsonSchemaFormat {
                name: "structured_output".to_string(),
                strict: true,
                schema,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

/// Chat-completion response (the subset the pipeline reads)
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Content of the first choice, when present.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }

    /// Reported cost in USD, when the provider includes accounting.
    pub fn cost_usd(&self) -> Option<f64> {
        self.usage.as_ref().and_then(|u| u.cost)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub cost: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_request_serializes() {
        let request = ChatRequest::structured(
            "anthropic/claude-sonnet-4.5",
            "system text",
            "user text",
            json!({ "type": "object" }),
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "anthropic/claude-sonnet-4.5");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["usage"]["include"], true);
        // Unset options stay off the wire
        assert!(value.get("temperature").is_none());
        assert!(value.get("reasoning").is_none());
    }

    #[test]
    fn test_response_content_and_cost() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "content": "{\"ok\":true}" } }
            ],
            "usage": { "cost": 0.0021, "prompt_tokens": 120 }
        }))
        .unwrap();

        assert_eq!(response.content(), Some("{\"ok\":true}"));
        assert_eq!(response.cost_usd(), Some(0.0021));
    }

    #[test]
    fn test_empty_response_tolerated() {
        let response: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.content().is_none());
        assert!(response.cost_usd().is_none());
    }
}
