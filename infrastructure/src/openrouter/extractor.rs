//! Issue extractor adapter over the chat-completions endpoint.
//!
//! Applies the full [`ExtractorConfig`] to the request - model, temperature,
//! reasoning effort, provider preferences - so each ensemble member really
//! is an independently-configured attempt.

use super::client::OpenRouterClient;
use super::protocol::{ChatRequest, ReasoningOptions};
use async_trait::async_trait;
use redline_application::{
    ExtractionOutput, ExtractionRequest, ExtractorError, IssueExtractor,
};
use redline_domain::{ExtractedIssue, ReasoningEffort};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// [`IssueExtractor`] implementation for an OpenRouter-style API
pub struct OpenRouterIssueExtractor {
    client: Arc<OpenRouterClient>,
}

/// One issue row in the structured extraction response
#[derive(Debug, Deserialize)]
struct IssueRow {
    exact_text: String,
    severity: u8,
    confidence: u8,
    #[serde(default = "default_importance")]
    importance: u8,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

fn default_importance() -> u8 {
    50
}

#[derive(Debug, Deserialize)]
struct IssueRows {
    issues: Vec<IssueRow>,
}

impl OpenRouterIssueExtractor {
    pub fn new(client: Arc<OpenRouterClient>) -> Self {
        Self { client }
    }

    fn system_prompt(min_severity: u8, min_confidence: u8) -> String {
        format!(
            r#"You are an issue extractor reviewing a document. Find passages
that are wrong, misleading, unsupported, or internally inconsistent. For each
issue report the exact text span from the document, a severity score (0-100),
your confidence (0-100), and an importance score (0-100). Only report issues
with severity >= {min_severity} and confidence >= {min_confidence}. Report
the text span exactly as it appears in the document."#
        )
    }

    fn response_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "issues": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "exact_text": { "type": "string" },
                            "severity": { "type": "integer", "minimum": 0, "maximum": 100 },
                            "confidence": { "type": "integer", "minimum": 0, "maximum": 100 },
                            "importance": { "type": "integer", "minimum": 0, "maximum": 100 },
                            "category": { "type": "string" },
                            "note": { "type": "string" }
                        },
                        "required": ["exact_text", "severity", "confidence"]
                    }
                }
            },
            "required": ["issues"]
        })
    }
}

#[async_trait]
impl IssueExtractor for OpenRouterIssueExtractor {
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionOutput, ExtractorError> {
        let config = &request.config;

        let mut chat_request = ChatRequest::structured(
            config.model.clone(),
            Self::system_prompt(
                request.thresholds.min_severity,
                request.thresholds.min_confidence,
            ),
            request.document_text.clone(),
            Self::response_schema(),
        );
        chat_request.temperature = config.temperature.value();
        chat_request.reasoning = match config.reasoning_effort {
            ReasoningEffort::Default => None,
            effort => Some(ReasoningOptions {
                effort: effort.to_string(),
            }),
        };
        chat_request.provider = config.provider_preferences.clone();

        let (content, cost_usd) = self.client.chat_structured(&chat_request).await?;
        let rows: IssueRows = serde_json::from_value(content)
            .map_err(|e| ExtractorError::Malformed(e.to_string()))?;

        let issues: Vec<ExtractedIssue> = rows
            .issues
            .into_iter()
            .map(|row| {
                let mut issue =
                    ExtractedIssue::new(row.exact_text, row.severity, row.confidence)
                        .with_importance(row.importance);
                if let Some(category) = row.category {
                    issue = issue.with_category(category);
                }
                if let Some(note) = row.note {
                    issue = issue.with_note(note);
                }
                issue
            })
            .collect();

        debug!(
            "Extractor {} returned {} issues",
            config.display_name(),
            issues.len()
        );
        Ok(ExtractionOutput { issues, cost_usd })
    }
}
