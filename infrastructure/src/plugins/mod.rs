//! Prompt-driven checker plugin adapter.
//!
//! [`PromptPlugin`] stands up a [`CheckerPlugin`] from a descriptor and an
//! analysis instruction, delegating the actual checking to the reasoning
//! service. Checkers with bespoke logic implement the trait directly; this
//! adapter covers the common "criteria prompt + structured findings" shape.

use async_trait::async_trait;
use redline_application::{
    CheckerPlugin, PluginError, ReasoningGateway, ReasoningRequest,
};
use redline_domain::util::truncate_with_marker;
use redline_domain::{AnalysisOutput, Chunk, Finding, PluginDescriptor};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Checker plugin backed by a single structured reasoning call
pub struct PromptPlugin<G: ReasoningGateway> {
    descriptor: PluginDescriptor,
    instructions: String,
    gateway: Arc<G>,
    model: Option<String>,
    /// Byte budget for the document context appended to each request
    max_context_chars: usize,
}

#[derive(Debug, Deserialize)]
struct FindingRow {
    description: String,
    #[serde(default)]
    chunk_id: Option<String>,
    #[serde(default)]
    quote: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalysisRows {
    summary: String,
    analysis: String,
    #[serde(default)]
    findings: Vec<FindingRow>,
}

impl<G: ReasoningGateway> PromptPlugin<G> {
    pub fn new(
        descriptor: PluginDescriptor,
        instructions: impl Into<String>,
        gateway: Arc<G>,
    ) -> Self {
        Self {
            descriptor,
            instructions: instructions.into(),
            gateway,
            model: None,
            max_context_chars: 16_000,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_context_chars(mut self, chars: usize) -> Self {
        self.max_context_chars = chars;
        self
    }

    fn user_prompt(&self, chunks: &[Chunk], document_text: &str) -> String {
        let mut prompt = String::from("Chunks assigned to you:\n");
        for chunk in chunks {
            prompt.push_str(&format!("\n--- chunk {} ---\n{}\n", chunk.id, chunk.text));
        }
        prompt.push_str(&format!(
            "\nFull document for context:\n{}\n",
            truncate_with_marker(document_text, self.max_context_chars)
        ));
        prompt.push_str("\nReport findings referencing chunk ids where possible.");
        prompt
    }

    fn response_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string" },
                "analysis": { "type": "string" },
                "findings": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "description": { "type": "string" },
                            "chunk_id": { "type": "string" },
                            "quote": { "type": "string" }
                        },
                        "required": ["description"]
                    }
                }
            },
            "required": ["summary", "analysis", "findings"]
        })
    }
}

#[async_trait]
impl<G: ReasoningGateway> CheckerPlugin for PromptPlugin<G> {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn analyze(
        &self,
        chunks: &[Chunk],
        document_text: &str,
    ) -> Result<AnalysisOutput, PluginError> {
        let mut request = ReasoningRequest::new(
            self.instructions.clone(),
            self.user_prompt(chunks, document_text),
            Self::response_schema(),
        );
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let response = self.gateway.complete_structured(request).await?;
        let cost_usd = response.cost_usd;
        let rows: AnalysisRows = serde_json::from_value(response.content)
            .map_err(|e| PluginError::AnalysisFailed(format!("unparseable analysis: {e}")))?;

        let findings = rows
            .findings
            .into_iter()
            .map(|row| {
                let mut finding = Finding::new(row.description);
                if let Some(chunk_id) = row.chunk_id {
                    finding = finding.with_chunk(chunk_id);
                }
                if let Some(quote) = row.quote {
                    finding = finding.with_quote(quote);
                }
                finding
            })
            .collect();

        let mut output = AnalysisOutput::new(rows.summary, rows.analysis).with_findings(findings);
        if let Some(cost) = cost_usd {
            output = output.with_cost(cost);
        }
        Ok(output)
    }
}
