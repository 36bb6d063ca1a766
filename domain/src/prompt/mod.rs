//! Prompt templates for the routing and arbitration flows

use crate::judgment::IssueProvenance;
use crate::routing::PluginDescriptor;
use crate::util::truncate_with_marker;

/// Templates for chunk-classification requests
pub struct ClassifierPromptTemplate;

impl ClassifierPromptTemplate {
    /// System prompt: per-plugin criteria sections plus strict non-overlap
    /// instructions.
    pub fn system(descriptors: &[PluginDescriptor]) -> String {
        let mut prompt = String::from(
            r#"You are a routing classifier for a document-review pipeline.
For each chunk of text you are given, decide which of the following checker
plugins should examine it. Assign zero, one, or many plugins per chunk.
Plugins have narrow, non-overlapping responsibilities; when in doubt, assign
none. Never invent plugin names that are not listed below.

Available plugins:
"#,
        );

        for descriptor in descriptors {
            prompt.push_str(&format!(
                "\n--- {} ---\nCriteria: {}\n",
                descriptor.name, descriptor.usage_criteria
            ));
            for example in &descriptor.examples {
                prompt.push_str(&format!(
                    "Example: {:?} -> {} ({})\n",
                    truncate_with_marker(&example.sample_text, 160),
                    if example.should_process {
                        "process"
                    } else {
                        "skip"
                    },
                    example.reason
                ));
            }
        }

        prompt.push_str(
            r#"
Return one entry per chunk with the chunk id and the (possibly empty) list of
plugin names that should process it."#,
        );

        prompt
    }

    /// User payload: the batch's chunk texts, truncated to bound cost.
    pub fn user(chunks: &[(String, String)], max_chunk_chars: usize) -> String {
        let mut prompt = String::from("Chunks to classify:\n");
        for (id, text) in chunks {
            prompt.push_str(&format!(
                "\n--- chunk {} ---\n{}\n",
                id,
                truncate_with_marker(text, max_chunk_chars)
            ));
        }
        prompt
    }
}

/// Templates for arbitration requests over deduplicated candidates
pub struct JudgePromptTemplate;

impl JudgePromptTemplate {
    /// System prompt for the accept/merge/reject pass.
    pub fn system() -> &'static str {
        r#"You are an arbitrator reviewing candidate issues extracted from a
document by several independent extraction runs. For each candidate, decide:
- "accepted": the issue is real and well-stated
- "merged": the issue is real but overlaps another candidate it subsumes
- "rejected": the issue is spurious, trivial, or not supported by the document
Give one short sentence of reasoning per verdict. Judge every candidate."#
    }

    /// User payload: candidates with their scores and provenance.
    pub fn user(candidates: &[IssueProvenance], document_text: &str) -> String {
        let mut prompt = format!(
            "Document under review:\n{}\n\nCandidate issues:\n",
            truncate_with_marker(document_text, 8000)
        );

        for (index, candidate) in candidates.iter().enumerate() {
            let sources: Vec<&str> = candidate
                .source_extractors
                .iter()
                .map(|s| s.as_str())
                .collect();
            prompt.push_str(&format!(
                "\n[{}] {:?} (severity {}, confidence {}, proposed by: {})\n",
                index,
                candidate.issue.exact_text,
                candidate.issue.severity,
                candidate.issue.confidence,
                sources.join(", ")
            ));
        }

        prompt.push_str("\nReturn one verdict per candidate index.");
        prompt
    }
}
