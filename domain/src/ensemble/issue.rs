//! Extracted issues - the atomic unit of deduplication.

use serde::{Deserialize, Serialize};

/// One issue reported by an extractor
///
/// Never mutated after extraction; deduplication only replaces a cluster's
/// representative with a better duplicate, it does not edit issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedIssue {
    /// Exact text span the issue refers to in the source document
    pub exact_text: String,
    /// Severity score, 0-100
    pub severity: u8,
    /// Extractor's confidence, 0-100
    pub confidence: u8,
    /// Importance score, 0-100
    pub importance: u8,
    /// Issue category (e.g. "factual", "logical"), extractor-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-text note from the extractor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExtractedIssue {
    pub fn new(exact_text: impl Into<String>, severity: u8, confidence: u8) -> Self {
        Self {
            exact_text: exact_text.into(),
            severity: severity.min(100),
            confidence: confidence.min(100),
            importance: 50,
            category: None,
            note: None,
        }
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance.min(100);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether the issue carries a usable text span.
    ///
    /// Issues without one are malformed extraction output and are filtered
    /// before deduplication.
    pub fn has_text(&self) -> bool {
        !self.exact_text.trim().is_empty()
    }
}
