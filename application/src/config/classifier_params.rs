//! Classifier parameters — batching and prompt-size control.

use serde::{Deserialize, Serialize};

/// Static parameters of the chunk classifier.
///
/// Batching bounds request size: all chunks within a batch are classified in
/// one reasoning call, batches run sequentially. Chunk text is truncated to
/// `max_chunk_chars` in the prompt to control cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Chunks per classification request
    pub batch_size: usize,
    /// Per-chunk byte budget in the prompt
    pub max_chunk_chars: usize,
    /// Model override for classification calls
    pub model: Option<String>,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_chunk_chars: 1200,
            model: None,
        }
    }
}

impl ClassifierParams {
    // ==================== Builder Methods ====================

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn with_max_chunk_chars(mut self, chars: usize) -> Self {
        self.max_chunk_chars = chars;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
