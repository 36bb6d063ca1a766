//! Chunk value objects - the unit of assignment to checker plugins.
//!
//! A [`Chunk`] is a contiguous slice of a document with identity and optional
//! position metadata. Chunks are owned by the caller of the pipeline and are
//! never mutated by it; routing and execution only read them.

use serde::{Deserialize, Serialize};

/// Identifier of a chunk within one document-analysis run (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChunkId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChunkId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Byte-offset range of a chunk within its parent document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Line-range info of a chunk within its parent document (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineRange {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}

/// A contiguous slice of a document, the unit of plugin routing
///
/// Immutable once created. The pipeline reads chunk text to classify and
/// analyze it but never rewrites it; findings reference chunks by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk identity, unique within one run
    pub id: ChunkId,
    /// The chunk's text content
    pub text: String,
    /// Byte offsets in the parent document, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Line range in the parent document, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineRange>,
}

impl Chunk {
    /// Create a chunk with no position metadata.
    pub fn new(id: impl Into<ChunkId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            span: None,
            lines: None,
        }
    }

    /// Attach the byte-offset range within the parent document.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach the line range within the parent document.
    pub fn with_lines(mut self, lines: LineRange) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Length of the chunk text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_construction() {
        let chunk = Chunk::new("c1", "Some paragraph text.")
            .with_span(Span::new(0, 20))
            .with_lines(LineRange::new(1, 1));

        assert_eq!(chunk.id.as_str(), "c1");
        assert_eq!(chunk.len(), 20);
        assert_eq!(chunk.span.unwrap().len(), 20);
        assert_eq!(chunk.lines.unwrap().start_line, 1);
    }

    #[test]
    fn test_chunk_without_metadata() {
        let chunk = Chunk::new("c2", "text");
        assert!(chunk.span.is_none());
        assert!(chunk.lines.is_none());
    }

    #[test]
    fn test_span_empty() {
        assert!(Span::new(5, 5).is_empty());
        assert!(!Span::new(5, 6).is_empty());
        assert_eq!(Span::new(10, 4).len(), 0);
    }

    #[test]
    fn test_chunk_id_display() {
        let id = ChunkId::new("chunk-42");
        assert_eq!(id.to_string(), "chunk-42");
    }

    #[test]
    fn test_chunk_id_serde_transparent() {
        let id = ChunkId::new("c7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"c7\"");
        let back: ChunkId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
