//! Naive paragraph chunker.
//!
//! Splits a document on blank lines into paragraph chunks with byte spans
//! and line ranges. Chunking strategy is not the pipeline's concern; this
//! just produces reasonable chunks to drive it from the command line.

use redline_domain::{Chunk, LineRange, Span};

/// Split a document into paragraph chunks.
///
/// A paragraph is a maximal run of non-blank lines. Chunk ids are assigned
/// sequentially (`c0`, `c1`, ...) in document order.
pub fn chunk_paragraphs(document: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut paragraph_start: Option<(usize, usize)> = None; // (byte offset, line)
    let mut offset = 0;

    let flush = |start: Option<(usize, usize)>,
                 end: usize,
                 end_line: usize,
                 chunks: &mut Vec<Chunk>| {
        if let Some((start_offset, start_line)) = start {
            let text = document[start_offset..end].trim_end();
            if !text.is_empty() {
                let id = format!("c{}", chunks.len());
                chunks.push(
                    Chunk::new(id, text)
                        .with_span(Span::new(start_offset, start_offset + text.len()))
                        .with_lines(LineRange::new(start_line, end_line)),
                );
            }
        }
    };

    for (line_index, line) in document.split_inclusive('\n').enumerate() {
        let line_number = line_index + 1;
        if line.trim().is_empty() {
            flush(paragraph_start.take(), offset, line_number.saturating_sub(1), &mut chunks);
        } else if paragraph_start.is_none() {
            paragraph_start = Some((offset, line_number));
        }
        offset += line.len();
    }
    let total_lines = document.lines().count();
    flush(paragraph_start.take(), document.len(), total_lines, &mut chunks);

    chunks
}
