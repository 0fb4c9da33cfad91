//! Fixed-size text chunking with overlap

use crate::config::ChunkingConfig;

/// Splits report text into overlapping fixed-size character windows.
///
/// Consecutive chunks share `overlap` characters so that sentences cut at a
/// window boundary still appear whole in one of the two chunks. The final
/// window always runs to the end of the text; trailing content is never
/// dropped and no chunk exceeds `chunk_size`.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. `overlap` must be smaller than `chunk_size`
    /// (enforced by config validation).
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        debug_assert!(overlap < chunk_size);
        Self { chunk_size, overlap }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split text into ordered, overlapping chunks.
    ///
    /// Deterministic: the same input always yields the same sequence.
    /// Empty input yields an empty sequence.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Windows are measured in characters, not bytes, so multi-byte
        // input never splits inside a code point.
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}
