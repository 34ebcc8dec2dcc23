//! Fixed-window text chunking with overlap

use crate::config::ChunkingConfig;
use crate::error::Result;

/// Half-open window `[start, end)` over a text, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub start: usize,
    pub end: usize,
}

/// Text chunker with configurable size and overlap
///
/// Windows are measured in Unicode scalar values, so a window never splits a
/// code point. Consecutive windows start `chunk_size - overlap` characters
/// apart.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    /// Window size in characters
    chunk_size: usize,
    /// Characters shared by consecutive windows
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker, rejecting windows that would never advance
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        ChunkingConfig {
            chunk_size,
            chunk_overlap: overlap,
        }
        .validate()?;

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between consecutive window starts
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Windows scanned over a text of `char_len` characters
    pub fn spans(&self, char_len: usize) -> Vec<ChunkSpan> {
        let mut spans = Vec::new();
        let mut start = 0;

        while start < char_len {
            spans.push(ChunkSpan {
                start,
                end: (start + self.chunk_size).min(char_len),
            });
            start += self.step();
        }

        spans
    }

    /// Split text into trimmed, non-empty windows
    ///
    /// Whitespace-only windows are dropped. When nothing survives, the whole
    /// untrimmed text is returned as the only chunk.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks: Vec<String> = self
            .windows(text)
            .map(str::trim)
            .filter(|window| !window.is_empty())
            .map(str::to_string)
            .collect();

        if chunks.is_empty() {
            chunks.push(text.to_string());
        }

        chunks
    }

    /// Untrimmed windows in scan order, one per entry of `spans`
    ///
    /// Walks byte cursors over the text, so memory stays proportional to a
    /// single window.
    pub fn windows<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let chunk_size = self.chunk_size;
        let step = self.step();
        let mut start = 0;

        std::iter::from_fn(move || {
            if start >= text.len() {
                return None;
            }
            let rest = &text[start..];
            let window = &rest[..byte_offset(rest, chunk_size)];
            start += byte_offset(rest, step);
            Some(window)
        })
    }
}

/// Byte offset of the `chars`-th character, or the length when the text is shorter
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

impl Default for TextChunker {
    fn default() -> Self {
        let config = ChunkingConfig::default();
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
        }
    }
}

/// Chunk text with explicit window parameters
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(TextChunker::new(chunk_size, overlap)?.chunk(text))
}
