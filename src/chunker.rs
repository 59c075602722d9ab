use crate::config::ChunkingConfig;
use crate::error::ConfigError;

/// A bounded contiguous segment of document text prepared for embedding
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Chunk {
    /// Chunk text, at most `chunk_size` characters
    pub content: String,
    /// Position in the source order
    pub index: usize,
}

/// Splits document text into overlapping fixed-size chunks
///
/// The splitter walks the text left to right. Each cut prefers, inside the
/// current window, the last paragraph break, then line break, then sentence
/// end, then word boundary, and falls back to a hard cut at `chunk_size`
/// characters. Consecutive chunks always share exactly `overlap` characters,
/// so concatenating chunk 0 with every later chunk's suffix past the overlap
/// reconstructs the input without losing a single character.
///
/// Sizes are measured in characters, not bytes, so multi-byte input never
/// splits inside a code point.
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a chunker with explicit size and overlap
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chunking.chunk_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if overlap >= chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "chunking.chunk_overlap".to_string(),
                reason: format!(
                    "must be smaller than chunk_size ({} >= {})",
                    overlap, chunk_size
                ),
            });
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Create a chunker from a chunking config section
    pub fn from_config(config: &ChunkingConfig) -> Result<Self, ConfigError> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into ordered overlapping chunks
    ///
    /// Empty input yields no chunks. Every chunk's length is at most
    /// `chunk_size` and every consecutive pair shares exactly `overlap`
    /// characters of context.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();

        if total == 0 {
            return chunks;
        }

        let mut start = 0;
        loop {
            let hard_end = (start + self.chunk_size).min(total);
            let end = if hard_end < total {
                self.cut_point(&chars, start, hard_end)
            } else {
                hard_end
            };

            chunks.push(Chunk {
                content: chars[start..end].iter().collect(),
                index: chunks.len(),
            });

            if end >= total {
                break;
            }

            // Exact overlap keeps the sequence lossless and restartable
            start = end - self.overlap;
        }

        tracing::debug!("Split {} characters into {} chunks", total, chunks.len());
        chunks
    }

    /// Pick the cut position for the window `[start, hard_end)`
    ///
    /// Candidate positions must leave room for the next chunk to make
    /// progress, so only `start + overlap + 1 ..= hard_end` is considered.
    /// Boundary classes are tried strictly in order; within a class the
    /// latest position wins.
    fn cut_point(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let min_cut = start + self.overlap + 1;

        for boundary in [
            Boundary::Paragraph,
            Boundary::Line,
            Boundary::Sentence,
            Boundary::Word,
        ] {
            let mut pos = hard_end;
            while pos >= min_cut {
                if boundary.matches(chars, pos) {
                    return pos;
                }
                pos -= 1;
            }
        }

        hard_end
    }
}

/// Natural boundary classes, strongest first
#[derive(Clone, Copy)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
}

impl Boundary {
    /// Whether cutting just before `chars[pos]` lands after this boundary
    fn matches(self, chars: &[char], pos: usize) -> bool {
        match self {
            Boundary::Paragraph => {
                pos >= 2 && chars[pos - 1] == '\n' && chars[pos - 2] == '\n'
            }
            Boundary::Line => pos >= 1 && chars[pos - 1] == '\n',
            Boundary::Sentence => {
                pos >= 2
                    && matches!(chars[pos - 2], '.' | '!' | '?')
                    && chars[pos - 1].is_whitespace()
            }
            Boundary::Word => pos >= 1 && chars[pos - 1].is_whitespace(),
        }
    }
}
