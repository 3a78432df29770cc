//! Separator-based text splitting ahead of embedding.

use std::collections::VecDeque;
use tracing::warn;

use crate::{Error, Result};

/// Default separator: blank line between listing blocks.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Splits text on a separator and greedily packs the pieces into chunks of
/// at most `chunk_size` characters, carrying up to `chunk_overlap`
/// characters of trailing pieces into the following chunk.
///
/// A single piece longer than `chunk_size` is emitted as its own chunk.
#[derive(Debug, Clone)]
pub struct CharacterTextSplitter {
    separator: String,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be positive".to_string()));
        }
        if chunk_overlap > chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({chunk_overlap}) is larger than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            chunk_size,
            chunk_overlap,
        })
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub const fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = if self.separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(self.separator.as_str())
                .filter(|piece| !piece.is_empty())
                .collect()
        };
        self.merge(&pieces)
    }

    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let sep_len = self.separator.chars().count();
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = piece.chars().count();
            let joiner = if current.is_empty() { 0 } else { sep_len };

            if total + len + joiner > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        "Created a chunk of size {total}, which is longer than the specified {}",
                        self.chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(chunk) = self.join(&current) {
                        chunks.push(chunk);
                    }
                    // Drop leading pieces until what remains fits as overlap.
                    while total > self.chunk_overlap
                        || (total > 0
                            && total + len + if current.is_empty() { 0 } else { sep_len }
                                > self.chunk_size)
                    {
                        let Some(first) = current.pop_front() else {
                            break;
                        };
                        let joined = if current.is_empty() { 0 } else { sep_len };
                        total = total.saturating_sub(first.chars().count() + joined);
                    }
                }
            }

            current.push_back(piece);
            total += len + if current.len() > 1 { sep_len } else { 0 };
        }

        if let Some(chunk) = self.join(&current) {
            chunks.push(chunk);
        }
        chunks
    }

    fn join(&self, pieces: &VecDeque<&str>) -> Option<String> {
        let joined = pieces
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(&self.separator);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_text_is_single_chunk() {
        let splitter = CharacterTextSplitter::new(1000, 0).unwrap();
        let chunks = splitter.split_text("Apple: A fruit.\n\nBanana: Another fruit.\n\n");
        assert_eq!(chunks, vec!["Apple: A fruit.\n\nBanana: Another fruit."]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let splitter = CharacterTextSplitter::new(1000, 0).unwrap();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text("\n\n\n\n").is_empty());
    }

    #[test]
    fn test_pieces_are_packed_up_to_size() {
        let splitter = CharacterTextSplitter::new(10, 0).unwrap();
        let chunks = splitter.split_text("aaa\n\nbbb\n\nccc");
        assert_eq!(chunks, vec!["aaa\n\nbbb", "ccc"]);
    }

    #[test]
    fn test_overlap_carries_trailing_piece() {
        let splitter = CharacterTextSplitter::new(10, 5).unwrap();
        let chunks = splitter.split_text("aaa\n\nbbb\n\nccc");
        assert_eq!(chunks, vec!["aaa\n\nbbb", "bbb\n\nccc"]);
    }

    #[test]
    fn test_oversize_piece_is_kept_whole() {
        let splitter = CharacterTextSplitter::new(5, 0).unwrap();
        let chunks = splitter.split_text("abcdefgh\n\nxy");
        assert_eq!(chunks, vec!["abcdefgh", "xy"]);
    }

    #[test]
    fn test_custom_separator() {
        let splitter = CharacterTextSplitter::new(3, 0).unwrap().with_separator("\n");
        let chunks = splitter.split_text("a\nb\nc\nd");
        assert_eq!(chunks, vec!["a\nb", "c\nd"]);
    }

    #[test]
    fn test_overlap_larger_than_size_is_rejected() {
        assert!(matches!(
            CharacterTextSplitter::new(10, 11),
            Err(Error::Config(_))
        ));
        assert!(CharacterTextSplitter::new(0, 0).is_err());
    }
}
