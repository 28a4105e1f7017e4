//! Context windows between neighbouring chunks

use crate::application::config::SegmenterConfig;
use crate::domain::types::Chunk;

/// Attaches bounded context from neighbouring chunks
///
/// Windows are cut from the neighbour's cleaned text and are limited both in
/// words and in bytes. Content and ordering of the chunks are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapManager {
    max_words: usize,
    max_bytes: usize,
}

impl OverlapManager {
    pub fn new(max_words: usize, max_bytes: usize) -> Self {
        Self {
            max_words,
            max_bytes,
        }
    }

    pub fn from_config(config: &SegmenterConfig) -> Self {
        Self::new(config.overlap_words, config.overlap_window_size)
    }

    /// Copies of `chunks` with `context_before`/`context_after` filled in
    pub fn apply(&self, chunks: &[Chunk]) -> Vec<Chunk> {
        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let mut chunk = chunk.clone();
                chunk.context_before = match i.checked_sub(1) {
                    Some(prev) => self.tail_window(&chunks[prev].clean_content),
                    None => String::new(),
                };
                chunk.context_after = match chunks.get(i + 1) {
                    Some(next) => self.head_window(&next.clean_content),
                    None => String::new(),
                };
                chunk
            })
            .collect()
    }

    /// First words of `text`, within both caps
    pub fn head_window(&self, text: &str) -> String {
        let words: Vec<&str> = text.split_whitespace().take(self.max_words).collect();
        self.fit(words)
    }

    /// Last words of `text`, within both caps
    pub fn tail_window(&self, text: &str) -> String {
        let mut words: Vec<&str> = text.split_whitespace().rev().take(self.max_words).collect();
        words.reverse();
        // Keep the words closest to the shared edge
        let mut kept: Vec<&str> = Vec::new();
        let mut used = 0;
        for word in words.iter().rev() {
            let cost = word.len() + usize::from(!kept.is_empty());
            if used + cost > self.max_bytes {
                break;
            }
            used += cost;
            kept.push(*word);
        }
        kept.reverse();
        if kept.is_empty() {
            return words
                .last()
                .map(|word| suffix_within(word, self.max_bytes).to_string())
                .unwrap_or_default();
        }
        kept.join(" ")
    }

    fn fit(&self, words: Vec<&str>) -> String {
        let mut output = String::new();
        for word in &words {
            let cost = word.len() + usize::from(!output.is_empty());
            if output.len() + cost > self.max_bytes {
                break;
            }
            if !output.is_empty() {
                output.push(' ');
            }
            output.push_str(word);
        }
        if output.is_empty() {
            if let Some(word) = words.first() {
                return prefix_within(word, self.max_bytes).to_string();
            }
        }
        output
    }
}

fn prefix_within(word: &str, max: usize) -> &str {
    &word[..super::floor_char_boundary(word, max)]
}

fn suffix_within(word: &str, max: usize) -> &str {
    let start = super::ceil_char_boundary(word, word.len().saturating_sub(max));
    &word[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ChunkType;

    fn chunk(text: &str) -> Chunk {
        Chunk::new(text, (0, text.len()), ChunkType::QuestionBased, 0.95)
    }

    #[test]
    fn test_three_chunks_get_neighbour_context() {
        let chunks = vec![
            chunk("primeiro bloco de texto"),
            chunk("segundo bloco de texto"),
            chunk("terceiro bloco de texto"),
        ];
        let with_context = OverlapManager::new(2, 200).apply(&chunks);

        assert_eq!(with_context.len(), 3);
        assert!(with_context[0].context_before.is_empty());
        assert_eq!(with_context[0].context_after, "segundo bloco");
        assert_eq!(with_context[1].context_before, "de texto");
        assert_eq!(with_context[1].context_after, "terceiro bloco");
        assert!(with_context[2].context_after.is_empty());

        for (before, after) in chunks.iter().zip(&with_context) {
            assert_eq!(before.raw_content, after.raw_content);
            assert_eq!(before.clean_content, after.clean_content);
            assert_eq!(before.metadata, after.metadata);
        }
    }

    #[test]
    fn test_windows_respect_byte_cap() {
        let manager = OverlapManager::new(20, 12);
        assert_eq!(manager.head_window("alfa beta gama delta"), "alfa beta");
        assert_eq!(manager.tail_window("alfa beta gama delta"), "gama delta");
        assert!(manager.head_window(&"palavra ".repeat(50)).len() <= 12);
    }

    #[test]
    fn test_oversized_word_is_cut_on_char_boundary() {
        let manager = OverlapManager::new(5, 5);
        assert_eq!(manager.head_window("ãããããããã"), "ãã");
        assert_eq!(manager.tail_window("xxxxxxxx"), "xxxxx");
    }

    #[test]
    fn test_single_chunk_has_no_context() {
        let with_context = OverlapManager::new(20, 200).apply(&[chunk("único")]);
        assert!(with_context[0].context_before.is_empty());
        assert!(with_context[0].context_after.is_empty());
    }
}
