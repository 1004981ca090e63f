//! Sentence-aware text chunking with overlap

use unicode_segmentation::UnicodeSegmentation;

/// Text chunker with configurable size and overlap
///
/// Sizes are measured in bytes of UTF-8 text. Chunks never split a
/// character and never exceed `chunk_size`.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size
    chunk_size: usize,
    /// Overlap carried from the end of one chunk into the next
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Split text into ordered chunks; blank input yields no chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for piece in self.pieces(text) {
            if !current.is_empty() && current.len() + piece.len() > self.chunk_size {
                let finished = current.trim();
                if !finished.is_empty() {
                    chunks.push(finished.to_string());
                }

                // Start new chunk with overlap, dropped if the piece would not fit
                current = self.get_overlap_text(&current);
                if current.len() + piece.len() > self.chunk_size {
                    current.clear();
                }
            }

            current.push_str(piece);
        }

        let finished = current.trim();
        if !finished.is_empty() {
            chunks.push(finished.to_string());
        }

        chunks
    }

    /// Sentences, with oversized sentences broken at word and then character bounds
    fn pieces<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();

        for sentence in text.split_sentence_bounds() {
            if sentence.len() <= self.chunk_size {
                pieces.push(sentence);
                continue;
            }

            for word in sentence.split_word_bounds() {
                if word.len() <= self.chunk_size {
                    pieces.push(word);
                } else {
                    self.hard_split(word, &mut pieces);
                }
            }
        }

        pieces
    }

    fn hard_split<'a>(&self, word: &'a str, out: &mut Vec<&'a str>) {
        let mut start = 0;
        while start < word.len() {
            let mut end = (start + self.chunk_size).min(word.len());
            while !word.is_char_boundary(end) {
                end -= 1;
            }
            if end == start {
                // chunk_size smaller than one character
                end = start + word[start..].chars().next().map_or(1, char::len_utf8);
            }
            out.push(&word[start..end]);
            start = end;
        }
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len() - self.overlap;
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let overlap_text = &text[start..];

        // Try to start at a sentence boundary
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = TextChunker::new(1000, 200);
        assert_eq!(chunker.split("Short note."), vec!["Short note.".to_string()]);
        assert!(chunker.split("   \n ").is_empty());
    }

    #[test]
    fn test_splits_on_sentences_with_overlap() {
        let chunker = TextChunker::new(60, 20);
        let text = "The pump must be primed. Open valve A first. Then start the motor. \
                    Check the pressure gauge. Close valve B when done.";
        let chunks = chunker.split(text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 60));
        assert!(chunks[0].starts_with("The pump"));
        assert!(chunks.last().unwrap().ends_with("done."));
    }

    #[test]
    fn test_oversized_word_is_hard_split() {
        let chunker = TextChunker::new(10, 0);
        let chunks = chunker.split(&"x".repeat(25));
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_multibyte_text_never_splits_chars() {
        let chunker = TextChunker::new(7, 3);
        let chunks = chunker.split("ééééééééééé ñññññ. 日本語のテキスト。");
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.len() <= 7));
    }

    proptest! {
        #[test]
        fn test_chunks_bounded_and_non_empty(text in "[a-zA-Z .,\n]{0,400}", size in 20usize..200, overlap in 0usize..50) {
            let chunker = TextChunker::new(size, overlap);
            for chunk in chunker.split(&text) {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.len() <= size);
            }
        }
    }
}
