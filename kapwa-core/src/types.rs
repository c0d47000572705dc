//! Documents, sentences, chunks and statistics

use crate::tokenizer::TokenizerMode;
use serde::{Deserialize, Serialize};

/// Raw input owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier, typically a file name
    pub identifier: String,
    /// Raw text content
    pub content: String,
}

impl Document {
    /// Create a document
    pub fn new(identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            content: content.into(),
        }
    }
}

/// A sentence with its measured token count
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
    /// Trimmed, non-empty sentence text
    pub text: String,
    /// Tokens in `text`
    pub token_count: usize,
}

/// One chunk of a document, ready for embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sentences joined by single spaces
    pub text: String,
    /// Tokens in `text`, measured with the chunker's tokenizer
    pub token_count: usize,
    /// Length of `text` in characters
    pub char_length: usize,
    /// 0-based position within the document
    pub position_index: usize,
    /// Number of sentences in the chunk
    pub sentence_count: usize,
    /// Leading sentences repeated from the previous chunk
    pub overlap_sentences: usize,
}

/// Per-document chunking statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStats {
    /// Sentences produced by the splitter
    pub sentences: usize,
    /// Sentences dropped for exceeding the chunk ceiling
    pub dropped_sentences: usize,
    /// Sum of chunk token counts
    pub total_tokens: usize,
    /// How tokens were counted
    pub tokenizer: TokenizerMode,
}

/// All chunks produced for one document, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSet {
    /// Identifier of the source document
    pub source: String,
    /// Ordered chunks
    pub chunks: Vec<Chunk>,
    /// Statistics for this document
    pub stats: ChunkStats,
}

impl ChunkSet {
    /// Whether the document produced nothing indexable
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Average tokens per chunk (0.0 when empty)
    pub fn avg_tokens(&self) -> f64 {
        if self.chunks.is_empty() {
            0.0
        } else {
            self.stats.total_tokens as f64 / self.chunks.len() as f64
        }
    }

    /// Flatten into storage records
    pub fn records(&self) -> impl Iterator<Item = ChunkRecord<'_>> {
        self.chunks.iter().map(move |chunk| ChunkRecord {
            source: &self.source,
            chunk_id: chunk.position_index,
            token_count: chunk.token_count,
            char_length: chunk.char_length,
            text: &chunk.text,
        })
    }
}

/// Chunk text plus the metadata the storage collaborator expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkRecord<'a> {
    /// Source identifier
    pub source: &'a str,
    /// Position index within the source
    pub chunk_id: usize,
    /// Tokens in the chunk
    pub token_count: usize,
    /// Characters in the chunk
    pub char_length: usize,
    /// Chunk text
    pub text: &'a str,
}

/// Running totals across many documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Documents chunked
    pub documents: usize,
    /// Documents that produced no chunks
    pub empty_documents: usize,
    /// Chunks produced
    pub chunks: usize,
    /// Sum of chunk token counts
    pub total_tokens: usize,
    /// Sentences dropped for exceeding the chunk ceiling
    pub dropped_sentences: usize,
}

impl CorpusStats {
    /// Fold one document's results into the totals
    pub fn record(&mut self, set: &ChunkSet) {
        self.documents += 1;
        if set.is_empty() {
            self.empty_documents += 1;
        }
        self.chunks += set.len();
        self.total_tokens += set.stats.total_tokens;
        self.dropped_sentences += set.stats.dropped_sentences;
    }

    /// Average tokens per chunk (0.0 when no chunks)
    pub fn avg_tokens(&self) -> f64 {
        if self.chunks == 0 {
            0.0
        } else {
            self.total_tokens as f64 / self.chunks as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, position_index: usize, token_count: usize) -> Chunk {
        Chunk {
            text: text.to_string(),
            token_count,
            char_length: text.chars().count(),
            position_index,
            sentence_count: 1,
            overlap_sentences: 0,
        }
    }

    fn set(source: &str, chunks: Vec<Chunk>) -> ChunkSet {
        let total_tokens = chunks.iter().map(|c| c.token_count).sum();
        ChunkSet {
            source: source.to_string(),
            chunks,
            stats: ChunkStats {
                sentences: 0,
                dropped_sentences: 1,
                total_tokens,
                tokenizer: TokenizerMode::CharEstimate,
            },
        }
    }

    #[test]
    fn test_records_carry_metadata() {
        let set = set("gabay.txt", vec![chunk("Una.", 0, 1), chunk("Ikalawa.", 1, 2)]);
        let records: Vec<_> = set.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].source, "gabay.txt");
        assert_eq!(records[1].chunk_id, 1);
        assert_eq!(records[1].char_length, 8);
        assert_eq!(records[1].text, "Ikalawa.");
    }

    #[test]
    fn test_avg_tokens() {
        assert_eq!(set("a", vec![]).avg_tokens(), 0.0);
        let set = set("a", vec![chunk("x", 0, 10), chunk("y", 1, 20)]);
        assert_eq!(set.avg_tokens(), 15.0);
    }

    #[test]
    fn test_corpus_stats_accumulate() {
        let mut stats = CorpusStats::default();
        stats.record(&set("a", vec![chunk("x", 0, 10), chunk("y", 1, 30)]));
        stats.record(&set("b", vec![]));

        assert_eq!(stats.documents, 2);
        assert_eq!(stats.empty_documents, 1);
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.total_tokens, 40);
        assert_eq!(stats.dropped_sentences, 2);
        assert_eq!(stats.avg_tokens(), 20.0);
    }

    #[test]
    fn test_record_serializes_with_storage_field_names() {
        let set = set("gabay.txt", vec![chunk("Una.", 0, 1)]);
        let record = set.records().next().unwrap();
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["source"], "gabay.txt");
        assert_eq!(json["chunk_id"], 0);
        assert_eq!(json["token_count"], 1);
        assert_eq!(json["char_length"], 4);
    }
}
