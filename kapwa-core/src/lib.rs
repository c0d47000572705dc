//! Token-bounded, sentence-overlapping chunking for mixed Filipino/English text
//!
//! The pipeline prepares documents for embedding and retrieval:
//!
//! - **Normalization** cleans whitespace, citation markers and mojibake
//! - **Sentence splitting** tolerates abbreviations such as `Dr.` and `p.m.`
//! - **Chunk building** packs whole sentences under a token ceiling and seeds
//!   each chunk with the trailing sentences of the previous one
//!
//! Token counts come from a BPE vocabulary (`cl100k_base` by default). If the
//! vocabulary cannot be loaded the tokenizer falls back to a `chars / 4`
//! estimate and says so in the chunk statistics.
//!
//! # Example
//!
//! ```rust
//! use kapwa_core::{Chunker, Document};
//!
//! let chunker = Chunker::builder()
//!     .max_tokens(64)
//!     .overlap_tokens(16)
//!     .build()
//!     .unwrap();
//!
//! let doc = Document::new(
//!     "gabay.txt",
//!     "Dr. Reyes works at sea. Mr. Cruz is an OFW in Dubai. Pamilya niya ay masaya.",
//! );
//! let set = chunker.chunk_document(&doc);
//!
//! assert_eq!(set.chunks.len(), 1);
//! assert_eq!(set.stats.sentences, 3);
//! ```

#![warn(missing_docs)]

pub mod abbreviation;
pub mod builder;
pub mod chunker;
pub mod config;
pub mod error;
pub mod normalize;
pub mod splitter;
pub mod tokenizer;
pub mod types;

// Re-export key types
pub use abbreviation::AbbreviationTrie;
pub use builder::{build_chunks, overlap_seed, BuildOutput, ChunkBuilder, SentenceGroup};
pub use chunker::{Chunker, ChunkerBuilder};
pub use config::{ChunkingConfig, TokenBudget};
pub use error::{ChunkError, Result};
pub use normalize::TextNormalizer;
pub use splitter::SentenceSplitter;
pub use tokenizer::{Encoding, TokenCounter, Tokenizer, TokenizerMode, Vocabulary};
pub use types::{Chunk, ChunkRecord, ChunkSet, ChunkStats, CorpusStats, Document, Sentence};
