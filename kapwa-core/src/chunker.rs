//! Document chunking pipeline
//!
//! Wires the normalizer, splitter, builder and tokenizer together for one
//! document at a time.

use crate::builder::ChunkBuilder;
use crate::config::{ChunkingConfig, TokenBudget};
use crate::error::Result;
use crate::normalize::TextNormalizer;
use crate::splitter::SentenceSplitter;
use crate::tokenizer::{Encoding, TokenCounter, Tokenizer};
use crate::types::{Chunk, ChunkSet, ChunkStats, Document};
use std::sync::Arc;

/// Splits documents into token-bounded, sentence-overlapping chunks
///
/// A `Chunker` is immutable after construction and can be shared across
/// threads; each call owns its own buffers.
#[derive(Debug, Clone)]
pub struct Chunker {
    tokenizer: Arc<Tokenizer>,
    normalizer: TextNormalizer,
    splitter: SentenceSplitter,
    budget: TokenBudget,
}

impl Chunker {
    /// Chunker with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ChunkingConfig::default())
    }

    /// Chunker for `config`, loading its tokenizer vocabulary
    pub fn with_config(config: ChunkingConfig) -> Result<Self> {
        let tokenizer = Arc::new(Tokenizer::load(config.encoding));
        Self::with_tokenizer(config, tokenizer)
    }

    /// Chunker for `config` using an already-loaded tokenizer
    ///
    /// `config.encoding` is ignored in favour of `tokenizer`.
    pub fn with_tokenizer(config: ChunkingConfig, tokenizer: Arc<Tokenizer>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer,
            normalizer: TextNormalizer::new(config.preserve_paragraphs)?,
            splitter: SentenceSplitter::with_extra(&config.extra_abbreviations)?,
            budget: config.budget()?,
        })
    }

    /// Start a builder
    pub fn builder() -> ChunkerBuilder {
        ChunkerBuilder::new()
    }

    /// The tokenizer used for all counts
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Shared handle to the tokenizer
    pub fn shared_tokenizer(&self) -> Arc<Tokenizer> {
        Arc::clone(&self.tokenizer)
    }

    /// The token budget in use
    pub fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// Normalize and split `text` into sentences
    pub fn sentences(&self, text: &str) -> Vec<String> {
        let cleaned = self.normalizer.clean(text);
        self.splitter.split(&cleaned)
    }

    /// Chunk one document
    pub fn chunk_document(&self, document: &Document) -> ChunkSet {
        let sentences = self.sentences(&document.content);
        let output = ChunkBuilder::new(self.tokenizer.as_ref(), self.budget).build(&sentences);

        let chunks: Vec<Chunk> = output
            .groups
            .iter()
            .enumerate()
            .map(|(position_index, group)| {
                let text = group.text();
                Chunk {
                    token_count: self.tokenizer.count_tokens(&text),
                    char_length: text.chars().count(),
                    position_index,
                    sentence_count: group.sentences().len(),
                    overlap_sentences: group.overlap().len(),
                    text,
                }
            })
            .collect();

        let set = ChunkSet {
            source: document.identifier.clone(),
            stats: ChunkStats {
                sentences: sentences.len(),
                dropped_sentences: output.dropped.len(),
                total_tokens: chunks.iter().map(|c| c.token_count).sum(),
                tokenizer: self.tokenizer.mode(),
            },
            chunks,
        };

        if set.is_empty() {
            tracing::info!(source = %set.source, "no indexable content");
        } else {
            tracing::debug!(
                source = %set.source,
                chunks = set.len(),
                avg_tokens = format_args!("{:.0}", set.avg_tokens()),
                dropped = set.stats.dropped_sentences,
                "chunked document"
            );
        }
        set
    }

    /// Chunk raw text, returning only the chunk texts
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        let sentences = self.sentences(text);
        ChunkBuilder::new(self.tokenizer.as_ref(), self.budget)
            .build(&sentences)
            .texts()
    }
}

/// Fluent builder for [`Chunker`]
#[derive(Debug, Default)]
pub struct ChunkerBuilder {
    config: ChunkingConfig,
    tokenizer: Option<Arc<Tokenizer>>,
}

impl ChunkerBuilder {
    /// Builder starting from the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: ChunkingConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the chunk ceiling
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set the overlap budget
    pub fn overlap_tokens(mut self, overlap_tokens: usize) -> Self {
        self.config.overlap_tokens = overlap_tokens;
        self
    }

    /// Set the BPE encoding
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// Keep or flatten paragraph breaks
    pub fn preserve_paragraphs(mut self, preserve: bool) -> Self {
        self.config.preserve_paragraphs = preserve;
        self
    }

    /// Protect one more abbreviation
    pub fn abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.config.extra_abbreviations.push(abbreviation.into());
        self
    }

    /// Use a shared, already-loaded tokenizer
    pub fn tokenizer(mut self, tokenizer: Arc<Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Build the chunker
    pub fn build(self) -> Result<Chunker> {
        match self.tokenizer {
            Some(tokenizer) => Chunker::with_tokenizer(self.config, tokenizer),
            None => Chunker::with_config(self.config),
        }
    }
}
