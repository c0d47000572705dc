//! Core error types

use thiserror::Error;

/// Errors raised while configuring the chunking pipeline
///
/// Chunking itself never fails: oversized sentences are dropped, an
/// unavailable vocabulary downgrades to the character estimate, and empty
/// documents produce empty chunk sets. Only construction can go wrong.
#[derive(Error, Debug)]
pub enum ChunkError {
    /// Token budget violates `0 <= overlap_tokens < max_tokens`
    #[error(
        "invalid token budget: max_tokens={max_tokens}, overlap_tokens={overlap_tokens} \
         (need max_tokens > 0 and overlap_tokens < max_tokens)"
    )]
    InvalidBudget {
        /// Requested chunk ceiling
        max_tokens: usize,
        /// Requested overlap budget
        overlap_tokens: usize,
    },

    /// Configuration value is malformed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Unknown tokenizer encoding name
    #[error("unknown encoding '{name}' (expected one of: cl100k_base, o200k_base, p50k_base, r50k_base)")]
    UnknownEncoding {
        /// The name that failed to parse
        name: String,
    },

    /// Pattern compilation failed
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ChunkError>;
