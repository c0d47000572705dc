//! Token counting
//!
//! Chunk sizes are measured in BPE tokens so that they line up with what an
//! embedding model will actually see. The vocabulary is loaded once per
//! [`Tokenizer`] value; when loading fails the tokenizer permanently switches
//! to a coarse character estimate (`chars / 4`) so the pipeline keeps running.

use crate::error::ChunkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::CoreBPE;

/// Anything that can measure a piece of text in tokens
///
/// Implementations must be deterministic and never fail.
pub trait TokenCounter {
    /// Number of tokens in `text`
    fn count_tokens(&self, text: &str) -> usize;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for std::sync::Arc<T> {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

/// BPE encodings bundled with `tiktoken-rs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// GPT-4 / GPT-3.5 vocabulary
    #[default]
    #[serde(rename = "cl100k_base")]
    Cl100kBase,
    /// GPT-4o vocabulary
    #[serde(rename = "o200k_base")]
    O200kBase,
    /// Codex-era vocabulary
    #[serde(rename = "p50k_base")]
    P50kBase,
    /// GPT-3 vocabulary
    #[serde(rename = "r50k_base")]
    R50kBase,
}

impl Encoding {
    /// All supported encodings
    pub const ALL: [Encoding; 4] = [
        Encoding::Cl100kBase,
        Encoding::O200kBase,
        Encoding::P50kBase,
        Encoding::R50kBase,
    ];

    /// Canonical name as used by tiktoken
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::O200kBase => "o200k_base",
            Encoding::P50kBase => "p50k_base",
            Encoding::R50kBase => "r50k_base",
        }
    }

    fn load(&self) -> Result<CoreBPE, String> {
        let loaded = match self {
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
        };
        loaded.map_err(|e| e.to_string())
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Encoding::ALL
            .into_iter()
            .find(|enc| enc.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChunkError::UnknownEncoding {
                name: s.to_string(),
            })
    }
}

/// Backing data of a [`Tokenizer`], decided once at construction
pub enum Vocabulary {
    /// BPE vocabulary loaded successfully
    Loaded {
        /// Which encoding was loaded
        encoding: Encoding,
        /// The encoder
        bpe: CoreBPE,
    },
    /// Vocabulary could not be loaded; counts are character estimates
    Unavailable {
        /// Why loading failed (empty when fallback was requested explicitly)
        reason: String,
    },
}

impl fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vocabulary::Loaded { encoding, .. } => f
                .debug_struct("Loaded")
                .field("encoding", encoding)
                .finish_non_exhaustive(),
            Vocabulary::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// How token counts were produced, for chunk metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenizerMode {
    /// Real BPE counts
    Bpe {
        /// Encoding used
        encoding: Encoding,
    },
    /// `chars / 4` approximation
    CharEstimate,
}

impl fmt::Display for TokenizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerMode::Bpe { encoding } => write!(f, "bpe:{encoding}"),
            TokenizerMode::CharEstimate => f.write_str("char_estimate"),
        }
    }
}

/// Token counter over a fixed BPE vocabulary with character fallback
///
/// Construct once and share (`Arc<Tokenizer>`); it is read-only after
/// construction.
#[derive(Debug)]
pub struct Tokenizer {
    vocabulary: Vocabulary,
}

/// Characters per token assumed by the fallback estimate
pub const CHARS_PER_TOKEN_ESTIMATE: usize = 4;

impl Tokenizer {
    /// Load the given encoding, falling back to the character estimate on failure
    pub fn load(encoding: Encoding) -> Self {
        match encoding.load() {
            Ok(bpe) => {
                tracing::debug!(encoding = %encoding, "loaded BPE vocabulary");
                Self {
                    vocabulary: Vocabulary::Loaded { encoding, bpe },
                }
            }
            Err(reason) => {
                tracing::warn!(
                    encoding = %encoding,
                    error = %reason,
                    "could not load tokenizer vocabulary, falling back to character estimation \
                     (chars / {CHARS_PER_TOKEN_ESTIMATE}); token counts are approximate"
                );
                Self {
                    vocabulary: Vocabulary::Unavailable { reason },
                }
            }
        }
    }

    /// Tokenizer that only uses the character estimate
    pub fn char_estimate() -> Self {
        Self {
            vocabulary: Vocabulary::Unavailable {
                reason: String::new(),
            },
        }
    }

    /// The backing vocabulary state
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Whether counts are character estimates
    pub fn is_fallback(&self) -> bool {
        matches!(self.vocabulary, Vocabulary::Unavailable { .. })
    }

    /// Counting mode, for metadata
    pub fn mode(&self) -> TokenizerMode {
        match &self.vocabulary {
            Vocabulary::Loaded { encoding, .. } => TokenizerMode::Bpe {
                encoding: *encoding,
            },
            Vocabulary::Unavailable { .. } => TokenizerMode::CharEstimate,
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::load(Encoding::default())
    }
}

impl TokenCounter for Tokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        match &self.vocabulary {
            Vocabulary::Loaded { bpe, .. } => bpe.encode_ordinary(text).len(),
            Vocabulary::Unavailable { .. } => estimate_tokens(text),
        }
    }
}

/// Character-based token estimate used when no vocabulary is available
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN_ESTIMATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounds_down() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefg"), 1);
        assert_eq!(estimate_tokens(&"x".repeat(400)), 100);
    }

    #[test]
    fn test_estimate_counts_chars_not_bytes() {
        // 8 chars, 10 bytes
        assert_eq!(estimate_tokens("Ñiño ñañ"), 2);
    }

    #[test]
    fn test_char_estimate_tokenizer() {
        let tokenizer = Tokenizer::char_estimate();
        assert!(tokenizer.is_fallback());
        assert!(matches!(
            tokenizer.vocabulary(),
            Vocabulary::Unavailable { reason } if reason.is_empty()
        ));
        assert_eq!(tokenizer.mode(), TokenizerMode::CharEstimate);
        assert_eq!(tokenizer.count_tokens("abcdefgh"), 2);
    }

    #[test]
    fn test_bpe_tokenizer_counts() {
        let tokenizer = Tokenizer::load(Encoding::Cl100kBase);
        assert!(!tokenizer.is_fallback());
        assert!(matches!(
            tokenizer.vocabulary(),
            Vocabulary::Loaded {
                encoding: Encoding::Cl100kBase,
                ..
            }
        ));
        assert_eq!(
            tokenizer.mode(),
            TokenizerMode::Bpe {
                encoding: Encoding::Cl100kBase
            }
        );
        assert_eq!(tokenizer.count_tokens(""), 0);
        let count = tokenizer.count_tokens("Kumusta ka, kabayan? I hope you are well.");
        assert!(count > 0);
        assert_eq!(
            count,
            tokenizer.count_tokens("Kumusta ka, kabayan? I hope you are well.")
        );
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("cl100k_base".parse::<Encoding>().unwrap(), Encoding::Cl100kBase);
        assert_eq!("O200K_BASE".parse::<Encoding>().unwrap(), Encoding::O200kBase);
        assert!(matches!(
            "gpt2".parse::<Encoding>(),
            Err(ChunkError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn test_encoding_serde_names() {
        let json = serde_json::to_string(&Encoding::P50kBase).unwrap();
        assert_eq!(json, "\"p50k_base\"");
        let back: Encoding = serde_json::from_str("\"r50k_base\"").unwrap();
        assert_eq!(back, Encoding::R50kBase);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(TokenizerMode::CharEstimate.to_string(), "char_estimate");
        assert_eq!(
            TokenizerMode::Bpe {
                encoding: Encoding::Cl100kBase
            }
            .to_string(),
            "bpe:cl100k_base"
        );
    }

    #[test]
    fn test_counter_through_references() {
        let tokenizer = std::sync::Arc::new(Tokenizer::char_estimate());
        fn measure<C: TokenCounter>(c: C) -> usize {
            c.count_tokens("12345678")
        }
        assert_eq!(measure(&*tokenizer), 2);
        assert_eq!(measure(tokenizer.clone()), 2);
    }
}
