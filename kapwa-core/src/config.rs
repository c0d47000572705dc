//! Chunking configuration

use crate::error::{ChunkError, Result};
use crate::tokenizer::Encoding;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration constants
pub mod defaults {
    /// Chunk ceiling in tokens; fits most sentence-embedding models
    pub const MAX_TOKENS: usize = 400;

    /// Overlap budget between consecutive chunks in tokens
    pub const OVERLAP_TOKENS: usize = 50;

    /// Keep paragraph breaks through normalization
    pub const PRESERVE_PARAGRAPHS: bool = true;
}

/// Validated chunk size limits
///
/// Guarantees `max_tokens > 0` and `overlap_tokens < max_tokens`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    max_tokens: usize,
    overlap_tokens: usize,
}

impl TokenBudget {
    /// Validate and create a budget
    pub fn new(max_tokens: usize, overlap_tokens: usize) -> Result<Self> {
        if max_tokens == 0 || overlap_tokens >= max_tokens {
            return Err(ChunkError::InvalidBudget {
                max_tokens,
                overlap_tokens,
            });
        }
        Ok(Self {
            max_tokens,
            overlap_tokens,
        })
    }

    /// Largest chunk in tokens
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Largest overlap seed in tokens
    pub fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            max_tokens: defaults::MAX_TOKENS,
            overlap_tokens: defaults::OVERLAP_TOKENS,
        }
    }
}

/// Chunking configuration, usually the `[chunking]` table of a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkingConfig {
    /// Chunk ceiling in tokens
    pub max_tokens: usize,
    /// Overlap budget in tokens
    pub overlap_tokens: usize,
    /// BPE encoding used for counting
    pub encoding: Encoding,
    /// Keep paragraph breaks so they split sentences
    pub preserve_paragraphs: bool,
    /// Abbreviations protected in addition to the built-in table
    pub extra_abbreviations: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: defaults::MAX_TOKENS,
            overlap_tokens: defaults::OVERLAP_TOKENS,
            encoding: Encoding::default(),
            preserve_paragraphs: defaults::PRESERVE_PARAGRAPHS,
            extra_abbreviations: Vec::new(),
        }
    }
}

impl ChunkingConfig {
    /// Parse from a TOML string holding the fields at top level
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ChunkError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&source)
    }

    /// Validated token budget
    pub fn budget(&self) -> Result<TokenBudget> {
        TokenBudget::new(self.max_tokens, self.overlap_tokens)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.budget()?;
        if let Some(bad) = self
            .extra_abbreviations
            .iter()
            .find(|abbr| abbr.trim().trim_end_matches('.').is_empty())
        {
            return Err(ChunkError::Config(format!(
                "empty entry in extra_abbreviations: {bad:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_validation() {
        assert!(TokenBudget::new(400, 50).is_ok());
        assert!(TokenBudget::new(400, 0).is_ok());
        assert!(TokenBudget::new(1, 0).is_ok());
        assert!(matches!(
            TokenBudget::new(0, 0),
            Err(ChunkError::InvalidBudget { .. })
        ));
        assert!(matches!(
            TokenBudget::new(100, 100),
            Err(ChunkError::InvalidBudget { .. })
        ));
        assert!(TokenBudget::new(100, 150).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ChunkingConfig::default();
        assert_eq!(config.max_tokens, 400);
        assert_eq!(config.overlap_tokens, 50);
        assert_eq!(config.encoding, Encoding::Cl100kBase);
        assert!(config.preserve_paragraphs);
        assert_eq!(config.budget().unwrap(), TokenBudget::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ChunkingConfig::from_toml(
            r#"
max_tokens = 256
encoding = "o200k_base"
extra_abbreviations = ["Kap", "Brgy"]
"#,
        )
        .unwrap();
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.overlap_tokens, 50);
        assert_eq!(config.encoding, Encoding::O200kBase);
        assert_eq!(config.extra_abbreviations, vec!["Kap", "Brgy"]);
    }

    #[test]
    fn test_from_toml_rejects_bad_budget() {
        let err = ChunkingConfig::from_toml("max_tokens = 40\noverlap_tokens = 40").unwrap_err();
        assert!(matches!(err, ChunkError::InvalidBudget { .. }));
    }

    #[test]
    fn test_from_toml_rejects_unknown_fields() {
        let err = ChunkingConfig::from_toml("max_token = 40").unwrap_err();
        assert!(matches!(err, ChunkError::Toml(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_encoding() {
        assert!(ChunkingConfig::from_toml("encoding = \"gpt2\"").is_err());
    }

    #[test]
    fn test_rejects_blank_abbreviation() {
        let config = ChunkingConfig {
            extra_abbreviations: vec![" . ".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ChunkError::Config(_))));
    }

    #[test]
    fn test_serializes_round_trip_through_toml() {
        let config = ChunkingConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("max_tokens = 400"));
        assert!(text.contains("encoding = \"cl100k_base\""));
    }
}
