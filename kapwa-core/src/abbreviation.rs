//! Abbreviation trie for backward scanning
//!
//! Given the position just past a period, the trie answers whether the word
//! ending at that period is a known abbreviation. Lookups walk the word once
//! and do not allocate.

use crate::error::{ChunkError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Built-in abbreviation table
const EMBEDDED_TABLE: &str = include_str!("../configs/abbreviations.toml");

/// Category assigned to abbreviations added through configuration
pub const CUSTOM_CATEGORY: &str = "custom";

#[derive(Debug, Deserialize)]
struct AbbreviationTable {
    abbreviations: BTreeMap<String, Vec<String>>,
}

/// Trie node; children are indices into the node arena
#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<char, u32>,
    category: Option<usize>,
}

/// Case-insensitive abbreviation trie
#[derive(Debug, Clone)]
pub struct AbbreviationTrie {
    nodes: Vec<TrieNode>,
    categories: Vec<String>,
    len: usize,
}

impl Default for AbbreviationTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl AbbreviationTrie {
    /// Create an empty trie
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            categories: Vec::new(),
            len: 0,
        }
    }

    /// Trie holding the built-in abbreviation table
    pub fn builtin() -> Result<Self> {
        Self::from_toml(EMBEDDED_TABLE)
    }

    /// Parse an `[abbreviations]` table of `category = ["Abbr", ...]` entries
    pub fn from_toml(source: &str) -> Result<Self> {
        let table: AbbreviationTable = toml::from_str(source)?;
        let mut trie = Self::new();
        for (category, entries) in table.abbreviations {
            for abbr in entries {
                trie.insert(&abbr, &category)?;
            }
        }
        Ok(trie)
    }

    /// Insert an abbreviation (without its final period)
    pub fn insert(&mut self, abbreviation: &str, category: &str) -> Result<()> {
        let abbreviation = abbreviation.trim().trim_end_matches('.');
        if abbreviation.is_empty() || !abbreviation.chars().all(is_word_char) {
            return Err(ChunkError::Config(format!(
                "invalid abbreviation '{abbreviation}' (letters, digits and inner periods only)"
            )));
        }

        let category_idx = match self.categories.iter().position(|c| c == category) {
            Some(idx) => idx,
            None => {
                self.categories.push(category.to_string());
                self.categories.len() - 1
            }
        };

        let mut current = 0usize;
        for ch in abbreviation.chars().flat_map(char::to_lowercase) {
            current = match self.nodes[current].children.get(&ch) {
                Some(&next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(ch, next as u32);
                    next
                }
            };
        }

        let node = &mut self.nodes[current];
        if node.category.is_none() {
            self.len += 1;
        }
        node.category = Some(category_idx);
        Ok(())
    }

    /// Number of distinct abbreviations
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the trie holds no abbreviations
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Category of `word` if it is a known abbreviation
    pub fn lookup(&self, word: &str) -> Option<&str> {
        let mut current = 0usize;
        for ch in word.chars().flat_map(char::to_lowercase) {
            current = *self.nodes[current].children.get(&ch)? as usize;
        }
        self.nodes[current]
            .category
            .map(|idx| self.categories[idx].as_str())
    }

    /// Find an abbreviation ending at `pos` (backwards scan)
    ///
    /// `pos` is the byte offset just past a period. Returns the category when
    /// the whole word before that period is a known abbreviation.
    pub fn find_abbrev(&self, text: &str, pos: usize) -> Option<&str> {
        if pos == 0 || pos > text.len() || !text.is_char_boundary(pos) {
            return None;
        }
        let before = text[..pos].strip_suffix('.')?;

        let word_start = before
            .char_indices()
            .rev()
            .find(|&(_, ch)| !is_word_char(ch))
            .map(|(idx, ch)| idx + ch.len_utf8())
            .unwrap_or(0);

        let word = &before[word_start..];
        if word.is_empty() {
            return None;
        }
        self.lookup(word)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_abbreviations() {
        let mut trie = AbbreviationTrie::new();
        trie.insert("Dr", "titles").unwrap();
        trie.insert("Mr", "titles").unwrap();
        trie.insert("a.m", "time").unwrap();

        assert_eq!(trie.find_abbrev("Dr.", 3), Some("titles"));
        assert_eq!(trie.find_abbrev("Hello Mr.", 9), Some("titles"));
        assert_eq!(trie.find_abbrev("at 8 a.m.", 9), Some("time"));
        assert_eq!(trie.find_abbrev("Ms.", 3), None);
    }

    #[test]
    fn test_whole_word_only() {
        let mut trie = AbbreviationTrie::new();
        trie.insert("Dr", "titles").unwrap();

        assert_eq!(trie.find_abbrev("Padr.", 5), None);
        assert_eq!(trie.find_abbrev("(Dr.", 4), Some("titles"));
        assert_eq!(trie.find_abbrev("\"Dr.", 4), Some("titles"));
        assert_eq!(trie.find_abbrev("si-Dr.", 6), Some("titles"));
    }

    #[test]
    fn test_case_insensitive() {
        let mut trie = AbbreviationTrie::new();
        trie.insert("Dr", "titles").unwrap();

        assert!(trie.find_abbrev("dr.", 3).is_some());
        assert!(trie.find_abbrev("DR.", 3).is_some());
        assert!(trie.find_abbrev("Dr.", 3).is_some());
    }

    #[test]
    fn test_position_must_follow_period() {
        let mut trie = AbbreviationTrie::new();
        trie.insert("Dr", "titles").unwrap();

        assert_eq!(trie.find_abbrev("Dr.", 2), None);
        assert_eq!(trie.find_abbrev("Dr.", 0), None);
        assert_eq!(trie.find_abbrev("Dr.", 10), None);
        // Not on a char boundary
        assert_eq!(trie.find_abbrev("Ñ.", 1), None);
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        let mut trie = AbbreviationTrie::new();
        trie.insert("Ph.D", "degrees").unwrap();

        assert!(trie.find_abbrev("a Ph.D.", 7).is_some());
        assert!(trie.find_abbrev("a Ph.", 5).is_none());
    }

    #[test]
    fn test_builtin_table_loads() {
        let trie = AbbreviationTrie::builtin().unwrap();
        assert!(trie.len() >= 30);
        assert_eq!(trie.lookup("mr"), Some("titles"));
        assert_eq!(trie.lookup("P.M"), Some("time"));
        assert_eq!(trie.lookup("atty"), Some("filipino"));
        assert_eq!(trie.lookup("ofw"), None);
    }

    #[test]
    fn test_insert_rejects_bad_entries() {
        let mut trie = AbbreviationTrie::new();
        assert!(trie.insert("", CUSTOM_CATEGORY).is_err());
        assert!(trie.insert("Sr Dr", CUSTOM_CATEGORY).is_err());
        // Trailing period is tolerated
        trie.insert("Kgg.", CUSTOM_CATEGORY).unwrap();
        assert_eq!(trie.lookup("kgg"), Some(CUSTOM_CATEGORY));
    }

    #[test]
    fn test_duplicate_insert_counts_once() {
        let mut trie = AbbreviationTrie::new();
        trie.insert("Dr", "titles").unwrap();
        trie.insert("DR", "titles").unwrap();
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_from_toml_rejects_malformed() {
        assert!(AbbreviationTrie::from_toml("abbreviations = 3").is_err());
    }
}
