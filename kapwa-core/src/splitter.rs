//! Sentence splitting for mixed Filipino/English prose
//!
//! A heuristic splitter: a sentence ends at `.`, `!` or `?` followed by
//! whitespace and an uppercase letter. It under-splits when the next sentence
//! starts in lowercase or with a digit, and over-splits after abbreviations it
//! does not know. Known abbreviations are protected in a first pass; the
//! second pass splits on the remaining terminators and on paragraph breaks.

use crate::abbreviation::{AbbreviationTrie, CUSTOM_CATEGORY};
use crate::error::Result;
use std::sync::Arc;

/// Sentence-ending punctuation
pub const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits normalized text into trimmed, non-empty sentences
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    abbreviations: Arc<AbbreviationTrie>,
}

impl SentenceSplitter {
    /// Splitter using the built-in abbreviation table
    pub fn new() -> Result<Self> {
        Ok(Self::with_abbreviations(AbbreviationTrie::builtin()?))
    }

    /// Splitter using the built-in table plus `extra` abbreviations
    pub fn with_extra<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = AbbreviationTrie::builtin()?;
        for abbr in extra {
            trie.insert(abbr.as_ref(), CUSTOM_CATEGORY)?;
        }
        Ok(Self::with_abbreviations(trie))
    }

    /// Splitter using exactly the given abbreviations
    pub fn with_abbreviations(abbreviations: AbbreviationTrie) -> Self {
        Self {
            abbreviations: Arc::new(abbreviations),
        }
    }

    /// The abbreviation table in use
    pub fn abbreviations(&self) -> &AbbreviationTrie {
        &self.abbreviations
    }

    /// Split `text` into sentences, preserving order
    pub fn split(&self, text: &str) -> Vec<String> {
        let protected = self.protected_periods(text);

        let mut sentences = Vec::new();
        for piece in split_at_terminators(text, &protected) {
            for paragraph in split_paragraphs(piece) {
                let sentence = paragraph.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
            }
        }
        sentences
    }

    /// Byte offsets of periods that close a known abbreviation, ascending
    pub fn protected_periods(&self, text: &str) -> Vec<usize> {
        text.match_indices('.')
            .filter_map(|(idx, _)| {
                let category = self.abbreviations.find_abbrev(text, idx + 1)?;
                tracing::trace!(offset = idx, category, "protected abbreviation period");
                Some(idx)
            })
            .collect()
    }
}

/// Cut after every unprotected terminator that is followed by whitespace and
/// an uppercase letter
fn split_at_terminators<'a>(text: &'a str, protected: &[usize]) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if !TERMINATORS.contains(&ch) || protected.binary_search(&idx).is_ok() {
            continue;
        }
        let end = idx + ch.len_utf8();
        let rest = &text[end..];
        let after_space = rest.trim_start();
        let has_space = after_space.len() < rest.len();
        if has_space && after_space.chars().next().is_some_and(char::is_uppercase) {
            pieces.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Split at blank lines (a newline, optional whitespace, another newline)
fn split_paragraphs(piece: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut para_start: Option<usize> = None;
    let mut para_end = 0;
    let mut offset = 0;

    for line in piece.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        if line.trim().is_empty() {
            if line.ends_with('\n') && line_start > 0 {
                if let Some(start) = para_start.take() {
                    paragraphs.push(&piece[start..para_end]);
                }
            }
            continue;
        }
        para_start.get_or_insert(line_start);
        para_end = line_start + line.trim_end().len();
    }

    if let Some(start) = para_start {
        paragraphs.push(&piece[start..para_end]);
    }
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> SentenceSplitter {
        SentenceSplitter::new().unwrap()
    }

    #[test]
    fn test_basic_split() {
        let sentences = splitter().split("Kumusta ka? Mabuti naman! Salamat sa tanong.");
        assert_eq!(
            sentences,
            vec!["Kumusta ka?", "Mabuti naman!", "Salamat sa tanong."]
        );
    }

    #[test]
    fn test_abbreviations_are_not_boundaries() {
        let sentences = splitter()
            .split("Dr. Reyes works at sea. Mr. Cruz is an OFW in Dubai. Pamilya niya ay masaya.");
        assert_eq!(
            sentences,
            vec![
                "Dr. Reyes works at sea.",
                "Mr. Cruz is an OFW in Dubai.",
                "Pamilya niya ay masaya."
            ]
        );
    }

    #[test]
    fn test_lowercase_after_period_does_not_split() {
        let sentences = splitter().split("Umalis siya. tapos bumalik. 2 beses pa.");
        assert_eq!(sentences, vec!["Umalis siya. tapos bumalik. 2 beses pa."]);
    }

    #[test]
    fn test_unicode_uppercase_starts_sentence() {
        let sentences = splitter().split("Tapos na. Ñanay ang tawag niya.");
        assert_eq!(sentences, vec!["Tapos na.", "Ñanay ang tawag niya."]);
    }

    #[test]
    fn test_unknown_abbreviation_over_splits() {
        let sentences = splitter().split("Nakausap ko si Kap. Santos kahapon.");
        assert_eq!(sentences, vec!["Nakausap ko si Kap.", "Santos kahapon."]);
    }

    #[test]
    fn test_extra_abbreviation_protects() {
        let splitter = SentenceSplitter::with_extra(["Kap"]).unwrap();
        let sentences = splitter.split("Nakausap ko si Kap. Santos kahapon.");
        assert_eq!(sentences, vec!["Nakausap ko si Kap. Santos kahapon."]);
    }

    #[test]
    fn test_multi_period_abbreviation() {
        let sentences =
            splitter().split("Ang meeting ay 9 a.m. Bukas naman ay 3 p.m. Tuloy tayo.");
        assert_eq!(
            sentences,
            vec!["Ang meeting ay 9 a.m. Bukas naman ay 3 p.m. Tuloy tayo."]
        );
    }

    #[test]
    fn test_paragraph_breaks_split() {
        let sentences = splitter().split("Unang talata walang tuldok\n\nikalawang talata");
        assert_eq!(sentences, vec!["Unang talata walang tuldok", "ikalawang talata"]);

        let sentences = splitter().split("isa\n \t\ndalawa\ntatlo");
        assert_eq!(sentences, vec!["isa", "dalawa\ntatlo"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(splitter().split("").is_empty());
        assert!(splitter().split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_terminator_without_following_text() {
        assert_eq!(splitter().split("Tapos na. "), vec!["Tapos na."]);
        assert_eq!(splitter().split("Ano?!  Sigurado ka?"), vec!["Ano?!", "Sigurado ka?"]);
    }

    #[test]
    fn test_protected_periods_offsets() {
        let text = "Si Dr. Cruz at Mr. Lim.";
        assert_eq!(splitter().protected_periods(text), vec![5, 17]);
    }

    #[test]
    fn test_split_paragraphs_helper() {
        assert_eq!(split_paragraphs("a\n\n\n\nb"), vec!["a", "b"]);
        assert_eq!(split_paragraphs("\n\na"), vec!["a"]);
        assert_eq!(split_paragraphs("a\n"), vec!["a"]);
        assert!(split_paragraphs("").is_empty());
    }
}
