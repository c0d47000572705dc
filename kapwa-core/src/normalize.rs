//! Text normalization
//!
//! Cleans raw document text before sentence splitting. The rules run in a
//! fixed order because later rules assume earlier ones already ran:
//!
//! 1. whitespace runs collapse to one space (or to a paragraph break)
//! 2. numeric citation markers such as `[12]` are removed
//! 3. Windows-1252 mojibake for curly quotes and dashes is repaired
//! 4. runs of three or more periods become `...`
//! 5. the result is trimmed
//!
//! [`TextNormalizer::clean`] is idempotent.

use crate::error::Result;
use regex::Regex;

/// Paragraph separator kept by normalization when paragraphs are preserved
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// UTF-8 punctuation decoded as Windows-1252, longest sequences first
const MOJIBAKE: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "'"),   // ’
    ("\u{e2}\u{20ac}\u{2dc}", "'"),    // ‘
    ("\u{e2}\u{20ac}\u{153}", "\""),   // “
    ("\u{e2}\u{20ac}\u{9d}", "\""),    // ”
    ("\u{e2}\u{20ac}\u{201d}", "-"),   // em dash
    ("\u{e2}\u{20ac}\u{201c}", "-"),   // en dash
    ("\u{e2}\u{20ac}\u{a6}", "..."),   // …
    ("\u{e2}\u{20ac}", "\""),
];

/// Cleans raw text for sentence splitting
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    whitespace: Regex,
    citation: Regex,
    periods: Regex,
    preserve_paragraphs: bool,
}

impl TextNormalizer {
    /// Create a normalizer
    ///
    /// With `preserve_paragraphs` a whitespace run that contains a blank line
    /// collapses to [`PARAGRAPH_BREAK`] instead of a single space, so the
    /// sentence splitter can still see paragraph boundaries.
    pub fn new(preserve_paragraphs: bool) -> Result<Self> {
        Ok(Self {
            whitespace: Regex::new(r"\s+")?,
            citation: Regex::new(r"\[\d+\]")?,
            periods: Regex::new(r"\.{3,}")?,
            preserve_paragraphs,
        })
    }

    /// Whether paragraph breaks survive normalization
    pub fn preserves_paragraphs(&self) -> bool {
        self.preserve_paragraphs
    }

    /// Apply all normalization rules in order
    pub fn clean(&self, text: &str) -> String {
        let text = self.collapse_whitespace(text);
        let text = self.remove_citations(text);
        let text = repair_mojibake(text);
        let text = self.periods.replace_all(&text, "...");
        text.trim().to_string()
    }

    fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace
            .replace_all(text, |caps: &regex::Captures<'_>| {
                if self.preserve_paragraphs && caps[0].matches('\n').count() >= 2 {
                    PARAGRAPH_BREAK
                } else {
                    " "
                }
            })
            .into_owned()
    }

    fn remove_citations(&self, mut text: String) -> String {
        if !self.citation.is_match(&text) {
            return text;
        }
        // Removal can expose new markers, e.g. "[1[2]]"
        while self.citation.is_match(&text) {
            text = self.citation.replace_all(&text, "").into_owned();
        }
        self.collapse_whitespace(&text)
    }
}

fn repair_mojibake(mut text: String) -> String {
    if !text.contains('\u{e2}') {
        return text;
    }
    for (broken, fixed) in MOJIBAKE {
        if text.contains(broken) {
            text = text.replace(broken, fixed);
        }
    }
    text
}
