//! Token-bounded chunk assembly with sentence-level overlap
//!
//! The builder scans sentences in order, packing them into a buffer until the
//! next sentence would push the joined buffer text past `max_tokens`. The buffer is then
//! finalized and the next one is seeded with the trailing sentences of the
//! finalized buffer that fit in the overlap budget.
//!
//! A sentence that alone exceeds `max_tokens` cannot fit in any chunk and is
//! dropped with a warning. This loses information on purpose: the caller gets
//! bounded chunks or nothing, never an oversized one.

use crate::config::TokenBudget;
use crate::error::Result;
use crate::tokenizer::TokenCounter;
use crate::types::Sentence;

/// Characters of a dropped sentence shown in the diagnostic
const PREVIEW_CHARS: usize = 100;

/// Sentences that make up one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceGroup {
    sentences: Vec<Sentence>,
    overlap: usize,
}

impl SentenceGroup {
    /// All sentences, overlap seed first
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Leading sentences carried over from the previous group
    pub fn overlap(&self) -> &[Sentence] {
        &self.sentences[..self.overlap]
    }

    /// Sum of sentence token counts
    pub fn token_sum(&self) -> usize {
        self.sentences.iter().map(|s| s.token_count).sum()
    }

    /// Sentences joined by single spaces
    pub fn text(&self) -> String {
        join_sentences(&self.sentences)
    }
}

/// Sentence that was too large for any chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedSentence {
    /// Index of the sentence in the input sequence
    pub index: usize,
    /// Its token count
    pub token_count: usize,
}

/// Result of one build pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    /// Chunks in document order
    pub groups: Vec<SentenceGroup>,
    /// Sentences left out of every chunk
    pub dropped: Vec<DroppedSentence>,
}

impl BuildOutput {
    /// Chunk texts in order
    pub fn texts(&self) -> Vec<String> {
        self.groups.iter().map(SentenceGroup::text).collect()
    }
}

/// Packs sentences into overlapping chunks under a token budget
#[derive(Debug, Clone)]
pub struct ChunkBuilder<C> {
    counter: C,
    budget: TokenBudget,
}

impl<C: TokenCounter> ChunkBuilder<C> {
    /// Create a builder measuring sentences with `counter`
    pub fn new(counter: C, budget: TokenBudget) -> Self {
        Self { counter, budget }
    }

    /// The budget in use
    pub fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// Build chunks from sentences in order
    ///
    /// Fit is decided on the joined text, so every group's `text()` measures
    /// at most `max_tokens` with the same counter.
    pub fn build<S: AsRef<str>>(&self, sentences: &[S]) -> BuildOutput {
        let max_tokens = self.budget.max_tokens();
        let mut output = BuildOutput::default();
        let mut current: Vec<Sentence> = Vec::new();
        let mut current_text = String::new();
        let mut current_overlap = 0;

        for (index, text) in sentences.iter().enumerate() {
            let text = text.as_ref();
            let token_count = self.counter.count_tokens(text);

            if token_count > max_tokens {
                tracing::warn!(
                    index,
                    tokens = token_count,
                    max_tokens,
                    preview = %preview(text),
                    "skipping sentence longer than the chunk limit"
                );
                output.dropped.push(DroppedSentence { index, token_count });
                continue;
            }

            let sentence = Sentence {
                text: text.to_string(),
                token_count,
            };

            let candidate = if current.is_empty() {
                sentence.text.clone()
            } else {
                format!("{current_text} {}", sentence.text)
            };

            if !current.is_empty() && self.counter.count_tokens(&candidate) > max_tokens {
                let seed = self.seed_for(&current, &sentence);
                let finished = std::mem::take(&mut current);
                output.groups.push(SentenceGroup {
                    sentences: finished,
                    overlap: current_overlap,
                });

                current_overlap = seed.len();
                current = seed;
                current.push(sentence);
                current_text = join_sentences(&current);
            } else {
                current_text = candidate;
                current.push(sentence);
            }
        }

        if !current.is_empty() {
            output.groups.push(SentenceGroup {
                sentences: current,
                overlap: current_overlap,
            });
        }

        tracing::trace!(
            chunks = output.groups.len(),
            dropped = output.dropped.len(),
            "built chunks"
        );
        output
    }

    /// Overlap seed for the group that starts with `incoming`
    ///
    /// Takes the trailing sentences within the overlap budget, then drops
    /// leading seed sentences until seed plus `incoming` fits `max_tokens`.
    fn seed_for(&self, buffer: &[Sentence], incoming: &Sentence) -> Vec<Sentence> {
        let max_tokens = self.budget.max_tokens();
        let budget = self
            .budget
            .overlap_tokens()
            .min(max_tokens - incoming.token_count);
        let mut seed = overlap_seed(buffer, budget);

        while !seed.is_empty() {
            let mut text = join_sentences(&seed);
            text.push(' ');
            text.push_str(&incoming.text);
            if self.counter.count_tokens(&text) <= max_tokens {
                break;
            }
            seed.remove(0);
        }
        seed
    }
}

/// Trailing sentences of `buffer` whose token total stays within `budget`
///
/// Walks backwards and stops at the first sentence that would exceed the
/// budget; the result keeps the original order.
pub fn overlap_seed(buffer: &[Sentence], budget: usize) -> Vec<Sentence> {
    let mut used = 0;
    let take = buffer
        .iter()
        .rev()
        .take_while(|sentence| {
            used += sentence.token_count;
            used <= budget
        })
        .count();
    buffer[buffer.len() - take..].to_vec()
}

/// Chunk texts for `sentences` under the given limits
///
/// Fails only when the limits are inconsistent (`max_tokens == 0` or
/// `overlap_tokens >= max_tokens`).
pub fn build_chunks<S, C>(
    sentences: &[S],
    counter: &C,
    max_tokens: usize,
    overlap_tokens: usize,
) -> Result<Vec<String>>
where
    S: AsRef<str>,
    C: TokenCounter + ?Sized,
{
    let budget = TokenBudget::new(max_tokens, overlap_tokens)?;
    Ok(ChunkBuilder::new(counter, budget).build(sentences).texts())
}

fn join_sentences(sentences: &[Sentence]) -> String {
    let mut text = String::with_capacity(sentences.iter().map(|s| s.text.len() + 1).sum());
    for (i, sentence) in sentences.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(&sentence.text);
    }
    text
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
