//! Output formatting module

use anyhow::Result;
use kapwa_core::ChunkSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter: Send {
    /// Format and output the chunks of one document
    fn write_set(&mut self, set: &ChunkSet) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod jsonl;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use jsonl::JsonLinesFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Chunks separated by headers with their metadata
    Text,
    /// JSON array of chunk records
    Json,
    /// One JSON chunk record per line
    Jsonl,
    /// Markdown document grouped by source
    Markdown,
}

impl OutputFormat {
    /// All formats, in listing order
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Text,
        OutputFormat::Json,
        OutputFormat::Jsonl,
        OutputFormat::Markdown,
    ];

    /// Name accepted by `--format`
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Markdown => "markdown",
        }
    }

    /// One-line description for `kapwa list formats`
    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Text => "Chunks separated by headers with their metadata",
            OutputFormat::Json => "JSON array of chunk records",
            OutputFormat::Jsonl => "One JSON chunk record per line",
            OutputFormat::Markdown => "Markdown document grouped by source",
        }
    }

    /// Build a formatter writing to `writer`
    pub fn formatter<'a, W>(&self, writer: W, pretty_json: bool) -> Box<dyn OutputFormatter + 'a>
    where
        W: Write + Send + 'a,
    {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json)),
            OutputFormat::Jsonl => Box::new(JsonLinesFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
