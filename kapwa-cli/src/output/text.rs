//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use kapwa_core::ChunkSet;
use std::io::Write;

/// Plain text formatter - a metadata header line, then the chunk text
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> OutputFormatter for TextFormatter<W> {
    fn write_set(&mut self, set: &ChunkSet) -> Result<()> {
        for chunk in &set.chunks {
            writeln!(
                self.writer,
                "[{} #{}] {} tokens, {} chars",
                set.source, chunk.position_index, chunk.token_count, chunk.char_length
            )?;
            writeln!(self.writer, "{}", chunk.text)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
