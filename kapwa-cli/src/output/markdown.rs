//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use kapwa_core::ChunkSet;
use std::io::Write;

/// Markdown formatter - a section per source, a subsection per chunk
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    chunk_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunk_count: 0,
        }
    }
}

impl<W: Write + Send> OutputFormatter for MarkdownFormatter<W> {
    fn write_set(&mut self, set: &ChunkSet) -> Result<()> {
        if set.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## {}", set.source)?;
        writeln!(self.writer)?;
        for chunk in &set.chunks {
            self.chunk_count += 1;
            writeln!(
                self.writer,
                "### Chunk {} ({} tokens)",
                chunk.position_index, chunk.token_count
            )?;
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", chunk.text)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total chunks: {}*", self.chunk_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
