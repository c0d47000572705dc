//! JSON Lines output formatter

use super::OutputFormatter;
use anyhow::Result;
use kapwa_core::ChunkSet;
use std::io::Write;

/// JSON Lines formatter - one record per line, written as it arrives
pub struct JsonLinesFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesFormatter<W> {
    /// Create a new JSON Lines formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> OutputFormatter for JsonLinesFormatter<W> {
    fn write_set(&mut self, set: &ChunkSet) -> Result<()> {
        for record in set.records() {
            serde_json::to_writer(&mut self.writer, &record)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
