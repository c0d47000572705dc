//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use kapwa_core::ChunkSet;
use serde_json::Value;
use std::io::Write;

/// JSON formatter - outputs all chunk records as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    records: Vec<Value>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            records: Vec::new(),
        }
    }
}

impl<W: Write + Send> OutputFormatter for JsonFormatter<W> {
    fn write_set(&mut self, set: &ChunkSet) -> Result<()> {
        for record in set.records() {
            self.records.push(serde_json::to_value(record)?);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.records)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_set;

    fn render(pretty: bool) -> String {
        let mut buffer = Vec::new();
        {
            let mut formatter = JsonFormatter::new(&mut buffer, pretty);
            formatter.write_set(&sample_set("a.txt", &["Una ito."])).unwrap();
            formatter.write_set(&sample_set("b.txt", &["Isa.", "Dalawa."])).unwrap();
            formatter.finish().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_records_across_documents() {
        let parsed: Value = serde_json::from_str(&render(true)).unwrap();
        let records = parsed.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["source"], "a.txt");
        assert_eq!(records[2]["source"], "b.txt");
        assert_eq!(records[2]["chunk_id"], 1);
        assert_eq!(records[2]["text"], "Dalawa.");
        assert_eq!(records[2]["char_length"], 7);
    }

    #[test]
    fn test_compact_output_is_single_line() {
        let output = render(false);
        assert_eq!(output.lines().count(), 1);
        assert!(render(true).lines().count() > 1);
    }

    #[test]
    fn test_empty_output_is_empty_array() {
        let mut buffer = Vec::new();
        JsonFormatter::new(&mut buffer, false).finish().unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "[]\n");
    }
}
