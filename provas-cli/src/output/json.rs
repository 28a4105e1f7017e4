//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use provas_core::{
    Chunk, ExerciseRecord, ExtractionOutput, ExtractionStats, RawDocument, SkippedRecord,
};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs one entry per document as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    include_chunks: bool,
    documents: Vec<DocumentData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentData {
    pub source_file: String,
    pub year: String,
    pub records: Vec<ExerciseRecord>,
    pub skipped: Vec<SkippedRecord>,
    pub stats: ExtractionStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Chunk>>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool, include_chunks: bool) -> Self {
        Self {
            writer,
            pretty,
            include_chunks,
            documents: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, document: &RawDocument, output: &ExtractionOutput) -> Result<()> {
        self.documents.push(DocumentData {
            source_file: document.source_file_name.clone(),
            year: document.year.clone(),
            records: output.records.clone(),
            skipped: output.skipped.clone(),
            stats: output.stats.clone(),
            chunks: self.include_chunks.then(|| output.chunks.clone()),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    fn render(pretty: bool, include_chunks: bool) -> String {
        let (document, output) = fixtures::processed();
        let mut buffer = Vec::new();
        let mut formatter = JsonFormatter::new(&mut buffer, pretty, include_chunks);
        formatter.format_document(&document, &output).unwrap();
        formatter.finish().unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_json_is_an_array_of_documents() {
        let json = render(false, false);
        assert_eq!(json.lines().count(), 1);

        let parsed: Vec<DocumentData> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].source_file, "enem_2021.txt");
        assert_eq!(parsed[0].records[0].id, "enem_2021_2021_Q7");
        assert!(parsed[0].chunks.is_none());
        assert!(!json.contains("\"chunks\""));
    }

    #[test]
    fn test_record_type_field_and_chunks() {
        let json = render(true, true);
        assert!(json.contains("\"type\": \"multiple_choice\""));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["chunks"].as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["records"][0]["correct_alternative"], "A");
    }
}
