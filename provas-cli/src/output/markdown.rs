//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use provas_core::{ExtractionOutput, RawDocument};
use std::io::Write;

/// Markdown formatter - one section per exercise record
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    include_chunks: bool,
    record_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W, include_chunks: bool) -> Self {
        Self {
            writer,
            include_chunks,
            record_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_document(&mut self, document: &RawDocument, output: &ExtractionOutput) -> Result<()> {
        writeln!(self.writer, "# {}", document.source_file_name)?;
        writeln!(self.writer)?;

        for record in &output.records {
            self.record_count += 1;
            writeln!(self.writer, "## {}", record.id)?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "**Area:** {} | **Difficulty:** {:?} | **Year:** {}",
                record.subject_area, record.estimated_difficulty, record.year
            )?;
            if !record.topics.is_empty() {
                writeln!(self.writer, "**Topics:** {}", record.topics.join(", "))?;
            }
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", record.statement)?;
            writeln!(self.writer)?;
            for alternative in &record.alternatives {
                let text = if alternative.is_valid {
                    alternative.text.as_str()
                } else {
                    "*(unreadable)*"
                };
                let correct = record.correct_alternative == Some(alternative.letter);
                let check = if correct { " ✓" } else { "" };
                writeln!(self.writer, "- **{})** {text}{check}", alternative.letter)?;
            }
            writeln!(self.writer)?;
        }

        if !output.skipped.is_empty() {
            writeln!(self.writer, "### Skipped")?;
            writeln!(self.writer)?;
            for skipped in &output.skipped {
                writeln!(
                    self.writer,
                    "- `{}`: {} ({})",
                    skipped.question_id, skipped.rule, skipped.detail
                )?;
            }
            writeln!(self.writer)?;
        }

        if self.include_chunks {
            writeln!(self.writer, "### Chunks")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| id | span | type | score |")?;
            writeln!(self.writer, "|----|------|------|-------|")?;
            for chunk in &output.chunks {
                writeln!(
                    self.writer,
                    "| {} | {}..{} | {:?} | {:.2} |",
                    chunk.metadata.id,
                    chunk.start(),
                    chunk.end(),
                    chunk.metadata.chunk_type,
                    chunk.quality_score
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total records: {}*", self.record_count)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    #[test]
    fn test_markdown_sections() {
        let (document, output) = fixtures::processed();
        let mut buffer = Vec::new();
        let mut formatter = MarkdownFormatter::new(&mut buffer, true);
        formatter.format_document(&document, &output).unwrap();
        formatter.finish().unwrap();
        let markdown = String::from_utf8(buffer).unwrap();

        assert!(markdown.starts_with("# enem_2021.txt\n"));
        assert!(markdown.contains("## enem_2021_2021_Q7"));
        assert!(markdown.contains("- **A)** A produção cresceu mais que a área ✓"));
        assert!(markdown.contains("- **C)** *(unreadable)*"));
        assert!(markdown.contains("| chunk_1 | 0.."));
        assert!(markdown.ends_with("*Total records: 1*\n"));
    }
}
