//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use provas_core::{ExtractionOutput, RawDocument};
use std::io::Write;

/// Plain text formatter - one block per exercise record
pub struct TextFormatter<W: Write> {
    writer: W,
    include_chunks: bool,
    records: usize,
    skipped: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, include_chunks: bool) -> Self {
        Self {
            writer,
            include_chunks,
            records: 0,
            skipped: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, document: &RawDocument, output: &ExtractionOutput) -> Result<()> {
        writeln!(
            self.writer,
            "# {} ({}) - strategy: {}",
            document.source_file_name, document.year, output.stats.applied_strategy
        )?;

        if self.include_chunks {
            for chunk in &output.chunks {
                writeln!(
                    self.writer,
                    "[{}] {}..{} {:?} score={:.2}",
                    chunk.metadata.id,
                    chunk.start(),
                    chunk.end(),
                    chunk.metadata.chunk_type,
                    chunk.quality_score
                )?;
            }
            writeln!(self.writer)?;
        }

        for record in &output.records {
            writeln!(
                self.writer,
                "{} | {} | {:?}",
                record.id, record.subject_area, record.estimated_difficulty
            )?;
            writeln!(self.writer, "{}", record.statement)?;
            for alternative in &record.alternatives {
                let marker = if alternative.is_valid { "" } else { " [invalid]" };
                writeln!(self.writer, "  {}) {}{marker}", alternative.letter, alternative.text)?;
            }
            if let Some(letter) = record.correct_alternative {
                writeln!(self.writer, "  Answer: {letter}")?;
            }
            writeln!(self.writer)?;
        }

        for skipped in &output.skipped {
            writeln!(
                self.writer,
                "skipped {}: {} ({})",
                skipped.question_id, skipped.rule, skipped.detail
            )?;
        }

        self.records += output.records.len();
        self.skipped += output.skipped.len();
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(
            self.writer,
            "{} records, {} skipped",
            self.records, self.skipped
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
