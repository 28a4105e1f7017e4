//! Exercise record assembly and validation
//!
//! Records are built per question number found in a chunk, or per chunk in
//! fallback mode when the document has no question headers at all. A record
//! failing validation is discarded and reported, never repaired.

use crate::application::config::{ExtractionStats, FallbackKind, SegmenterConfig};
use crate::domain::alternatives::AlternativeExtractor;
use crate::domain::boundary::BoundaryDetector;
use crate::domain::classify::{
    classify_subject, detect_answer_key, detect_skill, detect_topics, estimate_difficulty,
    TermIndex,
};
use crate::domain::cleaning::clean_text;
use crate::domain::types::{
    Alternative, Chunk, ExerciseRecord, RawDocument, SkippedRecord, ValidationRule,
};

/// Minimum statement length in characters
pub const MIN_STATEMENT_LENGTH: usize = 50;

/// Minimum number of alternatives, and of valid ones
pub const MIN_RECORD_ALTERNATIVES: usize = 3;

/// A valid alternative must have more characters than this
pub const MIN_ALTERNATIVE_TEXT: usize = 5;

/// Value of `ExerciseRecord::exercise_type`
pub const MULTIPLE_CHOICE: &str = "multiple_choice";

/// Records and discards for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub records: Vec<ExerciseRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// One question candidate cut out of a chunk
struct Unit<'a> {
    label: String,
    /// Text after the question header
    body: &'a str,
}

/// Builds exercise records from enriched chunks
#[derive(Debug, Clone)]
pub struct ExerciseAssembler<'c> {
    config: &'c SegmenterConfig,
    detector: BoundaryDetector,
    extractor: AlternativeExtractor,
}

impl<'c> ExerciseAssembler<'c> {
    pub fn new(config: &'c SegmenterConfig) -> Self {
        Self {
            config,
            detector: BoundaryDetector::new(),
            extractor: AlternativeExtractor::new(),
        }
    }

    /// Assemble every chunk of a document
    ///
    /// `fallback_mode` is set when the document had no question header: each
    /// chunk then becomes one candidate with a `CHUNK_<n>` identifier.
    pub fn assemble(
        &self,
        document: &RawDocument,
        chunks: &[Chunk],
        fallback_mode: bool,
        stats: &mut ExtractionStats,
    ) -> Assembly {
        let mut assembly = Assembly::default();

        for (index, chunk) in chunks.iter().enumerate() {
            let units = if chunk.has_question_number() {
                self.question_units(chunk)
            } else if fallback_mode {
                vec![Unit {
                    label: format!("CHUNK_{}", index + 1),
                    body: &chunk.raw_content,
                }]
            } else {
                tracing::trace!(chunk = %chunk.metadata.id, "chunk without question skipped");
                Vec::new()
            };

            for unit in units {
                match self.build_record(document, chunk, &unit, stats) {
                    Ok(record) => assembly.records.push(record),
                    Err(skipped) => {
                        tracing::warn!(
                            question = %skipped.question_id,
                            rule = %skipped.rule,
                            detail = %skipped.detail,
                            "discarding exercise record"
                        );
                        stats.record_discard(skipped.rule);
                        assembly.skipped.push(skipped);
                    }
                }
            }
        }

        stats.records_emitted += assembly.records.len();
        assembly
    }

    /// One unit per question header inside the chunk
    fn question_units<'a>(&self, chunk: &'a Chunk) -> Vec<Unit<'a>> {
        let raw = chunk.raw_content.as_str();
        let headers: Vec<_> = self
            .detector
            .detect(raw)
            .into_iter()
            .filter(|b| b.is_question_header())
            .filter(|b| {
                b.question_number()
                    .is_some_and(|n| chunk.metadata.question_numbers.contains(&n))
            })
            .collect();

        if headers.is_empty() {
            // Numbers without a visible header: use the whole chunk for the first
            return chunk
                .metadata
                .question_numbers
                .first()
                .map(|number| Unit {
                    label: number.to_string(),
                    body: raw,
                })
                .into_iter()
                .collect();
        }

        headers
            .iter()
            .enumerate()
            .filter_map(|(i, header)| {
                let number = header.question_number()?;
                let end = headers.get(i + 1).map_or(raw.len(), |next| next.position);
                Some(Unit {
                    label: number.to_string(),
                    body: &raw[header.end()..end],
                })
            })
            .collect()
    }

    fn build_record(
        &self,
        document: &RawDocument,
        chunk: &Chunk,
        unit: &Unit<'_>,
        stats: &mut ExtractionStats,
    ) -> Result<ExerciseRecord, SkippedRecord> {
        let id = format!(
            "{}_{}_{}",
            document.source_stem(),
            document.year,
            if unit.label.starts_with("CHUNK_") {
                unit.label.clone()
            } else {
                format!("Q{}", unit.label)
            }
        );

        let split = self.extractor.split(unit.body);
        if split.style.is_none() {
            stats.record_fallback(FallbackKind::StatementOnly);
        }

        let mut statement_raw = split.statement;
        if split.style.is_none() {
            if let Some((_, key_start)) = detect_answer_key(statement_raw) {
                statement_raw = &statement_raw[..key_start];
            }
        }
        let statement = clean_text(statement_raw);
        let alternatives = split.alternatives.into_vec();

        validate(&id, &statement, &alternatives)?;

        let clean_body = clean_text(unit.body);
        let index = TermIndex::new(&clean_body);
        let subject_area = chunk
            .metadata
            .subject_area
            .clone()
            .or_else(|| classify_subject(&index, &self.config.keywords).map(str::to_string))
            .unwrap_or_else(|| self.config.default_subject_area.clone());
        let correct_alternative = detect_answer_key(unit.body)
            .map(|(letter, _)| letter)
            .filter(|letter| alternatives.iter().any(|alt| alt.letter == *letter));

        Ok(ExerciseRecord {
            id,
            subject_area,
            estimated_difficulty: estimate_difficulty(&index, statement.chars().count()),
            statement,
            alternatives,
            correct_alternative,
            topics: detect_topics(&index, &self.config.keywords),
            year: document.year.clone(),
            question_number: unit.label.clone(),
            source_file: document.source_file_name.clone(),
            associated_skill: detect_skill(unit.body).unwrap_or_default(),
            exercise_type: MULTIPLE_CHOICE.to_string(),
        })
    }
}

/// Completeness gate; the first failing rule is reported
pub fn validate(
    id: &str,
    statement: &str,
    alternatives: &[Alternative],
) -> Result<(), SkippedRecord> {
    let skipped = |rule: ValidationRule, detail: String| SkippedRecord {
        question_id: id.to_string(),
        rule,
        detail,
    };

    let statement_chars = statement.chars().count();
    if statement_chars < MIN_STATEMENT_LENGTH {
        return Err(skipped(
            ValidationRule::StatementTooShort,
            format!("statement has {statement_chars} characters, need {MIN_STATEMENT_LENGTH}"),
        ));
    }
    if alternatives.len() < MIN_RECORD_ALTERNATIVES {
        return Err(skipped(
            ValidationRule::TooFewAlternatives,
            format!(
                "found {} alternatives, need {MIN_RECORD_ALTERNATIVES}",
                alternatives.len()
            ),
        ));
    }
    let valid = alternatives
        .iter()
        .filter(|alt| alt.is_valid && alt.text.chars().count() > MIN_ALTERNATIVE_TEXT)
        .count();
    if valid < MIN_RECORD_ALTERNATIVES {
        return Err(skipped(
            ValidationRule::TooFewValidAlternatives,
            format!("{valid} usable alternatives, need {MIN_RECORD_ALTERNATIVES}"),
        ));
    }
    Ok(())
}
