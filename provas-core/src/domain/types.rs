//! Value types shared by every pipeline stage
//!
//! Each stage owns what it produces. Later stages copy and transform these
//! values; nothing here carries back-pointers into earlier stages.

use crate::domain::cleaning::clean_text;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Layout information attached to a block of the extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutHint {
    /// Byte offset where the block starts in the document text
    pub position: usize,
    /// Font size reported by the extractor, when known
    pub font_size: Option<f32>,
    /// Whether the block came from a scanned page (OCR output)
    pub is_scanned: bool,
}

/// Immutable input handed over by the extraction collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Full extracted text
    pub text: String,
    /// Exam year, e.g. "2019"
    pub year: String,
    /// File the text was extracted from
    pub source_file_name: String,
    /// Per-block layout hints, ordered by position
    #[serde(default)]
    pub layout_hints: Vec<LayoutHint>,
}

impl RawDocument {
    /// Create a document without layout hints
    pub fn new(
        text: impl Into<String>,
        year: impl Into<String>,
        source_file_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            year: year.into(),
            source_file_name: source_file_name.into(),
            layout_hints: Vec::new(),
        }
    }

    /// Attach layout hints, keeping them sorted by position
    pub fn with_layout_hints(mut self, mut hints: Vec<LayoutHint>) -> Self {
        hints.sort_by_key(|hint| hint.position);
        self.layout_hints = hints;
        self
    }

    /// Whether the block covering `position` was flagged as scanned
    pub fn is_scanned_at(&self, position: usize) -> bool {
        self.layout_hints
            .iter()
            .take_while(|hint| hint.position <= position)
            .last()
            .map(|hint| hint.is_scanned)
            .unwrap_or(false)
    }

    /// File name without directories or extension, used to build record ids
    pub fn source_stem(&self) -> &str {
        let name = self
            .source_file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.source_file_name);
        match name.rfind('.') {
            Some(dot) if dot > 0 => &name[..dot],
            _ => name,
        }
    }
}

/// Confidence tier of a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryCategory {
    Strong,
    Medium,
    Weak,
}

impl BoundaryCategory {
    /// Sort rank used for tie-breaks (lower wins)
    pub fn rank(self) -> u8 {
        match self {
            BoundaryCategory::Strong => 0,
            BoundaryCategory::Medium => 1,
            BoundaryCategory::Weak => 2,
        }
    }
}

/// What kind of structural marker a boundary was produced by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// "QUESTÃO 91"
    QuestionHeader,
    /// Exam area header such as "MATEMÁTICA E SUAS TECNOLOGIAS"
    SubjectSection,
    /// Booklet or exam-day marker
    ExamSection,
    /// "texto ... questões 91 a 93"
    SharedContext,
    /// Instructional opener ("considere", "observe")
    Instruction,
    /// Concluding connective ("portanto", "therefore")
    Connective,
    /// Two or more blank lines
    ParagraphBreak,
}

/// A candidate split point in the raw text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Byte offset of the match in the raw text
    pub position: usize,
    /// Text matched by the pattern
    pub matched_text: String,
    pub category: BoundaryCategory,
    pub kind: BoundaryKind,
    /// Weight in `[0, 1]`
    pub weight: f32,
    pub description: String,
}

impl Boundary {
    /// Whether this boundary opens a question
    pub fn is_question_header(&self) -> bool {
        self.kind == BoundaryKind::QuestionHeader
    }

    /// Question number carried by a question header
    pub fn question_number(&self) -> Option<u32> {
        if !self.is_question_header() {
            return None;
        }
        let digits: String = self
            .matched_text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    /// End offset of the matched text
    pub fn end(&self) -> usize {
        self.position + self.matched_text.len()
    }
}

/// Letter of a multiple-choice option
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
}

impl Letter {
    pub const ALL: [Letter; 5] = [Letter::A, Letter::B, Letter::C, Letter::D, Letter::E];

    /// Parse an upper-case option letter
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One lettered answer option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub letter: Letter,
    /// Cleaned option text (empty when the capture was pure OCR noise)
    pub text: String,
    pub is_valid: bool,
    /// Confidence in `[0, 1]`
    pub confidence: f32,
}

/// How a chunk was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkType {
    QuestionBased,
    SemanticGroup,
    ContextualOverlap,
    AdaptiveSize,
    SizeBased,
}

/// Segmentation strategy requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    #[default]
    QuestionBased,
    SemanticGroup,
    ContextualOverlap,
    AdaptiveSize,
    Mixed,
}

impl SegmentationStrategy {
    pub const ALL: [SegmentationStrategy; 5] = [
        SegmentationStrategy::QuestionBased,
        SegmentationStrategy::SemanticGroup,
        SegmentationStrategy::ContextualOverlap,
        SegmentationStrategy::AdaptiveSize,
        SegmentationStrategy::Mixed,
    ];

    /// Stable name used on the command line and in config files
    pub fn name(self) -> &'static str {
        match self {
            SegmentationStrategy::QuestionBased => "question_based",
            SegmentationStrategy::SemanticGroup => "semantic_group",
            SegmentationStrategy::ContextualOverlap => "contextual_overlap",
            SegmentationStrategy::AdaptiveSize => "adaptive_size",
            SegmentationStrategy::Mixed => "mixed",
        }
    }
}

impl fmt::Display for SegmentationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SegmentationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        SegmentationStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == normalized)
            .ok_or_else(|| format!("unknown segmentation strategy: {s}"))
    }
}

/// Structural metadata of a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub id: String,
    pub chunk_type: ChunkType,
    pub question_numbers: BTreeSet<u32>,
    pub subject_area: Option<String>,
    /// Topics in catalog order, without duplicates
    pub topics: Vec<String>,
    /// Weight of the boundary that opened the chunk
    pub confidence: f32,
    /// Byte span `(start, end)` in the source text
    pub original_span: (usize, usize),
    /// Set on the whole-document chunk emitted when segmentation found nothing
    #[serde(default)]
    pub degraded: bool,
}

/// A contiguous span of text turned into a structured unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub raw_content: String,
    pub clean_content: String,
    pub metadata: ChunkMetadata,
    pub alternatives: SmallVec<[Alternative; 5]>,
    pub commands: Vec<String>,
    pub context_before: String,
    pub context_after: String,
    /// Byte length of `raw_content`
    pub size: usize,
    pub quality_score: f32,
}

impl Chunk {
    /// Build a chunk from a raw span; cleaning happens here
    pub fn new(
        raw_content: &str,
        span: (usize, usize),
        chunk_type: ChunkType,
        confidence: f32,
    ) -> Self {
        Self {
            raw_content: raw_content.to_string(),
            clean_content: clean_text(raw_content),
            metadata: ChunkMetadata {
                id: String::new(),
                chunk_type,
                question_numbers: BTreeSet::new(),
                subject_area: None,
                topics: Vec::new(),
                confidence,
                original_span: span,
                degraded: false,
            },
            alternatives: SmallVec::new(),
            commands: Vec::new(),
            context_before: String::new(),
            context_after: String::new(),
            size: raw_content.len(),
            quality_score: 0.0,
        }
    }

    pub fn with_question_number(mut self, number: u32) -> Self {
        self.metadata.question_numbers.insert(number);
        self
    }

    pub fn with_subject_area(mut self, area: Option<String>) -> Self {
        self.metadata.subject_area = area;
        self
    }

    pub fn has_question_number(&self) -> bool {
        !self.metadata.question_numbers.is_empty()
    }

    pub fn start(&self) -> usize {
        self.metadata.original_span.0
    }

    pub fn end(&self) -> usize {
        self.metadata.original_span.1
    }
}

/// Estimated difficulty of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Fully assembled, validated exam question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: String,
    pub subject_area: String,
    pub statement: String,
    pub alternatives: Vec<Alternative>,
    pub correct_alternative: Option<Letter>,
    pub topics: Vec<String>,
    pub year: String,
    /// Question number, or a synthetic `CHUNK_<n>` identifier
    pub question_number: String,
    pub source_file: String,
    pub associated_skill: String,
    pub estimated_difficulty: Difficulty,
    #[serde(rename = "type")]
    pub exercise_type: String,
}

/// Completeness rule an assembled record failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValidationRule {
    /// Statement shorter than 50 characters
    StatementTooShort,
    /// Fewer than 3 alternatives
    TooFewAlternatives,
    /// Fewer than 3 valid alternatives with more than 5 characters
    TooFewValidAlternatives,
}

impl ValidationRule {
    pub fn name(self) -> &'static str {
        match self {
            ValidationRule::StatementTooShort => "statement_too_short",
            ValidationRule::TooFewAlternatives => "too_few_alternatives",
            ValidationRule::TooFewValidAlternatives => "too_few_valid_alternatives",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A discarded record, reported for observability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub question_id: String,
    pub rule: ValidationRule,
    pub detail: String,
}
