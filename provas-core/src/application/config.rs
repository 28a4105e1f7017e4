//! Configuration, errors and statistics for the application layer
//!
//! Invalid configuration is the only fatal error class in the pipeline.
//! Everything that goes wrong with the input text itself degrades to a
//! coarser result and is counted in [`ExtractionStats`].

use crate::application::selector::MixedSignals;
use crate::domain::boundary::BoundaryStats;
use crate::domain::error::DomainError;
use crate::domain::keywords::KeywordCatalog;
use crate::domain::tables::DEFAULT_SUBJECT_AREA;
use crate::domain::types::{SegmentationStrategy, ValidationRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Thresholds the Mixed strategy compares its signals against
///
/// These are starting points meant to be tuned on real exam corpora.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedThresholds {
    /// Question headers per 1000 bytes at or above which QuestionBased is used
    pub header_density: f32,
    /// Largest-group fraction at or above which SemanticGroup is used
    pub thematic_coherence: f32,
    /// Context-referencing fraction at or above which ContextualOverlap is used
    pub context_dependency: f32,
}

impl Default for MixedThresholds {
    fn default() -> Self {
        Self {
            header_density: 0.3,
            thematic_coherence: 0.6,
            context_dependency: 0.3,
        }
    }
}

/// Configuration for segmentation and extraction
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Chunks shorter than this many bytes are dropped
    pub min_chunk_size: usize,

    /// Upper bound for size-driven chunks, in bytes
    pub max_chunk_size: usize,

    /// Byte cap for each context window
    pub overlap_window_size: usize,

    /// Word cap for each context window
    pub overlap_words: usize,

    pub strategy: SegmentationStrategy,

    pub mixed_thresholds: MixedThresholds,

    /// Subject-area and topic keyword sets
    pub keywords: KeywordCatalog,

    /// Area assigned when no keyword matches
    pub default_subject_area: String,

    /// Worker threads for per-chunk work (None = all cores)
    pub threads: Option<usize>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: 100,
            max_chunk_size: 2000,
            overlap_window_size: 200,
            overlap_words: 20,
            strategy: SegmentationStrategy::QuestionBased,
            mixed_thresholds: MixedThresholds::default(),
            keywords: KeywordCatalog::default(),
            default_subject_area: DEFAULT_SUBJECT_AREA.to_string(),
            threads: None,
        }
    }
}

impl SegmenterConfig {
    /// Creates a new builder for SegmenterConfig
    pub fn builder() -> SegmenterConfigBuilder {
        SegmenterConfigBuilder::new()
    }

    /// Tuned for short objective questions (math, sciences)
    pub fn small_questions() -> Self {
        Self {
            min_chunk_size: 50,
            max_chunk_size: 1200,
            overlap_window_size: 120,
            overlap_words: 12,
            ..Default::default()
        }
    }

    /// Tuned for reading-heavy exams where several questions share a text
    pub fn long_passages() -> Self {
        Self {
            min_chunk_size: 200,
            max_chunk_size: 4000,
            overlap_window_size: 400,
            overlap_words: 40,
            strategy: SegmentationStrategy::ContextualOverlap,
            ..Default::default()
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> ProcessingResult<()> {
        if self.max_chunk_size == 0 {
            return Err(invalid("Max chunk size must be greater than 0"));
        }

        if self.min_chunk_size > self.max_chunk_size {
            return Err(ProcessingError::InvalidConfig {
                reason: format!(
                    "Min chunk size ({}) must not exceed max chunk size ({})",
                    self.min_chunk_size, self.max_chunk_size
                ),
            });
        }

        if self.overlap_window_size >= self.max_chunk_size {
            return Err(invalid("Overlap window size must be less than max chunk size"));
        }

        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err(invalid("Threads must be greater than 0"));
            }
        }

        let thresholds = &self.mixed_thresholds;
        if !thresholds.header_density.is_finite() || thresholds.header_density < 0.0 {
            return Err(invalid("Header density threshold must be a non-negative number"));
        }
        for (name, value) in [
            ("Thematic coherence", thresholds.thematic_coherence),
            ("Context dependency", thresholds.context_dependency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProcessingError::InvalidConfig {
                    reason: format!("{name} threshold must be within [0, 1], got {value}"),
                });
            }
        }

        self.keywords.validate()?;

        Ok(())
    }
}

fn invalid(reason: &str) -> ProcessingError {
    ProcessingError::InvalidConfig {
        reason: reason.to_string(),
    }
}

/// Errors that abort processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Invalid configuration parameters
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A keyword table could not be loaded
    #[error("Invalid keyword table: {reason}")]
    InvalidKeywordTable { reason: String },

    /// The worker pool could not be created
    #[error("Failed to build thread pool: {reason}")]
    ThreadPool { reason: String },
}

impl From<DomainError> for ProcessingError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::KeywordTable(reason) => ProcessingError::InvalidKeywordTable { reason },
            other @ DomainError::InvalidPattern { .. } => ProcessingError::InvalidConfig {
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for processing operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Builder for SegmenterConfig with fluent API
#[derive(Debug, Clone)]
pub struct SegmenterConfigBuilder {
    config: SegmenterConfig,
}

impl SegmenterConfigBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            config: SegmenterConfig::default(),
        }
    }

    /// Starts from an existing configuration
    pub fn from_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn min_chunk_size(mut self, size: usize) -> Self {
        self.config.min_chunk_size = size;
        self
    }

    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.config.max_chunk_size = size;
        self
    }

    pub fn overlap_window_size(mut self, size: usize) -> Self {
        self.config.overlap_window_size = size;
        self
    }

    pub fn overlap_words(mut self, words: usize) -> Self {
        self.config.overlap_words = words;
        self
    }

    pub fn strategy(mut self, strategy: SegmentationStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn mixed_thresholds(mut self, thresholds: MixedThresholds) -> Self {
        self.config.mixed_thresholds = thresholds;
        self
    }

    /// Replaces the keyword catalog
    pub fn keywords(mut self, keywords: KeywordCatalog) -> Self {
        self.config.keywords = keywords;
        self
    }

    /// Merges extra keyword sets into the current catalog
    pub fn extend_keywords(mut self, extra: KeywordCatalog) -> Self {
        self.config.keywords.extend(extra);
        self
    }

    /// Merges keyword sets parsed from a TOML table
    pub fn keyword_table(self, toml: &str) -> ProcessingResult<Self> {
        let extra = KeywordCatalog::from_toml_str(toml)?;
        Ok(self.extend_keywords(extra))
    }

    pub fn default_subject_area(mut self, area: impl Into<String>) -> Self {
        self.config.default_subject_area = area.into();
        self
    }

    /// Sets the number of worker threads
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.threads = threads;
        self
    }

    /// Builds the configuration, validating parameters
    pub fn build(self) -> ProcessingResult<SegmenterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Builds the configuration without validation (for testing)
    pub fn build_unchecked(self) -> SegmenterConfig {
        self.config
    }
}

impl Default for SegmenterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarser path taken when structure could not be recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// No question header anywhere: size-based chunks were used
    NoQuestionHeaders,
    /// Segmentation produced nothing: one whole-document chunk was used
    EmptySegmentation,
    /// No option markers in a question: the whole span became the statement
    StatementOnly,
}

impl fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FallbackKind::NoQuestionHeaders => "no_question_headers",
            FallbackKind::EmptySegmentation => "empty_segmentation",
            FallbackKind::StatementOnly => "statement_only",
        };
        f.write_str(name)
    }
}

/// Observable counts describing how a document was structured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Boundaries found per tier
    pub boundaries: BoundaryStats,

    pub requested_strategy: SegmentationStrategy,

    /// Strategy actually run (differs from the request for Mixed)
    pub applied_strategy: SegmentationStrategy,

    /// Signals computed when Mixed was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_signals: Option<MixedSignals>,

    pub fallbacks: BTreeMap<FallbackKind, usize>,

    pub chunk_count: usize,

    pub records_emitted: usize,

    /// Discarded records per failed rule
    pub discarded: BTreeMap<ValidationRule, usize>,
}

impl ExtractionStats {
    pub fn record_fallback(&mut self, kind: FallbackKind) {
        *self.fallbacks.entry(kind).or_insert(0) += 1;
    }

    pub fn record_discard(&mut self, rule: ValidationRule) {
        *self.discarded.entry(rule).or_insert(0) += 1;
    }

    pub fn fallback_count(&self, kind: FallbackKind) -> usize {
        self.fallbacks.get(&kind).copied().unwrap_or(0)
    }

    pub fn discard_count(&self, rule: ValidationRule) -> usize {
        self.discarded.get(&rule).copied().unwrap_or(0)
    }

    pub fn total_discarded(&self) -> usize {
        self.discarded.values().sum()
    }

    /// Adds another document's counts into this summary
    ///
    /// Strategies and signals are kept from `self`; only counters accumulate.
    pub fn absorb(&mut self, other: &ExtractionStats) {
        self.boundaries.strong += other.boundaries.strong;
        self.boundaries.medium += other.boundaries.medium;
        self.boundaries.weak += other.boundaries.weak;
        self.boundaries.question_headers += other.boundaries.question_headers;
        for (kind, count) in &other.fallbacks {
            *self.fallbacks.entry(*kind).or_insert(0) += count;
        }
        for (rule, count) in &other.discarded {
            *self.discarded.entry(*rule).or_insert(0) += count;
        }
        self.chunk_count += other.chunk_count;
        self.records_emitted += other.records_emitted;
    }
}
