//! Segmentation of exam text into chunks
//!
//! The engine turns `(text, boundaries)` into an ordered chunk list under one
//! strategy. Strategies that cannot find the structure they need fall back
//! to coarser ones; the fallbacks taken are reported with the result, never
//! as errors.

pub mod overlap;
pub mod strategies;

pub use overlap::OverlapManager;
pub use strategies::{
    AdaptiveSizeSegmenter, QuestionBasedSegmenter, SemanticGrouper, Segmenter, SizeBasedSegmenter,
};

use crate::application::config::{FallbackKind, SegmenterConfig};
use crate::application::selector::{MixedSignals, StrategySelector};
use crate::domain::types::{
    Boundary, BoundaryCategory, Chunk, ChunkType, RawDocument, SegmentationStrategy,
};

/// Confidence given to chunks that were not opened by a boundary
pub const UNANCHORED_CONFIDENCE: f32 = 0.3;

/// Everything a segmenter reads
#[derive(Debug, Clone, Copy)]
pub struct SegmentInput<'a> {
    pub document: &'a RawDocument,
    pub boundaries: &'a [Boundary],
    pub config: &'a SegmenterConfig,
}

impl<'a> SegmentInput<'a> {
    pub fn new(
        document: &'a RawDocument,
        boundaries: &'a [Boundary],
        config: &'a SegmenterConfig,
    ) -> Self {
        Self {
            document,
            boundaries,
            config,
        }
    }

    pub fn text(&self) -> &'a str {
        &self.document.text
    }

    /// Strong question-header boundaries, in order
    pub fn question_headers(&self) -> impl Iterator<Item = &'a Boundary> + 'a {
        self.boundaries
            .iter()
            .filter(|b| b.category == BoundaryCategory::Strong && b.is_question_header())
    }

    pub fn has_question_headers(&self) -> bool {
        self.question_headers().next().is_some()
    }
}

/// Chunks produced for one document plus how they were obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub chunks: Vec<Chunk>,
    pub requested: SegmentationStrategy,
    pub applied: SegmentationStrategy,
    pub fallbacks: Vec<FallbackKind>,
    pub mixed_signals: Option<MixedSignals>,
}

/// Stateless segmentation service bound to one configuration
#[derive(Debug, Clone, Copy)]
pub struct SegmentationEngine<'c> {
    config: &'c SegmenterConfig,
}

impl<'c> SegmentationEngine<'c> {
    pub fn new(config: &'c SegmenterConfig) -> Self {
        Self { config }
    }

    /// Segment with the configured strategy
    pub fn segment(&self, document: &RawDocument, boundaries: &[Boundary]) -> Segmentation {
        self.segment_with(self.config.strategy, document, boundaries)
    }

    /// Segment with an explicit strategy
    pub fn segment_with(
        &self,
        strategy: SegmentationStrategy,
        document: &RawDocument,
        boundaries: &[Boundary],
    ) -> Segmentation {
        let input = SegmentInput::new(document, boundaries, self.config);
        let mut result = Segmentation {
            chunks: Vec::new(),
            requested: strategy,
            applied: strategy,
            fallbacks: Vec::new(),
            mixed_signals: None,
        };

        if document.text.trim().is_empty() {
            if strategy == SegmentationStrategy::Mixed {
                result.applied = SegmentationStrategy::QuestionBased;
            }
            return result;
        }

        let mut chunks = match strategy {
            SegmentationStrategy::QuestionBased => {
                self.question_chunks(&input, &mut result.fallbacks)
            }
            SegmentationStrategy::SemanticGroup => {
                let base = self.question_chunks(&input, &mut result.fallbacks);
                SemanticGrouper::new(&self.config.keywords).group(base)
            }
            SegmentationStrategy::ContextualOverlap => {
                let base = self.question_chunks(&input, &mut result.fallbacks);
                self.with_overlap(base)
            }
            SegmentationStrategy::AdaptiveSize => AdaptiveSizeSegmenter.segment(&input),
            SegmentationStrategy::Mixed => {
                let mut base_fallbacks = Vec::new();
                let base = self.question_chunks(&input, &mut base_fallbacks);
                let selector = StrategySelector::new(self.config.mixed_thresholds);
                let signals = selector.signals(&input, &base);
                let selection = selector.select(&signals);
                tracing::debug!(
                    strategy = %selection.strategy,
                    reason = %selection.reason,
                    "mixed strategy resolved"
                );
                result.applied = selection.strategy;
                result.mixed_signals = Some(signals);

                match selection.strategy {
                    SegmentationStrategy::SemanticGroup => {
                        result.fallbacks.extend(base_fallbacks);
                        SemanticGrouper::new(&self.config.keywords).group(base)
                    }
                    SegmentationStrategy::ContextualOverlap => {
                        result.fallbacks.extend(base_fallbacks);
                        self.with_overlap(base)
                    }
                    SegmentationStrategy::AdaptiveSize => AdaptiveSizeSegmenter.segment(&input),
                    _ => {
                        result.fallbacks.extend(base_fallbacks);
                        base
                    }
                }
            }
        };

        if chunks.is_empty() {
            tracing::warn!(
                source = %document.source_file_name,
                "segmentation produced no chunks, using the whole document"
            );
            result.fallbacks.push(FallbackKind::EmptySegmentation);
            chunks = vec![whole_document_chunk(&document.text)];
        }

        for (index, chunk) in chunks.iter_mut().enumerate() {
            chunk.metadata.id = format!("chunk_{}", index + 1);
        }
        tracing::debug!(
            strategy = %result.applied,
            chunks = chunks.len(),
            "segmentation finished"
        );
        result.chunks = chunks;
        result
    }

    /// QuestionBased chunks, or size-based windows when there is no header
    fn question_chunks(
        &self,
        input: &SegmentInput<'_>,
        fallbacks: &mut Vec<FallbackKind>,
    ) -> Vec<Chunk> {
        if input.has_question_headers() {
            return QuestionBasedSegmenter.segment(input);
        }
        tracing::warn!(
            source = %input.document.source_file_name,
            "no question headers found, falling back to size-based chunks"
        );
        fallbacks.push(FallbackKind::NoQuestionHeaders);
        SizeBasedSegmenter.segment(input)
    }

    fn with_overlap(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut chunks = OverlapManager::from_config(self.config).apply(&chunks);
        for chunk in &mut chunks {
            chunk.metadata.chunk_type = ChunkType::ContextualOverlap;
        }
        chunks
    }
}

/// Single degraded chunk covering the whole input
fn whole_document_chunk(text: &str) -> Chunk {
    let mut chunk = Chunk::new(text, (0, text.len()), ChunkType::SizeBased, 0.0);
    chunk.metadata.degraded = true;
    chunk
}

/// Largest char boundary at or below `pos`
pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut pos = pos;
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Smallest char boundary at or above `pos`
pub fn ceil_char_boundary(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut pos = pos;
    while !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

/// End of a window of at most `max` bytes starting at `start`
///
/// The cut lands right after the last whitespace in the second half of the
/// window when there is one, and always makes progress.
pub fn window_end(text: &str, start: usize, max: usize) -> usize {
    let hard_end = start.saturating_add(max);
    if hard_end >= text.len() {
        return text.len();
    }
    let hard_end = floor_char_boundary(text, hard_end);
    let half = ceil_char_boundary(text, start + max / 2);
    if half < hard_end {
        if let Some((offset, ch)) = text[half..hard_end]
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
        {
            return half + offset + ch.len_utf8();
        }
    }
    if hard_end > start {
        hard_end
    } else {
        ceil_char_boundary(text, start + 1)
    }
}
