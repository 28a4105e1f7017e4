//! Segmentation strategies
//!
//! Each segmenter is a stateless unit struct reading a [`SegmentInput`].
//! SemanticGroup and ContextualOverlap refine QuestionBased output, so they
//! are post-processors ([`SemanticGrouper`], [`OverlapManager`]) rather
//! than segmenters of their own.
//!
//! [`OverlapManager`]: super::OverlapManager

use super::{window_end, SegmentInput, UNANCHORED_CONFIDENCE};
use crate::domain::alternatives::AlternativeExtractor;
use crate::domain::boundary::section_area;
use crate::domain::classify::{classify_subject, mentions_figure, TermIndex};
use crate::domain::keywords::KeywordCatalog;
use crate::domain::types::{Boundary, BoundaryKind, Chunk, ChunkType};

/// Mean line length (bytes) below which text counts as dense with short lines
const SHORT_LINE_LENGTH: usize = 40;

/// A way of cutting a document into chunks
pub trait Segmenter: Send + Sync {
    /// Produce chunks ordered by start offset
    fn segment(&self, input: &SegmentInput<'_>) -> Vec<Chunk>;

    /// Strategy name for logs
    fn name(&self) -> &'static str;
}

/// One chunk per question header
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionBasedSegmenter;

impl Segmenter for QuestionBasedSegmenter {
    fn segment(&self, input: &SegmentInput<'_>) -> Vec<Chunk> {
        let text = input.text();
        let headers: Vec<&Boundary> = input.question_headers().collect();
        let mut chunks = Vec::with_capacity(headers.len());

        for (i, header) in headers.iter().enumerate() {
            let start = header.position;
            let end = headers.get(i + 1).map_or(text.len(), |next| next.position);
            let raw = &text[start..end];
            if raw.len() < input.config.min_chunk_size {
                tracing::debug!(
                    question = ?header.question_number(),
                    size = raw.len(),
                    "dropping question chunk below minimum size"
                );
                continue;
            }

            let mut chunk = Chunk::new(raw, (start, end), ChunkType::QuestionBased, header.weight)
                .with_subject_area(area_before(input.boundaries, start));
            if let Some(number) = header.question_number() {
                chunk = chunk.with_question_number(number);
            }
            chunks.push(chunk);
        }
        chunks
    }

    fn name(&self) -> &'static str {
        "question_based"
    }
}

/// Fixed windows of `max_chunk_size` bytes, no overlap
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeBasedSegmenter;

impl Segmenter for SizeBasedSegmenter {
    fn segment(&self, input: &SegmentInput<'_>) -> Vec<Chunk> {
        let text = input.text();
        let max = input.config.max_chunk_size.max(1);
        let mut chunks = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let end = window_end(text, pos, max);
            let raw = &text[pos..end];
            if !raw.trim().is_empty() {
                chunks.push(
                    Chunk::new(raw, (pos, end), ChunkType::SizeBased, UNANCHORED_CONFIDENCE)
                        .with_subject_area(area_before(input.boundaries, pos)),
                );
            }
            pos = end;
        }
        chunks
    }

    fn name(&self) -> &'static str {
        "size_based"
    }
}

/// Density-driven chunk lengths that never cut through an option list
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveSizeSegmenter;

impl AdaptiveSizeSegmenter {
    /// Preferred chunk length for the text starting at `pos`
    pub fn ideal_length(&self, input: &SegmentInput<'_>, pos: usize) -> usize {
        let text = input.text();
        let min = input.config.min_chunk_size;
        let max = input.config.max_chunk_size.max(1);
        let window_stop = super::floor_char_boundary(text, pos.saturating_add(max));
        let window = &text[pos..window_stop.max(pos)];

        let mut ideal = min + max.saturating_sub(min) / 2;
        if mentions_figure(&TermIndex::new(window)) {
            ideal = max;
        }
        if mean_line_length(window) < SHORT_LINE_LENGTH {
            ideal = ideal * 3 / 4;
        }
        if input.document.is_scanned_at(pos) {
            ideal = ideal * 3 / 4;
        }
        ideal.max(min).min(max).max(1)
    }
}

impl Segmenter for AdaptiveSizeSegmenter {
    fn segment(&self, input: &SegmentInput<'_>) -> Vec<Chunk> {
        let text = input.text();
        let len = text.len();
        let min = input.config.min_chunk_size;
        let max = input.config.max_chunk_size.max(1);
        let blocks = AlternativeExtractor::new().option_blocks(text);
        let mut chunks = Vec::new();
        let mut pos = 0;

        while pos < len {
            let ideal = self.ideal_length(input, pos);
            let target = pos + ideal;
            let limit = pos.saturating_add(max).min(len);

            let mut end = if target >= len {
                len
            } else {
                input
                    .boundaries
                    .iter()
                    .map(|b| b.position)
                    .find(|&p| p >= target && p <= limit)
                    .unwrap_or_else(|| window_end(text, pos, max))
            };
            if let Some(&(_, block_end)) = blocks.iter().find(|(s, e)| *s < end && end < *e) {
                end = block_end;
            }
            if end < len && len - end < min {
                end = len;
            }
            if end <= pos {
                end = super::ceil_char_boundary(text, pos + 1);
            }

            let raw = &text[pos..end];
            if !raw.trim().is_empty() {
                let confidence = input
                    .boundaries
                    .iter()
                    .find(|b| b.position == pos)
                    .map_or(UNANCHORED_CONFIDENCE, |b| b.weight);
                let mut chunk = Chunk::new(raw, (pos, end), ChunkType::AdaptiveSize, confidence)
                    .with_subject_area(area_before(input.boundaries, pos));
                for header in input
                    .question_headers()
                    .filter(|h| h.position >= pos && h.position < end)
                {
                    if let Some(number) = header.question_number() {
                        chunk = chunk.with_question_number(number);
                    }
                }
                chunks.push(chunk);
            }
            pos = end;
        }
        chunks
    }

    fn name(&self) -> &'static str {
        "adaptive_size"
    }
}

/// Merges chunks that share a theme into one combined chunk
#[derive(Debug, Clone, Copy)]
pub struct SemanticGrouper<'k> {
    keywords: &'k KeywordCatalog,
}

impl<'k> SemanticGrouper<'k> {
    pub fn new(keywords: &'k KeywordCatalog) -> Self {
        Self { keywords }
    }

    /// Theme of a chunk: its section area, else its keyword classification
    pub fn theme(&self, chunk: &Chunk) -> Option<String> {
        chunk.metadata.subject_area.clone().or_else(|| {
            classify_subject(&TermIndex::new(&chunk.clean_content), self.keywords)
                .map(str::to_string)
        })
    }

    /// Themes with their member indices, in order of first appearance
    pub fn groups(&self, chunks: &[Chunk]) -> Vec<(String, Vec<usize>)> {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let Some(theme) = self.theme(chunk) else {
                continue;
            };
            match groups.iter_mut().find(|(name, _)| *name == theme) {
                Some((_, members)) => members.push(index),
                None => groups.push((theme, vec![index])),
            }
        }
        groups
    }

    /// Combine multi-member groups; singletons and unthemed chunks pass through
    ///
    /// A combined chunk takes the place of its first member, so the output
    /// stays ordered by start offset.
    pub fn group(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let groups = self.groups(&chunks);
        let mut slots: Vec<Option<Chunk>> = chunks.into_iter().map(Some).collect();
        let mut leader_of: Vec<Option<usize>> = vec![None; slots.len()];
        for (group_index, (_, members)) in groups.iter().enumerate() {
            if members.len() > 1 {
                for &member in members {
                    leader_of[member] = Some(group_index);
                }
            }
        }

        let mut output = Vec::with_capacity(slots.len());
        for index in 0..slots.len() {
            match leader_of[index] {
                None => {
                    if let Some(chunk) = slots[index].take() {
                        output.push(chunk);
                    }
                }
                Some(group_index) => {
                    let (theme, members) = &groups[group_index];
                    if members.first() != Some(&index) {
                        continue;
                    }
                    let parts: Vec<Chunk> =
                        members.iter().filter_map(|&m| slots[m].take()).collect();
                    output.push(combine(parts, theme));
                }
            }
        }
        output
    }
}

fn combine(parts: Vec<Chunk>, theme: &str) -> Chunk {
    let raw = parts
        .iter()
        .map(|c| c.raw_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let start = parts.iter().map(Chunk::start).min().unwrap_or(0);
    let end = parts.iter().map(Chunk::end).max().unwrap_or(start);
    let confidence = parts
        .iter()
        .map(|c| c.metadata.confidence)
        .fold(f32::INFINITY, f32::min);
    let confidence = if confidence.is_finite() { confidence } else { 0.0 };

    let mut chunk = Chunk::new(&raw, (start, end), ChunkType::SemanticGroup, confidence)
        .with_subject_area(Some(theme.to_string()));
    for part in &parts {
        chunk
            .metadata
            .question_numbers
            .extend(part.metadata.question_numbers.iter().copied());
    }
    chunk
}

/// Area named by the last subject section header before `pos`
fn area_before(boundaries: &[Boundary], pos: usize) -> Option<String> {
    boundaries
        .iter()
        .take_while(|b| b.position < pos)
        .filter(|b| b.kind == BoundaryKind::SubjectSection)
        .last()
        .and_then(section_area)
        .map(str::to_string)
}

fn mean_line_length(text: &str) -> usize {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return 0;
    }
    lines.iter().map(|l| l.len()).sum::<usize>() / lines.len()
}
