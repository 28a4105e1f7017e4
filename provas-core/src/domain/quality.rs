//! Chunk quality scoring
//!
//! The score is a pure function of a chunk's stored fields and the size
//! bounds it is judged against. Rescoring an unchanged chunk always gives the
//! same value.

use crate::domain::types::Chunk;
use serde::{Deserialize, Serialize};

/// The four sub-scores averaged into a chunk's quality score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub completeness: f32,
    pub coherence: f32,
    pub size: f32,
    pub context: f32,
}

impl QualityBreakdown {
    pub fn average(&self) -> f32 {
        ((self.completeness + self.coherence + self.size + self.context) / 4.0).clamp(0.0, 1.0)
    }
}

/// Scores chunks against a size range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityScorer {
    min_size: usize,
    max_size: usize,
}

impl QualityScorer {
    pub fn new(min_size: usize, max_size: usize) -> Self {
        Self { min_size, max_size }
    }

    /// Quality score in `[0, 1]`; degraded chunks always score 0
    pub fn score(&self, chunk: &Chunk) -> f32 {
        if chunk.metadata.degraded {
            return 0.0;
        }
        self.breakdown(chunk).average()
    }

    pub fn breakdown(&self, chunk: &Chunk) -> QualityBreakdown {
        QualityBreakdown {
            completeness: completeness(chunk),
            coherence: coherence(chunk),
            size: self.size_fit(chunk.size),
            context: context_quality(chunk),
        }
    }

    /// 1.0 inside `[min, max]`, otherwise the ratio to the nearer bound
    pub fn size_fit(&self, size: usize) -> f32 {
        if size == 0 {
            return 0.0;
        }
        if size < self.min_size {
            size as f32 / self.min_size as f32
        } else if size > self.max_size {
            self.max_size as f32 / size as f32
        } else {
            1.0
        }
    }
}

fn completeness(chunk: &Chunk) -> f32 {
    let mut score = 0.0;
    if chunk.has_question_number() {
        score += 0.3;
    }
    match chunk.alternatives.len() {
        0 => {}
        1..=3 => score += 0.2,
        _ => score += 0.4,
    }
    if !chunk.commands.is_empty() {
        score += 0.3;
    }
    f32::min(score, 1.0)
}

fn coherence(chunk: &Chunk) -> f32 {
    if !chunk.alternatives.is_empty() && chunk.has_question_number() {
        0.8
    } else {
        0.5
    }
}

fn context_quality(chunk: &Chunk) -> f32 {
    let mut score = 0.5;
    if !chunk.context_before.is_empty() {
        score += 0.25;
    }
    if !chunk.context_after.is_empty() {
        score += 0.25;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Alternative, ChunkType, Letter};

    fn alternatives(count: usize) -> Vec<Alternative> {
        Letter::ALL
            .iter()
            .take(count)
            .map(|&letter| Alternative {
                letter,
                text: "uma opção qualquer".to_string(),
                is_valid: true,
                confidence: 1.0,
            })
            .collect()
    }

    fn chunk(len: usize) -> Chunk {
        let raw = "x".repeat(len);
        Chunk::new(&raw, (0, len), ChunkType::QuestionBased, 0.95)
    }

    #[test]
    fn test_complete_question_scores_high() {
        let mut c = chunk(500).with_question_number(91);
        c.alternatives.extend(alternatives(5));
        c.commands.push("assinale a alternativa".to_string());
        let scorer = QualityScorer::new(100, 2000);
        let breakdown = scorer.breakdown(&c);
        assert!((breakdown.completeness - 1.0).abs() < 1e-6);
        assert_eq!(breakdown.coherence, 0.8);
        assert_eq!(breakdown.size, 1.0);
        assert_eq!(breakdown.context, 0.5);
        assert!((scorer.score(&c) - 0.825).abs() < 1e-6);
    }

    #[test]
    fn test_partial_alternatives_and_context() {
        let mut c = chunk(150);
        c.alternatives.extend(alternatives(2));
        c.context_before = "antes".to_string();
        let breakdown = QualityScorer::new(100, 2000).breakdown(&c);
        assert!((breakdown.completeness - 0.2).abs() < 1e-6);
        assert_eq!(breakdown.coherence, 0.5);
        assert_eq!(breakdown.context, 0.75);
    }

    #[test]
    fn test_size_fit_ratios() {
        let scorer = QualityScorer::new(100, 2000);
        assert_eq!(scorer.size_fit(50), 0.5);
        assert_eq!(scorer.size_fit(4000), 0.5);
        assert_eq!(scorer.size_fit(100), 1.0);
        assert_eq!(scorer.size_fit(2000), 1.0);
        assert_eq!(scorer.size_fit(0), 0.0);
    }

    #[test]
    fn test_degraded_chunk_scores_zero() {
        let mut c = chunk(500).with_question_number(1);
        c.metadata.degraded = true;
        assert_eq!(QualityScorer::new(100, 2000).score(&c), 0.0);
    }

    #[test]
    fn test_score_is_repeatable() {
        let mut c = chunk(1200).with_question_number(7);
        c.context_after = "depois".to_string();
        let scorer = QualityScorer::new(100, 2000);
        let first = scorer.score(&c);
        c.quality_score = first;
        assert_eq!(scorer.score(&c), first);
        assert!((0.0..=1.0).contains(&first));
    }
}
