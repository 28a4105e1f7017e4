//! Strategy selection for the Mixed strategy

use crate::application::chunking::{SegmentInput, SemanticGrouper};
use crate::application::config::MixedThresholds;
use crate::domain::classify::{references_context, TermIndex};
use crate::domain::types::{Chunk, SegmentationStrategy};
use serde::{Deserialize, Serialize};

/// Whole-document signals the Mixed strategy decides on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MixedSignals {
    /// Question headers per 1000 bytes of text
    pub header_density: f32,
    /// Fraction of base chunks in the largest theme group
    pub thematic_coherence: f32,
    /// Fraction of base chunks that point at text outside themselves
    pub context_dependency: f32,
}

/// Outcome of a selection, with a human-readable reason
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySelection {
    pub strategy: SegmentationStrategy,
    pub reason: String,
}

/// Picks a concrete strategy from document signals
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategySelector {
    thresholds: MixedThresholds,
}

impl StrategySelector {
    pub fn new(thresholds: MixedThresholds) -> Self {
        Self { thresholds }
    }

    /// Compute the signals over the text and its QuestionBased chunks
    pub fn signals(&self, input: &SegmentInput<'_>, base: &[Chunk]) -> MixedSignals {
        let text_len = input.text().len();
        let headers = input.question_headers().count();
        let header_density = if text_len == 0 {
            0.0
        } else {
            headers as f32 * 1000.0 / text_len as f32
        };

        if base.is_empty() {
            return MixedSignals {
                header_density,
                ..Default::default()
            };
        }

        let largest_group = SemanticGrouper::new(&input.config.keywords)
            .groups(base)
            .iter()
            .map(|(_, members)| members.len())
            .max()
            .unwrap_or(0);
        let dependent = base
            .iter()
            .filter(|chunk| references_context(&TermIndex::new(&chunk.clean_content)))
            .count();

        MixedSignals {
            header_density,
            thematic_coherence: largest_group as f32 / base.len() as f32,
            context_dependency: dependent as f32 / base.len() as f32,
        }
    }

    /// First signal that reaches its threshold wins, in priority order
    pub fn select(&self, signals: &MixedSignals) -> StrategySelection {
        let t = &self.thresholds;
        if signals.header_density >= t.header_density && signals.header_density > 0.0 {
            StrategySelection {
                strategy: SegmentationStrategy::QuestionBased,
                reason: format!(
                    "header density {:.2} per 1000 bytes reaches {:.2}",
                    signals.header_density, t.header_density
                ),
            }
        } else if signals.thematic_coherence >= t.thematic_coherence {
            StrategySelection {
                strategy: SegmentationStrategy::SemanticGroup,
                reason: format!(
                    "thematic coherence {:.2} reaches {:.2}",
                    signals.thematic_coherence, t.thematic_coherence
                ),
            }
        } else if signals.context_dependency >= t.context_dependency {
            StrategySelection {
                strategy: SegmentationStrategy::ContextualOverlap,
                reason: format!(
                    "context dependency {:.2} reaches {:.2}",
                    signals.context_dependency, t.context_dependency
                ),
            }
        } else {
            StrategySelection {
                strategy: SegmentationStrategy::AdaptiveSize,
                reason: "no signal reached its threshold".to_string(),
            }
        }
    }
}
