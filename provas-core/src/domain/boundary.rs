//! Boundary detection over raw exam text
//!
//! A fixed, ordered catalog of patterns is applied to the whole text. Every
//! match becomes a [`Boundary`]; nothing is filtered here; that is the
//! segmentation engine's job. Catalog order is the final tie-break, so the
//! catalog below is deliberately kept in priority order.

use crate::domain::error::DomainError;
use crate::domain::patterns::compile;
use crate::domain::types::{Boundary, BoundaryCategory, BoundaryKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

struct PatternSpec {
    name: &'static str,
    pattern: &'static str,
    category: BoundaryCategory,
    kind: BoundaryKind,
    weight: f32,
    description: &'static str,
}

const CATALOG: &[PatternSpec] = &[
    PatternSpec {
        name: "question_header",
        pattern: r"(?m)^[ \t]*(?:QUESTÃO|QUESTAO|Questão|Questao)[ \t]*(?:N[º°o][ \t]*)?\d{1,3}\b",
        category: BoundaryCategory::Strong,
        kind: BoundaryKind::QuestionHeader,
        weight: 0.95,
        description: "question header",
    },
    PatternSpec {
        name: "subject_section",
        pattern: r"(?m)^[ \t]*(?:CIÊNCIAS HUMANAS E SUAS TECNOLOGIAS|CIÊNCIAS DA NATUREZA E SUAS TECNOLOGIAS|LINGUAGENS, CÓDIGOS E SUAS TECNOLOGIAS|MATEMÁTICA E SUAS TECNOLOGIAS)",
        category: BoundaryCategory::Strong,
        kind: BoundaryKind::SubjectSection,
        weight: 0.90,
        description: "subject area section header",
    },
    PatternSpec {
        name: "exam_section",
        pattern: r"(?m)^[ \t]*(?:\d[º°o][ \t]*DIA\b|CADERNO[ \t]+\d+|PROVA[ \t]+DE[ \t]+\p{Lu}+)",
        category: BoundaryCategory::Strong,
        kind: BoundaryKind::ExamSection,
        weight: 0.85,
        description: "exam or booklet section marker",
    },
    PatternSpec {
        name: "shared_context",
        pattern: r"(?i)\b(?:textos?|text)\b[^\n]{0,80}?\b(?:questões|questoes|questions)[ \t]+\d{1,3}[ \t]*(?:a|e|and|to|-|–)[ \t]*\d{1,3}",
        category: BoundaryCategory::Medium,
        kind: BoundaryKind::SharedContext,
        weight: 0.75,
        description: "shared context for a range of questions",
    },
    PatternSpec {
        name: "instruction",
        pattern: r"(?i)\b(?:considere|considerando|observe|analise|leia|consider the following|read the following)\b",
        category: BoundaryCategory::Medium,
        kind: BoundaryKind::Instruction,
        weight: 0.70,
        description: "instructional opener",
    },
    PatternSpec {
        name: "connective",
        pattern: r"(?i)\b(?:portanto|assim|logo|dessa forma|desse modo|therefore|thus)\b",
        category: BoundaryCategory::Weak,
        kind: BoundaryKind::Connective,
        weight: 0.50,
        description: "concluding connective",
    },
    PatternSpec {
        name: "paragraph_break",
        pattern: r"\n(?:[ \t]*\n){2,}",
        category: BoundaryCategory::Weak,
        kind: BoundaryKind::ParagraphBreak,
        weight: 0.40,
        description: "paragraph break",
    },
];

static DEFAULT_CATALOG: LazyLock<Arc<Vec<BoundaryPattern>>> = LazyLock::new(|| {
    let patterns = CATALOG
        .iter()
        .filter_map(|spec| match BoundaryPattern::from_spec(spec) {
            Ok(pattern) => Some(pattern),
            Err(error) => {
                tracing::warn!(%error, "boundary pattern disabled");
                None
            }
        })
        .collect();
    Arc::new(patterns)
});

/// A compiled boundary pattern
#[derive(Debug, Clone)]
pub struct BoundaryPattern {
    pub name: String,
    regex: Regex,
    pub category: BoundaryCategory,
    pub kind: BoundaryKind,
    pub weight: f32,
    pub description: String,
}

impl BoundaryPattern {
    /// Compile a custom boundary pattern
    pub fn new(
        name: &str,
        pattern: &str,
        category: BoundaryCategory,
        kind: BoundaryKind,
        weight: f32,
        description: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: name.to_string(),
            regex: compile(name, pattern)?,
            category,
            kind,
            weight: weight.clamp(0.0, 1.0),
            description: description.to_string(),
        })
    }

    fn from_spec(spec: &PatternSpec) -> Result<Self, DomainError> {
        Self::new(
            spec.name,
            spec.pattern,
            spec.category,
            spec.kind,
            spec.weight,
            spec.description,
        )
    }
}

/// Stateless boundary detector over a shared, read-only pattern catalog
#[derive(Debug, Clone)]
pub struct BoundaryDetector {
    patterns: Arc<Vec<BoundaryPattern>>,
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryDetector {
    /// Detector over the built-in catalog
    pub fn new() -> Self {
        Self {
            patterns: Arc::clone(&DEFAULT_CATALOG),
        }
    }

    /// Detector over a custom catalog; order is the tie-break order
    pub fn with_patterns(patterns: Vec<BoundaryPattern>) -> Self {
        Self {
            patterns: Arc::new(patterns),
        }
    }

    pub fn patterns(&self) -> &[BoundaryPattern] {
        &self.patterns
    }

    /// Find all boundaries, ordered by position
    ///
    /// When several patterns match at the same position the highest weight
    /// wins, then the stronger category, then the earlier catalog entry.
    pub fn detect(&self, text: &str) -> Vec<Boundary> {
        let mut found: Vec<(usize, Boundary)> = Vec::new();

        for (order, pattern) in self.patterns.iter().enumerate() {
            for m in pattern.regex.find_iter(text) {
                let matched = m.as_str();
                let trimmed = matched.trim_start_matches([' ', '\t']);
                if trimmed.is_empty() {
                    continue;
                }
                let position = m.start() + (matched.len() - trimmed.len());
                found.push((
                    order,
                    Boundary {
                        position,
                        matched_text: trimmed.trim_end_matches([' ', '\t']).to_string(),
                        category: pattern.category,
                        kind: pattern.kind,
                        weight: pattern.weight,
                        description: pattern.description.clone(),
                    },
                ));
            }
        }

        found.sort_by(|(order_a, a), (order_b, b)| {
            a.position
                .cmp(&b.position)
                .then(b.weight.total_cmp(&a.weight))
                .then(a.category.rank().cmp(&b.category.rank()))
                .then(order_a.cmp(order_b))
        });
        found.dedup_by_key(|(_, boundary)| boundary.position);

        let boundaries: Vec<Boundary> = found.into_iter().map(|(_, b)| b).collect();
        tracing::debug!(count = boundaries.len(), "boundaries detected");
        boundaries
    }
}

/// Exam area named by a subject section header
pub fn section_area(boundary: &Boundary) -> Option<&'static str> {
    if boundary.kind != BoundaryKind::SubjectSection {
        return None;
    }
    let text = boundary.matched_text.as_str();
    if text.contains("HUMANAS") {
        Some("Ciências Humanas")
    } else if text.contains("NATUREZA") {
        Some("Ciências da Natureza")
    } else if text.contains("LINGUAGENS") {
        Some("Linguagens")
    } else if text.contains("MATEMÁTICA") {
        Some("Matemática")
    } else {
        None
    }
}

/// Boundary counts per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryStats {
    pub strong: usize,
    pub medium: usize,
    pub weak: usize,
    pub question_headers: usize,
}

impl BoundaryStats {
    pub fn from_boundaries(boundaries: &[Boundary]) -> Self {
        let mut stats = Self::default();
        for boundary in boundaries {
            match boundary.category {
                BoundaryCategory::Strong => stats.strong += 1,
                BoundaryCategory::Medium => stats.medium += 1,
                BoundaryCategory::Weak => stats.weak += 1,
            }
            if boundary.is_question_header() {
                stats.question_headers += 1;
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.strong + self.medium + self.weak
    }
}
