//! Statement/alternatives split and A–E option extraction
//!
//! Letter markers come in several shapes depending on the exam and on how
//! the PDF was extracted. They are tried as an ordered list: the first shape
//! that yields at least three letters in increasing order is used for the
//! whole question.

use crate::domain::cleaning::{
    clean_text, count_math_symbols, count_numeric_tokens, count_words, has_letter,
};
use crate::domain::classify::detect_answer_key;
use crate::domain::patterns::compile_lenient;
use crate::domain::types::{Alternative, Letter};
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::LazyLock;

/// Minimum number of letters a marker shape must produce to be accepted
pub const MIN_ALTERNATIVES: usize = 3;

/// Shape of the letter marker that introduced the alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerStyle {
    /// `A)`
    Paren,
    /// `(A)`
    Enclosed,
    /// `A.`
    Dotted,
    /// `A` followed by capitalised text at line start
    Bare,
}

#[derive(Debug)]
struct MarkerPattern {
    style: MarkerStyle,
    regex: Regex,
}

static MARKERS: LazyLock<Vec<MarkerPattern>> = LazyLock::new(|| {
    [
        (MarkerStyle::Paren, r"(?m)(?:^|\s)([A-E])\)"),
        (MarkerStyle::Enclosed, r"\(([A-E])\)"),
        (MarkerStyle::Dotted, r"(?m)(?:^|\s)([A-E])\.\s+"),
        (MarkerStyle::Bare, r"(?m)^[ \t]*([A-E])[ \t]+[A-ZÀ-Þ0-9+×=\-]"),
    ]
    .into_iter()
    .filter_map(|(style, pattern)| {
        compile_lenient(&format!("{style:?}"), pattern).map(|regex| MarkerPattern { style, regex })
    })
    .collect()
});

static BLANK_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile_lenient("blank_line", r"\n[ \t]*\n"));

#[derive(Debug, Clone, Copy)]
struct Marker {
    letter: Letter,
    /// Where the marker itself starts
    start: usize,
    /// Where the option text starts
    content_start: usize,
}

impl MarkerPattern {
    fn markers(&self, text: &str) -> Vec<Marker> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let letter_match = caps.get(1)?;
                let letter = Letter::from_char(letter_match.as_str().chars().next()?)?;
                let start = match self.style {
                    MarkerStyle::Enclosed => whole.start(),
                    _ => letter_match.start(),
                };
                let content_start = match self.style {
                    MarkerStyle::Bare => letter_match.end(),
                    _ => whole.end(),
                };
                Some(Marker {
                    letter,
                    start,
                    content_start,
                })
            })
            .collect()
    }

    /// Markers whose letters strictly increase; the first occurrence wins
    fn ordered_markers(&self, text: &str) -> Vec<Marker> {
        let mut kept: Vec<Marker> = Vec::new();
        for marker in self.markers(text) {
            if kept.last().map_or(true, |last| marker.letter > last.letter) {
                kept.push(marker);
            }
        }
        kept
    }
}

/// A chunk body divided into statement and options
#[derive(Debug, Clone, PartialEq)]
pub struct SplitQuestion<'a> {
    /// Raw text before the first option marker
    pub statement: &'a str,
    pub alternatives: SmallVec<[Alternative; 5]>,
    /// Marker shape the options were read with, if any were found
    pub style: Option<MarkerStyle>,
}

/// Stateless extractor over the shared marker catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternativeExtractor;

impl AlternativeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Byte offset where alternative material starts, if any marker is present
    ///
    /// The first shape with an `A` marker decides; failing that, the first
    /// marker of the first shape that matches anything.
    pub fn split_point(&self, text: &str) -> Option<usize> {
        let per_pattern: Vec<Vec<Marker>> = MARKERS.iter().map(|p| p.markers(text)).collect();
        per_pattern
            .iter()
            .find_map(|markers| markers.iter().find(|m| m.letter == Letter::A))
            .or_else(|| per_pattern.iter().find_map(|markers| markers.first()))
            .map(|marker| marker.start)
    }

    /// Split a question body and extract its options
    pub fn split<'a>(&self, text: &'a str) -> SplitQuestion<'a> {
        let Some(at) = self.split_point(text) else {
            return SplitQuestion {
                statement: text,
                alternatives: SmallVec::new(),
                style: None,
            };
        };
        let (alternatives, style) = self.extract_with_style(&text[at..]);
        SplitQuestion {
            statement: &text[..at],
            alternatives,
            style,
        }
    }

    /// Extract options from alternative material; empty when no shape yields
    /// at least three letters
    pub fn extract(&self, span: &str) -> SmallVec<[Alternative; 5]> {
        self.extract_with_style(span).0
    }

    fn extract_with_style(&self, span: &str) -> (SmallVec<[Alternative; 5]>, Option<MarkerStyle>) {
        for pattern in MARKERS.iter() {
            let markers = pattern.ordered_markers(span);
            if markers.len() < MIN_ALTERNATIVES {
                continue;
            }

            let mut alternatives: SmallVec<[Alternative; 5]> = SmallVec::new();
            for (i, marker) in markers.iter().enumerate() {
                let end = match markers.get(i + 1) {
                    Some(next) => next.start,
                    None => last_option_end(span, marker.content_start),
                };
                let capture = span.get(marker.content_start..end).unwrap_or("");
                if let Some(alternative) = build_alternative(marker.letter, capture) {
                    alternatives.push(alternative);
                }
            }
            alternatives.sort_by_key(|alt| alt.letter);
            tracing::trace!(
                style = ?pattern.style,
                count = alternatives.len(),
                "alternatives extracted"
            );
            return (alternatives, Some(pattern.style));
        }
        (SmallVec::new(), None)
    }

    /// Spans covering lettered option blocks, merged and ordered by start
    ///
    /// A block runs from its first marker to the end of the line holding its
    /// last marker. Used to keep size-driven cuts out of option lists.
    pub fn option_blocks(&self, text: &str) -> Vec<(usize, usize)> {
        let mut blocks: Vec<(usize, usize)> = Vec::new();
        for pattern in MARKERS.iter() {
            let markers = pattern.markers(text);
            let mut run: Vec<Marker> = Vec::new();
            for marker in markers {
                let continues = run
                    .last()
                    .is_some_and(|last| marker.letter as u8 == last.letter as u8 + 1);
                if !continues {
                    push_block(&mut blocks, &run, text);
                    run.clear();
                    if marker.letter != Letter::A {
                        continue;
                    }
                }
                run.push(marker);
            }
            push_block(&mut blocks, &run, text);
        }

        blocks.sort_unstable();
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(blocks.len());
        for (start, end) in blocks {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        merged
    }
}

fn push_block(blocks: &mut Vec<(usize, usize)>, run: &[Marker], text: &str) {
    if run.len() < MIN_ALTERNATIVES {
        return;
    }
    if let (Some(first), Some(last)) = (run.first(), run.last()) {
        let end = text[last.content_start..]
            .find('\n')
            .map_or(text.len(), |nl| last.content_start + nl);
        blocks.push((first.start, end));
    }
}

/// End of the final option: the first blank line or an answer-key marker
fn last_option_end(span: &str, from: usize) -> usize {
    let rest = &span[from..];
    let mut end = BLANK_LINE
        .as_ref()
        .and_then(|re| re.find(rest))
        .map_or(rest.len(), |m| m.start());
    if let Some((_, key_start)) = detect_answer_key(&rest[..end]) {
        end = key_start;
    }
    from + end
}

fn build_alternative(letter: Letter, capture: &str) -> Option<Alternative> {
    if capture.trim().is_empty() {
        return None;
    }
    let text = clean_text(capture);
    if text.is_empty() || !has_letter(&text) {
        // OCR-corrupted option: keep the letter, never invent its content
        return Some(Alternative {
            letter,
            text,
            is_valid: false,
            confidence: 0.0,
        });
    }
    let confidence = alternative_confidence(&text);
    Some(Alternative {
        letter,
        text,
        is_valid: true,
        confidence,
    })
}

/// Confidence of a cleaned option text, in `[0, 1]`
pub fn alternative_confidence(text: &str) -> f32 {
    let mut confidence: f32 = 1.0;
    if text.chars().count() < 10 {
        confidence -= 0.3;
    }
    if count_numeric_tokens(text) > 3 {
        confidence -= 0.2;
    }
    if count_math_symbols(text) > 2 {
        confidence -= 0.2;
    }
    if count_words(text, 3) >= 3 {
        confidence += 0.1;
    }
    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Qual é a capital do Brasil?\n\
A) Rio de Janeiro, antiga capital\n\
B) Brasília, no Distrito Federal\n\
C) Salvador, primeira capital\n\
D) São Paulo, maior cidade\n\
E) Belo Horizonte, em Minas\n";

    #[test]
    fn test_split_well_formed_question() {
        let split = AlternativeExtractor::new().split(WELL_FORMED);
        assert_eq!(split.statement, "Qual é a capital do Brasil?\n");
        assert_eq!(split.style, Some(MarkerStyle::Paren));
        let letters: Vec<Letter> = split.alternatives.iter().map(|a| a.letter).collect();
        assert_eq!(letters, Letter::ALL.to_vec());
        assert_eq!(split.alternatives[1].text, "Brasília, no Distrito Federal");
        assert!(split.alternatives.iter().all(|a| a.is_valid));
        assert_eq!(split.alternatives[4].confidence, 1.0);
    }

    #[test]
    fn test_no_marker_is_statement_only() {
        let text = "Explique o ciclo da água em um parágrafo.";
        let split = AlternativeExtractor::new().split(text);
        assert_eq!(split.statement, text);
        assert!(split.alternatives.is_empty());
        assert_eq!(split.style, None);
    }

    #[test]
    fn test_enclosed_markers_inline() {
        let text = "Escolha: (A) primeira opção (B) segunda opção (C) terceira opção";
        let split = AlternativeExtractor::new().split(text);
        assert_eq!(split.statement, "Escolha: ");
        assert_eq!(split.style, Some(MarkerStyle::Enclosed));
        assert_eq!(split.alternatives.len(), 3);
        assert_eq!(split.alternatives[2].text, "terceira opção");
    }

    #[test]
    fn test_bare_markers_with_ocr_garbage() {
        let text = "Enunciado da questão.\nA 125 251++\nB Texto válido da segunda\nC Outra opção possível\nD Mais uma opção aqui\n";
        let split = AlternativeExtractor::new().split(text);
        assert_eq!(split.style, Some(MarkerStyle::Bare));
        let first = &split.alternatives[0];
        assert_eq!(first.letter, Letter::A);
        assert!(!first.is_valid);
        assert!(first.text.is_empty());
        assert_eq!(first.confidence, 0.0);
        assert!(split.alternatives[1..].iter().all(|a| a.is_valid));
    }

    #[test]
    fn test_too_few_letters_yields_nothing() {
        let alternatives = AlternativeExtractor::new().extract("A) sim\nB) não\n");
        assert!(alternatives.is_empty());
    }

    #[test]
    fn test_duplicate_and_out_of_order_letters_are_skipped() {
        let text = "A) um texto\nC) três textos\nB) dois textos\nD) quatro textos\nC) de novo\n";
        let alternatives = AlternativeExtractor::new().extract(text);
        let letters: Vec<Letter> = alternatives.iter().map(|a| a.letter).collect();
        assert_eq!(letters, vec![Letter::A, Letter::C, Letter::D]);
        assert_eq!(alternatives[1].text, "três textos B) dois textos");
    }

    #[test]
    fn test_last_option_stops_at_blank_line_and_answer_key() {
        let text = "A) opção um\nB) opção dois\nC) opção três Gabarito: B\n\nTexto seguinte";
        let alternatives = AlternativeExtractor::new().extract(text);
        assert_eq!(alternatives.len(), 3);
        assert_eq!(alternatives[2].text, "opção três");
    }

    #[test]
    fn test_confidence_adjustments() {
        assert!((alternative_confidence("curto") - 0.7).abs() < 1e-6);
        assert_eq!(alternative_confidence("uma frase com várias palavras"), 1.0);
        let numeric = alternative_confidence("1 2 3 4 = 5 + 6 - 7");
        assert!((numeric - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_option_blocks() {
        let text = format!("Intro\n{WELL_FORMED}\nOutra coisa A) solta");
        let blocks = AlternativeExtractor::new().option_blocks(&text);
        assert_eq!(blocks.len(), 1);
        let (start, end) = blocks[0];
        assert!(text[start..].starts_with("A) Rio"));
        assert!(text[..end].ends_with("em Minas"));
    }
}
