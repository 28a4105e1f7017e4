//! Keyword-driven classification: subject area, topics, commands, difficulty

use crate::domain::keywords::KeywordCatalog;
use crate::domain::patterns::compile_lenient;
use crate::domain::tables;
use crate::domain::types::{Difficulty, Letter};
use regex::Regex;
use std::sync::LazyLock;

/// Statement length, in characters, above which a question is considered hard
pub const HARD_LENGTH: usize = 1000;

/// Statement length above which a question is at least medium
pub const MEDIUM_LENGTH: usize = 500;

static SKILL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile_lenient("skill", r"\b(?:H|[Hh]abilidade\s+)(\d{1,2})\b")
});

static ANSWER_KEY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile_lenient(
        "answer_key",
        r"(?m)(?i:gabarito|resposta correta|resposta|answer)\s*:\s*\(?([A-E])\)?\.?[ \t]*\r?$",
    )
});

/// Lower-cased word sequence used for whole-word keyword lookup
///
/// Words are separated by single spaces and the whole index is padded with
/// spaces, so a term matches only on word boundaries.
#[derive(Debug, Clone)]
pub struct TermIndex {
    joined: String,
}

impl TermIndex {
    pub fn new(text: &str) -> Self {
        let mut joined = String::with_capacity(text.len() + 2);
        joined.push(' ');
        joined.push_str(&normalize_words(text));
        joined.push(' ');
        Self { joined }
    }

    /// Number of whole-word occurrences of `term`
    pub fn count(&self, term: &str) -> usize {
        let needle = padded(term);
        if needle.trim().is_empty() {
            return 0;
        }
        let mut count = 0;
        let mut from = 0;
        while let Some(found) = self.joined[from..].find(&needle) {
            count += 1;
            // Reuse the trailing space as the next leading space
            from += found + needle.len() - 1;
        }
        count
    }

    pub fn contains(&self, term: &str) -> bool {
        self.position(term).is_some()
    }

    /// Offset of the first occurrence inside the index
    pub fn position(&self, term: &str) -> Option<usize> {
        let needle = padded(term);
        if needle.trim().is_empty() {
            return None;
        }
        self.joined.find(&needle)
    }

    fn contains_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|term| self.contains(term))
    }
}

fn normalize_words(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn padded(term: &str) -> String {
    format!(" {} ", normalize_words(term))
}

/// Highest-scoring subject area, or `None` when no keyword matches
///
/// Scores are keyword occurrence counts; ties go to the area listed first.
pub fn classify_subject<'a>(index: &TermIndex, catalog: &'a KeywordCatalog) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for set in &catalog.subject_areas {
        let score: usize = set.keywords.iter().map(|k| index.count(k)).sum();
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((set.name.as_str(), score)),
        }
    }
    best.map(|(name, _)| name)
}

/// Topics whose keywords appear in the text, in catalog order
pub fn detect_topics(index: &TermIndex, catalog: &KeywordCatalog) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for set in &catalog.topics {
        if set.keywords.iter().any(|k| index.contains(k)) && !topics.contains(&set.name) {
            topics.push(set.name.clone());
        }
    }
    topics
}

/// Instruction phrases found in the text, ordered by first appearance
pub fn detect_commands(index: &TermIndex) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = tables::COMMAND_PHRASES
        .iter()
        .filter_map(|phrase| index.position(phrase).map(|pos| (pos, *phrase)))
        .collect();
    found.sort();
    found.dedup_by(|a, b| a.1 == b.1);
    found.into_iter().map(|(_, phrase)| phrase.to_string()).collect()
}

/// Keyword- and length-driven difficulty estimate; Hard beats Medium beats Easy
pub fn estimate_difficulty(index: &TermIndex, statement_len: usize) -> Difficulty {
    if index.contains_any(tables::HARD_VERBS) || statement_len > HARD_LENGTH {
        Difficulty::Hard
    } else if index.contains_any(tables::MEDIUM_VERBS) || statement_len > MEDIUM_LENGTH {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

/// Whether the text refers to an embedded table, chart or figure
pub fn mentions_figure(index: &TermIndex) -> bool {
    index.contains_any(tables::FIGURE_REFERENCES)
}

/// Whether the text points at material outside itself ("o texto acima")
pub fn references_context(index: &TermIndex) -> bool {
    index.contains_any(tables::CONTEXT_REFERENCES)
}

/// Skill code such as `H12`
pub fn detect_skill(text: &str) -> Option<String> {
    let pattern = SKILL_PATTERN.as_ref()?;
    let captures = pattern.captures(text)?;
    let number: u32 = captures.get(1)?.as_str().parse().ok()?;
    Some(format!("H{number}"))
}

/// Answer-key marker (`Gabarito: C`) with the byte offset where it starts
///
/// The letter must be uppercase and close its line, so prose such as
/// "Resposta: a energia..." is not read as a key.
pub fn detect_answer_key(text: &str) -> Option<(Letter, usize)> {
    let pattern = ANSWER_KEY_PATTERN.as_ref()?;
    let captures = pattern.captures(text)?;
    let whole = captures.get(0)?;
    let letter = captures.get(1)?.as_str().chars().next()?;
    Letter::from_char(letter).map(|letter| (letter, whole.start()))
}
