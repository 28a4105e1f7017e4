//! Text cleaning shared by all stages
//!
//! OCR output carries stray control characters, repeated symbol runs and
//! page/line numbers glued to the real text. Cleaning works on whitespace
//! delimited tokens so that every step only removes material, which keeps
//! the transform idempotent and never longer than its input.

/// Symbols that show up as OCR garbage when repeated
const NOISE_SYMBOLS: &[char] = &['+', '×', '*', '=', '#', '~', '^', '|', '_', '•', '÷'];

/// Minimum digit count for a standalone number to be treated as noise
const NOISE_NUMBER_DIGITS: usize = 3;

/// Returns true for characters that count as OCR noise symbols
pub fn is_noise_symbol(ch: char) -> bool {
    NOISE_SYMBOLS.contains(&ch)
}

#[derive(Debug)]
struct Token<'a> {
    /// Newlines in the whitespace gap preceding this token
    newlines_before: usize,
    text: &'a str,
}

/// Clean a span of extracted text
///
/// - control characters are removed (newlines and tabs survive as whitespace)
/// - runs of two or more noise symbols (`++`, `××`) are removed
/// - standalone numbers of three or more digits are removed
/// - a leading run of digit/symbol tokens is removed when it contains a symbol
/// - whitespace collapses to one space, or to one blank line when the gap
///   held two or more line breaks
pub fn clean_text(input: &str) -> String {
    let stripped: String = input
        .chars()
        .filter(|ch| !ch.is_control() || *ch == '\n' || *ch == '\t')
        .collect();
    let despiked = replace_symbol_runs(&stripped);

    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut carried_newlines = 0;
    for token in tokenize(&despiked) {
        if is_noise_number(token.text) {
            carried_newlines += token.newlines_before;
            continue;
        }
        tokens.push(Token {
            newlines_before: token.newlines_before + carried_newlines,
            text: token.text,
        });
        carried_newlines = 0;
    }

    let start = leading_noise_len(&tokens);

    let mut output = String::with_capacity(despiked.len());
    for (i, token) in tokens[start..].iter().enumerate() {
        if i > 0 {
            if token.newlines_before >= 2 {
                output.push_str("\n\n");
            } else {
                output.push(' ');
            }
        }
        output.push_str(token.text);
    }
    output
}

/// Replace every maximal run of two or more noise symbols with a single space
fn replace_symbol_runs(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut run = String::new();

    let flush = |run: &mut String, output: &mut String| {
        if run.chars().count() >= 2 {
            output.push(' ');
        } else {
            output.push_str(run);
        }
        run.clear();
    };

    for ch in text.chars() {
        if is_noise_symbol(ch) {
            run.push(ch);
        } else {
            if !run.is_empty() {
                flush(&mut run, &mut output);
            }
            output.push(ch);
        }
    }
    if !run.is_empty() {
        flush(&mut run, &mut output);
    }
    output
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut newlines = 0;
    let mut token_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = token_start.take() {
                tokens.push(Token {
                    newlines_before: newlines,
                    text: &text[start..idx],
                });
                newlines = 0;
            }
            if ch == '\n' {
                newlines += 1;
            }
        } else if token_start.is_none() {
            token_start = Some(idx);
        }
    }
    if let Some(start) = token_start {
        tokens.push(Token {
            newlines_before: newlines,
            text: &text[start..],
        });
    }
    tokens
}

fn is_noise_number(token: &str) -> bool {
    token.len() >= NOISE_NUMBER_DIGITS && token.bytes().all(|b| b.is_ascii_digit())
}

/// Number of leading tokens to drop as OCR noise
fn leading_noise_len(tokens: &[Token<'_>]) -> usize {
    let Some(first_word) = tokens.iter().position(|t| has_letter(t.text)) else {
        return 0;
    };
    let prefix = &tokens[..first_word];
    let only_noise = prefix.iter().all(|t| {
        t.text
            .chars()
            .all(|ch| ch.is_ascii_digit() || is_noise_symbol(ch))
    });
    let has_symbol = prefix
        .iter()
        .any(|t| t.text.chars().any(is_noise_symbol));

    if only_noise && has_symbol {
        first_word
    } else {
        0
    }
}

/// Whether the text contains at least one alphabetic character
pub fn has_letter(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Count whitespace-delimited tokens that read as numbers (`12`, `3,5`, `0.25`)
pub fn count_numeric_tokens(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| {
            let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
            !trimmed.is_empty()
                && trimmed.chars().next().is_some_and(|c| c.is_ascii_digit())
                && trimmed
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
        })
        .count()
}

/// Count stray arithmetic symbols (`+`, `×`, `-`, `=`)
pub fn count_math_symbols(text: &str) -> usize {
    text.chars()
        .filter(|ch| matches!(ch, '+' | '×' | '-' | '='))
        .count()
}

/// Count whole alphabetic words of at least `min_len` characters
pub fn count_words(text: &str, min_len: usize) -> usize {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|word| word.chars().count() >= min_len && word.chars().all(char::is_alphabetic))
        .count()
}
