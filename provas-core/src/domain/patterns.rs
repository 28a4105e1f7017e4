//! Pattern compilation shared by the detector catalogs

use crate::domain::error::DomainError;
use regex::Regex;

/// Compile a pattern, reporting failures as a domain error
pub fn compile(name: &str, pattern: &str) -> Result<Regex, DomainError> {
    Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Compile a pattern, logging and skipping it on failure
///
/// Catalog construction degrades to fewer patterns instead of failing the
/// whole pipeline.
pub fn compile_lenient(name: &str, pattern: &str) -> Option<Regex> {
    match compile(name, pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            tracing::warn!(%error, "skipping pattern");
            None
        }
    }
}
