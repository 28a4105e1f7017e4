use thiserror::Error;

/// Domain-specific errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// A built-in or user-supplied pattern failed to compile
    #[error("Invalid pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    /// Keyword table could not be parsed or serialized
    #[error("Keyword table error: {0}")]
    KeywordTable(String),
}
