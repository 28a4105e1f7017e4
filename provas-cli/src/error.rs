//! Error handling for the CLI application

use std::fmt;

/// CLI-specific failures; everything else travels as `anyhow::Error`
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Glob pattern that does not parse
    InvalidPattern(String),
    /// Configuration file or flag combination is unusable
    ConfigError(String),
    /// Processor could not be set up
    ProcessingError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<provas_core::ProcessingError> for CliError {
    fn from(error: provas_core::ProcessingError) -> Self {
        match error {
            provas_core::ProcessingError::ThreadPool { reason } => {
                CliError::ProcessingError(reason)
            }
            other => CliError::ConfigError(other.to_string()),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
