//! Provas CLI library
//!
//! This library provides the command-line interface for segmenting exam
//! text and extracting exercise records.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
