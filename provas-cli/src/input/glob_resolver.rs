//! File pattern resolution using glob

use anyhow::{Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Extension picked up when a directory is given instead of a pattern
const TEXT_EXTENSION: &str = "txt";

/// Resolve file patterns to actual file paths
///
/// A directory stands for the `.txt` files directly inside it. The result is
/// sorted and free of duplicates, so documents are processed in a stable
/// order.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let path = Path::new(pattern);
        let expanded = if path.is_dir() {
            path.join(format!("*.{TEXT_EXTENSION}"))
                .to_string_lossy()
                .into_owned()
        } else {
            pattern.clone()
        };

        let paths = glob(&expanded)
            .map_err(|e| CliError::InvalidPattern(format!("{pattern} ({e})")))?;

        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {pattern}"))?;

            if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    files.sort();
    files.dedup();

    Ok(files)
}
