//! Reading exam text files

use anyhow::{Context, Result};
use provas_core::RawDocument;
use std::fs;
use std::path::Path;

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read a file into a document
    ///
    /// The year comes from `year` when given, otherwise from the file name,
    /// otherwise it is `"unknown"`.
    pub fn read_document(path: &Path, year: Option<&str>) -> Result<RawDocument> {
        let text = Self::read_text(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let year = year
            .map(str::to_string)
            .or_else(|| year_from_name(&name))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(RawDocument::new(text, year, name))
    }
}

/// First standalone `19xx`/`20xx` digit run in a file name
pub fn year_from_name(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    (0..bytes.len().saturating_sub(3)).find_map(|i| {
        let candidate = &bytes[i..i + 4];
        let standalone = (i == 0 || !bytes[i - 1].is_ascii_digit())
            && bytes.get(i + 4).map_or(true, |b| !b.is_ascii_digit());
        let century = candidate.starts_with(b"19") || candidate.starts_with(b"20");
        (standalone && century && candidate.iter().all(u8::is_ascii_digit))
            .then(|| String::from_utf8_lossy(candidate).into_owned())
    })
}
