//! Configuration file support
//!
//! The file has three sections. `[segmentation]` mirrors the core
//! configuration, `[output]` sets formatter defaults and `[keywords]` adds
//! keyword sets on top of the built-in catalog. Command-line flags override
//! whatever the file says.

use anyhow::{Context, Result};
use provas_core::{KeywordCatalog, MixedThresholds, SegmentationStrategy, SegmenterConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CliError;

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub segmentation: SegmentationSection,

    #[serde(default)]
    pub output: OutputSection,

    /// Extra keyword sets merged into the built-in catalog
    #[serde(default = "KeywordCatalog::empty")]
    pub keywords: KeywordCatalog,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationSection::default(),
            output: OutputSection::default(),
            keywords: KeywordCatalog::empty(),
        }
    }
}

/// Segmentation-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SegmentationSection {
    pub strategy: SegmentationStrategy,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub overlap_window_size: usize,
    pub overlap_words: usize,
    /// Number of worker threads (0 = auto)
    pub threads: usize,
    pub default_subject_area: String,
    pub mixed: MixedThresholds,
}

impl Default for SegmentationSection {
    fn default() -> Self {
        let core = SegmenterConfig::default();
        Self {
            strategy: core.strategy,
            min_chunk_size: core.min_chunk_size,
            max_chunk_size: core.max_chunk_size,
            overlap_window_size: core.overlap_window_size,
            overlap_words: core.overlap_words,
            threads: 0,
            default_subject_area: core.default_subject_area,
            mixed: core.mixed_thresholds,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSection {
    /// Default output format (text, json, markdown)
    pub format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Include the chunks next to the records
    pub include_chunks: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty_json: true,
            include_chunks: false,
        }
    }
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CliConfig =
            toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()))?;
        config
            .keywords
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    /// Core configuration builder seeded from this file
    ///
    /// Not validated yet: callers apply their overrides and then `build()`.
    pub fn segmenter_builder(&self) -> provas_core::SegmenterConfigBuilder {
        let s = &self.segmentation;
        SegmenterConfig::builder()
            .strategy(s.strategy)
            .min_chunk_size(s.min_chunk_size)
            .max_chunk_size(s.max_chunk_size)
            .overlap_window_size(s.overlap_window_size)
            .overlap_words(s.overlap_words)
            .threads((s.threads > 0).then_some(s.threads))
            .default_subject_area(s.default_subject_area.clone())
            .mixed_thresholds(s.mixed)
            .extend_keywords(self.keywords.clone())
    }

    /// Validated core configuration
    pub fn segmenter_config(&self) -> Result<SegmenterConfig> {
        let config = self.segmenter_builder().build().map_err(CliError::from)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(CliConfig::from_toml_str("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = CliConfig::from_toml_str(
            r#"
[segmentation]
strategy = "mixed"
max_chunk_size = 1500

[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.segmentation.strategy, SegmentationStrategy::Mixed);
        assert_eq!(config.segmentation.max_chunk_size, 1500);
        assert_eq!(config.segmentation.min_chunk_size, 100);
        assert!(config.output.pretty_json);
        assert_eq!(config.output.format, "json");
        assert!(config.keywords.subject_areas.is_empty());
    }

    #[test]
    fn test_keywords_extend_builtin_catalog() {
        let config = CliConfig::from_toml_str(
            r#"
[[keywords.subject_areas]]
name = "Redação"
keywords = ["dissertação", "argumentação"]

[[keywords.topics]]
name = "Ecologia"
keywords = ["bioma"]
"#,
        )
        .unwrap();
        let core = config.segmenter_config().unwrap();
        let areas: Vec<&str> = core.keywords.area_names().collect();
        assert!(areas.contains(&"Matemática"));
        assert_eq!(areas.last(), Some(&"Redação"));
        assert!(core.keywords.topics.iter().any(|t| t.name == "Ecologia"));
    }

    #[test]
    fn test_blank_keywords_are_rejected() {
        let error = CliConfig::from_toml_str(
            r#"
[[keywords.topics]]
name = "Ecologia"
keywords = ["bioma", ""]
"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("empty keyword"));

        let unnamed = "[[keywords.subject_areas]]\nname = \" \"\nkeywords = [\"redação\"]\n";
        assert!(CliConfig::from_toml_str(unnamed).is_err());
    }

    #[test]
    fn test_threads_zero_means_auto() {
        let mut config = CliConfig::default();
        assert_eq!(config.segmenter_config().unwrap().threads, None);
        config.segmentation.threads = 3;
        assert_eq!(config.segmenter_config().unwrap().threads, Some(3));
    }

    #[test]
    fn test_invalid_sizes_are_rejected() {
        let mut config = CliConfig::default();
        config.segmentation.min_chunk_size = 5000;
        let error = config.segmenter_config().unwrap_err();
        assert!(error.to_string().contains("Min chunk size"));
    }

    #[test]
    fn test_unknown_strategy_is_a_parse_error() {
        let result = CliConfig::from_toml_str("[segmentation]\nstrategy = \"random\"\n");
        assert!(result.is_err());
    }
}
