//! Process command implementation

use anyhow::{Context, Result};
use clap::Args;
use provas_core::{ExamProcessor, ExtractionStats, RawDocument, SegmentationStrategy};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files, directories or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format [default: text, or the config file's]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Segmentation strategy
    #[arg(short, long, value_parser = parse_strategy)]
    pub strategy: Option<SegmentationStrategy>,

    /// Minimum chunk size in bytes
    #[arg(long, value_name = "BYTES")]
    pub min_chunk: Option<usize>,

    /// Maximum chunk size in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_chunk: Option<usize>,

    /// Byte cap for context windows
    #[arg(long, value_name = "BYTES")]
    pub overlap: Option<usize>,

    /// Exam year [default: taken from each file name]
    #[arg(long, value_name = "YYYY")]
    pub year: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "PROVAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of worker threads (default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Include chunks in the output
    #[arg(long)]
    pub include_chunks: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One block per exercise record
    Text,
    /// JSON array of documents
    Json,
    /// Markdown formatted output
    Markdown,
}

impl OutputFormat {
    fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(CliError::ConfigError(format!("unknown output format '{other}'")).into()),
        }
    }
}

fn parse_strategy(value: &str) -> Result<SegmentationStrategy, String> {
    value.parse()
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Starting exam processing");
        log::debug!("Arguments: {:?}", self);

        let file_config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        let processor = self.build_processor(&file_config)?;
        log::info!(
            "strategy {} on {} worker threads",
            processor.config().strategy,
            processor.thread_count()
        );

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} files to process", files.len());

        let documents: Vec<RawDocument> = files
            .par_iter()
            .map(|path| FileReader::read_document(path, self.year.as_deref()))
            .collect::<Result<_>>()?;

        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_name(&file_config.output.format)?,
        };
        let include_chunks = self.include_chunks || file_config.output.include_chunks;
        let mut formatter =
            self.formatter(format, file_config.output.pretty_json, include_chunks)?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(documents.len() as u64);

        let outputs = processor.process_batch(&documents);

        let mut totals = ExtractionStats::default();
        for (document, output) in documents.iter().zip(&outputs) {
            formatter.format_document(document, output)?;
            totals.absorb(&output.stats);
            progress.file_completed(&document.source_file_name, output.records.len());
        }
        formatter.finish()?;
        progress.finish();

        log::info!(
            "{} files, {} chunks, {} records, {} discarded",
            documents.len(),
            totals.chunk_count,
            totals.records_emitted,
            totals.total_discarded()
        );
        if !self.quiet && self.output.is_some() {
            eprintln!(
                "Extracted {} records from {} files ({} discarded)",
                totals.records_emitted,
                documents.len(),
                totals.total_discarded()
            );
        }

        Ok(())
    }

    /// Config file settings with command-line overrides applied
    fn build_processor(&self, file_config: &CliConfig) -> Result<ExamProcessor> {
        let mut builder = file_config.segmenter_builder();
        if let Some(strategy) = self.strategy {
            builder = builder.strategy(strategy);
        }
        if let Some(min) = self.min_chunk {
            builder = builder.min_chunk_size(min);
        }
        if let Some(max) = self.max_chunk {
            builder = builder.max_chunk_size(max);
        }
        if let Some(overlap) = self.overlap {
            builder = builder.overlap_window_size(overlap);
        }
        if self.threads.is_some() {
            builder = builder.threads(self.threads);
        }

        let config = builder.build().map_err(CliError::from)?;
        let processor = ExamProcessor::new(config).map_err(CliError::from)?;
        Ok(processor)
    }

    fn formatter(
        &self,
        format: OutputFormat,
        pretty_json: bool,
        include_chunks: bool,
    ) -> Result<Box<dyn OutputFormatter>> {
        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout()),
        };

        Ok(match format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer, include_chunks)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json, include_chunks)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer, include_chunks)),
        })
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when running inside tests
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ProcessArgs {
        ProcessArgs {
            input: vec!["prova.txt".to_string()],
            output: None,
            format: None,
            strategy: None,
            min_chunk: None,
            max_chunk: None,
            overlap: None,
            year: None,
            config: None,
            threads: None,
            include_chunks: false,
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file_config = CliConfig::default();
        file_config.segmentation.strategy = SegmentationStrategy::Mixed;
        file_config.segmentation.max_chunk_size = 1500;

        let mut args = args();
        args.strategy = Some(SegmentationStrategy::AdaptiveSize);
        args.threads = Some(2);
        let processor = args.build_processor(&file_config).unwrap();

        assert_eq!(processor.config().strategy, SegmentationStrategy::AdaptiveSize);
        assert_eq!(processor.config().max_chunk_size, 1500);
        assert_eq!(processor.config().threads, Some(2));
    }

    #[test]
    fn test_conflicting_sizes_are_rejected() {
        let mut args = args();
        args.min_chunk = Some(500);
        args.max_chunk = Some(400);
        let error = args.build_processor(&CliConfig::default()).unwrap_err();
        assert!(error.to_string().contains("Min chunk size"));
    }

    #[test]
    fn test_batch_results_follow_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let question = "QUESTÃO 1\nObserve o mapa da vegetação brasileira e analise as mudanças no uso do solo.\n\
A) primeira alternativa\nB) segunda alternativa\nC) terceira alternativa\n";
        let mut inputs = Vec::new();
        for name in ["c_2021.txt", "a_2019.txt", "b_2020.txt"] {
            let path = dir.path().join(name);
            std::fs::write(&path, question).unwrap();
            inputs.push(path.display().to_string());
        }
        let output = dir.path().join("saida.json");

        let mut args = args();
        args.input = inputs;
        args.output = Some(output.clone());
        args.format = Some(OutputFormat::Json);
        args.threads = Some(3);
        args.execute().unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let files: Vec<&str> = written
            .as_array()
            .unwrap()
            .iter()
            .map(|doc| doc["source_file"].as_str().unwrap())
            .collect();
        assert_eq!(files, ["a_2019.txt", "b_2020.txt", "c_2021.txt"]);
        assert_eq!(written[1]["records"][0]["id"], "b_2020_2020_Q1");
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(parse_strategy("mixed"), Ok(SegmentationStrategy::Mixed));
        assert_eq!(
            parse_strategy("contextual-overlap"),
            Ok(SegmentationStrategy::ContextualOverlap)
        );
        assert!(parse_strategy("random").is_err());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_name("md").unwrap(), OutputFormat::Markdown);
        assert!(OutputFormat::from_name("yaml").is_err());
    }
}
