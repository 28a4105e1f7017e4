//! Full document pipeline
//!
//! boundaries → segmentation (with overlap) → per-chunk enrichment and
//! scoring → record assembly. Segmentation is sequential per document;
//! enrichment runs in parallel across chunks when the `parallel` feature is
//! enabled. Output never depends on scheduling.

use crate::application::assembler::ExerciseAssembler;
use crate::application::chunking::SegmentationEngine;
use crate::application::config::{ExtractionStats, ProcessingResult, SegmenterConfig};
use crate::domain::alternatives::AlternativeExtractor;
use crate::domain::boundary::{BoundaryDetector, BoundaryStats};
use crate::domain::classify::{classify_subject, detect_commands, detect_topics, TermIndex};
use crate::domain::quality::QualityScorer;
use crate::domain::types::{Boundary, Chunk, ExerciseRecord, RawDocument, SkippedRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use crate::application::config::ProcessingError;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything produced for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub chunks: Vec<Chunk>,
    pub records: Vec<ExerciseRecord>,
    pub skipped: Vec<SkippedRecord>,
    pub stats: ExtractionStats,
}

/// Exam processor: validated configuration plus shared read-only services
#[derive(Debug, Clone)]
pub struct ExamProcessor {
    config: Arc<SegmenterConfig>,
    detector: BoundaryDetector,
    #[cfg(feature = "parallel")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl ExamProcessor {
    /// Creates a processor, rejecting invalid configuration
    pub fn new(config: SegmenterConfig) -> ProcessingResult<Self> {
        config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = match config.threads {
            Some(threads) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("provas-worker-{i}"))
                    .build()
                    .map_err(|e| ProcessingError::ThreadPool {
                        reason: e.to_string(),
                    })?,
            )),
            None => None,
        };

        Ok(Self {
            config: Arc::new(config),
            detector: BoundaryDetector::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// Processor with the default configuration
    pub fn with_defaults() -> ProcessingResult<Self> {
        Self::new(SegmenterConfig::default())
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Number of worker threads per-chunk work can use
    pub fn thread_count(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            match &self.pool {
                Some(pool) => pool.current_num_threads(),
                None => num_cpus::get(),
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }

    /// Boundary candidates for a text
    pub fn detect_boundaries(&self, text: &str) -> Vec<Boundary> {
        self.detector.detect(text)
    }

    /// Recomputes a chunk's quality score from its stored fields
    pub fn rescore(&self, chunk: &Chunk) -> f32 {
        self.scorer().score(chunk)
    }

    /// Convenience wrapper building the document from parts
    pub fn process_text(&self, text: &str, year: &str, source_file_name: &str) -> ExtractionOutput {
        self.process(&RawDocument::new(text, year, source_file_name))
    }

    /// Runs the whole pipeline on one document
    pub fn process(&self, document: &RawDocument) -> ExtractionOutput {
        let config = self.config.as_ref();
        let mut stats = ExtractionStats {
            requested_strategy: config.strategy,
            applied_strategy: config.strategy,
            ..Default::default()
        };

        let boundaries = self.detector.detect(&document.text);
        stats.boundaries = BoundaryStats::from_boundaries(&boundaries);
        tracing::debug!(
            strong = stats.boundaries.strong,
            medium = stats.boundaries.medium,
            weak = stats.boundaries.weak,
            "boundaries by tier"
        );

        let segmentation = SegmentationEngine::new(config).segment(document, &boundaries);
        stats.applied_strategy = segmentation.applied;
        stats.mixed_signals = segmentation.mixed_signals;
        for fallback in &segmentation.fallbacks {
            stats.record_fallback(*fallback);
        }

        let chunks = self.enrich_all(segmentation.chunks);
        stats.chunk_count = chunks.len();

        let fallback_mode = stats.boundaries.question_headers == 0;
        let assembly =
            ExerciseAssembler::new(config).assemble(document, &chunks, fallback_mode, &mut stats);

        tracing::info!(
            source = %document.source_file_name,
            strategy = %stats.applied_strategy,
            chunks = stats.chunk_count,
            records = assembly.records.len(),
            skipped = assembly.skipped.len(),
            "document processed"
        );

        ExtractionOutput {
            chunks,
            records: assembly.records,
            skipped: assembly.skipped,
            stats,
        }
    }

    /// Processes documents independently, keeping input order
    pub fn process_batch(&self, documents: &[RawDocument]) -> Vec<ExtractionOutput> {
        #[cfg(feature = "parallel")]
        {
            self.install(|| documents.par_iter().map(|doc| self.process(doc)).collect())
        }
        #[cfg(not(feature = "parallel"))]
        {
            documents.iter().map(|doc| self.process(doc)).collect()
        }
    }

    fn enrich_all(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        #[cfg(feature = "parallel")]
        {
            self.install(|| chunks.into_par_iter().map(|c| self.enrich(c)).collect())
        }
        #[cfg(not(feature = "parallel"))]
        {
            chunks.into_iter().map(|c| self.enrich(c)).collect()
        }
    }

    #[cfg(feature = "parallel")]
    fn install<R: Send>(&self, work: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }

    /// Options, commands, topics, area and score for one chunk
    fn enrich(&self, mut chunk: Chunk) -> Chunk {
        let index = TermIndex::new(&chunk.clean_content);
        chunk.alternatives = AlternativeExtractor::new().split(&chunk.raw_content).alternatives;
        chunk.commands = detect_commands(&index);
        chunk.metadata.topics = detect_topics(&index, &self.config.keywords);
        if chunk.metadata.subject_area.is_none() {
            chunk.metadata.subject_area =
                classify_subject(&index, &self.config.keywords).map(str::to_string);
        }
        chunk.quality_score = self.scorer().score(&chunk);
        chunk
    }

    fn scorer(&self) -> QualityScorer {
        QualityScorer::new(self.config.min_chunk_size, self.config.max_chunk_size)
    }
}
