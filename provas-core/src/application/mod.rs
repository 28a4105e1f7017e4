//! Application layer for turning exam text into chunks and records
//!
//! Coordinates the domain services: segmentation strategies and their
//! selection, context overlap, per-chunk enrichment on a worker pool and
//! exercise record assembly. Configuration and error types live here too.
//!
//! # Example
//!
//! ```rust
//! use provas_core::application::{ExamProcessor, SegmenterConfig};
//! use provas_core::SegmentationStrategy;
//!
//! let config = SegmenterConfig::builder()
//!     .strategy(SegmentationStrategy::Mixed)
//!     .build()
//!     .unwrap();
//! let processor = ExamProcessor::new(config).unwrap();
//!
//! let output = processor.process_text("", "2023", "enem_2023.txt");
//! assert!(output.chunks.is_empty());
//! ```

pub mod assembler;
pub mod chunking;
pub mod config;
pub mod processor;
pub mod selector;

pub use assembler::{Assembly, ExerciseAssembler};
pub use chunking::{Segmentation, SegmentationEngine};
pub use config::{
    ExtractionStats, FallbackKind, MixedThresholds, ProcessingError, ProcessingResult,
    SegmenterConfig, SegmenterConfigBuilder,
};
pub use processor::{ExamProcessor, ExtractionOutput};
pub use selector::{MixedSignals, StrategySelection, StrategySelector};
