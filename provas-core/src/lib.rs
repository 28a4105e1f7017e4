//! Segmentation and exercise extraction for OCR'd exam text
//!
//! Takes the plain text of a multiple-choice exam (typically produced by OCR,
//! with the noise that implies) and cuts it into chunks suitable for
//! retrieval, then assembles validated exercise records: statement, lettered
//! alternatives, answer key, subject area, topics and difficulty.
//!
//! All positions and sizes are UTF-8 byte offsets into the input text.
//!
//! # Architecture
//!
//! - **Domain layer**: value types, cleaning, boundary and option detection,
//!   keyword classification and quality scoring. Pure and stateless.
//! - **Application layer**: strategies, strategy selection, overlap,
//!   parallel enrichment and record assembly.
//!
//! # Example
//!
//! ```rust
//! use provas_core::{ExamProcessor, RawDocument, SegmenterConfig};
//!
//! let text = "QUESTÃO 1\n\
//! Considere o texto sobre a fotossíntese realizada pelas plantas verdes.\n\
//! Assinale a alternativa correta.\n\
//! A) A planta produz glicose\n\
//! B) A planta consome oxigênio apenas\n\
//! C) A planta não utiliza luz\n\
//! D) A planta libera metano\n\
//! E) A planta absorve nitrogênio do ar\n";
//!
//! let processor = ExamProcessor::new(SegmenterConfig::default()).unwrap();
//! let output = processor.process(&RawDocument::new(text, "2023", "enem_2023.txt"));
//!
//! assert_eq!(output.chunks.len(), 1);
//! assert_eq!(output.records.len(), 1);
//! assert_eq!(output.records[0].alternatives.len(), 5);
//! ```

pub mod application;
pub mod domain;

pub use application::{
    ExamProcessor, ExtractionOutput, ExtractionStats, FallbackKind, MixedThresholds,
    ProcessingError, ProcessingResult, SegmenterConfig, SegmenterConfigBuilder,
};
pub use domain::*;
