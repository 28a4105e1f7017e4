//! Domain layer for exam structuring
//!
//! Pure, stateless logic: value types, text cleaning, boundary and option
//! detection, keyword classification and quality scoring. Nothing here does
//! I/O or holds mutable shared state; the compiled pattern catalogs are
//! read-only after first use.

pub mod alternatives;
pub mod boundary;
pub mod classify;
pub mod cleaning;
pub mod error;
pub mod keywords;
pub mod patterns;
pub mod quality;
pub mod tables;
pub mod types;

pub use alternatives::{AlternativeExtractor, MarkerStyle, SplitQuestion};
pub use boundary::{BoundaryDetector, BoundaryPattern, BoundaryStats};
pub use cleaning::clean_text;
pub use error::DomainError;
pub use keywords::{KeywordCatalog, KeywordSet};
pub use quality::{QualityBreakdown, QualityScorer};
pub use types::*;
