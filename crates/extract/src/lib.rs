//! Document classification and field extraction over OCR output.
//!
//! Everything here is synchronous and free of I/O apart from
//! [`PipelineConfig::load`]; engines and image handling live in `veriscan-ocr`.

pub mod classify;
pub mod config;
pub mod extractors;
pub mod layout;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod redact;
pub mod util;

pub use classify::{ClassificationRule, Classifier, Signals};
pub use config::{ConfigError, PipelineConfig};
pub use extractors::{ExtractionInput, Extractor, ExtractorRegistry, MANUAL_REVIEW};
pub use normalize::Normalizer;
pub use pipeline::DocumentPipeline;
pub use redact::RedactionDeriver;
