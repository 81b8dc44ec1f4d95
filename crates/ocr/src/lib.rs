//! Image side of the scanner: preprocessing, OCR engines and the
//! end-to-end [`ScanPipeline`].

pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use pipeline::{PipelineError, ScanPipeline, ScanResult};
pub use preprocess::{prepare, PreprocessError, Variant};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
