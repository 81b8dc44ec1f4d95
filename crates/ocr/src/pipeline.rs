use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use veriscan_core::{Document, ExtractedRecord, MaskRegion};
use veriscan_extract::DocumentPipeline;

use crate::preprocess::{self, Variant};
use crate::recognizer::OcrBackend;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything one scan produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Merged OCR output of every pass and side.
    pub document: Document,
    pub record: ExtractedRecord,
    pub masks: Vec<MaskRegion>,
}

/// Orchestrates: preprocess (both variants) → OCR → merge passes → combine
/// sides → classify and extract → redaction masks.
///
/// A pass that fails to decode or recognise is logged and counted as empty, so
/// a scan always ends in a well-formed record.
pub struct ScanPipeline<R: OcrBackend> {
    recognizer: R,
    pipeline: DocumentPipeline,
}

impl<R: OcrBackend> ScanPipeline<R> {
    pub fn new(recognizer: R, pipeline: DocumentPipeline) -> Self {
        Self { recognizer, pipeline }
    }

    pub fn pipeline(&self) -> &DocumentPipeline {
        &self.pipeline
    }

    fn run_pass(&self, image: &[u8], variant: Variant) -> Document {
        let prepared = match preprocess::prepare(image, variant) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(variant = variant.name(), error = %e, "preprocessing failed, pass skipped");
                return Document::default();
            }
        };
        match self.recognizer.recognize(&prepared) {
            Ok(doc) => {
                debug!(variant = variant.name(), lines = doc.lines.len(), words = doc.words.len(), "OCR pass done");
                doc
            }
            Err(e) => {
                warn!(variant = variant.name(), error = %e, "OCR pass failed, pass skipped");
                Document::default()
            }
        }
    }

    /// Both renderings of one side, merged.
    pub fn recognize_side(&self, image: &[u8]) -> Document {
        Variant::ALL
            .into_iter()
            .map(|variant| self.run_pass(image, variant))
            .reduce(Document::merge_passes)
            .unwrap_or_default()
    }

    pub fn process_bytes(&self, front: &[u8], back: Option<&[u8]>) -> ScanResult {
        let front = self.recognize_side(front);
        let back = back.map(|b| self.recognize_side(b));
        let document = Document::combine_sides(front, back);

        let record = self.pipeline.process(&document);
        let masks = self.pipeline.record_masks(&document, &record);
        ScanResult { document, record, masks }
    }

    /// Process image files on disk. Only reading the files can fail.
    pub async fn process_files(&self, front: &Path, back: Option<&Path>) -> Result<ScanResult, PipelineError> {
        let front_bytes = tokio::fs::read(front).await?;
        let back_bytes = match back {
            Some(path) => Some(tokio::fs::read(path).await?),
            None => None,
        };
        Ok(self.process_bytes(&front_bytes, back_bytes.as_deref()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
