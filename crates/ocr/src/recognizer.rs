use thiserror::Error;
use veriscan_core::Document;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available, build with the `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR engine.
/// Implementations accept preprocessed PNG bytes and return text, lines and
/// word boxes in source-image pixel coordinates.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Document, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a fixed document whatever the image.
pub struct MockRecognizer {
    document: Document,
}

impl MockRecognizer {
    pub fn new(text: &str) -> Self {
        Self { document: Document::from_text(text) }
    }

    pub fn with_document(document: Document) -> Self {
        Self { document }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Document, OcrError> {
        Ok(self.document.clone())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::{capi, LepTess};
    use veriscan_core::{BBox, Document, Word};

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<Document, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let text = lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))?;

            let mut words = Vec::new();
            if let Some(boxes) = lt.get_component_boxes(capi::TessPageIteratorLevel_RIL_WORD, true) {
                for b in &boxes {
                    lt.set_rectangle(&b);
                    let word = lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))?;
                    let word = word.trim();
                    if word.is_empty() {
                        continue;
                    }
                    let g = b.get_geometry();
                    let bbox = BBox::new(g.x as f32, g.y as f32, (g.x + g.w) as f32, (g.y + g.h) as f32);
                    words.push(Word::new(word, bbox, lt.mean_text_conf() as f32));
                }
            }

            Ok(Document::from_text(&text).with_words(words))
        }
    }
}
