use veriscan_core::{DocumentType, FieldMap};

use super::{ExtractionInput, Extractor};

const EXCERPT_CHARS: usize = 200;

/// Unrecognised documents: a trimmed excerpt of the text is the only field.
pub struct GenericExtractor;

impl Extractor for GenericExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::GenericDocument
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(&["raw_text"]);
        let excerpt: String = input.raw_text.trim().chars().take(EXCERPT_CHARS).collect();
        fields.fill("raw_text", Some(excerpt));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use veriscan_core::{Document, NOT_DETECTED};

    #[test]
    fn excerpt_is_capped_on_char_boundary() {
        let text = "é".repeat(300);
        let doc = Document::from_text(&text);
        let n = Normalizer::default();
        let fields = GenericExtractor.extract(&ExtractionInput::new(&doc, &n));
        assert_eq!(fields.get("raw_text").unwrap().chars().count(), 200);
    }

    #[test]
    fn empty_document_yields_sentinel() {
        let doc = Document::default();
        let n = Normalizer::default();
        let fields = GenericExtractor.extract(&ExtractionInput::new(&doc, &n));
        assert_eq!(fields.get("raw_text"), Some(NOT_DETECTED));
    }
}
