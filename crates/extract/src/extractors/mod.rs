//! One extractor per [`DocumentType`], dispatched through [`ExtractorRegistry`].
//!
//! Every extractor starts from a map of its keys preset to the sentinel and
//! only overwrites a key on a validated match, so a record is always complete.

use std::collections::{HashMap, HashSet};

use veriscan_core::{Document, DocumentType, ExtractedRecord, FieldMap, Word};

use crate::normalize::Normalizer;

mod aadhaar;
mod driving_license;
mod form;
mod generic;
mod invoice;
mod pan;
mod passport;
mod student_id;
mod voter;

pub use aadhaar::AadhaarExtractor;
pub use driving_license::DrivingLicenseExtractor;
pub use form::{FormExtractor, DEFAULT_FORM_LABEL_MAX_LEN};
pub use generic::GenericExtractor;
pub use invoice::InvoiceExtractor;
pub use pan::PanExtractor;
pub use passport::PassportExtractor;
pub use student_id::StudentIdExtractor;
pub use voter::VoterExtractor;

/// Marker stored in `status` when a form yields nothing structured.
pub const MANUAL_REVIEW: &str = "Manual Review Required";

/// Read-only view of a document prepared for extraction.
pub struct ExtractionInput<'a> {
    /// Trimmed, non-blank lines in reading order, exact duplicates removed.
    pub lines: Vec<&'a str>,
    pub raw_text: String,
    pub words: &'a [Word],
    pub normalizer: &'a Normalizer,
}

impl<'a> ExtractionInput<'a> {
    pub fn new(doc: &'a Document, normalizer: &'a Normalizer) -> Self {
        let mut seen = HashSet::new();
        let lines = doc
            .line_texts()
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty() && seen.insert(*t))
            .collect();
        Self { lines, raw_text: doc.effective_text(), words: &doc.words, normalizer }
    }

    pub fn is_noise(&self, s: &str) -> bool {
        self.normalizer.is_noise(s)
    }

    /// Index of the first line matching `pred`.
    pub fn position(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        self.lines.iter().position(|l| pred(l))
    }
}

/// Recovers the fields of one document type.
pub trait Extractor: Send + Sync {
    fn doc_type(&self) -> DocumentType;
    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap;
}

/// Maps each document type to its extractor; unknown types use the generic one.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentType, Box<dyn Extractor>>,
    fallback: GenericExtractor,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::standard(form::DEFAULT_FORM_LABEL_MAX_LEN)
    }
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self { extractors: HashMap::new(), fallback: GenericExtractor }
    }

    pub fn standard(form_label_max_len: usize) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PassportExtractor));
        registry.register(Box::new(AadhaarExtractor));
        registry.register(Box::new(PanExtractor));
        registry.register(Box::new(DrivingLicenseExtractor));
        registry.register(Box::new(InvoiceExtractor));
        registry.register(Box::new(VoterExtractor));
        registry.register(Box::new(FormExtractor::new(form_label_max_len)));
        registry.register(Box::new(StudentIdExtractor));
        registry.register(Box::new(GenericExtractor));
        registry
    }

    /// Replaces any extractor already registered for the same type.
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.insert(extractor.doc_type(), extractor);
    }

    pub fn get(&self, doc_type: DocumentType) -> &dyn Extractor {
        match self.extractors.get(&doc_type) {
            Some(extractor) => extractor.as_ref(),
            None => &self.fallback,
        }
    }

    pub fn extract(&self, doc_type: DocumentType, input: &ExtractionInput<'_>) -> ExtractedRecord {
        ExtractedRecord::new(doc_type, self.get(doc_type).extract(input))
    }
}

/// Text after a label match on the same line, cleaned; `None` when empty.
pub(crate) fn suffix_after(line: &str, label_end: usize) -> Option<String> {
    let rest = line.get(label_end..)?;
    let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || ":.-/".contains(c));
    let cleaned = crate::normalize::clean(rest);
    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriscan_core::{Line, NOT_DETECTED};

    struct FixedExtractor;

    impl Extractor for FixedExtractor {
        fn doc_type(&self) -> DocumentType {
            DocumentType::Invoice
        }
        fn extract(&self, _input: &ExtractionInput<'_>) -> FieldMap {
            let mut map = FieldMap::new();
            map.insert("vendor", "FIXED");
            map
        }
    }

    #[test]
    fn input_dedups_and_trims_lines() {
        let doc = Document::new(
            "",
            vec![Line::new(" A "), Line::new("A"), Line::new(""), Line::new("B")],
            vec![],
        );
        let n = Normalizer::default();
        let input = ExtractionInput::new(&doc, &n);
        assert_eq!(input.lines, vec!["A", "B"]);
        assert_eq!(input.raw_text, " A \nA\n\nB");
    }

    #[test]
    fn registry_covers_every_type() {
        let registry = ExtractorRegistry::default();
        for t in DocumentType::ALL {
            assert_eq!(registry.get(t).doc_type(), t);
        }
    }

    #[test]
    fn register_replaces_existing_extractor() {
        let mut registry = ExtractorRegistry::default();
        registry.register(Box::new(FixedExtractor));
        let doc = Document::from_lines(&["whatever"]);
        let n = Normalizer::default();
        let record = registry.extract(DocumentType::Invoice, &ExtractionInput::new(&doc, &n));
        assert_eq!(record.field("vendor"), Some("FIXED"));
    }

    #[test]
    fn empty_registry_falls_back_to_generic() {
        let registry = ExtractorRegistry::empty();
        let doc = Document::default();
        let n = Normalizer::default();
        let record = registry.extract(DocumentType::Passport, &ExtractionInput::new(&doc, &n));
        assert_eq!(record.doc_type, DocumentType::Passport);
        assert_eq!(record.field("raw_text"), Some(NOT_DETECTED));
    }

    #[test]
    fn suffix_after_strips_separators() {
        assert_eq!(suffix_after("Name: RAHUL", 4).as_deref(), Some("RAHUL"));
        assert_eq!(suffix_after("Name :  ", 4), None);
    }
}
