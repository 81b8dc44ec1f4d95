use tracing::info;
use veriscan_core::{Document, DocumentType, ExtractedRecord, MaskRegion};

use crate::classify::Classifier;
use crate::config::{ConfigError, PipelineConfig};
use crate::extractors::{ExtractionInput, ExtractorRegistry};
use crate::normalize::Normalizer;
use crate::redact::RedactionDeriver;

/// Classify, extract and derive masks for one merged [`Document`].
///
/// Immutable after construction; one instance can serve any number of
/// concurrent requests.
pub struct DocumentPipeline {
    normalizer: Normalizer,
    classifier: Classifier,
    registry: ExtractorRegistry,
    redaction: RedactionDeriver,
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new(Normalizer::default(), Classifier::default(), ExtractorRegistry::default(), RedactionDeriver::default())
    }
}

impl DocumentPipeline {
    pub fn new(
        normalizer: Normalizer,
        classifier: Classifier,
        registry: ExtractorRegistry,
        redaction: RedactionDeriver,
    ) -> Self {
        Self { normalizer, classifier, registry, redaction }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.normalizer(),
            Classifier::default(),
            ExtractorRegistry::standard(config.form_label_max_len),
            config.redaction()?,
        ))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn classify(&self, doc: &Document) -> DocumentType {
        self.classifier.classify(doc)
    }

    /// Run the extractor for `doc_type` regardless of what the classifier would pick.
    pub fn extract_as(&self, doc_type: DocumentType, doc: &Document) -> ExtractedRecord {
        let input = ExtractionInput::new(doc, &self.normalizer);
        self.registry.extract(doc_type, &input)
    }

    pub fn process(&self, doc: &Document) -> ExtractedRecord {
        let record = self.extract_as(self.classify(doc), doc);
        info!(
            doc_type = %record.doc_type,
            detected = record.fields.detected_count(),
            fields = record.fields.len(),
            "document processed"
        );
        record
    }

    pub fn redaction_masks(&self, doc: &Document) -> Vec<MaskRegion> {
        self.redaction.derive(&doc.words)
    }

    /// Masks for sensitive words plus every word carrying a detected value of `record`.
    pub fn record_masks(&self, doc: &Document, record: &ExtractedRecord) -> Vec<MaskRegion> {
        self.redaction.derive_for_record(&doc.words, record)
    }
}
