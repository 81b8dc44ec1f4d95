use tracing::debug;
use veriscan_core::{DocumentType, FieldMap, NOT_DETECTED};

use super::{ExtractionInput, Extractor, MANUAL_REVIEW};
use crate::normalize::{clean, clean_keeping, is_all_caps, to_field_key};
use crate::patterns::has_digit;

/// Labels at or above this many characters are prose, not field names.
pub const DEFAULT_FORM_LABEL_MAX_LEN: usize = 30;
const VALUE_MAX_LEN: usize = 100;
const VALUE_PUNCTUATION: &str = "@,";

/// Generic `label: value` forms.
///
/// Two passes over the lines: horizontal `Label: value` pairs first, then
/// vertical pairs where a short all-caps header line is followed by its value.
/// The vertical pass never overwrites a key the horizontal pass found.
pub struct FormExtractor {
    label_max_len: usize,
}

impl Default for FormExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FORM_LABEL_MAX_LEN)
    }
}

impl FormExtractor {
    pub fn new(label_max_len: usize) -> Self {
        Self { label_max_len }
    }

    fn horizontal(&self, lines: &[&str], fields: &mut FieldMap) {
        for line in lines {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            if label.chars().count() >= self.label_max_len {
                continue;
            }
            let key = to_field_key(label);
            let value = value.trim();
            let value = clean_keeping(value, VALUE_PUNCTUATION);
            if !key.is_empty() && value.chars().count() > 1 {
                fields.insert(key, value);
            }
        }
    }

    fn vertical(lines: &[&str], fields: &mut FieldMap) {
        for pair in lines.windows(2) {
            let (header, value) = (pair[0], pair[1]);
            let is_header =
                header.chars().count() > 4 && is_all_caps(header) && !has_digit(header) && !header.contains(':');
            let is_value = !value.contains(':') && value.chars().count() < VALUE_MAX_LEN;
            if !is_header || !is_value {
                continue;
            }
            let key = to_field_key(header);
            let value = clean_keeping(value, VALUE_PUNCTUATION);
            if !key.is_empty() && !value.is_empty() && !fields.contains_key(&key) {
                fields.insert(key, value);
            }
        }
    }
}

impl Extractor for FormExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::Form
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::new();
        self.horizontal(&input.lines, &mut fields);
        Self::vertical(&input.lines, &mut fields);

        if fields.detected_count() == 0 {
            debug!("form yielded no fields, returning full text for review");
            let text = input.raw_text.trim();
            fields.insert("full_document_text", if text.is_empty() { NOT_DETECTED } else { text });
            fields.insert("status", MANUAL_REVIEW);
        }

        let title = input
            .lines
            .iter()
            .find(|l| l.chars().count() > 5 && l.to_uppercase().contains("FORM"))
            .map(|l| clean(l));
        fields.fill("form_title", title);
        fields
    }
}
