use veriscan_core::{DocumentType, FieldMap};

use super::{ExtractionInput, Extractor};
use crate::normalize::{clean, is_letters_only};
use crate::patterns::{parse_date, re};

re!(re_pan_number, r"\b[A-Z]{5}[0-9]{4}[A-Z]\b");
re!(re_header, r"(?i)INCOME|TAX|GOVT|INDIA");
re!(re_pan_label, r"(?i)permanent\s+account|\bpan\b");

const KEYS: &[&str] = &["full_name", "father_name", "pan_number", "dob"];

/// PAN cards. The holder's name is the first clean line under the
/// Income Tax header and the father's name the one after it.
pub struct PanExtractor;

impl Extractor for PanExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::PanCard
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(KEYS);
        fields.fill("pan_number", re_pan_number().find(&input.raw_text).map(|m| m.as_str().to_string()));
        fields.fill("dob", parse_date(&input.raw_text));

        let start = input.position(|l| re_header().is_match(l)).map_or(0, |i| i + 1);
        let mut names = input.lines[start..]
            .iter()
            .filter(|l| {
                l.chars().count() > 2
                    && is_letters_only(l)
                    && !input.is_noise(l)
                    && !re_pan_label().is_match(l)
            })
            .map(|l| clean(l));
        fields.fill("full_name", names.next());
        fields.fill("father_name", names.next());
        fields
    }
}
