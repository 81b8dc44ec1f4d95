use veriscan_core::{DocumentType, FieldMap};

use super::{suffix_after, ExtractionInput, Extractor};
use crate::normalize::clean;
use crate::patterns::{digits_only, has_digit, parse_date, re};

re!(re_aadhaar_number, r"\b[0-9]{4}\s*[0-9]{4}\s*[0-9]{4}\b");
re!(re_name_anchor, r"(?i)DOB|Year|Male|Female");
re!(re_header, r"(?i)government|india|aadhaar|unique");
re!(re_year_of_birth, r"(?i)year\s*of\s*birth\s*[:\-]?\s*([0-9]{4})");
re!(re_female, r"(?i)\bfemale\b");
re!(re_male, r"(?i)\bmale\b");
re!(re_address_label, r"(?i)\baddress\b");
re!(re_pin_code, r"\b[0-9]{6}\b");

const KEYS: &[&str] = &["full_name", "id_number", "dob", "gender", "address"];
const MAX_ADDRESS_LINES: usize = 5;

/// Aadhaar cards: the 12-digit number, holder name, birth date, gender and,
/// on the back side, the postal address.
pub struct AadhaarExtractor;

impl AadhaarExtractor {
    fn is_name_candidate(input: &ExtractionInput<'_>, line: &str) -> bool {
        line.chars().count() > 3 && !has_digit(line) && !input.is_noise(line) && !re_header().is_match(line)
    }

    /// The name sits one or two lines above the DOB/gender line.
    fn name_above_anchor(input: &ExtractionInput<'_>) -> Option<String> {
        let anchor = input.position(|l| re_name_anchor().is_match(l))?;
        input.lines[anchor.saturating_sub(2)..anchor]
            .iter()
            .rev()
            .find(|l| Self::is_name_candidate(input, l))
            .map(|l| clean(l))
    }

    fn name_below_header(input: &ExtractionInput<'_>) -> Option<String> {
        let header = input.position(|l| l.to_uppercase().contains("GOVERNMENT"))?;
        input.lines.iter().skip(header + 1).take(3).find(|l| Self::is_name_candidate(input, l)).map(|l| clean(l))
    }

    fn address(input: &ExtractionInput<'_>) -> Option<String> {
        let start = input.position(|l| re_address_label().is_match(l))?;
        let label_line = input.lines[start];
        let mut parts: Vec<String> = Vec::new();
        if let Some(end) = re_address_label().find(label_line).map(|m| m.end()) {
            parts.extend(suffix_after(label_line, end));
        }
        for line in input.lines.iter().skip(start + 1) {
            if parts.len() >= MAX_ADDRESS_LINES || re_aadhaar_number().is_match(line) {
                break;
            }
            parts.push(clean(line));
            if re_pin_code().is_match(line) {
                break;
            }
        }
        parts.retain(|p| !p.is_empty());
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl Extractor for AadhaarExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::AadhaarCard
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(KEYS);
        let text = &input.raw_text;

        if let Some(m) = re_aadhaar_number().find(text) {
            let digits = digits_only(m.as_str());
            if digits.len() == 12 {
                fields.insert("id_number", format!("{} {} {}", &digits[0..4], &digits[4..8], &digits[8..12]));
            }
        }

        let dob = parse_date(text).or_else(|| {
            re_year_of_birth().captures(text).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
        });
        fields.fill("dob", dob);

        if re_female().is_match(text) {
            fields.insert("gender", "Female");
        } else if re_male().is_match(text) {
            fields.insert("gender", "Male");
        }

        fields.fill("full_name", Self::name_above_anchor(input).or_else(|| Self::name_below_header(input)));
        fields.fill("address", Self::address(input));
        fields
    }
}
