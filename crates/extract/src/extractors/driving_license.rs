use veriscan_core::{DocumentType, FieldMap};

use super::{suffix_after, ExtractionInput, Extractor};
use crate::classify::is_indian_license;
use crate::normalize::{clean, is_all_caps, is_letters_only};
use crate::patterns::{all_dates, has_digit, parse_date, re, year_of};
use crate::util::similarity;

re!(re_dl_label, r"(?i)\bDL\s*No\b\.?");
re!(re_indian_number, r"\b[A-Z]{2}[-\s]?\d{2}[-\s]?\d{4,}\b");
re!(re_name_label, r"(?i)\bname\b");
re!(re_relation, r"(?i)father|husband|guardian|\b[SDW]\s*/\s*O\b");
re!(re_jurisdiction, r"(?i)union\s+of\s+india|\bstate\b|transport|licen[cs]e|motor");
re!(re_license_number, r"(?i)\b(?:DLN|DL|LIC(?:ENSE)?(?:\s*NO)?)[\s:#.]*([A-Z0-9]{5,15})\b");
re!(re_generic_number, r"\b[A-Z0-9]{8,15}\b");
re!(re_dob_label, r"(?i)\bDOB\b");
re!(re_aamva_surname, r"^1\s+([A-Z][A-Z' \-]+)$");
re!(re_aamva_given, r"^2\s+([A-Z][A-Z' \-]+)$");

const KEYS: &[&str] = &["full_name", "id_number", "dob"];
const NAME_SCAN_LINES: usize = 6;
const FUZZY_LABEL_MIN: f32 = 0.75;

/// Driving licences. Indian cards and the rest (US, AAMVA style) carry
/// different layouts, told apart by the same keyword test the classifier uses.
pub struct DrivingLicenseExtractor;

fn plausible_name(value: &str, input: &ExtractionInput<'_>) -> Option<String> {
    let value = clean(value);
    (value.chars().count() > 2 && !has_digit(&value) && !input.is_noise(&value)).then_some(value)
}

fn caps_name_line(line: &str, input: &ExtractionInput<'_>, min_len: usize) -> bool {
    line.chars().count() > min_len && is_all_caps(line) && is_letters_only(line) && !input.is_noise(line)
}

// ── Indian licences ──────────────────────────────────────────────────────────

fn indian_number(input: &ExtractionInput<'_>) -> Option<String> {
    let labelled = input.lines.iter().find_map(|l| {
        let end = re_dl_label().find(l)?.end();
        re_indian_number().find(&l[end..]).map(|m| m.as_str().to_string())
    });
    labelled.or_else(|| re_indian_number().find(&input.raw_text).map(|m| m.as_str().to_string()))
}

fn indian_name(input: &ExtractionInput<'_>) -> Option<String> {
    let labelled = input
        .position(|l| re_name_label().is_match(l) && !re_relation().is_match(l))
        .and_then(|idx| {
            let line = input.lines[idx];
            let end = re_name_label().find(line)?.end();
            suffix_after(line, end)
                .and_then(|v| plausible_name(&v, input))
                .or_else(|| plausible_name(input.lines.get(idx + 1)?, input))
        });
    labelled.or_else(|| {
        let anchor = input.position(|l| re_jurisdiction().is_match(l))?;
        input
            .lines
            .iter()
            .skip(anchor + 1)
            .take(NAME_SCAN_LINES)
            .find(|l| caps_name_line(l, input, 3))
            .map(|l| clean(l))
    })
}

/// Earliest date on the card by year, ties kept in text order. Birth
/// normally precedes issue and expiry.
fn earliest_date(text: &str) -> Option<String> {
    let mut dates = all_dates(text);
    dates.sort_by_key(|d| year_of(d).unwrap_or(i32::MAX));
    dates.into_iter().next()
}

// ── Other licences ───────────────────────────────────────────────────────────

fn other_number(input: &ExtractionInput<'_>) -> Option<String> {
    let labelled = re_license_number()
        .captures_iter(&input.raw_text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|s| has_digit(s));
    labelled
        .or_else(|| re_generic_number().find_iter(&input.raw_text).map(|m| m.as_str()).find(|s| has_digit(s)))
        .map(str::to_uppercase)
}

/// A line whose first token reads like "Name" despite OCR damage.
fn fuzzy_labelled_name(input: &ExtractionInput<'_>) -> Option<String> {
    input.lines.iter().enumerate().find_map(|(idx, line)| {
        let (first, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let token: String = first.chars().filter(|c| c.is_alphabetic()).collect();
        if token.is_empty() || similarity(&token, "name") < FUZZY_LABEL_MIN {
            return None;
        }
        let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '-');
        plausible_name(rest, input).or_else(|| plausible_name(input.lines.get(idx + 1)?, input))
    })
}

fn aamva_name(input: &ExtractionInput<'_>) -> Option<String> {
    let field = |re: &regex::Regex| {
        input.lines.iter().find_map(|l| re.captures(l).and_then(|c| c.get(1)).map(|m| clean(m.as_str())))
    };
    let surname = field(re_aamva_surname())?;
    Some(match field(re_aamva_given()) {
        Some(given) => format!("{given} {surname}"),
        None => surname,
    })
}

fn other_name(input: &ExtractionInput<'_>) -> Option<String> {
    fuzzy_labelled_name(input).or_else(|| aamva_name(input)).or_else(|| {
        input.lines.iter().find(|l| caps_name_line(l, input, 4)).map(|l| clean(l))
    })
}

fn other_dob(input: &ExtractionInput<'_>) -> Option<String> {
    input
        .lines
        .iter()
        .find_map(|l| re_dob_label().find(l).and_then(|m| parse_date(&l[m.end()..])))
        .or_else(|| parse_date(&input.raw_text))
}

impl Extractor for DrivingLicenseExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::DrivingLicense
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(KEYS);
        if is_indian_license(&input.raw_text.to_uppercase()) {
            fields.fill("id_number", indian_number(input));
            fields.fill("full_name", indian_name(input));
            fields.fill("dob", earliest_date(&input.raw_text));
        } else {
            fields.fill("id_number", other_number(input));
            fields.fill("full_name", other_name(input));
            fields.fill("dob", other_dob(input));
        }
        fields
    }
}
