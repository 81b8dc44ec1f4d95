use regex::Regex;
use tracing::debug;
use veriscan_core::{DocumentType, FieldMap};

use super::{suffix_after, ExtractionInput, Extractor};
use crate::normalize::{clean, Normalizer};
use crate::patterns::{format_mrz_date, parse_date, re};

re!(re_surname_label, r"(?i)\b(?:surname|nom)\b");
re!(re_given_label, r"(?i)\b(?:given\s+names?|pr[eé]noms?)\b");
re!(re_passport_number, r"\b[A-Z]\d{7}\b");
re!(re_printed_name, r"^[A-Z][A-Z' \-]*[A-Z]$");

const KEYS: &[&str] = &[
    "full_name",
    "surname",
    "given_names",
    "id_number",
    "nationality",
    "dob",
    "sex",
    "issuing_country",
    "mrz_check",
];

/// The machine-readable zone of a TD3/TD2 document: the name line and, when
/// OCR kept it, the data line after it.
#[derive(Debug, Clone, PartialEq)]
struct Mrz {
    names: String,
    data: Option<String>,
}

fn mrz_compact(line: &str) -> Option<String> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
    compact
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<')
        .then_some(compact)
}

fn find_mrz(lines: &[&str]) -> Option<Mrz> {
    lines.iter().enumerate().find_map(|(i, line)| {
        let names = mrz_compact(line)?;
        let valid = names.len() >= 10
            && (names.starts_with('P') || names.starts_with('I'))
            && names.contains("<<");
        if !valid {
            return None;
        }
        let data = lines.get(i + 1).and_then(|l| mrz_compact(l)).filter(|l| l.len() >= 20);
        Some(Mrz { names, data })
    })
}

/// ICAO 9303 check digit: weights 7-3-1, letters A=10.., filler `<` = 0.
fn mrz_check_digit(field: &str) -> u32 {
    field
        .chars()
        .zip([7u32, 3, 1].into_iter().cycle())
        .map(|(c, w)| {
            let value = match c {
                '0'..='9' => c as u32 - '0' as u32,
                'A'..='Z' => c as u32 - 'A' as u32 + 10,
                _ => 0,
            };
            value * w
        })
        .sum::<u32>()
        % 10
}

fn check_matches(field: &str, check: Option<char>) -> bool {
    check.and_then(|c| c.to_digit(10)) == Some(mrz_check_digit(field))
}

fn mrz_name_part(part: &str) -> String {
    part.split('<').filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ")
}

impl Mrz {
    /// `(surname, given names)` from the name line, positions 5 onward.
    fn names(&self) -> Option<(String, String)> {
        let body = self.names.get(5..)?;
        let (surname, given) = body.split_once("<<").unwrap_or((body, ""));
        let surname = mrz_name_part(surname);
        (!surname.is_empty()).then(|| (surname, mrz_name_part(given)))
    }

    fn issuing_country(&self) -> Option<String> {
        let code = self.names.get(2..5)?.trim_matches('<');
        (code.len() == 3).then(|| code.to_string())
    }
}

fn printed_name(value: &str, normalizer: &Normalizer) -> Option<String> {
    let value = clean(value);
    (value.chars().count() > 2 && re_printed_name().is_match(&value) && !normalizer.is_noise(&value))
        .then_some(value)
}

/// Visual-zone fallback: value after the label on the same line, else the next line.
fn labelled_name(input: &ExtractionInput<'_>, label: &Regex) -> Option<String> {
    let idx = input.position(|l| label.is_match(l))?;
    let line = input.lines[idx];
    let label_end = label.find_iter(line).last()?.end();
    suffix_after(line, label_end)
        .and_then(|v| printed_name(&v, input.normalizer))
        .or_else(|| printed_name(input.lines.get(idx + 1)?, input.normalizer))
}

/// Passport bio-data pages.
pub struct PassportExtractor;

impl Extractor for PassportExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::Passport
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(KEYS);
        let mrz = find_mrz(&input.lines);

        if let Some(mrz) = &mrz {
            debug!(has_data_line = mrz.data.is_some(), "passport MRZ located");
            if let Some((surname, given)) = mrz.names() {
                fields.fill("full_name", Some(format!("{given} {surname}").trim().to_string()));
                fields.fill("surname", Some(surname));
                fields.fill("given_names", Some(given));
            }
            fields.fill("issuing_country", mrz.issuing_country());

            if let Some(data) = &mrz.data {
                let number = &data[0..9];
                let birth: String = data[13..19].chars().map(|c| if c == 'O' { '0' } else { c }).collect();

                fields.fill("id_number", Some(number.trim_end_matches('<').to_string()));
                let nationality = data[10..13].trim_matches('<');
                if nationality.len() == 3 && nationality.chars().all(|c| c.is_ascii_uppercase()) {
                    fields.insert("nationality", nationality);
                }
                fields.fill("dob", format_mrz_date(&birth));
                match data.chars().nth(20) {
                    Some('M') => fields.insert("sex", "Male"),
                    Some('F') => fields.insert("sex", "Female"),
                    _ => {}
                }
                let valid = check_matches(number, data.chars().nth(9))
                    && check_matches(&birth, data.chars().nth(19));
                fields.insert("mrz_check", if valid { "Valid" } else { "Invalid" });
            }
        }

        if !fields.is_detected("full_name") {
            let surname = labelled_name(input, re_surname_label());
            let given = labelled_name(input, re_given_label());
            if surname.is_some() || given.is_some() {
                let full = format!("{} {}", given.as_deref().unwrap_or(""), surname.as_deref().unwrap_or(""));
                fields.fill("full_name", Some(full.trim().to_string()));
                fields.fill("surname", surname);
                fields.fill("given_names", given);
            }
        }

        if !fields.is_detected("id_number") {
            fields.fill("id_number", re_passport_number().find(&input.raw_text).map(|m| m.as_str().to_string()));
        }
        if !fields.is_detected("dob") {
            fields.fill("dob", parse_date(&input.raw_text));
        }

        fields
    }
}
