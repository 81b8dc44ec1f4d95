use veriscan_core::{DocumentType, FieldMap};

use super::{ExtractionInput, Extractor};
use crate::normalize::clean;
use crate::patterns::re;

re!(re_header, r"(?i)election\s+commission|identity\s+card|india|government");
re!(re_epic, r"(?i)\b[A-Z]{2}[A-Z0-9][0-9IO]{7}\b");
re!(re_dob, r"\d{2}[-./]\d{2}[-./]\d{4}");
re!(re_age, r"(?i)\bage\b");
re!(re_gender, r"(?i)male|female|transgender|mahila|purush");
re!(re_constituency, r"(?i)constituency|assembly");
re!(re_bare_label, r"(?i)^(?:name|father)\s*[:\-]*$");
re!(re_name_label, r"(?i)name\s*[:\-]");
re!(re_relation, r"(?i)father|husband");
re!(re_english, r"^[A-Za-z0-9\s.\-():]+$");
re!(re_value_split, r"[:\-]");

const KEYS: &[&str] = &["full_name", "father_name", "gender", "dob", "voter_id", "constituency"];

/// Voter ID (EPIC) cards. Hard fields are pulled out of the candidate pool
/// first so that whatever remains is names.
pub struct VoterExtractor;

/// Splits `pool` into the first line matching `pred` and every other line.
fn take_first<'a>(pool: Vec<&'a str>, pred: impl Fn(&str) -> bool) -> (Option<&'a str>, Vec<&'a str>) {
    match pool.iter().position(|l| pred(l)) {
        Some(idx) => {
            let rest = pool.iter().enumerate().filter(|(i, _)| *i != idx).map(|(_, l)| *l).collect();
            (Some(pool[idx]), rest)
        }
        None => (None, pool),
    }
}

/// EPIC numbers are three letters and seven digits; OCR swaps `1`/`I` and `0`/`O`.
fn correct_epic(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .enumerate()
        .map(|(i, c)| match (i < 3, c) {
            (true, '1') => 'I',
            (true, '0') => 'O',
            (false, 'O') => '0',
            (false, 'I') => '1',
            _ => c,
        })
        .collect()
}

/// Text after the last `:`/`-` of a labelled line.
fn labelled_value(line: &str) -> Option<String> {
    let value = clean(re_value_split().split(line).last()?);
    (!value.is_empty()).then_some(value)
}

fn gender_of(line: &str) -> Option<&'static str> {
    let lower = line.to_lowercase();
    if lower.contains("transgender") {
        Some("Transgender")
    } else if lower.contains("female") || lower.contains("mahila") {
        Some("Female")
    } else if lower.contains("male") || lower.contains("purush") {
        Some("Male")
    } else {
        None
    }
}

impl VoterExtractor {
    fn pick_name<'a>(
        input: &ExtractionInput<'_>,
        candidates: Vec<&'a str>,
        explicit: impl Fn(&str) -> bool,
    ) -> (Option<String>, Vec<&'a str>) {
        let (labelled, rest) = take_first(candidates, explicit);
        if let Some(line) = labelled {
            return (labelled_value(line), rest);
        }
        let fallback = rest
            .iter()
            .position(|l| re_english().is_match(l) && !input.is_noise(l))
            .or_else(|| rest.iter().position(|l| !input.is_noise(l)));
        match fallback {
            Some(idx) => {
                let value = clean(rest[idx]);
                let remaining = rest.iter().enumerate().filter(|(i, _)| *i != idx).map(|(_, l)| *l).collect();
                ((!value.is_empty()).then_some(value), remaining)
            }
            None => (None, rest),
        }
    }
}

impl Extractor for VoterExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::VoterId
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(KEYS);
        let pool: Vec<&str> = input
            .lines
            .iter()
            .copied()
            .filter(|l| l.chars().count() > 2 && !re_header().is_match(l))
            .collect();

        let (id_line, pool) = take_first(pool, |l| re_epic().is_match(l));
        fields.fill("voter_id", id_line.and_then(|l| re_epic().find(l)).map(|m| correct_epic(m.as_str())));

        let (dob_line, pool) = take_first(pool, |l| re_dob().is_match(l) || re_age().is_match(l));
        if let Some(line) = dob_line {
            let dob = match re_dob().find(line) {
                Some(m) => m.as_str().replace(['.', '/'], "-"),
                None => clean(line),
            };
            fields.fill("dob", Some(dob));
        }

        let (gender_line, pool) = take_first(pool, |l| re_gender().is_match(l));
        if let Some(gender) = gender_line.and_then(gender_of) {
            fields.insert("gender", gender);
        }

        let (constituency_line, pool) = take_first(pool, |l| re_constituency().is_match(l));
        fields.fill("constituency", constituency_line.and_then(labelled_value));

        let candidates: Vec<&str> = pool.into_iter().filter(|l| !re_bare_label().is_match(l)).collect();
        let (name, candidates) = Self::pick_name(input, candidates, |l| {
            re_name_label().is_match(l) && !re_relation().is_match(l)
        });
        let (father, _) = Self::pick_name(input, candidates, |l| re_relation().is_match(l));
        fields.fill("full_name", name);
        fields.fill("father_name", father);
        fields
    }
}
