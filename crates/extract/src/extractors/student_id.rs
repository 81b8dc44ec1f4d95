use veriscan_core::{DocumentType, FieldMap};

use super::{ExtractionInput, Extractor};
use crate::layout::tallest_line;
use crate::normalize::{clean, is_all_caps};
use crate::patterns::{has_digit, parse_date, re};

re!(re_id_label,
    r"(?i)\b(?:Reg|Roll|ID|Admn|Admission)[\s.]*(?:No|Number|#)?[\s.:\-]+([A-Z0-9]+)");
re!(re_id_anchor, r"(?i)\b(?:reg|roll|id|admn|admission)\b");
re!(re_id_token, r"\b[A-Za-z0-9]*\d[A-Za-z0-9]*\b");
re!(re_institution, r"(?i)college|school|university|institute|academy");

const KEYS: &[&str] = &["full_name", "id_number", "dob", "institution"];
const HEADER_LINES: usize = 6;

/// Student and staff ID cards. The holder's name is usually the largest
/// text on the card with no label next to it, so word geometry comes first.
pub struct StudentIdExtractor;

fn id_number(input: &ExtractionInput<'_>) -> Option<String> {
    let labelled = re_id_label()
        .captures_iter(&input.raw_text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|s| has_digit(s));
    if let Some(id) = labelled {
        return Some(id.to_string());
    }
    let idx = input.position(|l| re_id_anchor().is_match(l))?;
    input.lines[idx..]
        .iter()
        .take(2)
        .find_map(|l| re_id_token().find(l))
        .map(|m| m.as_str().to_string())
}

fn institution(input: &ExtractionInput<'_>) -> Option<String> {
    input
        .lines
        .iter()
        .take(HEADER_LINES)
        .find(|l| l.chars().count() > 4 && is_all_caps(l) && re_institution().is_match(l))
        .map(|l| clean(l))
}

fn name_candidate(input: &ExtractionInput<'_>, line: &str, institution: Option<&str>) -> bool {
    line.chars().count() >= 3
        && !has_digit(line)
        && !input.is_noise(line)
        && institution.map_or(true, |inst| !inst.contains(line))
}

/// Walk upward from the registration/roll line to the nearest clean line.
fn name_above_id_line(input: &ExtractionInput<'_>, institution: Option<&str>) -> Option<String> {
    let anchor = input.position(|l| re_id_anchor().is_match(l))?;
    input.lines[..anchor]
        .iter()
        .rev()
        .find(|l| name_candidate(input, l, institution))
        .map(|l| clean(l))
}

fn first_caps_line(input: &ExtractionInput<'_>, institution: Option<&str>) -> Option<String> {
    input
        .lines
        .iter()
        .find(|l| l.chars().count() > 4 && is_all_caps(l) && name_candidate(input, l, institution))
        .map(|l| clean(l))
}

impl Extractor for StudentIdExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::StudentId
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(KEYS);
        let institution = institution(input);

        let name = tallest_line(input.words, input.normalizer)
            .or_else(|| name_above_id_line(input, institution.as_deref()))
            .or_else(|| first_caps_line(input, institution.as_deref()));

        fields.fill("full_name", name);
        fields.fill("id_number", id_number(input));
        fields.fill("dob", parse_date(&input.raw_text));
        fields.fill("institution", institution);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use veriscan_core::{BBox, Document, Word, NOT_DETECTED};

    fn word(text: &str, x0: f32, y0: f32, height: f32) -> Word {
        Word::new(text, BBox::new(x0, y0, x0 + 12.0 * text.len() as f32, y0 + height), 90.0)
    }

    fn run(doc: &Document) -> FieldMap {
        let n = Normalizer::default();
        StudentIdExtractor.extract(&ExtractionInput::new(doc, &n))
    }

    #[test]
    fn tallest_visual_line_is_the_name() {
        let doc = Document::from_lines(&[
            "ALPHA ACADEMY",
            "Reg No: 2024001234",
            "DOB: 05-08-2006",
        ])
        .with_words(vec![
            word("ALPHA", 40.0, 20.0, 40.0),
            word("ACADEMY", 160.0, 22.0, 40.0),
            word("PRIYA", 40.0, 118.0, 44.0),
            word("KRISHNAN", 150.0, 121.0, 44.0),
            word("Reg", 40.0, 260.0, 14.0),
            word("No:", 90.0, 261.0, 14.0),
            word("2024001234", 140.0, 260.0, 14.0),
        ]);
        let f = run(&doc);
        assert_eq!(f.get("full_name"), Some("PRIYA KRISHNAN"));
        assert_eq!(f.get("id_number"), Some("2024001234"));
        assert_eq!(f.get("dob"), Some("05-08-2006"));
        assert_eq!(f.get("institution"), Some("ALPHA ACADEMY"));
    }

    #[test]
    fn without_words_the_name_sits_above_the_roll_line() {
        let doc = Document::from_lines(&[
            "CITY ENGINEERING COLLEGE",
            "STUDENT IDENTITY CARD",
            "Priya Deshmukh",
            "Roll Number - CS21B042",
        ]);
        let f = run(&doc);
        assert_eq!(f.get("full_name"), Some("Priya Deshmukh"));
        assert_eq!(f.get("id_number"), Some("CS21B042"));
        assert_eq!(f.get("institution"), Some("CITY ENGINEERING COLLEGE"));
    }

    #[test]
    fn id_label_value_on_next_line() {
        let doc = Document::from_lines(&["GREENFIELD SCHOOL", "ARUN KUMAR", "Admission No", "4471"]);
        let f = run(&doc);
        assert_eq!(f.get("id_number"), Some("4471"));
        assert_eq!(f.get("full_name"), Some("ARUN KUMAR"));
    }

    #[test]
    fn caps_fallback_without_anchor() {
        let doc = Document::from_lines(&["GREENFIELD SCHOOL", "ARUN KUMAR", "Class 7"]);
        let f = run(&doc);
        assert_eq!(f.get("full_name"), Some("ARUN KUMAR"));
        assert_eq!(f.get("id_number"), Some(NOT_DETECTED));
    }
}
