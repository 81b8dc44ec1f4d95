use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::geometry::Word;

/// Joins the raw text of the two sides of a card. Multi-character, so no
/// single-separator date or ID pattern can bridge the front and back.
pub const SIDE_SEPARATOR: &str = "\n----\n";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), words: Vec::new() }
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::new(text)
    }
}

/// OCR output for one physical side (or several merged passes/sides).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, alias = "rawText")]
    pub raw_text: String,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Document {
    pub fn new(raw_text: impl Into<String>, lines: Vec<Line>, words: Vec<Word>) -> Self {
        Self { raw_text: raw_text.into(), lines, words }
    }

    /// Build from plain engine text: one line per non-blank text line.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(Line::new)
            .collect();
        Self { raw_text: text.to_string(), lines, words: Vec::new() }
    }

    /// Build from already segmented lines; raw text is the lines joined by newlines.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let raw_text = lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
        Self {
            raw_text,
            lines: lines.iter().map(|l| Line::new(l.as_ref())).collect(),
            words: Vec::new(),
        }
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    /// Fill whichever of `raw_text` and `lines` the collaborator left empty
    /// from the other one.
    pub fn complete(mut self) -> Self {
        if self.lines.is_empty() {
            self.lines = self
                .raw_text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(Line::new)
                .collect();
        } else if self.raw_text.trim().is_empty() {
            self.raw_text = self.effective_text();
        }
        self
    }

    /// Front + back of one submission: lines and words appended in side order.
    pub fn combine_sides(front: Document, back: Option<Document>) -> Document {
        let Some(back) = back else {
            return front;
        };
        let mut combined = front.complete();
        let back = back.complete();
        combined.raw_text = format!("{}{}{}", combined.raw_text, SIDE_SEPARATOR, back.raw_text);
        combined.lines.extend(back.lines);
        combined.words.extend(back.words);
        combined
    }

    /// Union of two OCR passes over the same image. Lines are trimmed and
    /// deduplicated by exact text (first occurrence wins); words are concatenated.
    pub fn merge_passes(first: Document, second: Document) -> Document {
        let raw_text = match (first.raw_text.trim().is_empty(), second.raw_text.trim().is_empty()) {
            (true, _) => second.raw_text,
            (_, true) => first.raw_text,
            _ => format!("{}\n{}", first.raw_text, second.raw_text),
        };

        let mut seen = HashSet::new();
        let lines = first
            .lines
            .into_iter()
            .chain(second.lines)
            .filter_map(|mut line| {
                let trimmed = line.text.trim();
                if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
                    return None;
                }
                line.text = trimmed.to_string();
                Some(line)
            })
            .collect();

        let mut words = first.words;
        words.extend(second.words);

        Document { raw_text, lines, words }
    }

    /// Raw text if the collaborator supplied any, otherwise the lines joined.
    pub fn effective_text(&self) -> String {
        if self.raw_text.trim().is_empty() {
            self.lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n")
        } else {
            self.raw_text.clone()
        }
    }

    /// Line texts in reading order; raw text split on newlines when the
    /// collaborator sent no segmented lines.
    pub fn line_texts(&self) -> Vec<&str> {
        if self.lines.is_empty() {
            self.raw_text.lines().collect()
        } else {
            self.lines.iter().map(|l| l.text.as_str()).collect()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_text.trim().is_empty()
            && self.lines.iter().all(|l| l.text.trim().is_empty())
            && self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;

    #[test]
    fn from_text_drops_blank_lines() {
        let doc = Document::from_text("  PASSPORT \n\n   \nP<INDSHARMA<<RAHUL\n");
        let texts: Vec<_> = doc.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["PASSPORT", "P<INDSHARMA<<RAHUL"]);
    }

    #[test]
    fn combine_sides_keeps_side_order_and_separator() {
        let front = Document::from_lines(&["FRONT 1", "FRONT 2"]);
        let back = Document::from_lines(&["BACK 1"]);
        let doc = Document::combine_sides(front, Some(back));
        assert_eq!(doc.lines.len(), 3);
        assert_eq!(doc.lines[2].text, "BACK 1");
        assert_eq!(doc.raw_text, "FRONT 1\nFRONT 2\n----\nBACK 1");
    }

    #[test]
    fn combine_without_back_is_identity() {
        let front = Document::from_lines(&["ONLY"]);
        assert_eq!(Document::combine_sides(front.clone(), None), front);
    }

    #[test]
    fn combine_completes_half_filled_sides() {
        let front = Document::new("GOVERNMENT OF INDIA\n\nRAHUL SHARMA", vec![], vec![]);
        let back = Document::new("", vec![Line::new("1234 5678 9012")], vec![]);
        let doc = Document::combine_sides(front, Some(back));
        let texts: Vec<_> = doc.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["GOVERNMENT OF INDIA", "RAHUL SHARMA", "1234 5678 9012"]);
        assert!(doc.raw_text.ends_with("1234 5678 9012"));
    }

    #[test]
    fn merge_passes_dedups_lines_and_concatenates_words() {
        let word = Word::new("RAHUL", BBox::new(0.0, 0.0, 40.0, 12.0), 91.0);
        let a = Document::from_lines(&["RAHUL SHARMA", "DOB: 12-04-1990"]).with_words(vec![word.clone()]);
        let b = Document::from_lines(&[" RAHUL SHARMA ", "ALPHA ACADEMY"]).with_words(vec![word]);
        let merged = Document::merge_passes(a, b);
        let texts: Vec<_> = merged.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["RAHUL SHARMA", "DOB: 12-04-1990", "ALPHA ACADEMY"]);
        assert_eq!(merged.words.len(), 2);
    }

    #[test]
    fn merge_with_empty_pass_keeps_other_text() {
        let a = Document::default();
        let b = Document::from_text("INVOICE");
        assert_eq!(Document::merge_passes(a, b).raw_text, "INVOICE");
    }

    #[test]
    fn effective_text_falls_back_to_lines() {
        let doc = Document::new("", vec![Line::new("A"), Line::new("B")], vec![]);
        assert_eq!(doc.effective_text(), "A\nB");
    }

    #[test]
    fn line_texts_fall_back_to_raw_text() {
        let doc = Document::new("A\n\nB", vec![], vec![]);
        assert_eq!(doc.line_texts(), vec!["A", "", "B"]);
        assert_eq!(Document::from_lines(&["X"]).line_texts(), vec!["X"]);
    }

    #[test]
    fn deserializes_camel_case_raw_text() {
        let doc: Document = serde_json::from_str(r#"{"rawText":"X","lines":[{"text":"X"}]}"#).unwrap();
        assert_eq!(doc.raw_text, "X");
        assert!(doc.words.is_empty());
        assert!(!doc.is_empty());
    }
}
