use tracing::debug;
use veriscan_core::{Document, DocumentType};

use crate::patterns::re;

re!(re_passport_word, r"(?i)passport|passeport");
re!(re_invoice, r"(?i)invoice|bill\s*to|total\s*due|amount\s*due");
re!(re_aadhaar_number, r"[0-9]{4}\s[0-9]{4}\s[0-9]{4}");
re!(re_pan_number, r"[A-Z]{5}[0-9]{4}[A-Z]");
re!(re_indian_dl,
    r"(?i)driving\s*licen[cs]e|transport|motor\s*vehicle|licen[cs]ing\s*authority|\bDL\s*No\b");
re!(re_usa, r"\bUSA\b");
re!(re_voter, r"(?i)election|elector|voter");
re!(re_other_license, r"(?i)driver|licen[cs]e|\bDLN\b");
re!(re_student,
    r"(?i)student|college|school|university|academy|institute|\bclass\b|identity");
re!(re_form_word, r"(?i)\bform\b|\bapplication\b");
re!(re_label_line, r"^[A-Za-z][A-Za-z .'/()\-]{0,28}:\s*\S");

/// Indian licence keywords present and no standalone "USA".
pub(crate) fn is_indian_license(upper: &str) -> bool {
    re_indian_dl().is_match(upper) && !re_usa().is_match(upper)
}

/// What the predicates look at: the uppercased text of every side, plus lines.
pub struct Signals<'a> {
    pub upper: String,
    pub lines: Vec<&'a str>,
}

impl<'a> Signals<'a> {
    pub fn from_document(doc: &'a Document) -> Self {
        Self {
            upper: doc.effective_text().to_uppercase(),
            lines: doc.line_texts().into_iter().map(str::trim).collect(),
        }
    }
}

/// One step of the cascade.
pub struct ClassificationRule {
    pub name: &'static str,
    pub doc_type: DocumentType,
    matches: fn(&Signals<'_>) -> bool,
}

impl ClassificationRule {
    pub fn new(name: &'static str, doc_type: DocumentType, matches: fn(&Signals<'_>) -> bool) -> Self {
        Self { name, doc_type, matches }
    }

    pub fn is_match(&self, signals: &Signals<'_>) -> bool {
        (self.matches)(signals)
    }
}

/// Ordered cascade of predicates; the first match wins, anything else is
/// [`DocumentType::GenericDocument`].
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(standard_rules())
    }
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    pub fn classify(&self, doc: &Document) -> DocumentType {
        let signals = Signals::from_document(doc);
        match self.rules.iter().find(|r| r.is_match(&signals)) {
            Some(rule) => {
                debug!(rule = rule.name, doc_type = %rule.doc_type, "classification rule matched");
                rule.doc_type
            }
            None => {
                debug!("no classification rule matched");
                DocumentType::GenericDocument
            }
        }
    }
}

/// The standard cascade. MRZ markers come before every keyword test so a
/// passport page is never mistaken for anything looser.
pub fn standard_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new("passport", DocumentType::Passport, |s| {
            s.lines.iter().any(|l| l.contains("<<")) || re_passport_word().is_match(&s.upper)
        }),
        ClassificationRule::new("invoice", DocumentType::Invoice, |s| re_invoice().is_match(&s.upper)),
        ClassificationRule::new("aadhaar", DocumentType::AadhaarCard, |s| {
            re_aadhaar_number().is_match(&s.upper) || s.upper.contains("AADHAAR")
        }),
        ClassificationRule::new("pan", DocumentType::PanCard, |s| re_pan_number().is_match(&s.upper)),
        ClassificationRule::new("indian_driving_license", DocumentType::DrivingLicense, |s| {
            is_indian_license(&s.upper)
        }),
        ClassificationRule::new("voter", DocumentType::VoterId, |s| re_voter().is_match(&s.upper)),
        ClassificationRule::new("other_driving_license", DocumentType::DrivingLicense, |s| {
            re_other_license().is_match(&s.upper)
        }),
        ClassificationRule::new("student_id", DocumentType::StudentId, |s| re_student().is_match(&s.upper)),
        ClassificationRule::new("form", DocumentType::Form, |s| {
            re_form_word().is_match(&s.upper)
                || s.lines.iter().filter(|l| re_label_line().is_match(l)).count() >= 2
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(lines: &[&str]) -> DocumentType {
        Classifier::default().classify(&Document::from_lines(lines))
    }

    #[test]
    fn empty_input_is_generic() {
        assert_eq!(Classifier::default().classify(&Document::default()), DocumentType::GenericDocument);
    }

    #[test]
    fn mrz_marker_beats_invoice_keyword() {
        let t = classify(&["INVOICE", "P<INDSHARMA<<RAHUL<<<<<<<<<<<<<<<<<<<<<<<<<<<<<"]);
        assert_eq!(t, DocumentType::Passport);
    }

    #[test]
    fn passport_word_in_french() {
        assert_eq!(classify(&["REPUBLIQUE FRANCAISE", "PASSEPORT"]), DocumentType::Passport);
    }

    #[test]
    fn invoice_keywords() {
        assert_eq!(classify(&["ACME LTD", "Bill To:", "Jane Doe"]), DocumentType::Invoice);
        assert_eq!(classify(&["Amount Due $40.00"]), DocumentType::Invoice);
    }

    #[test]
    fn grouped_twelve_digits_is_aadhaar() {
        assert_eq!(classify(&["GOVERNMENT OF INDIA", "1234 5678 9012"]), DocumentType::AadhaarCard);
        assert_eq!(classify(&["Aadhaar"]), DocumentType::AadhaarCard);
    }

    #[test]
    fn pan_pattern_without_grouped_digits() {
        assert_eq!(classify(&["INCOME TAX DEPARTMENT", "ABCDE1234F"]), DocumentType::PanCard);
    }

    #[test]
    fn indian_license_vs_usa_license() {
        assert_eq!(classify(&["MAHARASHTRA", "DRIVING LICENCE"]), DocumentType::DrivingLicense);
        assert_eq!(classify(&["USA", "DRIVER LICENSE"]), DocumentType::DrivingLicense);
        // USA disables the Indian rule, so the looser ID keywords decide.
        assert_eq!(classify(&["USA", "TRANSPORT", "VOTER"]), DocumentType::VoterId);
    }

    #[test]
    fn voter_student_and_form() {
        assert_eq!(classify(&["ELECTION COMMISSION OF INDIA"]), DocumentType::VoterId);
        assert_eq!(classify(&["ALPHA ACADEMY", "PRIYA KRISHNAN"]), DocumentType::StudentId);
        assert_eq!(classify(&["Name: Jo", "Email: jo@x.io"]), DocumentType::Form);
        assert_eq!(classify(&["Membership Application"]), DocumentType::Form);
    }

    #[test]
    fn single_label_line_is_not_a_form() {
        assert_eq!(classify(&["Email: a@b.com", "hello"]), DocumentType::GenericDocument);
    }

    #[test]
    fn classification_is_deterministic() {
        let doc = Document::from_lines(&["INCOME TAX DEPARTMENT", "RAHUL SHARMA", "ABCDE1234F"]);
        let c = Classifier::default();
        assert_eq!(c.classify(&doc), c.classify(&doc.clone()));
    }

    #[test]
    fn rule_order_is_stable() {
        let names: Vec<_> = Classifier::default().rule_names().collect();
        assert_eq!(names.first(), Some(&"passport"));
        assert_eq!(names.last(), Some(&"form"));
        assert_eq!(names.len(), 9);
    }
}
