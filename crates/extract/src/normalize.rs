/// Administrative boilerplate, field labels and card codes that must never be
/// taken for a person's name.
pub const DEFAULT_NOISE_WORDS: &[&str] = &[
    // Institutions
    "COLLEGE", "ENGINEERING", "INSTITUTE", "UNIVERSITY", "TECHNOLOGY", "CAMPUS", "ACADEMY",
    "SCHOOL", "TRUST", "EDUCATION", "PRINCIPAL",
    // Government headers
    "GOVT", "GOVERNMENT", "INCOME", "TAX", "DEPARTMENT", "REPUBLIC", "INDIA", "UNION", "STATE",
    "MOTOR", "VEHICLE", "DRIVING", "LICENCE", "LICENSE", "IDENTITY", "CARD", "RULE", "FORM",
    // Commercial
    "INVOICE", "BILL", "TOTAL", "AMOUNT", "SUBTOTAL", "GST", "DUE",
    // Web
    "WWW", "HTTP", "COM", "ORG", "NET",
    // Field labels
    "SIGNATURE", "ADDRESS", "PHONE", "CELL", "VALID", "UPTO", "ISSUED", "DATE", "HOLDER", "MALE",
    "FEMALE", "DOB", "YEAR", "CLASS", "STUDENT", "FATHER", "MOTHER", "ROLL", "NO", "REG", "NAME",
    "SURNAME", "GIVEN", "SEX",
    // Physical description, colour and blood-group codes
    "EYES", "HGT", "WGT", "BRO", "BLK", "BLU", "GRN", "HAIR", "DONOR", "BLOOD", "A+", "B+", "O+",
    "AB+",
];

/// Noise detection over an injected word set. Built once, then read-only.
#[derive(Debug, Clone)]
pub struct Normalizer {
    noise_words: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_WORDS.iter().copied())
    }
}

impl Normalizer {
    pub fn new<I, S>(noise_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = noise_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.sort();
        words.dedup();
        Self { noise_words: words }
    }

    /// Copy of this normalizer with additional noise words.
    pub fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let merged = self
            .noise_words
            .iter()
            .cloned()
            .chain(extra.into_iter().map(|w| w.as_ref().to_string()))
            .collect::<Vec<_>>();
        Self::new(merged)
    }

    pub fn noise_words(&self) -> &[String] {
        &self.noise_words
    }

    /// True for strings under two characters, and for non-numeric strings that
    /// equal or contain a noise word (case-insensitive). Pure digit runs are never noise.
    pub fn is_noise(&self, s: &str) -> bool {
        let s = s.trim();
        if s.chars().count() < 2 {
            return true;
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        let upper = s.to_uppercase();
        self.noise_words.iter().any(|w| upper.contains(w.as_str()))
    }
}

/// Keep letters, digits, whitespace and `. - / :`; collapse whitespace runs.
pub fn clean(s: &str) -> String {
    clean_keeping(s, "")
}

/// [`clean`] with extra allowed punctuation.
pub fn clean_keeping(s: &str, extra: &str) -> String {
    let kept: String = s
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ".-/:".contains(*c) || extra.contains(*c))
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `"Father's Name"` → `"fathers_name"`.
pub fn to_field_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '.' || c == '_' || c == '/' {
            pending_sep = true;
        }
    }
    key
}

/// Letters, spaces and name punctuation only, with at least one letter.
pub fn is_letters_only(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
        && s.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '.' || c == '\'' || c == '-')
}

/// All alphabetic characters are uppercase, and there is at least one.
pub fn is_all_caps(s: &str) -> bool {
    let mut letters = s.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_disallowed_and_collapses_whitespace() {
        assert_eq!(clean("  RAHUL   SHARMA| * "), "RAHUL SHARMA");
        assert_eq!(clean("DOB: 12/04-1990."), "DOB: 12/04-1990.");
        assert_eq!(clean("a@b.com"), "ab.com");
        assert_eq!(clean_keeping("a@b.com, x", "@,"), "a@b.com, x");
    }

    #[test]
    fn short_strings_are_noise() {
        let n = Normalizer::default();
        assert!(n.is_noise(""));
        assert!(n.is_noise("A"));
        assert!(n.is_noise(" x "));
    }

    #[test]
    fn numeric_strings_are_never_noise() {
        let n = Normalizer::default();
        assert!(!n.is_noise("12"));
        assert!(!n.is_noise("123456789012"));
    }

    #[test]
    fn noise_words_match_case_insensitively_and_by_containment() {
        let n = Normalizer::default();
        assert!(n.is_noise("Government of India"));
        assert!(n.is_noise("name"));
        assert!(n.is_noise("M BRO"));
        assert!(!n.is_noise("RAHUL SHARMA"));
        assert!(!n.is_noise("PRIYA KRISHNAN"));
    }

    #[test]
    fn injected_word_set_replaces_defaults() {
        let n = Normalizer::new(["ACME"]);
        assert!(n.is_noise("ACME CORP"));
        assert!(!n.is_noise("GOVERNMENT"));
        let extended = n.extended(["corp"]);
        assert!(extended.is_noise("MEGA CORP"));
        assert_eq!(extended.noise_words().len(), 2);
    }

    #[test]
    fn field_keys_are_snake_case() {
        assert_eq!(to_field_key("CURRENT DESIGNATION"), "current_designation");
        assert_eq!(to_field_key(" Father's Name "), "fathers_name");
        assert_eq!(to_field_key("Date-of.Birth"), "date_of_birth");
        assert_eq!(to_field_key("E-mail"), "e_mail");
        assert_eq!(to_field_key("::"), "");
    }

    #[test]
    fn letter_and_caps_predicates() {
        assert!(is_letters_only("RAHUL SHARMA"));
        assert!(is_letters_only("O'NEIL"));
        assert!(!is_letters_only("ABCDE1234F"));
        assert!(!is_letters_only(" . "));
        assert!(is_all_caps("PRIYA K."));
        assert!(!is_all_caps("Priya"));
        assert!(!is_all_caps("1234"));
    }
}
