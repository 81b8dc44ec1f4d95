use chrono::NaiveDate;

// ── Compiled regex cache ─────────────────────────────────────────────────────

/// Declares a function returning a lazily compiled, process-wide `Regex`.
/// Patterns are literals, so a compile failure is a programming error.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}
pub(crate) use re;

re!(re_date_numeric,
    r"\b(\d{2,4})[-/.\s](\d{2})[-/.\s](\d{2,4})\b");
re!(re_date_month_abbr,
    r"(?i)\b(\d{1,2})[-/.\s]+((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*)[-/.\s]+(\d{4})\b");
re!(re_year4, r"\d{4}");
re!(re_year2_tail, r"(\d{2})\D*$");
re!(re_date_noise, r"[\[\](){}:]");

// ── Dates ────────────────────────────────────────────────────────────────────

/// First date-like substring in `text`: numeric form first, then day-month-year
/// with a month name. Brackets and colons are dropped before matching and the
/// match is returned verbatim, so feeding the result back returns it unchanged.
pub fn parse_date(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let clean = re_date_noise().replace_all(text, "");
    if let Some(m) = re_date_numeric().find(&clean) {
        return Some(m.as_str().to_string());
    }
    re_date_month_abbr().find(&clean).map(|m| m.as_str().to_string())
}

/// Every date-like substring in text order, both forms interleaved.
pub fn all_dates(text: &str) -> Vec<String> {
    let clean = re_date_noise().replace_all(text, "");
    let mut found: Vec<(usize, String)> = re_date_numeric()
        .find_iter(&clean)
        .chain(re_date_month_abbr().find_iter(&clean))
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();
    found.sort_by_key(|(start, _)| *start);
    found.dedup_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, d)| d).collect()
}

/// Best-effort year of a date string returned by [`parse_date`].
pub fn year_of(date: &str) -> Option<i32> {
    if let Some(m) = re_year4().find(date) {
        return m.as_str().parse().ok();
    }
    let c = re_year2_tail().captures(date)?;
    c.get(1)?.as_str().parse().ok().map(expand_two_digit_year)
}

/// Century pivot for two-digit years: above 30 is the 1900s, otherwise the 2000s.
pub fn expand_two_digit_year(yy: i32) -> i32 {
    if yy > 30 { 1900 + yy } else { 2000 + yy }
}

/// Expand a 6-digit MRZ `YYMMDD` date into `DD-MM-YYYY`.
/// Returns `None` unless the input is six digits forming a real calendar date.
pub fn format_mrz_date(yymmdd: &str) -> Option<String> {
    if yymmdd.len() != 6 || !yymmdd.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = yymmdd[0..2].parse().ok()?;
    let mm: u32 = yymmdd[2..4].parse().ok()?;
    let dd: u32 = yymmdd[4..6].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(expand_two_digit_year(yy), mm, dd)?;
    Some(date.format("%d-%m-%Y").to_string())
}

// ── Identifier cleanup ───────────────────────────────────────────────────────

pub fn alphanumeric_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}
