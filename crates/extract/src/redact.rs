use std::collections::HashSet;

use regex::Regex;
use tracing::debug;
use veriscan_core::{Amount, ExtractedRecord, MaskRegion, Word, MIN_MASK_SIZE, NOT_DETECTED};

use crate::patterns::re;

/// Four-digit runs, or keywords that usually sit next to personal data.
pub const DEFAULT_SENSITIVE_PATTERN: &str = r"(?i)\d{4}|total|amount|name|address|license|dob";

re!(re_default_sensitive, DEFAULT_SENSITIVE_PATTERN);

/// Record fields whose values are masked wherever their tokens appear.
const SENSITIVE_FIELDS: &[&str] = &[
    "full_name",
    "surname",
    "given_names",
    "father_name",
    "id_number",
    "pan_number",
    "voter_id",
    "dob",
    "address",
    "bill_to",
    "total",
];

/// Turns sensitive words into rectangles for an image compositor.
///
/// Every qualifying word becomes its own region; boxes are never merged.
/// Regions not strictly larger than the minimum on both sides are dropped.
#[derive(Debug, Clone)]
pub struct RedactionDeriver {
    sensitive: Regex,
    min_mask_size: f32,
}

impl Default for RedactionDeriver {
    fn default() -> Self {
        Self::new(re_default_sensitive().clone(), MIN_MASK_SIZE)
    }
}

impl RedactionDeriver {
    pub fn new(sensitive: Regex, min_mask_size: f32) -> Self {
        Self { sensitive, min_mask_size: min_mask_size.max(MIN_MASK_SIZE) }
    }

    pub fn with_pattern(pattern: &str, min_mask_size: f32) -> Result<Self, regex::Error> {
        Ok(Self::new(Regex::new(pattern)?, min_mask_size))
    }

    pub fn min_mask_size(&self) -> f32 {
        self.min_mask_size
    }

    pub fn is_sensitive(&self, text: &str) -> bool {
        self.sensitive.is_match(text)
    }

    pub fn derive(&self, words: &[Word]) -> Vec<MaskRegion> {
        self.collect(words, |w| self.is_sensitive(&w.text))
    }

    /// [`derive`](Self::derive) plus every word that is a token of a detected
    /// name, identifier, date, address or total in `record`.
    pub fn derive_for_record(&self, words: &[Word], record: &ExtractedRecord) -> Vec<MaskRegion> {
        let tokens: HashSet<String> = SENSITIVE_FIELDS
            .iter()
            .filter_map(|key| record.field(key).filter(|v| is_found_value(key, v)))
            .flat_map(str::split_whitespace)
            .map(normalize_token)
            .filter(|t| t.chars().count() >= 2)
            .collect();
        self.collect(words, |w| self.is_sensitive(&w.text) || tokens.contains(&normalize_token(&w.text)))
    }

    fn collect(&self, words: &[Word], wanted: impl Fn(&Word) -> bool) -> Vec<MaskRegion> {
        let mut rejected = 0usize;
        let regions: Vec<MaskRegion> = words
            .iter()
            .filter(|w| wanted(w))
            .filter_map(|w| match MaskRegion::from_bbox_with_min(&w.bbox, self.min_mask_size) {
                Ok(region) => Some(region),
                Err(_) => {
                    rejected += 1;
                    None
                }
            })
            .collect();
        debug!(masks = regions.len(), rejected, "redaction regions derived");
        regions
    }
}

/// The invoice total defaults to zero rather than the sentinel.
fn is_found_value(key: &str, value: &str) -> bool {
    if value == NOT_DETECTED {
        return false;
    }
    key != "total" || Amount::parse(value).map_or(true, |a| !a.is_zero())
}

fn normalize_token(token: &str) -> String {
    token.trim_matches(|c: char| !c.is_alphanumeric()).to_uppercase()
}
