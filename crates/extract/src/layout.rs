use std::collections::BTreeMap;

use veriscan_core::Word;

use crate::normalize::{clean, Normalizer};
use crate::patterns::has_digit;

/// Vertical bin size, in pixels, for grouping words into one printed line.
pub const LINE_BIN_PX: f32 = 10.0;

/// One printed line reconstructed from word boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualLine {
    pub text: String,
    pub mean_height: f32,
}

fn bin_of(word: &Word) -> i64 {
    (word.bbox.y0 / LINE_BIN_PX).round() as i64
}

/// Group words into visual lines, top to bottom.
///
/// Words are bucketed by `y0` rounded to the nearest 10px, which absorbs
/// per-glyph box jitter. Inside a bucket words are ordered left to right and
/// repeats of the same word at the same spot (from a second OCR pass) are dropped.
pub fn visual_lines(words: &[Word]) -> impl Iterator<Item = VisualLine> + '_ {
    let mut buckets: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
    for word in words.iter().filter(|w| !w.text.trim().is_empty()) {
        buckets.entry(bin_of(word)).or_default().push(word);
    }

    buckets.into_values().map(|mut bucket| {
        bucket.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
        bucket.dedup_by(|a, b| {
            a.text.trim() == b.text.trim() && (a.bbox.x0 - b.bbox.x0).abs() < LINE_BIN_PX
        });
        let text = bucket.iter().map(|w| w.text.trim()).collect::<Vec<_>>().join(" ");
        let mean_height =
            bucket.iter().map(|w| w.bbox.height()).sum::<f32>() / bucket.len() as f32;
        VisualLine { text, mean_height }
    })
}

/// Text of the tallest visual line that looks like a name: longer than three
/// characters, no digits, not noise. Ties keep the higher line.
pub fn tallest_line(words: &[Word], normalizer: &Normalizer) -> Option<String> {
    visual_lines(words)
        .filter(|l| l.text.chars().count() > 3 && !has_digit(&l.text) && !normalizer.is_noise(&l.text))
        .fold(None::<VisualLine>, |best, line| match best {
            Some(b) if b.mean_height >= line.mean_height => Some(b),
            _ => Some(line),
        })
        .map(|l| clean(&l.text))
        .filter(|t| !t.is_empty())
}
