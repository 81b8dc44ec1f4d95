use regex::Regex;
use veriscan_core::{Amount, DocumentType, FieldMap};

use super::{suffix_after, ExtractionInput, Extractor};
use crate::normalize::clean;
use crate::patterns::{has_digit, parse_date, re};

re!(re_invoice_number,
    r"(?i)invoice[ \t]*(?:no\.?|number|#)?[ \t]*[:\-]?[ \t]*#?[ \t]*([A-Z0-9][A-Z0-9\-/]*)");
re!(re_numeric_date, r"\b\d{2}[-/]\d{2}[-/]\d{4}\b");
re!(re_labelled_date, r"(?i)date\s*[:\-]?\s*([A-Za-z]+\s+\d{1,2},\s+\d{4})");
re!(re_currency_amount, r"(?:[$€£₹]|\bRs\.?|\bINR|\bUSD)\s*([\d,]+\.\d{2})");
re!(re_amount, r"[\d,]*\d\.\d{2}");
re!(re_total_word, r"(?i)\btotal\b");
re!(re_subtotal,
    r"(?i)\bsub\s*-?\s*total\b\s*[:\-]?\s*(?:[$€£₹]|Rs\.?|INR)?\s*([\d,]+\.\d{2})");
re!(re_tax,
    r"(?i)\b(?:tax|hst|gst|pst|vat|cgst|sgst|igst|sales\s*tax)\b(?:\s*\(?\d+(?:\.\d+)?%\)?)?\s*[:\-]?\s*(?:[$€£₹]|Rs\.?|INR)?\s*([\d,]+\.\d{2})");
re!(re_bill_to, r"(?i)bill\s*to");
re!(re_bill_to_skip, r"(?i)invoice|date|due|total|amount|tax");

const KEYS: &[&str] = &["vendor", "invoice_number", "date", "total", "subtotal", "tax", "bill_to"];
const BILL_TO_LINES: usize = 4;

/// Invoices and receipts.
pub struct InvoiceExtractor;

fn normalized_amount(raw: &str) -> Option<String> {
    Amount::parse(raw).map(|a| a.to_string())
}

fn labelled_amount(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).and_then(|c| c.get(1)).and_then(|m| normalized_amount(m.as_str()))
}

fn vendor(input: &ExtractionInput<'_>) -> Option<String> {
    input
        .lines
        .iter()
        .find(|l| l.chars().count() > 3 && !l.contains(':') && !input.is_noise(l))
        .map(|l| clean(l))
}

fn invoice_number(input: &ExtractionInput<'_>) -> Option<String> {
    input.lines.iter().find_map(|l| {
        re_invoice_number()
            .captures(l)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|s| has_digit(s))
            .map(str::to_string)
    })
}

fn date(text: &str) -> Option<String> {
    re_numeric_date()
        .find(text)
        .map(|m| m.as_str().to_string())
        .or_else(|| re_labelled_date().captures(text).and_then(|c| c.get(1)).map(|m| m.as_str().to_string()))
        .or_else(|| parse_date(text))
}

/// Last currency-prefixed amount; otherwise the last amount on a "Total" line.
fn total(input: &ExtractionInput<'_>) -> Option<String> {
    let prefixed = re_currency_amount()
        .captures_iter(&input.raw_text)
        .filter_map(|c| c.get(1))
        .last()
        .map(|m| m.as_str());
    let raw = prefixed.or_else(|| {
        input
            .lines
            .iter()
            .filter(|l| re_total_word().is_match(l))
            .find_map(|l| re_amount().find_iter(l).last())
            .map(|m| m.as_str())
    })?;
    normalized_amount(raw)
}

fn bill_to(input: &ExtractionInput<'_>) -> Option<String> {
    let idx = input.position(|l| re_bill_to().is_match(l))?;
    let label_line = input.lines[idx];
    let mut parts: Vec<String> = re_bill_to()
        .find(label_line)
        .and_then(|m| suffix_after(label_line, m.end()))
        .into_iter()
        .collect();
    parts.extend(
        input.lines[idx + 1..]
            .iter()
            .take(BILL_TO_LINES)
            .filter(|l| !re_bill_to_skip().is_match(l))
            .map(|l| clean(l))
            .filter(|l| !l.is_empty()),
    );
    (!parts.is_empty()).then(|| parts.join(", "))
}

impl Extractor for InvoiceExtractor {
    fn doc_type(&self) -> DocumentType {
        DocumentType::Invoice
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> FieldMap {
        let mut fields = FieldMap::with_keys(KEYS);
        fields.insert("total", Amount::zero().to_string());

        fields.fill("vendor", vendor(input));
        fields.fill("invoice_number", invoice_number(input));
        fields.fill("date", date(&input.raw_text));
        fields.fill("total", total(input));
        fields.fill("subtotal", labelled_amount(re_subtotal(), &input.raw_text));
        fields.fill("tax", labelled_amount(re_tax(), &input.raw_text));
        fields.fill("bill_to", bill_to(input));
        fields
    }
}
