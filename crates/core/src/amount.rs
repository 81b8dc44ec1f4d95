use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A monetary amount read off a document, kept at two decimal places.
/// Currency is not tracked; invoices mix symbols freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    /// Parse an OCR amount such as `1,234.56`. Thousands separators are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let clean: String = s.trim().chars().filter(|c| *c != ',').collect();
        Decimal::from_str(&clean).ok().map(Self::from_decimal)
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Amount(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Amount(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_thousands_separator() {
        assert_eq!(Amount::parse("1,234.56").unwrap().to_string(), "1234.56");
    }

    #[test]
    fn zero_displays_two_decimals() {
        assert_eq!(Amount::zero().to_string(), "0.00");
        assert!(Amount::zero().is_zero());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Amount::parse("12.3.4").is_none());
        assert!(Amount::parse("").is_none());
    }

    #[test]
    fn ordering_follows_value() {
        assert!(Amount::parse("99.99").unwrap() < Amount::parse("100.00").unwrap());
    }
}
