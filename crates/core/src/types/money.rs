//! Price representation using decimal arithmetic.
//!
//! AIMS prices are Vietnamese đồng, which has no minor unit - amounts are
//! whole numbers. `Decimal` is used anyway so VAT computation (10%) stays
//! exact and so the types survive a future multi-currency backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (đồng, not hundredths).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a VND price from a whole-đồng amount.
    #[must_use]
    pub fn vnd(amount: i64) -> Self {
        Self {
            amount: Decimal::from(amount),
            currency_code: CurrencyCode::VND,
        }
    }

    /// Format for display (e.g., "220.000 ₫").
    ///
    /// VND uses dot-grouped whole amounts with a trailing đồng sign, the
    /// same shape `Intl.NumberFormat("vi-VN")` produces.
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{} {}",
            group_thousands(&self.amount.round().to_string()),
            self.currency_code.symbol()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    VND,
    USD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::VND => "₫",
            Self::USD => "$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::VND => "VND",
            Self::USD => "USD",
        }
    }
}

/// Insert dot separators into an integer string: "1234567" -> "1.234.567".
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    format!("{sign}{grouped}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1.000");
        assert_eq!(group_thousands("220000"), "220.000");
        assert_eq!(group_thousands("1234567"), "1.234.567");
        assert_eq!(group_thousands("-15000"), "-15.000");
    }

    #[test]
    fn test_vnd_display() {
        assert_eq!(Price::vnd(220_000).display(), "220.000 ₫");
        assert_eq!(Price::vnd(0).display(), "0 ₫");
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(CurrencyCode::VND.code(), "VND");
        assert_eq!(CurrencyCode::default(), CurrencyCode::VND);
    }
}
