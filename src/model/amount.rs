//! Amount type for handling the money values typed into a bill.
//!
//! Bills keep the exact text that the user entered. This module provides the `Amount` type which
//! wraps `Decimal`, turns that text into a number when totals are needed, and formats numbers for
//! display with thousands separators and a currency symbol.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The riel sign, placed after the number, e.g. `12,500៛`.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "៛";

/// Represents an amount of money.
///
/// There are two ways to get one from text:
/// - `Amount::parse_lenient` never fails. It reads the leading number out of whatever the user
///   typed and falls back to zero. This is what bill totals are computed with.
/// - `FromStr` is strict and is used for configuration values, where garbage should be rejected.
///
/// # Examples
///
/// Lenient parsing takes the leading number and ignores the rest:
/// ```
/// # use utility_invoice::model::Amount;
/// # use rust_decimal::Decimal;
/// assert_eq!(Amount::parse_lenient("12abc").value(), Decimal::from(12));
/// assert_eq!(Amount::parse_lenient("abc").value(), Decimal::ZERO);
/// assert_eq!(Amount::parse_lenient("").value(), Decimal::ZERO);
/// ```
///
/// Strict parsing does not:
/// ```
/// # use utility_invoice::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("12abc").is_err());
/// assert!(Amount::from_str("1,000").is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// Reads a number out of free-form text the way a browser's `parseFloat` does: surrounding
    /// whitespace is ignored and the longest leading run that looks like a decimal number (an
    /// optional sign, digits, an optional fraction and an optional exponent) is used. Anything
    /// else, including empty text or a number too large for a `Decimal`, is zero.
    pub fn parse_lenient(text: &str) -> Self {
        parse_leading_number(text.trim())
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Formats the amount for display with thousands separators and `symbol` as a suffix.
    /// Whole amounts are shown without a fraction, others rounded to two decimal places. The digits
    /// come straight from the `Decimal`, so large totals are shown exactly.
    ///
    /// ```
    /// # use utility_invoice::model::Amount;
    /// # use rust_decimal::Decimal;
    /// let amount = Amount::new(Decimal::from(12500));
    /// assert_eq!(amount.format("៛"), "12,500៛");
    /// ```
    pub fn format(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value().abs();
        let plain = if num.fract().is_zero() {
            num.trunc().to_string()
        } else {
            let rounded = num.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2}")
        };
        let (whole, fraction) = match plain.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (plain.as_str(), None),
        };
        let mut digits = group_thousands(whole);
        if let Some(fraction) = fraction {
            digits.push('.');
            digits.push_str(fraction);
        }
        format!("{sign}{digits}{symbol}")
    }
}

/// Inserts a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (ix, digit) in digits.chars().enumerate() {
        if ix > 0 && (digits.len() - ix) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Scans `text` for a leading decimal number and parses it. Returns `None` when there is no
/// leading number or it does not fit in a `Decimal`.
fn parse_leading_number(text: &str) -> Option<Decimal> {
    let bytes = text.as_bytes();
    let is_digit = |ix: usize| bytes.get(ix).is_some_and(u8::is_ascii_digit);

    let mut ix = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            ix += 1;
            true
        }
        Some(b'+') => {
            ix += 1;
            false
        }
        _ => false,
    };

    let int_start = ix;
    while is_digit(ix) {
        ix += 1;
    }
    let int_digits = &text[int_start..ix];

    let mut frac_digits = "";
    if bytes.get(ix) == Some(&b'.') {
        let frac_start = ix + 1;
        let mut end = frac_start;
        while is_digit(end) {
            end += 1;
        }
        frac_digits = &text[frac_start..end];
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            ix = end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if matches!(bytes.get(ix), Some(b'e' | b'E')) {
        let mut end = ix + 1;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let exp_digits_start = end;
        while is_digit(end) {
            end += 1;
        }
        if end > exp_digits_start {
            exponent = &text[ix + 1..end];
        }
    }

    let mantissa = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
    );

    if exponent.is_empty() {
        Decimal::from_str(&mantissa).ok()
    } else {
        Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok()
    }
}

/// An error that can occur when strictly parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Remove a trailing currency sign if present
        let without_symbol = trimmed
            .strip_suffix(DEFAULT_CURRENCY_SYMBOL)
            .unwrap_or(trimmed)
            .trim_end();

        // Remove commas (thousand separators)
        let without_commas = without_symbol.replace(',', "");

        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.normalize())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
