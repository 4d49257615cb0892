use std::{fmt, str::FromStr};

use crate::AggregateError;

/// Signed money amount in the **smallest currency unit**.
///
/// The API has no fractional amounts, so neither does this type: everything
/// is integer arithmetic.
///
/// # Examples
///
/// ```rust
/// use aggregator::Money;
///
/// assert_eq!(Money::new(1_500_000).to_string(), "1.500.000");
/// assert_eq!(Money::new(-2_500).to_string(), "-2.500");
/// ```
///
/// Parsing form input (`.` is the thousands separator):
///
/// ```rust
/// use aggregator::Money;
///
/// assert_eq!("1.500.000".parse::<Money>().unwrap().minor(), 1_500_000);
/// assert_eq!("250".parse::<Money>().unwrap().minor(), 250);
/// assert!("1.50".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Non-negative amount as `u64`, for transaction payloads.
    pub fn to_unsigned(self) -> Result<u64, AggregateError> {
        u64::try_from(self.0)
            .map_err(|_| AggregateError::InvalidAmount("amount must not be negative".to_string()))
    }
}

/// Formats an unsigned amount with `.` as thousands separator.
#[must_use]
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{}", format_amount(self.0.unsigned_abs()))
    }
}

impl FromStr for Money {
    type Err = AggregateError;

    /// Parses form input such as `1.500.000`, `-250` or `+12`.
    ///
    /// Validation rules:
    /// - digits only, optionally grouped by `.` in threes
    /// - rejects empty input and values that overflow `i64`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || AggregateError::InvalidAmount("empty amount".to_string());
        let invalid = || AggregateError::InvalidAmount(format!("invalid amount \"{}\"", s.trim()));
        let overflow = || AggregateError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        if rest.is_empty() {
            return Err(empty());
        }

        let mut groups = rest.split('.');
        let head = groups.next().ok_or_else(invalid)?;
        let grouped = rest.contains('.');
        if head.is_empty()
            || (grouped && head.len() > 3)
            || !head.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut digits = head.to_string();
        for group in groups {
            if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.push_str(group);
        }

        let value: i64 = digits.parse().map_err(|_| overflow())?;
        let signed = if negative {
            value.checked_neg().ok_or_else(overflow)?
        } else {
            value
        };

        Ok(Money(signed))
    }
}
