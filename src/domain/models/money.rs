//! Integer money in minor currency units (cents / centavos).

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

const MINOR_PER_MAJOR: i64 = 100;

/// A non-negative amount in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Parse a decimal amount in major units (e.g. `"800.50"`) and round it
    /// half-up to whole minor units.
    pub fn parse_major(raw: &str) -> DomainResult<Self> {
        let invalid = || DomainError::ValidationFailed(format!("invalid amount '{raw}'"));
        let s = raw.trim();
        if s.starts_with('-') {
            return Err(DomainError::ValidationFailed(format!(
                "amount cannot be negative: {raw}"
            )));
        }
        let s = s.strip_prefix('+').unwrap_or(s);

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .map(Self)
            .ok_or_else(invalid)
    }

    /// `self` is an hourly rate; returns the cost for `minutes`, rounded half-up.
    pub fn prorate_hourly(self, minutes: u32) -> Self {
        Self(div_round_half_up(i128::from(self.0) * i128::from(minutes), 60))
    }

    /// `percent`% of `self`, rounded half-up.
    pub fn percent(self, percent: u32) -> Self {
        Self(div_round_half_up(i128::from(self.0) * i128::from(percent), 100))
    }

    pub fn times(self, n: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(n)))
    }
}

/// Integer division of a non-negative numerator with round-half-up.
fn div_round_half_up(numerator: i128, denominator: i128) -> i64 {
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    i64::try_from(rounded).unwrap_or(i64::MAX)
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / MINOR_PER_MAJOR, self.0 % MINOR_PER_MAJOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_units() {
        assert_eq!(Money::parse_major("800").unwrap().minor(), 80_000);
        assert_eq!(Money::parse_major("800.5").unwrap().minor(), 80_050);
        assert_eq!(Money::parse_major("800.50").unwrap().minor(), 80_050);
        assert_eq!(Money::parse_major("0.01").unwrap().minor(), 1);
        assert_eq!(Money::parse_major(".5").unwrap().minor(), 50);
    }

    #[test]
    fn test_parse_major_rounds_half_up() {
        assert_eq!(Money::parse_major("1.005").unwrap().minor(), 101);
        assert_eq!(Money::parse_major("1.0049").unwrap().minor(), 100);
        assert_eq!(Money::parse_major("2.999").unwrap().minor(), 300);
    }

    #[test]
    fn test_parse_major_rejects_bad_input() {
        for bad in ["", ".", "-5", "abc", "1e3", "1.2.3", "12,50"] {
            assert!(Money::parse_major(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_prorate_hourly() {
        assert_eq!(Money::from_minor(30_000).prorate_hourly(90).minor(), 45_000);
        assert_eq!(Money::from_minor(40_000).prorate_hourly(90).minor(), 60_000);
        // 100 * 45 / 60 = 75
        assert_eq!(Money::from_minor(100).prorate_hourly(45).minor(), 75);
        // 1 * 30 / 60 = 0.5 -> 1
        assert_eq!(Money::from_minor(1).prorate_hourly(30).minor(), 1);
        // 1 * 29 / 60 = 0.48 -> 0
        assert_eq!(Money::from_minor(1).prorate_hourly(29).minor(), 0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(Money::from_minor(80_000).percent(50).minor(), 40_000);
        assert_eq!(Money::from_minor(999).percent(15).minor(), 150); // 149.85
        assert_eq!(Money::from_minor(10).percent(25).minor(), 3); // 2.5
        assert_eq!(Money::from_minor(80_000).percent(0), Money::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(80_050).to_string(), "$800.50");
        assert_eq!(Money::from_minor(5).to_string(), "$0.05");
    }
}
