use rust_decimal::Decimal;
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use crate::error::Error;

/// Represents an amount of money in USD currency.
///
/// The amount is stored as an exact decimal, keeping whatever scale the
/// source used, so totals computed from parsed prices are exact. Arithmetic
/// is checked: an overflow is reported, never wrapped or panicked on. The
/// [`Display`] implementation formats it as dollars to 2 decimal places.
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Usd(Decimal);

impl Usd {
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns the amount in dollars, for writing into a spreadsheet cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn to_dollars(self) -> f64 {
        self.0.mantissa() as f64 / 10f64.powi(self.0.scale() as i32)
    }

    /// Returns `self * qty`, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, qty: i32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Self)
    }

    /// Returns `self + rhs`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Sums `amounts`, or returns `None` on overflow.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::default(), Self::checked_add)
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0.is_sign_negative() { "-" } else { "" };
        write!(f, "{sign}${:.2}", self.0.abs())
    }
}

/// Parses amounts such as `136`, `55.09`, `9.999`, `$3.25` or `1,250.00`.
impl FromStr for Usd {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let digits = unsigned.strip_prefix('$').unwrap_or(unsigned).replace(',', "");
        if !digits.chars().any(|c| c.is_ascii_digit())
            || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(Error::InvalidAmount(s.to_string()));
        }
        let digits = if digits.starts_with('.') {
            format!("0{digits}")
        } else {
            digits
        };
        let amount =
            Decimal::from_str(&digits).map_err(|_| Error::InvalidAmount(s.to_string()))?;
        Ok(Self(if negative { -amount } else { amount }))
    }
}
