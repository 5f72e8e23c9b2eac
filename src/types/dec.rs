use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Number of fractional digits carried by a `Dec`
pub const DEC_PRECISION: usize = 18;

const DEC_ONE: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecError {
    #[error("empty decimal string")]
    Empty,

    #[error("invalid decimal '{0}'")]
    Invalid(String),

    #[error("decimal '{0}' has more than 18 fractional digits")]
    TooPrecise(String),

    #[error("decimal '{0}' is out of range")]
    Overflow(String),
}

/// Non-negative fixed point decimal with 18 fractional digits.
///
/// Used for vote thresholds and quorums. All comparisons against vote
/// ratios are exact; no floating point is involved anywhere in a tally.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dec(u128);

impl Dec {
    pub const fn zero() -> Self {
        Dec(0)
    }

    pub const fn one() -> Self {
        Dec(DEC_ONE)
    }

    /// Build a decimal from its raw 18-digit scaled representation
    pub const fn from_raw(raw: u128) -> Self {
        Dec(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// `percent / 100`
    pub fn from_percent(percent: u64) -> Self {
        Dec(percent as u128 * (DEC_ONE / 100))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true when `numerator / denominator >= self`.
    ///
    /// Evaluated as `numerator * 10^18 >= self * denominator` with a 256-bit
    /// intermediate, so it is exact for every `u128` input. A zero
    /// denominator only satisfies a zero decimal.
    pub fn is_met_by(&self, numerator: u128, denominator: u128) -> bool {
        if denominator == 0 {
            return self.is_zero();
        }
        mul_wide(numerator, DEC_ONE) >= mul_wide(self.0, denominator)
    }
}

/// Full 256-bit product of two u128 values as (high, low) words
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    let mid = (lo_lo >> 64) + (hi_lo & MASK) + (lo_hi & MASK);
    let low = (lo_lo & MASK) | (mid << 64);
    let high = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (mid >> 64);

    (high, low)
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DecError::Empty);
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DecError::Invalid(s.to_string()));
        }
        if s.contains('.') && frac_part.is_empty() {
            return Err(DecError::Invalid(s.to_string()));
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DecError::Invalid(s.to_string()));
        }
        if frac_part.len() > DEC_PRECISION {
            return Err(DecError::TooPrecise(s.to_string()));
        }

        let int_value: u128 = int_part
            .parse()
            .map_err(|_| DecError::Overflow(s.to_string()))?;

        let mut frac_value: u128 = 0;
        for b in frac_part.bytes() {
            frac_value = frac_value * 10 + u128::from(b - b'0');
        }
        for _ in frac_part.len()..DEC_PRECISION {
            frac_value *= 10;
        }

        int_value
            .checked_mul(DEC_ONE)
            .and_then(|v| v.checked_add(frac_value))
            .map(Dec)
            .ok_or_else(|| DecError::Overflow(s.to_string()))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / DEC_ONE,
            self.0 % DEC_ONE,
            width = DEC_PRECISION
        )
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Dec::from_str(&s).map_err(de::Error::custom)
    }
}
