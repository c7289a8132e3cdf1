//! Token amounts in 18-decimal fixed point.
//!
//! Amounts are carried as base-unit integers (`U256`, scaled by 10^18) so no
//! floating-point rounding ever touches a balance. Human-decimal strings such
//! as `"1.5"` only exist at the edges: [`TokenAmount::parse_decimal`] on the
//! way in, [`TokenAmount::to_decimal_string`] on the way out.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::AmountError;

/// Number of fractional digits in one whole token.
pub const TOKEN_DECIMALS: usize = 18;

const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

/// A token amount in base units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn from_base_units(raw: U256) -> Self {
        Self(raw)
    }

    /// Whole tokens, for tests and fixtures.
    pub fn from_tokens(whole: u64) -> Self {
        Self(U256::from(whole) * U256::from(ONE_TOKEN))
    }

    pub fn base_units(&self) -> U256 {
        self.0
    }

    /// `None` on overflow; amounts never wrap.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parse a human-decimal string (`"10"`, `"1.5"`, `".25"`) into base units.
    ///
    /// Rejects signs, exponents, separators and more than 18 fractional digits.
    pub fn parse_decimal(input: &str) -> Result<Self, AmountError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = match input.split_once('.') {
            Some((w, f)) => (w, f),
            None => (input, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(AmountError::Malformed(input.to_string()));
        }
        if fraction.len() > TOKEN_DECIMALS {
            return Err(AmountError::TooManyDecimals {
                max: TOKEN_DECIMALS,
            });
        }

        let whole = parse_digits(whole)?;
        let fraction = parse_digits(&format!("{fraction:0<width$}", width = TOKEN_DECIMALS))?;

        whole
            .checked_mul(U256::from(ONE_TOKEN))
            .and_then(|scaled| scaled.checked_add(fraction))
            .map(Self)
            .ok_or(AmountError::Overflow)
    }

    /// Render as a human-decimal string with full precision.
    ///
    /// Always carries a fractional part (`"15.0"`, `"0.000000000000000001"`)
    /// and never trailing zeros beyond the first.
    pub fn to_decimal_string(&self) -> String {
        let unit = U256::from(ONE_TOKEN);
        let whole = self.0 / unit;
        let remainder = self.0 % unit;
        if remainder.is_zero() {
            return format!("{whole}.0");
        }
        let fraction = format!("{:0>width$}", remainder.to_string(), width = TOKEN_DECIMALS);
        format!("{whole}.{}", fraction.trim_end_matches('0'))
    }
}

fn parse_digits(digits: &str) -> Result<U256, AmountError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| AmountError::Overflow)
}

impl From<U256> for TokenAmount {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} TUR", self.to_decimal_string())
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_decimal(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(
            TokenAmount::parse_decimal("10").unwrap(),
            TokenAmount::from_tokens(10)
        );
        assert_eq!(
            TokenAmount::parse_decimal("1.5").unwrap().base_units(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(
            TokenAmount::parse_decimal(".25").unwrap().base_units(),
            U256::from(250_000_000_000_000_000u128)
        );
        assert_eq!(
            TokenAmount::parse_decimal("7.").unwrap(),
            TokenAmount::from_tokens(7)
        );
        assert_eq!(
            TokenAmount::parse_decimal("0.000000000000000001")
                .unwrap()
                .base_units(),
            U256::from(1u8)
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            TokenAmount::parse_decimal("  3 ").unwrap(),
            TokenAmount::from_tokens(3)
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(TokenAmount::parse_decimal(""), Err(AmountError::Empty));
        assert_eq!(TokenAmount::parse_decimal("   "), Err(AmountError::Empty));
    }

    #[test]
    fn rejects_non_numeric_input() {
        for bad in ["abc", "1,5", "-1", "+1", "1e3", ".", "1.2.3", "0x10"] {
            assert!(
                matches!(TokenAmount::parse_decimal(bad), Err(AmountError::Malformed(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn rejects_excess_precision() {
        assert_eq!(
            TokenAmount::parse_decimal("1.0000000000000000001"),
            Err(AmountError::TooManyDecimals { max: 18 })
        );
    }

    #[test]
    fn rejects_overflow() {
        let huge = "9".repeat(80);
        assert_eq!(TokenAmount::parse_decimal(&huge), Err(AmountError::Overflow));
    }

    #[test]
    fn formats_with_full_precision() {
        assert_eq!(TokenAmount::from_tokens(15).to_decimal_string(), "15.0");
        assert_eq!(TokenAmount::ZERO.to_decimal_string(), "0.0");
        assert_eq!(
            TokenAmount::from_base_units(U256::from(1u8)).to_decimal_string(),
            "0.000000000000000001"
        );
        assert_eq!(
            TokenAmount::parse_decimal("2.50").unwrap().to_decimal_string(),
            "2.5"
        );
    }

    #[test]
    fn display_carries_unit() {
        assert_eq!(TokenAmount::from_tokens(1).to_string(), "1.0 TUR");
    }

    #[test]
    fn serializes_as_decimal_string() {
        let amount = TokenAmount::parse_decimal("1.25").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1.25\"");
        let back: TokenAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn checked_arithmetic() {
        let a = TokenAmount::from_tokens(10);
        let b = TokenAmount::from_tokens(5);
        assert_eq!(a.checked_add(b), Some(TokenAmount::from_tokens(15)));

        let max = TokenAmount::from_base_units(U256::MAX);
        let one = TokenAmount::from_base_units(U256::from(1u8));
        assert_eq!(max.checked_add(one), None);
    }
}
