//! Fixed-point money arithmetic.
//!
//! All amounts, prices and fees are carried as 8-decimal fixed-point values.
//! Venue APIs deliver prices as decimal strings; they are parsed directly into
//! this representation and never pass through binary floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Error produced when a decimal string cannot be parsed into a [`FixedPoint`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid decimal amount: {0:?}")]
pub struct ParseAmountError(pub String);

/// Unsigned fixed-point number with 8 decimal places.
/// Used for precise amount/price representation without floating-point errors.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FixedPoint(pub u64);

impl FixedPoint {
    /// Number of decimal places.
    pub const DECIMALS: u32 = 8;
    /// Scale factor: 10^8.
    pub const SCALE: u64 = 100_000_000;

    pub const ZERO: FixedPoint = FixedPoint(0);
    pub const ONE: FixedPoint = FixedPoint(Self::SCALE);

    /// Create from a whole number of units.
    pub fn from_int(value: u64) -> Self {
        Self(value.saturating_mul(Self::SCALE))
    }

    /// Create from f64 (for testing/convenience, not used on the data path).
    pub fn from_f64(value: f64) -> Self {
        Self((value * Self::SCALE as f64) as u64)
    }

    /// Convert to f64 (for display/debugging).
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiply two fixed-point values, widening through u128.
    /// Saturates at the representable maximum.
    pub fn mul(self, rhs: FixedPoint) -> FixedPoint {
        let wide = self.0 as u128 * rhs.0 as u128 / Self::SCALE as u128;
        FixedPoint(u64::try_from(wide).unwrap_or(u64::MAX))
    }

    /// Divide two fixed-point values, widening through u128.
    /// A zero divisor yields zero; callers on the book-walking path guarantee
    /// positive prices (the normalizer rejects non-positive rows).
    pub fn div(self, rhs: FixedPoint) -> FixedPoint {
        if rhs.0 == 0 {
            return FixedPoint::ZERO;
        }
        let wide = self.0 as u128 * Self::SCALE as u128 / rhs.0 as u128;
        FixedPoint(u64::try_from(wide).unwrap_or(u64::MAX))
    }

    /// Signed difference `self - rhs`.
    pub fn signed_diff(self, rhs: FixedPoint) -> SignedFixedPoint {
        let wide = self.0 as i128 - rhs.0 as i128;
        SignedFixedPoint(i64::try_from(wide).unwrap_or(if wide < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Render at `dp` decimal places (0..=8), rounding half-up.
    pub fn format_dp(self, dp: u32) -> String {
        let dp = dp.min(Self::DECIMALS);
        let pow = 10u64.pow(Self::DECIMALS - dp);
        let rounded = self.0.saturating_add(pow / 2) / pow;
        let unit = 10u64.pow(dp);
        let int = rounded / unit;
        if dp == 0 {
            int.to_string()
        } else {
            format!("{}.{:0width$}", int, rounded % unit, width = dp as usize)
        }
    }
}

impl Add for FixedPoint {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for FixedPoint {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl FromStr for FixedPoint {
    type Err = ParseAmountError;

    /// Parse a decimal string like `"10000"` or `"0.0055"`.
    /// Digits beyond the 8th decimal place are truncated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseAmountError(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let int: u64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| err())?
        };
        let mut frac: u64 = 0;
        for b in frac_part.bytes().take(Self::DECIMALS as usize) {
            frac = frac * 10 + (b - b'0') as u64;
        }
        let frac_digits = frac_part.len().min(Self::DECIMALS as usize) as u32;
        frac *= 10u64.pow(Self::DECIMALS - frac_digits);
        int.checked_mul(Self::SCALE)
            .and_then(|v| v.checked_add(frac))
            .map(FixedPoint)
            .ok_or_else(err)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.format_dp(Self::DECIMALS);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        f.write_str(s)
    }
}

/// Signed fixed-point number with 8 decimal places, for profit and ROI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SignedFixedPoint(pub i64);

impl SignedFixedPoint {
    pub const ZERO: SignedFixedPoint = SignedFixedPoint(0);

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn abs(self) -> SignedFixedPoint {
        SignedFixedPoint(self.0.saturating_abs())
    }

    /// Convert to f64 (for display/debugging).
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / FixedPoint::SCALE as f64
    }

    /// `self / denominator * 100`, i.e. the ratio as a percentage.
    /// A zero denominator yields zero.
    pub fn pct_of(self, denominator: FixedPoint) -> SignedFixedPoint {
        if denominator.0 == 0 {
            return SignedFixedPoint::ZERO;
        }
        let wide = self.0 as i128 * 100 * FixedPoint::SCALE as i128 / denominator.0 as i128;
        SignedFixedPoint(i64::try_from(wide).unwrap_or(if wide < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Render at `dp` decimal places, rounding half-up away from zero.
    pub fn format_dp(self, dp: u32) -> String {
        let magnitude = FixedPoint(self.0.unsigned_abs()).format_dp(dp);
        if self.0 < 0 {
            format!("-{magnitude}")
        } else {
            magnitude
        }
    }
}

impl Sub for SignedFixedPoint {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for SignedFixedPoint {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for SignedFixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{}", FixedPoint(self.0.unsigned_abs()))
        } else {
            write!(f, "{}", FixedPoint(self.0.unsigned_abs()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_decimal_strings_exactly() {
        assert_eq!("10000".parse::<FixedPoint>().unwrap(), FixedPoint::from_int(10000));
        assert_eq!("0.0055".parse::<FixedPoint>().unwrap(), FixedPoint(550_000));
        assert_eq!("110.5".parse::<FixedPoint>().unwrap(), FixedPoint(110_50000000));
        assert_eq!(".25".parse::<FixedPoint>().unwrap(), FixedPoint(25_000_000));
        // Truncates beyond 8 decimal places.
        assert_eq!(
            "0.123456789".parse::<FixedPoint>().unwrap(),
            FixedPoint(12_345_678)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<FixedPoint>().is_err());
        assert!("abc".parse::<FixedPoint>().is_err());
        assert!("-5".parse::<FixedPoint>().is_err());
        assert!("1.2.3".parse::<FixedPoint>().is_err());
        assert!("10 000".parse::<FixedPoint>().is_err());
    }

    #[test]
    fn widened_mul_and_div() {
        let price = FixedPoint::from_int(110);
        let remainder = FixedPoint::from_int(100);
        // 100 / 110 = 0.90909090 truncated at 8 decimals
        assert_eq!(remainder.div(price), FixedPoint(90_909_090));
        assert_eq!(price.mul(FixedPoint::from_int(3)), FixedPoint::from_int(330));
        // Large notionals stay exact through the u128 widening.
        let big = FixedPoint::from_int(50_000_000);
        assert_eq!(big.mul(FixedPoint::from_int(100)), FixedPoint::from_int(5_000_000_000));
    }

    #[test]
    fn div_by_zero_yields_zero() {
        assert_eq!(FixedPoint::ONE.div(FixedPoint::ZERO), FixedPoint::ZERO);
    }

    #[test]
    fn formats_half_up() {
        let v: FixedPoint = "2.90909090".parse().unwrap();
        assert_eq!(v.format_dp(2), "2.91");
        assert_eq!(v.format_dp(8), "2.90909090");
        assert_eq!(v.format_dp(0), "3");
        assert_eq!(FixedPoint::from_int(7).format_dp(2), "7.00");
    }

    #[test]
    fn signed_diff_and_pct() {
        let capital = FixedPoint::from_int(10_000);
        let proceeds = FixedPoint::from_int(9_750);
        let profit = proceeds.signed_diff(capital);
        assert_eq!(profit, SignedFixedPoint(-250 * FixedPoint::SCALE as i64));
        // -250 / 10000 * 100 = -2.5%
        assert_eq!(profit.pct_of(capital), SignedFixedPoint(-2_50_000_000));
        assert_eq!(profit.pct_of(capital).format_dp(2), "-2.50");
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(FixedPoint::from_int(15).to_string(), "15");
        assert_eq!("15.2500".parse::<FixedPoint>().unwrap().to_string(), "15.25");
        assert_eq!(SignedFixedPoint(-150_000_000).to_string(), "-1.5");
    }
}
