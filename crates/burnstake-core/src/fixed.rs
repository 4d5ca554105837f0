//! # Fixed-Point Weight Arithmetic
//!
//! A deposit's weight is `amount × rate`, where `rate` is a fixed-point
//! number stored as a raw integer over a configured [`RateScale`]:
//!
//! ```text
//! weight = floor(amount * rate_raw / scale)
//! ```
//!
//! With a scale of 1 the rate is a plain integer multiplier; with a scale of
//! `10^18` a raw rate of `1.5 × 10^18` means "1.5 weight per unit".
//!
//! ## Invariant
//!
//! The multiply is performed with `checked_mul` on `u128` *before* the
//! division, so no precision is lost beyond the final floor to one unit of
//! weight. An intermediate product that does not fit in `u128` is an
//! [`ArithmeticError::Overflow`], never a wrapped value.

use serde::{Deserialize, Serialize};

use crate::error::ArithmeticError;

/// A raw fixed-point weight-per-unit rate. Zero means "unsupported".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightRate(pub u128);

impl WeightRate {
    /// The rate that marks an asset as unsupported.
    pub const UNSUPPORTED: WeightRate = WeightRate(0);

    /// The raw fixed-point value.
    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Whether deposits at this rate are accepted.
    pub fn is_supported(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for WeightRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The denominator of every [`WeightRate`]. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u128", into = "u128")]
pub struct RateScale(u128);

impl RateScale {
    /// Integer rates: a raw rate of 2 means two weight per unit.
    pub const UNIT: RateScale = RateScale(1);

    /// Eighteen decimal places, the usual token convention.
    pub const E18: RateScale = RateScale(1_000_000_000_000_000_000);

    /// Create a scale, rejecting zero.
    pub fn new(scale: u128) -> Result<Self, ArithmeticError> {
        if scale == 0 {
            return Err(ArithmeticError::ZeroScale);
        }
        Ok(Self(scale))
    }

    /// The raw denominator.
    pub fn get(&self) -> u128 {
        self.0
    }
}

impl Default for RateScale {
    fn default() -> Self {
        Self::UNIT
    }
}

impl TryFrom<u128> for RateScale {
    type Error = ArithmeticError;

    fn try_from(value: u128) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RateScale> for u128 {
    fn from(scale: RateScale) -> Self {
        scale.0
    }
}

/// Compute `floor(amount * rate / scale)` without wrapping.
///
/// # Errors
///
/// Returns [`ArithmeticError::Overflow`] if `amount * rate` exceeds `u128`.
pub fn compute_weight(
    amount: u128,
    rate: WeightRate,
    scale: RateScale,
) -> Result<u128, ArithmeticError> {
    amount
        .checked_mul(rate.raw())
        .map(|product| product / scale.get())
        .ok_or_else(|| ArithmeticError::overflow("weight"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integer_scale() {
        assert_eq!(
            compute_weight(100, WeightRate(2), RateScale::UNIT).unwrap(),
            200
        );
    }

    #[test]
    fn test_fractional_rate_floors() {
        // 1.5 per unit at 18 decimals.
        let rate = WeightRate(1_500_000_000_000_000_000);
        assert_eq!(compute_weight(3, rate, RateScale::E18).unwrap(), 4);
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = compute_weight(u128::MAX, WeightRate(2), RateScale::UNIT).unwrap_err();
        assert_eq!(err, ArithmeticError::overflow("weight"));
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert_eq!(RateScale::new(0), Err(ArithmeticError::ZeroScale));
        assert!(serde_json::from_str::<RateScale>("0").is_err());
    }

    #[test]
    fn test_unsupported_rate() {
        assert!(!WeightRate::UNSUPPORTED.is_supported());
        assert!(WeightRate(1).is_supported());
    }

    proptest! {
        #[test]
        fn prop_matches_wide_division(amount in 0u128..=u64::MAX as u128, rate in 0u128..=u64::MAX as u128, scale in 1u128..=1_000_000u128) {
            let weight = compute_weight(amount, WeightRate(rate), RateScale::new(scale).unwrap()).unwrap();
            prop_assert_eq!(weight, amount * rate / scale);
        }
    }
}
