//! Checked numeric conversions for pixel counts and scroll distances

use crate::{Error, Result};

/// Safely convert i32 to u32, rejecting negative values
///
/// # Errors
///
/// Returns an error if the value is negative
pub fn i32_to_u32(value: i32) -> Result<u32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} cannot be negative")))
}

/// Safely convert f64 to i32 with bounds checking
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
pub fn f64_to_i32(value: f64) -> Result<i32> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Convert a non-negative distance to u32, saturating at the type bounds
///
/// NaN maps to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamping ensures safe truncation
pub fn f64_to_u32_saturating(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_i32_to_u32() {
        assert_eq!(i32_to_u32(0).unwrap(), 0);
        assert_eq!(i32_to_u32(i32::MAX).unwrap(), i32::MAX as u32);
        assert!(i32_to_u32(-1).is_err());
    }

    #[test]
    fn test_f64_to_i32() {
        assert_eq!(f64_to_i32(42.0).unwrap(), 42);
        assert_eq!(f64_to_i32(-42.0).unwrap(), -42);
        assert_eq!(f64_to_i32(2147483647.0).unwrap(), i32::MAX);
        assert_eq!(f64_to_i32(-2147483648.0).unwrap(), i32::MIN);

        assert!(f64_to_i32(f64::INFINITY).is_err());
        assert!(f64_to_i32(f64::NAN).is_err());
        assert!(f64_to_i32(2147483648.0).is_err());
    }

    #[test]
    fn test_f64_to_u32_saturating() {
        assert_eq!(f64_to_u32_saturating(3.0), 3);
        assert_eq!(f64_to_u32_saturating(-5.0), 0);
        assert_eq!(f64_to_u32_saturating(f64::NAN), 0);
        assert_eq!(f64_to_u32_saturating(f64::INFINITY), u32::MAX);
        assert_eq!(f64_to_u32_saturating(1e20), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_f64_to_i32_finite_within_bounds(value in i32::MIN..=i32::MAX) {
            let result = f64_to_i32(f64::from(value));
            prop_assert!(result.is_ok());
            prop_assert_eq!(result.unwrap(), value);
        }

        #[test]
        fn prop_f64_to_u32_saturating_is_lossless_for_u32(value in any::<u32>()) {
            prop_assert_eq!(f64_to_u32_saturating(f64::from(value)), value);
        }
    }
}
