//! Numeric coercion
//!
//! Tri-state integers are always 64-bit signed and floats 64-bit. This
//! module moves numbers between those and the domain widths without silent
//! loss: unsigned values above `i64::MAX` and integers that do not fit a
//! narrower destination fail with `RangeOverflow`.
//!
//! Floats entering the domain are rounded to a fixed number of decimal
//! digits (4 by default) through a decimal string, so values that survived
//! a round trip through JSON compare equal to the originals.

use crate::error::{Error, Result};

/// Convert an unsigned integer to Int64, failing above `i64::MAX`
pub fn unsigned_to_int64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::range_overflow(value, "int64"))
}

/// Integer types an Int64 can be narrowed into
pub trait FromInt64: Sized + Copy {
    /// Type name used in error messages
    const NAME: &'static str;

    /// Exact conversion, `None` when the value does not fit
    fn checked(value: i64) -> Option<Self>;

    /// Two's complement truncation to the low bits
    fn wrapping(value: i64) -> Self;
}

macro_rules! from_int64 {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromInt64 for $ty {
                const NAME: &'static str = stringify!($ty);

                fn checked(value: i64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                fn wrapping(value: i64) -> Self {
                    value as $ty
                }
            }
        )+
    };
}

from_int64!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Narrow an Int64 into `T`, failing with `RangeOverflow` on loss
pub fn narrow_int<T: FromInt64>(value: i64) -> Result<T> {
    T::checked(value).ok_or_else(|| Error::range_overflow(value, T::NAME))
}

/// Narrow an Int64 into `T`, keeping the low bits
pub fn wrap_int<T: FromInt64>(value: i64) -> T {
    T::wrapping(value)
}

/// Round to `digits` decimal places via a decimal string
///
/// NaN and infinities pass through unchanged. Rounding an already rounded
/// value returns it unchanged.
pub fn round_float64(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", digits as usize, value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Round to `digits` decimal places and convert to `f32`
///
/// A finite value outside the `f32` range fails with `RangeOverflow`.
pub fn round_float32(value: f64, digits: u32) -> Result<f32> {
    if !value.is_finite() {
        return Ok(value as f32);
    }
    let rounded = format!("{:.*}", digits as usize, value)
        .parse::<f32>()
        .map_err(|e| Error::other(format!("cannot parse rounded float {}: {}", value, e)))?;
    if rounded.is_infinite() {
        return Err(Error::range_overflow(value, "f32"));
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_overflow() {
        assert_eq!(unsigned_to_int64(42).unwrap(), 42);
        assert_eq!(unsigned_to_int64(i64::MAX as u64).unwrap(), i64::MAX);

        let err = unsigned_to_int64(u64::MAX).unwrap_err();
        assert!(matches!(err, Error::RangeOverflow { .. }));
        assert_eq!(err.to_string(), "value 18446744073709551615 does not fit in int64");
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(narrow_int::<i8>(-128).unwrap(), -128);
        assert!(narrow_int::<i8>(128).is_err());
        assert!(narrow_int::<u32>(-1).is_err());
        assert_eq!(narrow_int::<u64>(i64::MAX).unwrap(), i64::MAX as u64);

        assert_eq!(wrap_int::<i32>(1 << 32 | 7), 7);
        assert_eq!(wrap_int::<u8>(-1), 255);
    }

    #[test]
    fn test_round_float64() {
        assert_eq!(round_float64(3.14159265, 4), 3.1416);
        assert_eq!(round_float64(2.0, 4), 2.0);
        assert_eq!(round_float64(-0.00004, 4), -0.0);
        assert!(round_float64(f64::NAN, 4).is_nan());
        assert_eq!(round_float64(f64::INFINITY, 4), f64::INFINITY);
    }

    #[test]
    fn test_rounding_is_idempotent() {
        for value in [0.1, 1.0 / 3.0, 12345.678949, -98.76545, 1e-7, 6.02e23] {
            let once = round_float64(value, 4);
            assert_eq!(round_float64(once, 4), once, "value {}", value);
        }
    }

    #[test]
    fn test_round_float32() {
        let widened = f64::from(0.1_f32);
        assert_eq!(round_float32(widened, 4).unwrap(), 0.1_f32);
        assert!(matches!(
            round_float32(1e300, 4),
            Err(Error::RangeOverflow { .. })
        ));
    }
}
