//! Numeric projection of records.

use super::Value;

/// A numeric reading that keeps integers exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// An integer, wide enough for every `i64` and `u64`.
    Int(i128),
    /// A floating point measurement.
    Float(f64),
}

impl Reading {
    /// Returns the reading as an `f64`, rounding large integers.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Reading::Int(v) => v as f64,
            Reading::Float(v) => v,
        }
    }
}

impl From<f64> for Reading {
    fn from(v: f64) -> Self {
        Reading::Float(v)
    }
}

impl From<f32> for Reading {
    fn from(v: f32) -> Self {
        Reading::Float(f64::from(v))
    }
}

/// Projects a record onto a numeric measurement.
///
/// Returns `None` for values that have no meaningful numeric reading
/// (`NaN`, infinities, booleans, strings, null). Aggregators treat `None`
/// as "not relevant" and skip the record.
pub trait Numeric {
    /// Returns the numeric reading of this value as an `f64`, if any.
    fn to_f64(&self) -> Option<f64>;

    /// Returns the numeric reading of this value, keeping integers exact.
    fn reading(&self) -> Option<Reading> {
        self.to_f64().map(Reading::Float)
    }
}

macro_rules! impl_numeric_int {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                #[inline]
                fn to_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }

                #[inline]
                fn reading(&self) -> Option<Reading> {
                    Some(Reading::Int(*self as i128))
                }
            }

            impl From<$t> for Reading {
                fn from(v: $t) -> Self {
                    Reading::Int(v as i128)
                }
            }
        )*
    };
}

impl_numeric_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Numeric for f32 {
    #[inline]
    fn to_f64(&self) -> Option<f64> {
        self.is_finite().then_some(f64::from(*self))
    }
}

impl Numeric for f64 {
    #[inline]
    fn to_f64(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl Numeric for Value {
    fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => v.to_f64(),
            Value::Null | Value::Bool(_) | Value::String(_) => None,
        }
    }

    fn reading(&self) -> Option<Reading> {
        match self {
            Value::Int64(v) => Some(Reading::Int(i128::from(*v))),
            _ => self.to_f64().map(Reading::Float),
        }
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    #[inline]
    fn to_f64(&self) -> Option<f64> {
        (**self).to_f64()
    }

    #[inline]
    fn reading(&self) -> Option<Reading> {
        (**self).reading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_project() {
        assert_eq!(5i64.to_f64(), Some(5.0));
        assert_eq!(7u8.to_f64(), Some(7.0));
        assert_eq!((-3isize).to_f64(), Some(-3.0));
    }

    #[test]
    fn test_non_finite_floats_are_excluded() {
        assert_eq!(f64::NAN.to_f64(), None);
        assert_eq!(f64::INFINITY.to_f64(), None);
        assert_eq!(f32::NEG_INFINITY.to_f64(), None);
        assert_eq!(1.5f32.to_f64(), Some(1.5));
    }

    #[test]
    fn test_value_projection() {
        assert_eq!(Value::Int64(4).to_f64(), Some(4.0));
        assert_eq!(Value::Float64(2.5).to_f64(), Some(2.5));
        assert_eq!(Value::Float64(f64::NAN).to_f64(), None);
        assert_eq!(Value::Bool(true).to_f64(), None);
        assert_eq!(Value::from("12").to_f64(), None);
        assert_eq!(Value::Null.to_f64(), None);
    }

    #[test]
    fn test_integer_readings_stay_exact() {
        let big = 9_007_199_254_740_993_i64;
        assert_eq!(big.reading(), Some(Reading::Int(i128::from(big))));
        assert_eq!(Value::Int64(big).reading(), Some(Reading::Int(i128::from(big))));
        assert_eq!(u64::MAX.reading(), Some(Reading::Int(i128::from(u64::MAX))));
        assert_eq!(Value::Float64(2.0).reading(), Some(Reading::Float(2.0)));
        assert_eq!(f64::NAN.reading(), None);
        assert_eq!(Value::from("1").reading(), None);
    }
}
