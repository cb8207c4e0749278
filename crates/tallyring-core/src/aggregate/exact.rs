//! Exact summation of finite floats and integers.
//!
//! Every finite `f64` is an integer multiple of 2^-1074, so a wide enough
//! fixed-point integer holds any sum of them without rounding:
//!
//! ```text
//!   bit 0           bit 1074          bit 2097        bit 2303
//!   +---------------+-----------------+---------------+---------+
//!   | 2^-1074 ...   | 2^0 ...         | ... 2^1023    | headroom|
//!   +---------------+-----------------+---------------+---------+
//! ```
//!
//! The accumulator is a two's complement integer over `LIMBS` words.
//! Rounding happens once, when the total is read, so the result depends only
//! on the multiset of inputs and never on their order.

use std::fmt;

use tallyring_common::types::Reading;

/// 64-bit words in the accumulator; room for 2^64 additions of `f64::MAX`.
const LIMBS: usize = 36;

/// Bit position of 2^0.
const UNIT_BIT: usize = 1074;

/// Significand bits of an `f64`, including the implicit bit.
const MANTISSA_BITS: usize = 53;

const FRACTION_MASK: u64 = (1 << 52) - 1;

/// Exact running total of [`Reading`]s.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) struct ExactSum {
    limbs: [u64; LIMBS],
}

impl Default for ExactSum {
    fn default() -> Self {
        Self { limbs: [0; LIMBS] }
    }
}

impl ExactSum {
    /// Adds a reading. Non-finite floats must be filtered by the caller.
    pub(super) fn add(&mut self, reading: Reading) {
        match reading {
            Reading::Int(v) => self.add_int(v),
            Reading::Float(v) => self.add_float(v),
        }
    }

    fn add_int(&mut self, value: i128) {
        let negative = value < 0;
        let magnitude = value.unsigned_abs();
        self.add_word(magnitude as u64, UNIT_BIT, negative);
        self.add_word((magnitude >> 64) as u64, UNIT_BIT + 64, negative);
    }

    fn add_float(&mut self, value: f64) {
        debug_assert!(value.is_finite());
        let bits = value.to_bits();
        let exponent = ((bits >> 52) & 0x7ff) as usize;
        let fraction = bits & FRACTION_MASK;
        let (mantissa, bit) = if exponent == 0 {
            (fraction, 0)
        } else {
            (fraction | (1 << 52), exponent - 1)
        };
        self.add_word(mantissa, bit, bits >> 63 == 1);
    }

    /// Adds or subtracts `word * 2^(bit - 1074)`.
    fn add_word(&mut self, word: u64, bit: usize, negative: bool) {
        if word == 0 {
            return;
        }
        let start = bit / 64;
        let wide = u128::from(word) << (bit % 64);
        let parts = [wide as u64, (wide >> 64) as u64];

        let mut carry = false;
        for (i, limb) in self.limbs.iter_mut().enumerate().skip(start) {
            let part = parts.get(i - start).copied().unwrap_or(0);
            if part == 0 && !carry && i >= start + parts.len() {
                break;
            }
            let (next, c1, c2) = if negative {
                let (d, b1) = limb.overflowing_sub(part);
                let (d, b2) = d.overflowing_sub(u64::from(carry));
                (d, b1, b2)
            } else {
                let (s, c1) = limb.overflowing_add(part);
                let (s, c2) = s.overflowing_add(u64::from(carry));
                (s, c1, c2)
            };
            *limb = next;
            carry = c1 || c2;
        }
    }

    /// Returns `(negative, mantissa, exponent)` with the total equal to
    /// `mantissa * 2^exponent`, rounded half to even to 53 bits.
    ///
    /// Returns `None` when the total is exactly zero.
    fn parts(&self) -> Option<(bool, u64, i64)> {
        let negative = self.limbs[LIMBS - 1] >> 63 == 1;
        let mut magnitude = self.limbs;
        if negative {
            negate(&mut magnitude);
        }

        let top = magnitude.iter().rposition(|&limb| limb != 0)?;
        let highest = top * 64 + 63 - magnitude[top].leading_zeros() as usize;
        if highest < MANTISSA_BITS {
            return Some((negative, magnitude[0], -(UNIT_BIT as i64)));
        }

        let low = highest + 1 - MANTISSA_BITS;
        let mut mantissa = bits_from(&magnitude, low);
        let mut exponent = low as i64 - UNIT_BIT as i64;
        let round = bit_set(&magnitude, low - 1);
        let sticky = any_below(&magnitude, low - 1);
        if round && (sticky || mantissa & 1 == 1) {
            mantissa += 1;
            if mantissa == 1 << MANTISSA_BITS {
                mantissa >>= 1;
                exponent += 1;
            }
        }
        Some((negative, mantissa, exponent))
    }

    /// Returns the total rounded to the nearest `f64`.
    ///
    /// Totals beyond the `f64` range round to an infinity.
    pub(super) fn to_f64(&self) -> f64 {
        let Some((negative, mantissa, exponent)) = self.parts() else {
            return 0.0;
        };
        let magnitude = if mantissa <= FRACTION_MASK {
            // Subnormal: exponent is the minimum and the bits are exact.
            f64::from_bits(mantissa)
        } else {
            let biased = exponent + 1075;
            if biased >= 0x7ff {
                f64::INFINITY
            } else {
                f64::from_bits(((biased as u64) << 52) | (mantissa & FRACTION_MASK))
            }
        };
        if negative { -magnitude } else { magnitude }
    }

    /// Returns the total divided by `count` without overflowing on the way.
    pub(super) fn mean(&self, count: u64) -> f64 {
        let Some((negative, mantissa, exponent)) = self.parts() else {
            return 0.0;
        };
        let magnitude = scale(mantissa as f64 / count as f64, exponent);
        if negative { -magnitude } else { magnitude }
    }
}

impl fmt::Debug for ExactSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExactSum").field(&self.to_f64()).finish()
    }
}

fn negate(limbs: &mut [u64; LIMBS]) {
    let mut carry = true;
    for limb in limbs.iter_mut() {
        let (sum, overflow) = (!*limb).overflowing_add(u64::from(carry));
        *limb = sum;
        carry = overflow;
    }
}

/// Reads the 53 bits starting at bit `low`.
fn bits_from(limbs: &[u64; LIMBS], low: usize) -> u64 {
    let i = low / 64;
    let lo = u128::from(limbs[i]);
    let hi = limbs.get(i + 1).map_or(0, |&w| u128::from(w));
    (((hi << 64) | lo) >> (low % 64)) as u64 & ((1 << MANTISSA_BITS) - 1)
}

fn bit_set(limbs: &[u64; LIMBS], bit: usize) -> bool {
    (limbs[bit / 64] >> (bit % 64)) & 1 == 1
}

/// Returns true if any bit strictly below `bit` is set.
fn any_below(limbs: &[u64; LIMBS], bit: usize) -> bool {
    let i = bit / 64;
    let mask = (1u64 << (bit % 64)) - 1;
    limbs[..i].iter().any(|&w| w != 0) || limbs[i] & mask != 0
}

/// Exact power of two for `-1022 <= exp <= 1023`.
fn pow2(exp: i64) -> f64 {
    f64::from_bits(((exp + 1023) as u64) << 52)
}

/// Computes `value * 2^exp` in steps that stay within the normal range.
fn scale(mut value: f64, mut exp: i64) -> f64 {
    while exp > 1023 {
        value *= pow2(1023);
        exp -= 1023;
    }
    while exp < -1022 {
        value *= pow2(-1022);
        exp += 1022;
    }
    value * pow2(exp)
}
