//! Exact decimal arithmetic.
//!
//! A [`BigDecimal`] is an arbitrary-precision integer (`unscaled`) and a
//! number of fractional digits (`scale`): the value is `unscaled / 10^scale`.
//!
//! Addition, subtraction and multiplication never lose precision: the result
//! scale is the larger operand scale (add/sub) or the sum of both (mul).
//! Multiplication and powers fail with [`DecimalError::ScaleOverflow`] when
//! that scale no longer fits in a `u32`.
//! Division runs decimal long division and stops as soon as the quotient is
//! exact or [`MAX_SCALE`] fractional digits have been produced; the quotient
//! is then stripped of trailing zeros.
//!
//! Equality, ordering and hashing are by numeric value, so `1.0 == 1.00`,
//! while `Display` preserves the scale (`1.50` prints as `1.50`).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Maximum number of fractional digits a division produces.
pub const MAX_SCALE: u32 = 50;

/// Largest accepted exponent magnitude in `1e<exp>` literals.
const MAX_EXPONENT: i64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecimalError {
    #[error("invalid decimal literal `{0}`")]
    Malformed(String),
    #[error("exponent out of range in decimal literal `{0}`")]
    ExponentOutOfRange(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("decimal scale exceeds {max} fractional digits", max = u32::MAX)]
    ScaleOverflow,
}

/// An exact decimal number.
#[derive(Clone)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: u32,
}

fn ten_pow(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

impl BigDecimal {
    pub fn zero() -> Self {
        BigDecimal {
            unscaled: BigInt::zero(),
            scale: 0,
        }
    }

    pub fn one() -> Self {
        BigDecimal {
            unscaled: BigInt::one(),
            scale: 0,
        }
    }

    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        BigDecimal { unscaled, scale }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        if self.unscaled.is_negative() {
            -1
        } else if self.unscaled.is_zero() {
            0
        } else {
            1
        }
    }

    /// Parse `[+-]digits[.digits][e[+-]digits]`, also `.5` and `-.5`.
    pub fn parse(text: &str) -> Result<Self, DecimalError> {
        let malformed = || DecimalError::Malformed(text.to_owned());
        let s = text.trim();

        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(at) => (&rest[..at], Some(&rest[at + 1..])),
            None => (rest, None),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) => {
                if frac_part.is_empty() {
                    return Err(malformed());
                }
                (if int_part.is_empty() { "0" } else { int_part }, frac_part)
            }
            None => (mantissa, ""),
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !(frac_part.is_empty() || all_digits(frac_part)) {
            return Err(malformed());
        }

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let mut unscaled = BigInt::from_str(&digits).map_err(|_| malformed())?;
        if negative {
            unscaled = -unscaled;
        }

        let frac_len = i64::try_from(frac_part.len()).map_err(|_| malformed())?;
        let exp = match exponent {
            Some(e) => {
                let parsed: i64 = e.parse().map_err(|_| malformed())?;
                if parsed.abs() > MAX_EXPONENT {
                    return Err(DecimalError::ExponentOutOfRange(text.to_owned()));
                }
                parsed
            }
            None => 0,
        };

        let scale = frac_len - exp;
        if scale >= 0 {
            let scale = u32::try_from(scale)
                .map_err(|_| DecimalError::ExponentOutOfRange(text.to_owned()))?;
            Ok(BigDecimal { unscaled, scale })
        } else {
            let shift = u32::try_from(-scale)
                .map_err(|_| DecimalError::ExponentOutOfRange(text.to_owned()))?;
            Ok(BigDecimal {
                unscaled: unscaled * ten_pow(shift),
                scale: 0,
            })
        }
    }

    /// Exact conversion from a finite float through its shortest decimal form.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::parse(&format!("{value}")).ok()
    }

    /// Unscaled value re-expressed with `scale` fractional digits.
    ///
    /// Callers only pass `scale >= self.scale`.
    fn inflate(&self, scale: u32) -> BigInt {
        if scale <= self.scale {
            return self.unscaled.clone();
        }
        &self.unscaled * ten_pow(scale - self.scale)
    }

    /// Strip trailing fractional zeros.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        let ten = BigInt::from(10u32);
        while scale > 0 && (&unscaled % &ten).is_zero() {
            unscaled /= &ten;
            scale -= 1;
        }
        if unscaled.is_zero() {
            scale = 0;
        }
        BigDecimal { unscaled, scale }
    }

    fn common(&self, other: &Self) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        (self.inflate(scale), other.inflate(scale), scale)
    }

    /// Long division, exact or to [`MAX_SCALE`] fractional digits.
    pub fn checked_div(&self, other: &Self) -> Result<Self, DecimalError> {
        if other.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        let (x, y, _) = self.common(other);
        let ten = BigInt::from(10u32);
        let mut quotient = &x / &y;
        let mut remainder = &x % &y;
        let mut digits = 0;
        while !remainder.is_zero() && digits < MAX_SCALE {
            remainder *= &ten;
            quotient = quotient * &ten + &remainder / &y;
            remainder %= &y;
            digits += 1;
        }
        Ok(BigDecimal {
            unscaled: quotient,
            scale: digits,
        }
        .normalized())
    }

    /// Remainder of truncating division; takes the sign of `self`.
    pub fn checked_rem(&self, other: &Self) -> Result<Self, DecimalError> {
        if other.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        let (x, y, scale) = self.common(other);
        Ok(BigDecimal {
            unscaled: x % y,
            scale,
        })
    }

    /// Round to `precision` fractional digits, half away from zero.
    #[must_use]
    pub fn round(&self, precision: u32) -> Self {
        if self.scale <= precision {
            return self.clone();
        }
        let divisor = ten_pow(self.scale - precision);
        let mut quotient = &self.unscaled / &divisor;
        let remainder = &self.unscaled % &divisor;
        if remainder.abs() * 2u32 >= divisor {
            if self.is_negative() {
                quotient -= 1u32;
            } else {
                quotient += 1u32;
            }
        }
        BigDecimal {
            unscaled: quotient,
            scale: precision,
        }
    }

    /// Drop the fractional part.
    #[must_use]
    pub fn truncate(&self) -> Self {
        BigDecimal {
            unscaled: &self.unscaled / ten_pow(self.scale),
            scale: 0,
        }
    }

    fn has_fraction(&self) -> bool {
        !(&self.unscaled % ten_pow(self.scale)).is_zero()
    }

    /// Largest integer not greater than `self`.
    #[must_use]
    pub fn floor(&self) -> Self {
        let mut result = self.truncate();
        if self.is_negative() && self.has_fraction() {
            result.unscaled -= 1u32;
        }
        result
    }

    /// Smallest integer not less than `self`.
    #[must_use]
    pub fn ceiling(&self) -> Self {
        let mut result = self.truncate();
        if !self.is_negative() && self.has_fraction() {
            result.unscaled += 1u32;
        }
        result
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        BigDecimal {
            unscaled: self.unscaled.abs(),
            scale: self.scale,
        }
    }

    /// Exact product; the scale is the sum of both operand scales.
    pub fn checked_mul(&self, other: &Self) -> Result<Self, DecimalError> {
        let scale = self
            .scale
            .checked_add(other.scale)
            .ok_or(DecimalError::ScaleOverflow)?;
        Ok(BigDecimal {
            unscaled: &self.unscaled * &other.unscaled,
            scale,
        })
    }

    /// Integer power. Negative exponents divide one by the positive power.
    pub fn pow(&self, exponent: i32) -> Result<Self, DecimalError> {
        let magnitude = exponent.unsigned_abs();
        let scale = self
            .scale
            .checked_mul(magnitude)
            .ok_or(DecimalError::ScaleOverflow)?;
        let positive = BigDecimal {
            unscaled: self.unscaled.pow(magnitude),
            scale,
        };
        if exponent >= 0 {
            Ok(positive)
        } else {
            BigDecimal::one().checked_div(&positive)
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Integer part, if it fits in an `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        self.truncate().unscaled.to_i64()
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        BigDecimal {
            unscaled: BigInt::from(value),
            scale: 0,
        }
    }
}

impl FromStr for BigDecimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::parse(s)
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.abs().to_string();
        if self.is_negative() {
            f.write_str("-")?;
        }
        if self.scale == 0 {
            return f.write_str(&digits);
        }
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{int_part}.{frac_part}")
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigDecimal({self})")
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (x, y, _) = self.common(other);
        x.cmp(&y)
    }
}

impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normal = self.normalized();
        normal.unscaled.hash(state);
        normal.scale.hash(state);
    }
}

impl Add for &BigDecimal {
    type Output = BigDecimal;

    fn add(self, rhs: &BigDecimal) -> BigDecimal {
        let (x, y, scale) = self.common(rhs);
        BigDecimal {
            unscaled: x + y,
            scale,
        }
    }
}

impl Sub for &BigDecimal {
    type Output = BigDecimal;

    fn sub(self, rhs: &BigDecimal) -> BigDecimal {
        let (x, y, scale) = self.common(rhs);
        BigDecimal {
            unscaled: x - y,
            scale,
        }
    }
}

impl Neg for &BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> BigDecimal {
        BigDecimal {
            unscaled: -&self.unscaled,
            scale: self.scale,
        }
    }
}
