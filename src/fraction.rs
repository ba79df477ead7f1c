// SPDX-License-Identifier: CC0-1.0

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use std::cmp::Ordering;
use std::fmt;

/// An exact rational number kept in lowest terms.
///
/// Invariant: `den > 0` and `gcd(|num|, den) == 1`. The sign lives in `num`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: BigInt,
    den: BigInt,
}

impl Fraction {
    /// Returns `num / den` in lowest terms, or `None` if `den` is zero
    pub fn new(num: BigInt, den: BigInt) -> Option<Self> {
        if den.is_zero() {
            return None;
        }
        Some(Self::reduced(num, den))
    }

    /// Returns `value / 1`
    pub fn from_integer(value: BigInt) -> Self {
        Self {
            num: value,
            den: BigInt::one(),
        }
    }

    /// Returns 0
    pub fn zero() -> Self {
        Self::from_integer(BigInt::zero())
    }

    // Caller guarantees a non-zero denominator
    pub(crate) fn reduced(mut num: BigInt, mut den: BigInt) -> Self {
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        let gcd = num.gcd(&den);
        if !gcd.is_one() && !gcd.is_zero() {
            num /= &gcd;
            den /= &gcd;
        }
        Self { num, den }
    }

    pub(crate) fn into_parts(self) -> (BigInt, BigInt) {
        (self.num, self.den)
    }

    /// Numerator (carries the sign)
    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    /// Denominator (always positive)
    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    /// Whether the denominator is 1
    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    /// Returns the value if it is integral
    pub fn to_integer(&self) -> Option<BigInt> {
        self.is_integer().then(|| self.num.clone())
    }

    /// Exact check `num == y * den`, i.e. whether this fraction equals `y`
    pub fn matches(&self, y: &BigInt) -> bool {
        self.num == y * &self.den
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    // Denominators are positive, so cross multiplication preserves order
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
