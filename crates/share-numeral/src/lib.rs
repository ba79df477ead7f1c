// SPDX-License-Identifier: CC0-1.0

//! # Share Numeral
//!
//! Decodes share values written as digit strings in an arbitrary base (2 through 36)
//! into arbitrary-precision integers. Digits beyond `9` are the letters `a`..`z`,
//! accepted in either case.
//!
//! ```rust
//! use num_bigint::BigUint;
//! use share_numeral::{decode, encode};
//!
//! let value = decode("FF", 16).unwrap();
//! assert_eq!(value, BigUint::from(255u32));
//! assert_eq!(encode(&value, 2).unwrap(), "11111111");
//! ```

// Coding conventions
#![deny(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(missing_docs)]

use num_bigint::BigUint;
use num_traits::Zero;

use std::error;
use std::fmt;

/// Smallest supported base
pub const MIN_BASE: u32 = 2;
/// Largest supported base (`0-9` followed by `a-z`)
pub const MAX_BASE: u32 = 36;

/// Error
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Base is outside `2..=36`
    InvalidBase(u32),
    /// Base is not a decimal numeral
    MalformedBase(String),
    /// Character is not a digit of the declared base
    InvalidDigit {
        /// Offending character
        digit: char,
        /// Character position within the digit string
        position: usize,
        /// Declared base
        base: u32,
    },
    /// Digit string is empty
    Empty,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidBase(base) => {
                write!(f, "invalid base {base} (expected {MIN_BASE}..={MAX_BASE})")
            }
            Self::MalformedBase(text) => write!(f, "malformed base '{text}'"),
            Self::InvalidDigit {
                digit,
                position,
                base,
            } => write!(
                f,
                "invalid digit '{digit}' for base {base} (position: {position})"
            ),
            Self::Empty => write!(f, "empty digit string"),
        }
    }
}

impl error::Error for Error {}

/// Parses a base written as a decimal numeral, e.g. `"16"`
pub fn parse_base(text: &str) -> Result<u32, Error> {
    let base = text
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::MalformedBase(text.to_string()))?;
    check_base(base)?;
    Ok(base)
}

/// Decodes `digits` in `base` using Horner evaluation from the most significant digit.
///
/// Every character must map to a digit value strictly less than `base`.
pub fn decode(digits: &str, base: u32) -> Result<BigUint, Error> {
    check_base(base)?;
    if digits.is_empty() {
        return Err(Error::Empty);
    }

    let mut acc = BigUint::zero();
    for (position, ch) in digits.chars().enumerate() {
        let digit = ch.to_digit(MAX_BASE).filter(|d| *d < base).ok_or(Error::InvalidDigit {
            digit: ch,
            position,
            base,
        })?;
        acc = acc * base + digit;
    }

    Ok(acc)
}

/// Writes `value` in `base` with lowercase digits. Inverse of [`decode`].
pub fn encode(value: &BigUint, base: u32) -> Result<String, Error> {
    check_base(base)?;
    if value.is_zero() {
        return Ok("0".to_string());
    }

    // `to_radix_be` yields digit values, most significant first
    Ok(value
        .to_radix_be(base)
        .into_iter()
        .filter_map(|d| char::from_digit(d as u32, base))
        .collect())
}

fn check_base(base: u32) -> Result<(), Error> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(Error::InvalidBase(base));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode("4", 10).unwrap(), BigUint::from(4u32));
        assert_eq!(decode("111", 2).unwrap(), BigUint::from(7u32));
        assert_eq!(decode("213", 4).unwrap(), BigUint::from(39u32));
        assert_eq!(decode("zz", 36).unwrap(), BigUint::from(1295u32));
        assert_eq!(decode("0000", 7).unwrap(), BigUint::zero());
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode("aBcDeF", 16).unwrap(), decode("ABCDEF", 16).unwrap());
        assert_eq!(decode("aBcDeF", 16).unwrap(), BigUint::from(0xABCDEFu32));
    }

    #[test]
    fn test_decode_exceeds_u128() {
        // 2^200
        let digits = format!("1{}", "0".repeat(200));
        let value = decode(&digits, 2).unwrap();
        assert_eq!(value, BigUint::from(1u32) << 200usize);
        assert_eq!(value.bits(), 201);
    }

    #[test]
    fn test_decode_rejects_digit_out_of_range() {
        assert_eq!(
            decode("129", 8),
            Err(Error::InvalidDigit {
                digit: '9',
                position: 2,
                base: 8
            })
        );
        assert_eq!(
            decode("1g", 16),
            Err(Error::InvalidDigit {
                digit: 'g',
                position: 1,
                base: 16
            })
        );
        assert!(matches!(
            decode("12-3", 10),
            Err(Error::InvalidDigit { digit: '-', .. })
        ));
        assert!(matches!(
            decode(" 12", 10),
            Err(Error::InvalidDigit { digit: ' ', .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_base_and_empty() {
        assert_eq!(decode("1", 1), Err(Error::InvalidBase(1)));
        assert_eq!(decode("1", 37), Err(Error::InvalidBase(37)));
        assert_eq!(decode("", 10), Err(Error::Empty));
    }

    #[test]
    fn test_parse_base() {
        assert_eq!(parse_base("10"), Ok(10));
        assert_eq!(parse_base(" 36 "), Ok(36));
        assert_eq!(parse_base("0"), Err(Error::InvalidBase(0)));
        assert_eq!(
            parse_base("ten"),
            Err(Error::MalformedBase("ten".to_string()))
        );
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(&BigUint::zero(), 16).unwrap(), "0");
        assert_eq!(encode(&BigUint::from(255u32), 16).unwrap(), "ff");
        assert_eq!(encode(&BigUint::from(1295u32), 36).unwrap(), "zz");
        assert_eq!(encode(&BigUint::from(1u32), 37), Err(Error::InvalidBase(37)));
    }

    #[test]
    fn test_random_values_survive_decode() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let bytes: [u8; 32] = rng.random();
            let value = BigUint::from_bytes_be(&bytes);
            let base = rng.random_range(MIN_BASE..=MAX_BASE);

            let digits = encode(&value, base).unwrap();
            assert_eq!(decode(&digits, base).unwrap(), value);
            assert_eq!(decode(&digits.to_uppercase(), base).unwrap(), value);
        }
    }
}
