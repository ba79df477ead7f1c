// SPDX-License-Identifier: CC0-1.0

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::fraction::Fraction;
use crate::share::Share;

use std::error;
use std::fmt;

/// Error
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Two points share an x-coordinate, so the basis denominator vanishes
    RepeatedX(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::RepeatedX(id) => write!(f, "x-coordinate of share '{id}' is repeated"),
        }
    }
}

impl error::Error for Error {}

/// Value at `x = 0` of the unique polynomial of degree `points.len() - 1`
/// passing through `points`.
pub fn constant_term(points: &[&Share]) -> Result<Fraction, Error> {
    lagrange_at(&BigInt::zero(), points)
}

/// Value at `x` of the unique polynomial of degree `points.len() - 1`
/// passing through `points`.
pub fn evaluate_at(x: &BigInt, points: &[&Share]) -> Result<Fraction, Error> {
    lagrange_at(x, points)
}

// Lagrange form accumulated into a single running fraction:
//
//   for each point i:
//     num = prod_{j != i} (target - x_j)
//     den = prod_{j != i} (x_i - x_j)
//     acc = acc + y_i * num / den
//
// The running fraction is reduced after every term so intermediate values stay small.
fn lagrange_at(target: &BigInt, points: &[&Share]) -> Result<Fraction, Error> {
    let mut acc_num = BigInt::zero();
    let mut acc_den = BigInt::one();

    for (i, point) in points.iter().enumerate() {
        let mut num = BigInt::one();
        let mut den = BigInt::one();
        for (j, other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            num *= target - other.x();
            den *= point.x() - other.x();
        }

        if den.is_zero() {
            return Err(Error::RepeatedX(point.id().to_string()));
        }

        let next_num = &acc_num * &den + point.y() * num * &acc_den;
        let next_den = acc_den * den;
        (acc_num, acc_den) = Fraction::reduced(next_num, next_den).into_parts();
    }

    Ok(Fraction::reduced(acc_num, acc_den))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::seq::SliceRandom;

    fn shares(points: &[(i64, i64)]) -> Vec<Share> {
        points
            .iter()
            .map(|(x, y)| Share::new(x.to_string(), *x, *y))
            .collect()
    }

    // Horner evaluation of an integer polynomial, lowest coefficient first
    fn eval_poly(coeffs: &[BigInt], x: &BigInt) -> BigInt {
        coeffs
            .iter()
            .rev()
            .fold(BigInt::zero(), |acc, c| acc * x + c)
    }

    #[test]
    fn test_line_through_two_points() {
        let s = shares(&[(1, 5), (2, 7)]);
        let points: Vec<&Share> = s.iter().collect();

        assert_eq!(constant_term(&points).unwrap().to_string(), "3");
        assert_eq!(
            evaluate_at(&BigInt::from(10), &points).unwrap().to_string(),
            "23"
        );
    }

    #[test]
    fn test_fractional_constant_term() {
        // quadratic through (1,5), (2,7), (4,100)
        let s = shares(&[(1, 5), (2, 7), (4, 100)]);
        let points: Vec<&Share> = s.iter().collect();

        let secret = constant_term(&points).unwrap();
        assert!(!secret.is_integer());
        assert_eq!(secret.to_string(), "98/3");
    }

    #[test]
    fn test_single_point_is_constant() {
        let s = shares(&[(9, -42)]);
        let points: Vec<&Share> = s.iter().collect();

        assert_eq!(constant_term(&points).unwrap().to_string(), "-42");
        assert_eq!(
            evaluate_at(&BigInt::from(1000), &points)
                .unwrap()
                .to_string(),
            "-42"
        );
    }

    #[test]
    fn test_evaluate_at_own_points() {
        let s = shares(&[(1, 5), (3, 92), (4, 100), (-2, 17)]);
        let points: Vec<&Share> = s.iter().collect();

        for share in &s {
            assert!(evaluate_at(share.x(), &points).unwrap().matches(share.y()));
        }
    }

    #[test]
    fn test_repeated_x() {
        let s = shares(&[(1, 5), (2, 7), (1, 9)]);
        let points: Vec<&Share> = s.iter().collect();

        assert_eq!(
            constant_term(&points),
            Err(Error::RepeatedX("1".to_string()))
        );
    }

    #[test]
    fn test_random_polynomials_recover_constant_term() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let k = rng.random_range(1..=8usize);
            let coeffs: Vec<BigInt> = (0..k)
                .map(|_| BigInt::from(rng.random_range(-1_000_000i64..1_000_000)))
                .collect();

            let mut xs: Vec<i64> = (-50..=50).filter(|x| *x != 0).collect();
            xs.shuffle(&mut rng);

            let s: Vec<Share> = xs[..k]
                .iter()
                .map(|x| {
                    let x = BigInt::from(*x);
                    Share::new(x.to_string(), x.clone(), eval_poly(&coeffs, &x))
                })
                .collect();
            let points: Vec<&Share> = s.iter().collect();

            let secret = constant_term(&points).unwrap();
            assert!(secret.is_integer());
            assert_eq!(secret.to_integer(), Some(coeffs[0].clone()));

            let probe = BigInt::from(rng.random_range(-1000i64..1000));
            assert!(
                evaluate_at(&probe, &points)
                    .unwrap()
                    .matches(&eval_poly(&coeffs, &probe))
            );
        }
    }

    #[test]
    fn test_large_values_stay_exact() {
        // y = 2^300 + 7x
        let big = BigInt::from(1) << 300usize;
        let s: Vec<Share> = (1..=3)
            .map(|x: i64| Share::new(x.to_string(), x, &big + BigInt::from(7 * x)))
            .collect();
        let points: Vec<&Share> = s.iter().collect();

        assert_eq!(constant_term(&points).unwrap().to_integer(), Some(big));
    }
}
