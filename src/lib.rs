// SPDX-License-Identifier: CC0-1.0

//! # Share Consensus
//!
//! Recovers a secret split with a threshold (Shamir-style) polynomial sharing from a
//! pool of submitted shares, some of which may be corrupted or deliberately altered.
//!
//! ## Overview
//!
//! A secret `s` is the constant term of a polynomial of degree `k - 1`. Each share is
//! one point `(x, y)` on that polynomial, so any `k` honest shares determine `s`
//! exactly. When more than `k` shares are submitted, every size-`k` subset is
//! interpolated and the subsets vote:
//!
//! 1. **Exact interpolation**: Lagrange interpolation is carried out over the
//!    rationals with arbitrary-precision integers. There is no field modulus and no
//!    floating point, so equality checks are exact
//! 2. **Consensus**: the integral secret produced by the most subsets wins. Ties go to
//!    the candidate whose polynomial disagrees with the fewest shares, then to the
//!    numerically smallest secret
//! 3. **Fault detection**: every share is evaluated against the winning polynomial and
//!    the ones that disagree are reported
//! 4. **Fallback**: if no subset yields an integral secret, the subset whose polynomial
//!    agrees with the most shares is used and its (fractional) constant term reported
//!
//! ## Usage
//!
//! ```rust
//! use share_consensus::{Config, Document, recover};
//!
//! let doc = Document::from_json(r#"{
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "5" },
//!     "2": { "base": "2", "value": "111" },
//!     "3": { "base": "16", "value": "9" },
//!     "4": { "base": "10", "value": "100" }
//! }"#).unwrap();
//!
//! let result = recover(&doc, &Config::default()).unwrap();
//! assert_eq!(result.secret.to_string(), "3");
//! assert_eq!(result.wrong_shares, vec!["4"]);
//! ```
//!
//! ## Cost
//!
//! The search visits all `C(n, k)` subsets, each costing `O(k^2)` big-integer
//! operations to interpolate and `O(n * k)` to check against every share. It is meant
//! for tens of shares, not hundreds; [`Config::max_combinations`] bounds the work.
//!

// Coding conventions
#![deny(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(missing_docs)]

pub use num_bigint;
pub use share_numeral;

/// Input document loading
pub mod document;
/// Exact rationals
pub mod fraction;
/// Interpolation, combination search and consensus
pub mod recovery;
/// Output summary
pub mod report;
/// Share model
pub mod share;

use anyhow::{Context, Result};

pub use document::Document;
pub use fraction::Fraction;
pub use recovery::consensus::{Config, Engine, Method, Reconstruction};
pub use report::Report;
pub use share::{Share, ShareSet};

/// Decodes the shares of `document` and reconstructs its secret
pub fn recover(document: &Document, config: &Config) -> Result<Reconstruction> {
    let k = document.threshold().context("Invalid document")?;
    let shares = document.shares().context("Failed to decode shares")?;

    let result = Engine::new(config.clone())
        .reconstruct(&shares, k)
        .context("Reconstruction failed")?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::consensus;
    use num_bigint::{BigInt, Sign};
    use num_traits::Zero;
    use rand::Rng;
    use rand::seq::SliceRandom;

    #[test]
    fn test_integration() {
        // y = x^2 + 3
        let doc = Document::from_json(
            r#"{
                "keys": { "n": 4, "k": 3 },
                "1": { "base": "10", "value": "4" },
                "2": { "base": "2", "value": "111" },
                "3": { "base": "10", "value": "12" },
                "6": { "base": "4", "value": "213" }
            }"#,
        )
        .unwrap();

        let result = recover(&doc, &Config::default()).unwrap();
        assert_eq!(result.secret.to_string(), "3");
        assert!(result.wrong_shares.is_empty());
        assert_eq!(result.diagnostics.total_combinations, 4);
        assert_eq!(result.diagnostics.correct_combinations, 4);

        let report = Report::from(&result);
        assert_eq!(report.secret, "3");
        assert!(report.wrong_share_ids.is_empty());
    }

    #[test]
    fn test_demo_documents() {
        let doc = Document::from_json(include_str!("../demos/testcase1.json")).unwrap();
        let result = recover(&doc, &Config::default()).unwrap();
        assert_eq!(result.secret.to_string(), "3");
        assert!(result.wrong_shares.is_empty());

        let doc = Document::from_json(include_str!("../demos/corrupted.json")).unwrap();
        let result = recover(&doc, &Config::default()).unwrap();
        assert_eq!(result.secret.to_string(), "3");
        assert_eq!(result.wrong_shares, vec!["4"]);
        assert_eq!(result.method, Method::Consensus);
    }

    #[test]
    fn test_large_secret_with_corrupted_shares() {
        let mut rng = rand::rng();

        // degree 4 polynomial with ~256-bit coefficients
        let k = 5;
        let coeffs: Vec<BigInt> = (0..k)
            .map(|_| BigInt::from_bytes_be(Sign::Plus, &rng.random::<[u8; 32]>()))
            .collect();
        let eval = |x: &BigInt| {
            coeffs
                .iter()
                .rev()
                .fold(BigInt::zero(), |acc, c| acc * x + c)
        };

        let mut xs: Vec<u32> = (1..=40).collect();
        xs.shuffle(&mut rng);
        let xs = &xs[..8];

        let corrupted = [xs[1], xs[6]];
        let mut entries = Vec::new();
        for &x in xs {
            let mut y = eval(&BigInt::from(x));
            if corrupted.contains(&x) {
                y += rng.random::<u64>() + 1;
            }
            let base = rng.random_range(2..=36u32);
            let digits = share_numeral::encode(y.magnitude(), base).unwrap();
            entries.push(format!(
                r#""{x}": {{ "base": "{base}", "value": "{digits}" }}"#
            ));
        }
        let json = format!(
            r#"{{ "keys": {{ "n": 8, "k": {k} }}, {} }}"#,
            entries.join(", ")
        );

        let doc = Document::from_json(&json).unwrap();
        let result = recover(&doc, &Config::default()).unwrap();

        assert_eq!(result.method, Method::Consensus);
        assert_eq!(result.secret.to_integer(), Some(coeffs[0].clone()));

        let mut expected: Vec<u32> = corrupted.to_vec();
        expected.sort();
        let expected: Vec<String> = expected.iter().map(|x| x.to_string()).collect();
        assert_eq!(result.wrong_shares, expected);
        // C(6, 5) honest combinations
        assert_eq!(result.diagnostics.correct_combinations, 6);
    }

    #[test]
    fn test_error_context() {
        let doc = Document::from_json(
            r#"{
                "keys": { "n": 2, "k": 3 },
                "1": { "base": "10", "value": "4" },
                "2": { "base": "10", "value": "5" }
            }"#,
        )
        .unwrap();

        let err = recover(&doc, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Reconstruction failed"));
        assert_eq!(
            err.downcast_ref::<consensus::Error>(),
            Some(&consensus::Error::InsufficientShares { need: 3, got: 2 })
        );

        let doc = Document::from_json(
            r#"{
                "keys": { "n": 1, "k": 1 },
                "1": { "base": "8", "value": "9" }
            }"#,
        )
        .unwrap();

        let err = recover(&doc, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to decode shares"));
        assert!(matches!(
            err.downcast_ref::<document::Error>(),
            Some(document::Error::Numeral { .. })
        ));
    }
}
