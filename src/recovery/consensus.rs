// SPDX-License-Identifier: CC0-1.0

//! Majority vote over every size-`k` subset of the submitted shares.
//!
//! Each combination of `k` shares determines one interpolating polynomial. Honest
//! combinations agree on the constant term, so the integral secret produced by the
//! most combinations wins. Shares that disagree with the winning polynomial are
//! reported as wrong. When no combination produces an integral secret, the
//! combination agreeing with the most shares is used instead.

use num_bigint::BigInt;
use tracing::{debug, trace};

use super::combination::{Combination, Combinations, binomial, combinations};
use super::interpolate::{self, constant_term, evaluate_at};
use crate::fraction::Fraction;
use crate::share::{Share, ShareSet};

use std::collections::BTreeMap;
use std::error;
use std::fmt;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Fail with [`Error::AmbiguousConsensus`] instead of picking the smallest
    /// secret when candidates tie on both support and mismatches
    pub strict: bool,
    /// Refuse to search more than this many combinations
    pub max_combinations: Option<u128>,
}

/// Error
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Threshold must be at least 1
    InvalidThreshold,
    /// Fewer shares than the threshold
    InsufficientShares {
        /// Threshold
        need: usize,
        /// Shares supplied
        got: usize,
    },
    /// The search space exceeds the configured limit
    TooManyCombinations {
        /// Combinations the search would visit
        count: u128,
        /// Configured limit
        limit: u128,
    },
    /// Several secrets tie on support and mismatches (strict mode only)
    AmbiguousConsensus(Vec<BigInt>),
    /// Interpolation failed
    Interpolation(interpolate::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold => write!(f, "threshold must be at least 1"),
            Self::InsufficientShares { need, got } => {
                write!(f, "insufficient shares (need {need}, got {got})")
            }
            Self::TooManyCombinations { count, limit } => {
                write!(f, "{count} combinations exceed the limit of {limit}")
            }
            Self::AmbiguousConsensus(secrets) => {
                let secrets: Vec<String> = secrets.iter().map(|s| s.to_string()).collect();
                write!(f, "ambiguous consensus between secrets {}", secrets.join(", "))
            }
            Self::Interpolation(err) => write!(f, "interpolation failed: {err}"),
        }
    }
}

impl error::Error for Error {}

impl From<interpolate::Error> for Error {
    fn from(err: interpolate::Error) -> Self {
        Self::Interpolation(err)
    }
}

/// How the reported secret was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Exactly `k` shares were supplied, so there was nothing to vote on
    Direct,
    /// Majority vote over integral secrets
    Consensus,
    /// No combination produced an integral secret; closest combination used
    Fallback,
}

/// Counters describing the search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    /// Combinations evaluated
    pub total_combinations: u128,
    /// Distinct integral secrets seen
    pub unique_secrets: usize,
    /// Combinations whose constant term equals the reported secret
    pub correct_combinations: usize,
    /// Support of every integral secret, in numeric order
    pub secret_frequencies: BTreeMap<BigInt, usize>,
}

/// Outcome of a reconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    /// Recovered secret. Only the fallback path can yield a non-integral value.
    pub secret: Fraction,
    /// Labels of shares inconsistent with the selected polynomial, in x order
    pub wrong_shares: Vec<String>,
    /// Path that produced the secret
    pub method: Method,
    /// Search counters
    pub diagnostics: Diagnostics,
}

#[derive(Debug)]
struct TallyEntry {
    count: usize,
    // first combination producing this secret, in generation order
    representative: Vec<usize>,
}

#[derive(Debug, Default)]
struct Tally {
    integral: BTreeMap<BigInt, TallyEntry>,
    fractional: BTreeMap<Fraction, usize>,
}

impl Tally {
    fn collect(shares: &ShareSet, k: usize) -> Result<Self, Error> {
        let mut tally = Tally::default();

        for (index, indices) in Combinations::new(shares.len(), k).enumerate() {
            let combination = Combination::new(index, &indices, shares.as_slice());
            let term = constant_term(combination.points())?;
            trace!(index, secret = %term, "combination interpolated");

            match term.to_integer() {
                Some(secret) => {
                    tally
                        .integral
                        .entry(secret)
                        .and_modify(|entry| entry.count += 1)
                        .or_insert(TallyEntry {
                            count: 1,
                            representative: indices,
                        });
                }
                None => *tally.fractional.entry(term).or_default() += 1,
            }
        }

        Ok(tally)
    }

    fn frequencies(&self) -> BTreeMap<BigInt, usize> {
        self.integral
            .iter()
            .map(|(secret, entry)| (secret.clone(), entry.count))
            .collect()
    }
}

/// Reconstructs a secret from shares that may include corrupted entries
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Creates an engine
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Settings in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recovers the secret shared with threshold `k` and lists the shares that
    /// disagree with it.
    pub fn reconstruct(&self, shares: &ShareSet, k: usize) -> Result<Reconstruction, Error> {
        if k == 0 {
            return Err(Error::InvalidThreshold);
        }
        if shares.len() < k {
            return Err(Error::InsufficientShares {
                need: k,
                got: shares.len(),
            });
        }

        let total = binomial(shares.len(), k);
        if let Some(limit) = self.config.max_combinations {
            if total > limit {
                return Err(Error::TooManyCombinations {
                    count: total,
                    limit,
                });
            }
        }

        if shares.len() == k {
            return Self::direct(shares);
        }

        debug!(n = shares.len(), k, total, "tallying combinations");
        let tally = Tally::collect(shares, k)?;

        if tally.integral.is_empty() {
            debug!("no combination yields an integral secret, falling back");
            self.fallback(shares, k, total, &tally)
        } else {
            self.select(shares, total, &tally)
        }
    }

    // No redundancy: the only combination is the answer
    fn direct(shares: &ShareSet) -> Result<Reconstruction, Error> {
        let points: Vec<&Share> = shares.iter().collect();
        let secret = constant_term(&points)?;

        let secret_frequencies: BTreeMap<BigInt, usize> =
            secret.to_integer().map(|s| (s, 1)).into_iter().collect();

        Ok(Reconstruction {
            wrong_shares: Vec::new(),
            method: Method::Direct,
            diagnostics: Diagnostics {
                total_combinations: 1,
                unique_secrets: secret_frequencies.len(),
                correct_combinations: 1,
                secret_frequencies,
            },
            secret,
        })
    }

    fn select(
        &self,
        shares: &ShareSet,
        total: u128,
        tally: &Tally,
    ) -> Result<Reconstruction, Error> {
        let max_count = tally
            .integral
            .values()
            .map(|entry| entry.count)
            .max()
            .unwrap_or(0);

        // BTreeMap order: candidates are visited from the smallest secret upwards
        let mut scored = Vec::new();
        for (secret, entry) in tally.integral.iter().filter(|(_, e)| e.count == max_count) {
            let points: Vec<&Share> = entry
                .representative
                .iter()
                .map(|&i| &shares.as_slice()[i])
                .collect();
            let wrong = disagreeing(&points, shares)?;
            debug!(%secret, support = entry.count, mismatches = wrong.len(), "candidate");
            scored.push((secret, entry, wrong));
        }

        let Some(fewest) = scored.iter().map(|(_, _, wrong)| wrong.len()).min() else {
            unreachable!("tally is non-empty");
        };
        let mut best = scored.into_iter().filter(|(_, _, wrong)| wrong.len() == fewest);
        let Some((secret, entry, wrong)) = best.next() else {
            unreachable!("minimum is attained");
        };

        if self.config.strict {
            let rest: Vec<BigInt> = best.map(|(s, _, _)| s.clone()).collect();
            if !rest.is_empty() {
                let mut secrets = vec![secret.clone()];
                secrets.extend(rest);
                return Err(Error::AmbiguousConsensus(secrets));
            }
        }

        Ok(Reconstruction {
            secret: Fraction::from_integer(secret.clone()),
            wrong_shares: wrong.iter().map(|s| s.id().to_string()).collect(),
            method: Method::Consensus,
            diagnostics: Diagnostics {
                total_combinations: total,
                unique_secrets: tally.integral.len(),
                correct_combinations: entry.count,
                secret_frequencies: tally.frequencies(),
            },
        })
    }

    // First combination with the fewest mismatches wins
    fn fallback(
        &self,
        shares: &ShareSet,
        k: usize,
        total: u128,
        tally: &Tally,
    ) -> Result<Reconstruction, Error> {
        let mut best: Option<(Combination, Vec<&Share>)> = None;

        for combination in combinations(shares.as_slice(), k) {
            let wrong = disagreeing(combination.points(), shares)?;
            trace!(index = combination.index(), mismatches = wrong.len(), "fallback candidate");

            let improves = best
                .as_ref()
                .is_none_or(|(_, best_wrong)| wrong.len() < best_wrong.len());
            if improves {
                let perfect = wrong.is_empty();
                best = Some((combination, wrong));
                if perfect {
                    break;
                }
            }
        }

        let Some((combination, wrong)) = best else {
            unreachable!("at least one combination exists when n > k");
        };
        let secret = constant_term(combination.points())?;
        debug!(
            index = combination.index(),
            %secret,
            mismatches = wrong.len(),
            "fallback selected"
        );

        Ok(Reconstruction {
            wrong_shares: wrong.iter().map(|s| s.id().to_string()).collect(),
            method: Method::Fallback,
            diagnostics: Diagnostics {
                total_combinations: total,
                unique_secrets: 0,
                correct_combinations: tally.fractional.get(&secret).copied().unwrap_or(0),
                secret_frequencies: BTreeMap::new(),
            },
            secret,
        })
    }
}

// Shares whose y differs from the polynomial through `points`, in share order
fn disagreeing<'a>(points: &[&Share], shares: &'a ShareSet) -> Result<Vec<&'a Share>, Error> {
    let mut wrong = Vec::new();
    for share in shares {
        if !evaluate_at(share.x(), points)?.matches(share.y()) {
            wrong.push(share);
        }
    }
    Ok(wrong)
}
