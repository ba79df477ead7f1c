// SPDX-License-Identifier: CC0-1.0

use crate::share::Share;

/// Enumerates every size-`k` subset of `0..n` as ascending index vectors,
/// in lexicographic order.
///
/// Starting from `[0, 1, .., k-1]`, each step finds the rightmost index that is
/// not yet at its maximum position `n - k + i`, increments it, and resets every
/// index to its right to consecutive values. A fresh instance always yields the
/// same sequence.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    /// Creates a generator over the subsets of size `k` of `0..n`
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }

    // Moves `indices` to the next subset, returning false once exhausted
    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            return false;
        };

        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.indices.clone();
        self.done = !self.advance();
        Some(current)
    }
}

/// Number of size-`k` subsets of an `n`-element set, saturating at `u128::MAX`
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }

    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut result: u128 = 1;
    for i in 0..k {
        // result * (n - i) is always divisible by (i + 1)
        result = match result.checked_mul(n - i) {
            Some(product) => product / (i + 1),
            None => return u128::MAX,
        };
    }
    result
}

/// Borrowed view of the shares selected by one index set
#[derive(Debug, Clone)]
pub struct Combination<'a> {
    index: usize,
    points: Vec<&'a Share>,
}

impl<'a> Combination<'a> {
    /// Selects `indices` out of `shares`. `index` is the position of this
    /// combination in generation order.
    pub fn new(index: usize, indices: &[usize], shares: &'a [Share]) -> Self {
        Self {
            index,
            points: indices.iter().map(|&i| &shares[i]).collect(),
        }
    }

    /// Position in generation order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Selected shares
    pub fn points(&self) -> &[&'a Share] {
        &self.points
    }
}

/// Yields every size-`k` combination of `shares`, numbered in generation order
pub fn combinations(shares: &[Share], k: usize) -> impl Iterator<Item = Combination<'_>> {
    Combinations::new(shares.len(), k)
        .enumerate()
        .map(move |(index, indices)| Combination::new(index, &indices, shares))
}
