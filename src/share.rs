// SPDX-License-Identifier: CC0-1.0

use num_bigint::BigInt;

use std::error;
use std::fmt;

/// A single `(x, y)` sample of the secret-encoding polynomial.
///
/// `id` is the label the share was submitted under and is what gets reported
/// when the share is judged inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    id: String,
    x: BigInt,
    y: BigInt,
}

impl Share {
    /// Creates a share
    pub fn new(id: impl Into<String>, x: impl Into<BigInt>, y: impl Into<BigInt>) -> Self {
        Self {
            id: id.into(),
            x: x.into(),
            y: y.into(),
        }
    }

    /// Label the share was submitted under
    pub fn id(&self) -> &str {
        &self.id
    }

    /// x-coordinate
    pub fn x(&self) -> &BigInt {
        &self.x
    }

    /// y-coordinate
    pub fn y(&self) -> &BigInt {
        &self.y
    }
}

/// Error
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Two shares have the same x-coordinate
    DuplicateX {
        /// Label of the first share with this x-coordinate
        first: String,
        /// Label of the second share with this x-coordinate
        second: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::DuplicateX { first, second } => {
                write!(f, "shares '{first}' and '{second}' have the same x-coordinate")
            }
        }
    }
}

impl error::Error for Error {}

/// An ordered list of shares with pairwise distinct x-coordinates, sorted by `x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSet {
    shares: Vec<Share>,
}

impl ShareSet {
    /// Sorts `shares` by x-coordinate and rejects duplicate x-coordinates
    pub fn new(mut shares: Vec<Share>) -> Result<Self, Error> {
        shares.sort_by(|a, b| a.x.cmp(&b.x));

        if let Some(pair) = shares.windows(2).find(|pair| pair[0].x == pair[1].x) {
            return Err(Error::DuplicateX {
                first: pair[0].id.clone(),
                second: pair[1].id.clone(),
            });
        }

        Ok(Self { shares })
    }

    /// Number of shares
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the set holds no shares
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Shares in ascending x order
    pub fn as_slice(&self) -> &[Share] {
        &self.shares
    }

    /// Iterates shares in ascending x order
    pub fn iter(&self) -> std::slice::Iter<'_, Share> {
        self.shares.iter()
    }
}

impl<'a> IntoIterator for &'a ShareSet {
    type Item = &'a Share;
    type IntoIter = std::slice::Iter<'a, Share>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.iter()
    }
}
