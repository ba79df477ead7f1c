// SPDX-License-Identifier: CC0-1.0

use num_bigint::{BigInt, Sign};
use serde::Deserialize;
use tracing::warn;

use crate::share::{self, Share, ShareSet};

use std::collections::BTreeMap;
use std::error;
use std::fmt;
use std::io::Read;

/// Error
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Input is not a valid share document
    Malformed(String),
    /// Threshold must be at least 1
    InvalidThreshold,
    /// Share key is not a decimal integer
    InvalidShareKey(String),
    /// Share value could not be decoded
    Numeral {
        /// Share key
        id: String,
        /// Decoder error
        source: share_numeral::Error,
    },
    /// Share set is invalid
    Share(share::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed document: {err}"),
            Self::InvalidThreshold => write!(f, "threshold k must be at least 1"),
            Self::InvalidShareKey(key) => {
                write!(f, "share key '{key}' is not a decimal x-coordinate")
            }
            Self::Numeral { id, source } => write!(f, "share '{id}': {source}"),
            Self::Share(err) => write!(f, "{err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Numeral { source, .. } => Some(source),
            Self::Share(err) => Some(err),
            _ => None,
        }
    }
}

impl From<share::Error> for Error {
    fn from(err: share::Error) -> Self {
        Self::Share(err)
    }
}

/// Share count and threshold declared by the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Keys {
    /// Declared number of shares
    pub n: usize,
    /// Reconstruction threshold (polynomial degree + 1)
    pub k: usize,
}

/// A share value as written in the document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncodedShare {
    /// Base, written as a decimal numeral
    pub base: String,
    /// Digits in that base
    pub value: String,
}

/// Input document: a `keys` record plus one entry per share keyed by its x-coordinate.
///
/// ```json
/// {
///     "keys": { "n": 4, "k": 3 },
///     "1": { "base": "10", "value": "4" },
///     "2": { "base": "2", "value": "111" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    /// Declared share count and threshold
    pub keys: Keys,
    /// Share entries by x-coordinate key
    #[serde(flatten)]
    pub entries: BTreeMap<String, EncodedShare>,
}

impl Document {
    /// Parses a document from JSON text
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Malformed(e.to_string()))
    }

    /// Parses a document from a JSON reader
    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(|e| Error::Malformed(e.to_string()))
    }

    /// Reconstruction threshold, validated to be at least 1
    pub fn threshold(&self) -> Result<usize, Error> {
        if self.keys.k == 0 {
            return Err(Error::InvalidThreshold);
        }
        Ok(self.keys.k)
    }

    /// Decodes every entry into a share, sorted by x-coordinate.
    ///
    /// Any undecodable value fails the whole document rather than being left for
    /// consensus to flag.
    pub fn shares(&self) -> Result<ShareSet, Error> {
        if self.keys.n != self.entries.len() {
            warn!(
                declared = self.keys.n,
                found = self.entries.len(),
                "share count differs from keys.n, using every entry"
            );
        }

        let mut shares = Vec::with_capacity(self.entries.len());
        for (id, encoded) in &self.entries {
            let x = id
                .trim()
                .parse::<BigInt>()
                .map_err(|_| Error::InvalidShareKey(id.clone()))?;

            let numeral_err = |source| Error::Numeral {
                id: id.clone(),
                source,
            };
            let base = share_numeral::parse_base(&encoded.base).map_err(numeral_err)?;
            let y = share_numeral::decode(&encoded.value, base).map_err(numeral_err)?;

            shares.push(Share::new(id.clone(), x, BigInt::from_biguint(Sign::Plus, y)));
        }

        Ok(ShareSet::new(shares)?)
    }
}
