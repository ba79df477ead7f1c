// SPDX-License-Identifier: CC0-1.0

use itertools::Itertools;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};

use crate::recovery::consensus::{Method, Reconstruction};

use std::collections::BTreeMap;
use std::fmt;

/// Serializable summary of a [`Reconstruction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Decimal secret, or `num/den` when only a fractional secret was found
    pub secret: String,
    /// Labels of shares judged inconsistent
    pub wrong_share_ids: Vec<String>,
    /// Search counters
    pub diagnostics: ReportDiagnostics,
}

/// Search counters as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDiagnostics {
    /// Combinations evaluated
    pub total_combinations: u128,
    /// Distinct integral secrets seen
    pub unique_secrets: usize,
    /// Combinations agreeing with the reported secret
    pub correct_combinations_count: usize,
    /// Support of every integral secret, in numeric order
    #[serde(serialize_with = "serialize_frequencies")]
    pub secret_frequencies: BTreeMap<BigInt, usize>,
    /// Path that produced the secret
    #[serde(skip)]
    pub method: Method,
}

// Keys as decimal strings, kept in numeric rather than lexical order
fn serialize_frequencies<S>(
    frequencies: &BTreeMap<BigInt, usize>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        frequencies
            .iter()
            .map(|(secret, count)| (secret.to_string(), count)),
    )
}

impl From<&Reconstruction> for Report {
    fn from(result: &Reconstruction) -> Self {
        Self {
            secret: result.secret.to_string(),
            wrong_share_ids: result.wrong_shares.clone(),
            diagnostics: ReportDiagnostics {
                total_combinations: result.diagnostics.total_combinations,
                unique_secrets: result.diagnostics.unique_secrets,
                correct_combinations_count: result.diagnostics.correct_combinations,
                secret_frequencies: result.diagnostics.secret_frequencies.clone(),
                method: result.method,
            },
        }
    }
}

impl Report {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Secret: {}", self.secret)?;
        if self.wrong_share_ids.is_empty() {
            writeln!(f, "Wrong shares: none")?;
        } else {
            writeln!(f, "Wrong shares: {}", self.wrong_share_ids.iter().join(", "))?;
        }

        let d = &self.diagnostics;
        match d.method {
            Method::Direct => writeln!(f, "Method: direct (no redundant shares)")?,
            Method::Consensus => writeln!(f, "Method: consensus")?,
            Method::Fallback => writeln!(f, "Method: fallback (no integral secret)")?,
        }
        writeln!(
            f,
            "Combinations: {} total, {} unique secrets, {} agree with the secret",
            d.total_combinations, d.unique_secrets, d.correct_combinations_count
        )?;

        if !d.secret_frequencies.is_empty() {
            let table = d
                .secret_frequencies
                .iter()
                .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
                .map(|(secret, count)| format!("{secret} x{count}"))
                .join(", ");
            writeln!(f, "Frequencies: {table}")?;
        }

        Ok(())
    }
}
