// SPDX-License-Identifier: CC0-1.0

/// Size-`k` subsets of the submitted shares
pub mod combination;
/// Majority vote and fault detection over share combinations
pub mod consensus;
/// Exact Lagrange interpolation over the rationals
pub mod interpolate;
