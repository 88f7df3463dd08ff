//! Weighted choice trees for Exusiai.
//!
//! A [`ProbabilityTree`] holds nodes whose weights are conditional
//! probabilities relative to their siblings. Drawing descends from the root
//! one categorical choice at a time until it reaches a leaf. Weights are
//! fixed-point ([`Weight`]) so overrides and resets keep every sibling set
//! summing to exactly one.

/// Error types used throughout the crate.
pub mod error;
/// Proportional reweighting of sibling sets.
pub mod redistribute;
/// The arena tree, sampling, overrides, and resets.
pub mod tree;
/// Fixed-point probability type.
pub mod weight;

/// Re-export error types.
pub use error::{TreeError, TreeResult};
/// Re-export the reweighting functions.
pub use redistribute::{normalize, redistribute};
/// Re-export tree types.
pub use tree::{NodeId, ProbabilityNode, ProbabilityTree, WeightOverride};
/// Re-export the weight type.
pub use weight::Weight;
