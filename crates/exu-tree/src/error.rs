//! Error types for the weighted choice tree.

use crate::tree::NodeId;
use crate::weight::Weight;

/// Alias for `Result<T, TreeError>`.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised while building, reweighting, or sampling a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node ID does not belong to this tree.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// No direct child carries the requested label.
    #[error("node {parent} has no child labelled \"{label}\"")]
    UnknownLabel {
        /// The node whose children were searched.
        parent: NodeId,
        /// The label that was not found.
        label: String,
    },

    /// A child with the same label already exists under the parent.
    #[error("duplicate label \"{label}\" under node {parent}")]
    DuplicateLabel {
        /// The node the child was added to.
        parent: NodeId,
        /// The label that is already taken.
        label: String,
    },

    /// A weight outside `[0, 1]` (or not a number) was supplied.
    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    /// The children of a node do not sum to exactly 1.
    #[error("children of \"{label}\" sum to {sum} basis points, expected 10000")]
    WeightSum {
        /// Label of the parent node.
        label: String,
        /// The actual sum, in basis points.
        sum: u64,
    },

    /// A leaf node has nothing to hand back when it is drawn.
    #[error("leaf \"{0}\" carries no payload")]
    MissingPayload(String),

    /// A reweighting cannot be absorbed by the remaining siblings.
    #[error("cannot move sibling {index} to {target}: {reason}")]
    RedistributionOverflow {
        /// Position of the adjusted node among its siblings.
        index: usize,
        /// The weight that was requested.
        target: Weight,
        /// Why the redistribution was rejected.
        reason: &'static str,
    },

    /// A sibling position is out of range.
    #[error("sibling index {index} out of range for {len} siblings")]
    SiblingIndex {
        /// The requested position.
        index: usize,
        /// Number of siblings.
        len: usize,
    },

    /// More positional weights were supplied than the node has children.
    #[error("expected at most {expected} weights, got {got}")]
    ChildCountMismatch {
        /// Number of children on the node.
        expected: usize,
        /// Number of weights supplied.
        got: usize,
    },

    /// The root has no siblings and its weight is fixed at 1.
    #[error("the root weight is fixed at 1")]
    RootWeight,
}
