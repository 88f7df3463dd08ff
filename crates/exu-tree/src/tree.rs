//! Arena-backed probability tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. A node's
//! weight is a conditional probability: the chance of picking it once its
//! parent has been reached. Children are only ever created through
//! [`ProbabilityTree::add_child`], so no node can become its own ancestor.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;

use crate::error::{TreeError, TreeResult};
use crate::redistribute::redistribute;
use crate::weight::Weight;

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single node: weight relative to its siblings, label, optional payload.
#[derive(Debug, Clone)]
pub struct ProbabilityNode<T> {
    weight: Weight,
    initial_weight: Weight,
    label: String,
    payload: Option<T>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    by_label: HashMap<String, NodeId>,
}

impl<T> ProbabilityNode<T> {
    fn new(label: String, weight: Weight, payload: Option<T>, parent: Option<NodeId>) -> Self {
        Self {
            weight,
            initial_weight: weight,
            label,
            payload,
            children: Vec::new(),
            parent,
            by_label: HashMap::new(),
        }
    }

    /// Current weight relative to the siblings.
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Weight the node was created with.
    pub fn initial_weight(&self) -> Weight {
        self.initial_weight
    }

    /// Label, unique among siblings.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Value handed back when this node is drawn as a leaf.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// True when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Replacement weights for the children of one node.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightOverride {
    /// Children addressed by label; unnamed children keep their weight.
    ByLabel(Vec<(String, Weight)>),
    /// Children addressed by position; trailing children keep their weight.
    Positional(Vec<Weight>),
}

impl WeightOverride {
    /// Build a label override from `(label, weight)` pairs.
    pub fn by_label<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Weight)>,
        S: Into<String>,
    {
        Self::ByLabel(pairs.into_iter().map(|(l, w)| (l.into(), w)).collect())
    }
}

/// A tree of weighted choices. Node 0 is the root and always has weight 1.
#[derive(Debug, Clone)]
pub struct ProbabilityTree<T> {
    nodes: Vec<ProbabilityNode<T>>,
}

impl<T> Default for ProbabilityTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProbabilityTree<T> {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![ProbabilityNode::new("root".to_string(), Weight::ONE, None, None)],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree owns at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> TreeResult<&ProbabilityNode<T>> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut ProbabilityNode<T>> {
        self.nodes.get_mut(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Current weight of a node.
    pub fn weight(&self, id: NodeId) -> TreeResult<Weight> {
        Ok(self.node(id)?.weight)
    }

    /// Payload of a node, if it exists and carries one.
    pub fn payload(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).and_then(|n| n.payload.as_ref())
    }

    /// Append a child under `parent`.
    ///
    /// The sibling sum is not checked here; call [`validate`](Self::validate)
    /// once the tree is complete.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
        weight: Weight,
        payload: Option<T>,
    ) -> TreeResult<NodeId> {
        let label = label.into();
        let id = NodeId(self.nodes.len());
        let parent_node = self.node_mut(parent)?;
        if parent_node.by_label.contains_key(&label) {
            return Err(TreeError::DuplicateLabel { parent, label });
        }
        parent_node.children.push(id);
        parent_node.by_label.insert(label.clone(), id);
        self.nodes
            .push(ProbabilityNode::new(label, weight, payload, Some(parent)));
        Ok(id)
    }

    /// Find a direct child of `parent` by label.
    pub fn child_by_label(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.nodes
            .get(parent.0)
            .and_then(|n| n.by_label.get(label).copied())
    }

    /// Current weights of a node's children, in order.
    pub fn child_weights(&self, id: NodeId) -> TreeResult<Vec<Weight>> {
        let node = self.node(id)?;
        Ok(node.children.iter().map(|c| self.nodes[c.0].weight).collect())
    }

    /// The other children of this node's parent.
    pub fn siblings(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let node = self.node(id)?;
        let Some(parent) = node.parent else {
            return Ok(Vec::new());
        };
        Ok(self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|c| *c != id)
            .collect())
    }

    /// Number of edges between the root and this node.
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        let mut depth = 0;
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            depth += 1;
            current = &self.nodes[parent.0];
        }
        Ok(depth)
    }

    /// Leaf nodes in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| NodeId(i))
    }

    /// Draw one child of `id` using the children's weights.
    ///
    /// A childless node returns itself; that only happens if a caller samples
    /// a leaf directly.
    pub fn sample_once<R: Rng>(&self, id: NodeId, rng: &mut R) -> TreeResult<NodeId> {
        let node = self.node(id)?;
        if node.children.is_empty() {
            log::warn!("sampled leaf \"{}\" directly", node.label);
            return Ok(id);
        }

        let sum = Weight::total(node.children.iter().map(|c| &self.nodes[c.0].weight));
        if sum != u64::from(Weight::SCALE) {
            return Err(TreeError::WeightSum {
                label: node.label.clone(),
                sum,
            });
        }

        let draw = u64::from(rng.random_range(0..Weight::SCALE));
        let mut cumulative = 0u64;
        for &child in &node.children {
            cumulative += u64::from(self.nodes[child.0].weight.basis_points());
            if cumulative > draw {
                return Ok(child);
            }
        }
        Err(TreeError::WeightSum {
            label: node.label.clone(),
            sum: cumulative,
        })
    }

    /// Descend from `id` until a leaf is reached and return it.
    pub fn sample_recursive<R: Rng>(&self, id: NodeId, rng: &mut R) -> TreeResult<NodeId> {
        let mut current = self.sample_once(id, rng)?;
        while !self.nodes[current.0].is_leaf() {
            current = self.sample_once(current, rng)?;
        }
        Ok(current)
    }

    /// Replace the weights of some or all children of `id`.
    ///
    /// Nothing is renormalised: the resulting sibling set must sum to exactly
    /// one, otherwise the call fails and every weight is left as it was.
    pub fn override_child_weights(&mut self, id: NodeId, new: WeightOverride) -> TreeResult<()> {
        let node = self.node(id)?;
        let mut weights = self.child_weights(id)?;

        match new {
            WeightOverride::ByLabel(pairs) => {
                for (label, weight) in pairs {
                    let child = node.by_label.get(&label).ok_or(TreeError::UnknownLabel {
                        parent: id,
                        label: label.clone(),
                    })?;
                    let pos = node
                        .children
                        .iter()
                        .position(|c| c == child)
                        .ok_or(TreeError::UnknownNode(*child))?;
                    weights[pos] = weight;
                }
            }
            WeightOverride::Positional(list) => {
                if list.len() > weights.len() {
                    return Err(TreeError::ChildCountMismatch {
                        expected: weights.len(),
                        got: list.len(),
                    });
                }
                weights[..list.len()].copy_from_slice(&list);
            }
        }

        let sum = Weight::total(&weights);
        if sum != u64::from(Weight::SCALE) {
            return Err(TreeError::WeightSum {
                label: node.label.clone(),
                sum,
            });
        }
        log::debug!("overriding children of \"{}\" with {:?}", node.label, weights);
        self.apply_child_weights(id, &weights)
    }

    /// Set one node's weight, scaling its siblings so the set still sums to one.
    pub fn set_weight(&mut self, id: NodeId, target: Weight) -> TreeResult<()> {
        let parent = self.node(id)?.parent.ok_or(TreeError::RootWeight)?;
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == id)
            .ok_or(TreeError::UnknownNode(id))?;
        let weights = redistribute(&self.child_weights(parent)?, index, target)?;
        self.apply_child_weights(parent, &weights)
    }

    fn apply_child_weights(&mut self, id: NodeId, weights: &[Weight]) -> TreeResult<()> {
        let children = self.node(id)?.children.clone();
        for (child, weight) in children.into_iter().zip(weights) {
            self.nodes[child.0].weight = *weight;
        }
        Ok(())
    }

    /// Restore the construction-time weights of the direct children of `id`.
    pub fn reset_children(&mut self, id: NodeId) -> TreeResult<()> {
        let children = self.node(id)?.children.clone();
        for child in children {
            let node = &mut self.nodes[child.0];
            node.weight = node.initial_weight;
        }
        Ok(())
    }

    /// Restore the construction-time weights of every descendant of `id`.
    pub fn reset_recursive(&mut self, id: NodeId) -> TreeResult<()> {
        let mut stack = self.node(id)?.children.clone();
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            node.weight = node.initial_weight;
            stack.extend(node.children.iter().copied());
        }
        Ok(())
    }

    /// Check that every internal node's children sum to one and every leaf
    /// carries a payload.
    pub fn validate(&self) -> TreeResult<()> {
        for node in &self.nodes {
            if node.is_leaf() {
                if node.payload.is_none() {
                    return Err(TreeError::MissingPayload(node.label.clone()));
                }
                continue;
            }
            let sum = Weight::total(node.children.iter().map(|c| &self.nodes[c.0].weight));
            if sum != u64::from(Weight::SCALE) {
                return Err(TreeError::WeightSum {
                    label: node.label.clone(),
                    sum,
                });
            }
        }
        Ok(())
    }
}
