use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::frequency::FrequencyCounter;

/// Index of a node in a [`HuffmanTree`] arena
pub type NodeId = usize;

/// A Huffman tree node
///
/// Internal nodes always have exactly two children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u8 },
    Internal { left: NodeId, right: NodeId },
}

/// Binary prefix-code tree stored as an arena of nodes
///
/// Children are addressed by index so traversals run on explicit stacks,
/// independent of how skewed the tree is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree by repeatedly merging the two lowest-frequency nodes
    ///
    /// Equal frequencies are resolved in insertion order: leaves in the
    /// counter's enumeration order, then merged nodes in creation order.
    /// The first node taken becomes the left child.
    ///
    /// Returns `None` when there are no symbols. A single symbol yields a
    /// lone leaf root.
    pub fn build(frequencies: &FrequencyCounter) -> Option<Self> {
        let mut nodes = Vec::with_capacity(frequencies.distinct_symbols() * 2);
        let mut heap = BinaryHeap::with_capacity(frequencies.distinct_symbols());
        let mut seq = 0u64;

        for (symbol, freq) in frequencies.entries() {
            nodes.push(Node::Leaf { symbol });
            heap.push(Reverse((freq, seq, nodes.len() - 1)));
            seq += 1;
        }

        while heap.len() > 1 {
            let Reverse((left_freq, _, left)) = heap.pop()?;
            let Reverse((right_freq, _, right)) = heap.pop()?;

            nodes.push(Node::Internal { left, right });
            heap.push(Reverse((left_freq + right_freq, seq, nodes.len() - 1)));
            seq += 1;
        }

        let Reverse((total, _, root)) = heap.pop()?;
        tracing::trace!(
            leaves = frequencies.distinct_symbols(),
            nodes = nodes.len(),
            total,
            "built Huffman tree"
        );

        Some(Self { nodes, root })
    }

    /// Assemble a tree from an already-linked arena
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        debug_assert!(root < nodes.len());
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Symbols of every leaf, in preorder
    pub fn leaf_symbols(&self) -> Vec<u8> {
        let mut symbols = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { symbol } => symbols.push(symbol),
                Node::Internal { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        symbols
    }

    /// Whether the root is a leaf (single-symbol alphabet)
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.nodes[self.root], Node::Leaf { .. })
    }
}
