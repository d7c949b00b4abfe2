use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// Node of a Huffman tree. Only leaves carry a symbol; internal nodes carry
/// the combined weight of their two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: char,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: char, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    fn merge(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf { symbol, weight } => write!(f, "{},{}", symbol, weight),
            Node::Internal { weight, .. } => write!(f, "Null,{}", weight),
        }
    }
}

/// Queue entry ordered by weight first and arrival second, so equal weights
/// always resolve in favor of the node created earlier.
struct Pending {
    weight: u64,
    seq: usize,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.seq).cmp(&(other.weight, other.seq))
    }
}

#[derive(Debug)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest pending nodes,
    /// the lighter of the pair becoming the left child. Leaves enter the
    /// queue in list order and every merged node after all of them, which
    /// pins the shape for any given leaf list.
    pub fn build(leaves: Vec<Node>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let mut heap = BinaryHeap::with_capacity(leaves.len());
        let mut seq = 0;
        for node in leaves {
            heap.push(Reverse(Pending {
                weight: node.weight(),
                seq,
                node,
            }));
            seq += 1;
        }

        let symbols = heap.len();
        while heap.len() > 1 {
            let left = heap.pop().expect("heap holds at least two nodes").0;
            let right = heap.pop().expect("heap holds at least two nodes").0;
            trace!(left = %left.node, right = %right.node, "merging lightest nodes");

            let merged = Node::merge(left.node, right.node);
            heap.push(Reverse(Pending {
                weight: merged.weight(),
                seq,
                node: merged,
            }));
            seq += 1;
        }

        let root = heap.pop().expect("heap holds exactly the root").0.node;
        debug!(
            weight = root.weight(),
            merges = seq - symbols,
            "built Huffman tree"
        );

        Ok(HuffmanTree { root })
    }

    /// Seeds one leaf per table entry, in first-occurrence order, and builds.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
        let leaves = table
            .iter()
            .map(|(symbol, weight)| Node::leaf(symbol, weight))
            .collect();
        Self::build(leaves)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

/// Renders the whole tree, one node per line: the root prefixed `Root-> `,
/// every child indented one tab per level and prefixed `L-> ` or `R-> `,
/// left subtree fully before the right one.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Root-> {}", self.root)?;
        if let Node::Internal { left, right, .. } = &self.root {
            fmt_children(left, right, 1, f)?;
        }
        Ok(())
    }
}

fn fmt_children(
    left: &Node,
    right: &Node,
    level: usize,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    fmt_branch(left, "L", level, f)?;
    fmt_branch(right, "R", level, f)
}

fn fmt_branch(node: &Node, side: &str, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}{}-> {}", "\t".repeat(level), side, node)?;
    if let Node::Internal { left, right, .. } = node {
        fmt_children(left, right, level + 1, f)?;
    }
    Ok(())
}
