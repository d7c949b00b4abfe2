use std::collections::HashMap;

use tracing::debug;

use crate::tree::{HuffmanTree, Node};

/// One row of the derived code table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CodeEntry {
    pub symbol: char,
    pub code: String,
    pub length: usize,
}

impl CodeEntry {
    pub fn new(symbol: char, code: String) -> Self {
        let length = code.len();
        Self {
            symbol,
            code,
            length,
        }
    }
}

/// Binary prefix code for every leaf of a Huffman tree.
///
/// Entries are stored in depth-first leaf order; the table is prefix-free by
/// construction. A tree whose root is itself a leaf yields a single entry
/// with the empty code.
pub struct CodeTable {
    entries: Vec<CodeEntry>,
    index: HashMap<char, usize>,
}

impl CodeTable {
    /// Walks the tree depth first, left before right, growing the code with
    /// `0` on every left descent and `1` on every right descent. One
    /// accumulator serves the whole walk: push before descending, pop when
    /// coming back up.
    pub fn assign(tree: &HuffmanTree) -> Self {
        let mut entries = Vec::new();
        let mut acc = String::new();
        collect_codes(tree.root(), &mut acc, &mut entries);

        let index = entries
            .iter()
            .enumerate()
            .map(|(at, entry)| (entry.symbol, at))
            .collect();

        debug!(symbols = entries.len(), "assigned prefix codes");

        CodeTable { entries, index }
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.entry(symbol).map(|entry| entry.code.as_str())
    }

    pub fn entry(&self, symbol: char) -> Option<&CodeEntry> {
        self.index.get(&symbol).map(|&at| &self.entries[at])
    }

    /// Entries in depth-first leaf order.
    pub fn iter(&self) -> impl Iterator<Item = &CodeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_codes(node: &Node, acc: &mut String, entries: &mut Vec<CodeEntry>) {
    match node {
        Node::Leaf { symbol, .. } => {
            entries.push(CodeEntry::new(*symbol, acc.clone()));
        }
        Node::Internal { left, right, .. } => {
            acc.push('0');
            collect_codes(left, acc, entries);
            acc.pop();

            acc.push('1');
            collect_codes(right, acc, entries);
            acc.pop();
        }
    }
}
