//! Huffman tree construction
//!
//! The tree is rebuilt on the decode side from the frequency table stored in
//! the archive header, so construction must be fully deterministic: equal
//! frequencies are tie-broken by insertion order (leaves are inserted in
//! ascending byte order, merged nodes in creation order). Two runs over the
//! same frequencies always produce bit-identical trees.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::{HuffzError, HuffzResult};
use crate::freq::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        byte: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn frequency(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }
}

/// Min-heap entry. Ordering is (frequency, insertion sequence) so that ties
/// pop first-inserted-first, independent of heap internals.
struct HeapEntry {
    freq: u64,
    seq: u16,
    node: HuffmanNode,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.freq, self.seq).cmp(&(other.freq, other.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Build the tree for a frequency table. O(k log k) in the number of
    /// distinct bytes, never in input size.
    pub fn build(freq: &FrequencyTable) -> HuffzResult<Self> {
        let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
        let mut seq: u16 = 0;

        for byte in 0..=255u8 {
            let count = freq.count(byte);
            if count > 0 {
                heap.push(Reverse(HeapEntry {
                    freq: count as u64,
                    seq,
                    node: HuffmanNode::Leaf {
                        byte,
                        freq: count as u64,
                    },
                }));
                seq += 1;
            }
        }

        loop {
            let first = match heap.pop() {
                Some(Reverse(entry)) => entry,
                None => {
                    return Err(HuffzError::format("frequency table has no symbols"));
                }
            };
            let second = match heap.pop() {
                Some(Reverse(entry)) => entry,
                None => {
                    // Last node standing is the root. A lone leaf (single
                    // distinct byte in the input) gets a synthetic parent so
                    // the byte still receives a genuine 1-bit code; the
                    // zero-frequency sibling mirrors the same byte, so any
                    // padding bit that reaches it decodes harmlessly.
                    let root = match first.node {
                        HuffmanNode::Leaf { byte, freq } => HuffmanNode::Internal {
                            freq,
                            left: Box::new(HuffmanNode::Leaf { byte, freq }),
                            right: Box::new(HuffmanNode::Leaf { byte, freq: 0 }),
                        },
                        internal => internal,
                    };
                    return Ok(HuffmanTree { root });
                }
            };

            // First pop becomes the left child. This pairing fixes the
            // 0/1 bit assignment, so the decode side must not reorder it.
            let merged = HuffmanNode::Internal {
                freq: first.freq + second.freq,
                left: Box::new(first.node),
                right: Box::new(second.node),
            };
            heap.push(Reverse(HeapEntry {
                freq: merged.frequency(),
                seq,
                node: merged,
            }));
            seq += 1;
        }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }
}
