//! Code table derivation
//!
//! Root-to-leaf paths become per-byte bit codes: a left descent appends a 0,
//! a right descent a 1, and bit 0 of the pattern is the first branch taken
//! from the root (root-is-LSB). The encoder and both decoders all rely on
//! this convention.

use crate::error::{HuffzError, HuffzResult};
use crate::freq::SYMBOL_COUNT;
use crate::tree::{HuffmanNode, HuffmanTree};

/// Hard ceiling on code length: patterns are stored in a u64. With u32
/// frequency counters the deepest reachable leaf is well below this (a
/// Fibonacci-skewed table tops out around 58 bits), so hitting the ceiling
/// means the tree itself is malformed.
pub const MAX_CODE_LEN: u8 = 64;

/// One Huffman code. `len == 0` marks a byte that never occurs in the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: [Code; SYMBOL_COUNT],
    max_len: u8,
}

impl CodeTable {
    /// Derive codes with an iterative depth-first walk. The tree can
    /// degenerate into a 255-deep chain, so an explicit stack is used
    /// instead of recursion.
    pub fn from_tree(tree: &HuffmanTree) -> HuffzResult<Self> {
        let mut codes = [Code::default(); SYMBOL_COUNT];
        let mut max_len: u8 = 0;

        let mut stack: Vec<(&HuffmanNode, Code)> = vec![(tree.root(), Code::default())];
        while let Some((node, code)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { byte, .. } => {
                    if code.len == 0 {
                        // The tree builder wraps a lone leaf under a
                        // synthetic parent, so a zero-length code cannot
                        // come out of a well-formed tree.
                        return Err(HuffzError::corrupt("huffman tree is a bare leaf"));
                    }
                    codes[*byte as usize] = code;
                    max_len = max_len.max(code.len);
                }
                HuffmanNode::Internal { left, right, .. } => {
                    if code.len >= MAX_CODE_LEN {
                        return Err(HuffzError::corrupt(format!(
                            "huffman code longer than {} bits",
                            MAX_CODE_LEN
                        )));
                    }
                    // Left pushed first so it is visited last; in the
                    // single-symbol tree both children carry the same byte
                    // and the left (all-zero) code wins.
                    stack.push((
                        left,
                        Code {
                            bits: code.bits,
                            len: code.len + 1,
                        },
                    ));
                    stack.push((
                        right,
                        Code {
                            bits: code.bits | 1u64 << code.len,
                            len: code.len + 1,
                        },
                    ));
                }
            }
        }

        Ok(CodeTable { codes, max_len })
    }

    pub fn code(&self, byte: u8) -> Code {
        self.codes[byte as usize]
    }

    /// Longest code in the table; sizes the decode window requirement.
    pub fn max_code_len(&self) -> u8 {
        self.max_len
    }

    /// Bytes that actually have a code, in ascending byte order.
    pub fn iter_defined(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.len > 0)
            .map(|(b, c)| (b as u8, *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freq::FrequencyTable;

    fn table_for(data: &[u8]) -> CodeTable {
        let mut freq = FrequencyTable::new();
        freq.accumulate(data).unwrap();
        let tree = HuffmanTree::build(&freq).unwrap();
        CodeTable::from_tree(&tree).unwrap()
    }

    /// A code is a prefix of another if all its bits match starting at bit 0.
    fn is_prefix(short: Code, long: Code) -> bool {
        short.len <= long.len && (long.bits & ((1u64 << short.len) - 1)) == short.bits
    }

    #[test]
    fn codes_are_prefix_free() {
        let table = table_for(b"the quick brown fox jumps over the lazy dog");
        let codes: Vec<(u8, Code)> = table.iter_defined().collect();
        for (i, &(_, a)) in codes.iter().enumerate() {
            for &(_, b) in codes.iter().skip(i + 1) {
                assert!(!is_prefix(a, b) && !is_prefix(b, a));
            }
        }
    }

    #[test]
    fn abracadabra_code_lengths() {
        let table = table_for(b"ABRACADABRA");
        // A:5 B:2 R:2 C:1 D:1 over 11 bytes; the optimal static code costs
        // 1 bit for A and 3 bits for the rest.
        assert_eq!(table.code(b'A').len, 1);
        assert_eq!(table.code(b'B').len, 3);
        assert_eq!(table.code(b'R').len, 3);
        assert_eq!(table.code(b'C').len, 3);
        assert_eq!(table.code(b'D').len, 3);
        assert_eq!(table.max_code_len(), 3);
        assert_eq!(table.code(b'Z').len, 0);

        let total_bits: u64 = table
            .iter_defined()
            .map(|(b, c)| {
                let f = b"ABRACADABRA".iter().filter(|&&x| x == b).count() as u64;
                f * c.len as u64
            })
            .sum();
        assert_eq!(total_bits, 23);
    }

    #[test]
    fn root_is_least_significant_bit() {
        // Two symbols: the tree is a single internal node, codes are one
        // bit each and live entirely in bit 0.
        let table = table_for(b"aab");
        let a = table.code(b'a');
        let b = table.code(b'b');
        assert_eq!(a.len, 1);
        assert_eq!(b.len, 1);
        assert_eq!(a.bits & !1, 0);
        assert_eq!(b.bits & !1, 0);
        assert_ne!(a.bits, b.bits);
    }

    #[test]
    fn single_symbol_code_is_one_bit_of_zero() {
        let table = table_for(&[0x41; 64]);
        let code = table.code(0x41);
        assert_eq!(code.len, 1);
        assert_eq!(code.bits, 0);
    }

    #[test]
    fn skewed_frequencies_grow_code_length() {
        // Fibonacci-weighted symbols produce a maximally skewed tree.
        let mut data = Vec::new();
        let (mut a, mut b) = (1u32, 1u32);
        for byte in 0u8..16 {
            data.extend(std::iter::repeat(byte).take(a as usize));
            let next = a + b;
            a = b;
            b = next;
        }
        let table = table_for(&data);
        assert!(table.max_code_len() >= 14);
    }
}
