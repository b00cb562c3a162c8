//! Window lookup-table decode acceleration
//!
//! For every possible n-bit window the table precomputes which bytes the
//! window decodes to and how many bits those complete symbols consumed,
//! turning the hot decode loop into one table lookup per window instead of
//! one tree step per bit.
//!
//! Correctness hinges on every entry completing at least one symbol, which
//! holds exactly when the window is at least as wide as the longest code.
//! That is checked here at build time; partial-window carry-over across
//! windows is deliberately not implemented.

use crate::error::{HuffzError, HuffzResult};
use crate::tree::{HuffmanNode, HuffmanTree};

pub const MIN_WINDOW_BITS: u8 = 8;
pub const MAX_WINDOW_BITS: u8 = 24;

/// One precomputed window. At most `window_bits` symbols fit (all 1-bit
/// codes), so the inline array never overflows.
#[derive(Debug, Clone)]
pub struct LutEntry {
    bytes: [u8; MAX_WINDOW_BITS as usize],
    len: u8,
    bits_used: u8,
}

impl LutEntry {
    /// Bytes decoded by complete symbols within the window.
    pub fn decoded(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Bits consumed up to and including the last completed symbol.
    pub fn bits_used(&self) -> u8 {
        self.bits_used
    }
}

impl Default for LutEntry {
    fn default() -> Self {
        LutEntry {
            bytes: [0; MAX_WINDOW_BITS as usize],
            len: 0,
            bits_used: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodeLut {
    entries: Box<[LutEntry]>,
    window_bits: u8,
}

impl DecodeLut {
    /// Precompute all 2^window_bits entries by simulating the bit-by-bit
    /// tree walk over each window value, LSB first. `max_code_len` comes
    /// from the code table; a window narrower than the longest code would
    /// leave entries with zero complete symbols, so it is rejected here
    /// rather than discovered mid-decode.
    pub fn build(tree: &HuffmanTree, window_bits: u8, max_code_len: u8) -> HuffzResult<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(HuffzError::config(format!(
                "window size {} out of range [{}, {}]",
                window_bits, MIN_WINDOW_BITS, MAX_WINDOW_BITS
            )));
        }
        if window_bits < max_code_len {
            return Err(HuffzError::config(format!(
                "window size {} is smaller than the longest code ({} bits)",
                window_bits, max_code_len
            )));
        }

        let root = tree.root();
        let mut entries = vec![LutEntry::default(); 1usize << window_bits];

        for (value, entry) in entries.iter_mut().enumerate() {
            let mut node = root;
            for bit in 0..window_bits {
                node = match node {
                    HuffmanNode::Internal { left, right, .. } => {
                        if value >> bit & 1 == 1 {
                            right
                        } else {
                            left
                        }
                    }
                    // The walk resets to the root after every leaf and the
                    // builder never yields a leaf root.
                    HuffmanNode::Leaf { .. } => {
                        return Err(HuffzError::corrupt("huffman tree root is a leaf"))
                    }
                };
                if let HuffmanNode::Leaf { byte, .. } = node {
                    entry.bytes[entry.len as usize] = *byte;
                    entry.len += 1;
                    entry.bits_used = bit + 1;
                    node = root;
                }
            }
            if entry.len == 0 {
                return Err(HuffzError::config(format!(
                    "window 0x{:x} decodes no complete symbol",
                    value
                )));
            }
        }

        Ok(DecodeLut {
            entries: entries.into_boxed_slice(),
            window_bits,
        })
    }

    pub fn window_bits(&self) -> u8 {
        self.window_bits
    }

    pub fn entry(&self, window: u32) -> &LutEntry {
        &self.entries[window as usize]
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Extract `window_bits` bits starting at an arbitrary bit offset, LSB
/// first across byte boundaries. Reads at most four bytes, which covers a
/// 24-bit window at any intra-byte shift; near the end of a block those
/// bytes are the encoder's guard region, so the read stays in bounds as
/// long as the caller keeps `bit_offset + window_bits` within the block.
pub fn read_window(data: &[u8], bit_offset: usize, window_bits: u8) -> u32 {
    let start = bit_offset / 8;
    let shift = bit_offset % 8;
    let mut raw: u64 = 0;
    for (i, &b) in data[start..].iter().take(4).enumerate() {
        raw |= (b as u64) << (8 * i);
    }
    ((raw >> shift) & ((1u64 << window_bits) - 1)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_table::CodeTable;
    use crate::freq::FrequencyTable;

    fn tree_and_table(data: &[u8]) -> (HuffmanTree, CodeTable) {
        let mut freq = FrequencyTable::new();
        freq.accumulate(data).unwrap();
        let tree = HuffmanTree::build(&freq).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        (tree, table)
    }

    #[test]
    fn read_window_crosses_byte_boundaries() {
        let data = [0b1010_1100u8, 0b0011_0101, 0xff, 0x00];
        assert_eq!(read_window(&data, 0, 8), 0b1010_1100);
        assert_eq!(read_window(&data, 4, 8), 0b0101_1010);
        assert_eq!(read_window(&data, 6, 10), 0b00_1101_0110);
        // Full 24-bit window at a misaligned offset.
        assert_eq!(read_window(&data, 3, 24), 0x1f_e6b5);
    }

    #[test]
    fn read_window_tolerates_short_tail() {
        // Fewer than four bytes remain; missing bytes read as zero.
        let data = [0xffu8, 0x01];
        assert_eq!(read_window(&data, 8, 8), 0x01);
        assert_eq!(read_window(&data, 12, 12), 0x000);
    }

    #[test]
    fn every_entry_decodes_at_least_one_symbol() {
        let (tree, table) = tree_and_table(b"ABRACADABRA");
        let lut = DecodeLut::build(&tree, 8, table.max_code_len()).unwrap();
        assert_eq!(lut.entry_count(), 256);
        for w in 0..256u32 {
            let entry = lut.entry(w);
            assert!(!entry.decoded().is_empty());
            assert!(entry.bits_used() >= 1 && entry.bits_used() <= 8);
        }
    }

    #[test]
    fn entries_match_code_table() {
        let (tree, table) = tree_and_table(b"ABRACADABRA");
        let lut = DecodeLut::build(&tree, 8, table.max_code_len()).unwrap();

        // A window holding exactly one A code (1 bit, value 0) then B's
        // code must decode A first.
        let a = table.code(b'A');
        assert_eq!(a.len, 1);
        let b = table.code(b'B');
        let window = (a.bits | b.bits << a.len) as u32;
        let entry = lut.entry(window);
        assert_eq!(entry.decoded()[0], b'A');
        assert_eq!(entry.decoded()[1], b'B');
    }

    #[test]
    fn out_of_range_window_is_rejected() {
        let (tree, table) = tree_and_table(b"abc");
        for bad in [1u8, 7, 25, 200] {
            let err = DecodeLut::build(&tree, bad, table.max_code_len()).unwrap_err();
            assert!(matches!(err, HuffzError::Config(_)));
        }
    }

    #[test]
    fn window_narrower_than_longest_code_is_rejected() {
        // Fibonacci weights push the longest code past 8 bits.
        let mut data = Vec::new();
        let (mut a, mut b) = (1u32, 1u32);
        for byte in 0u8..12 {
            data.extend(std::iter::repeat(byte).take(a as usize));
            let next = a + b;
            a = b;
            b = next;
        }
        let (tree, table) = tree_and_table(&data);
        assert!(table.max_code_len() > 8);

        let err = DecodeLut::build(&tree, 8, table.max_code_len()).unwrap_err();
        assert!(matches!(err, HuffzError::Config(_)));

        // A window wide enough for the longest code builds fine.
        assert!(DecodeLut::build(&tree, 16, table.max_code_len()).is_ok());
    }
}
