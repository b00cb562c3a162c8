//! Block decoding
//!
//! Two strategies produce identical output: a bit-by-bit tree walk and the
//! precomputed window lookup. Huffman data carries no terminator at the bit
//! level, so both stop exactly at the descriptor's original_size; trailing
//! flush and guard bits are never emitted. Corrupted input surfaces as a
//! typed error, never a panic.

use crate::error::{HuffzError, HuffzResult};
use crate::lut::{read_window, DecodeLut};
use crate::tree::{HuffmanNode, HuffmanTree};

/// Naive strategy: one tree step per encoded bit. `out` is cleared and
/// reused across blocks; its capacity sticks at the largest block seen.
pub fn decode_block_naive(
    input: &[u8],
    original_size: usize,
    tree: &HuffmanTree,
    out: &mut Vec<u8>,
) -> HuffzResult<()> {
    out.clear();
    out.reserve(original_size);

    let root = tree.root();
    let mut byte_cursor = 0usize;
    let mut bit_cursor: u8 = 8; // forces a fetch on the first bit
    let mut current: u8 = 0;

    while out.len() < original_size {
        let mut node = root;
        loop {
            match node {
                HuffmanNode::Leaf { byte, .. } => {
                    out.push(*byte);
                    break;
                }
                HuffmanNode::Internal { left, right, .. } => {
                    if bit_cursor == 8 {
                        current = *input.get(byte_cursor).ok_or_else(|| {
                            HuffzError::corrupt(
                                "compressed block exhausted before original size was reached",
                            )
                        })?;
                        byte_cursor += 1;
                        bit_cursor = 0;
                    }
                    let bit = current >> bit_cursor & 1 == 1;
                    bit_cursor += 1;
                    node = if bit { right } else { left };
                }
            }
        }
    }

    Ok(())
}

/// Accelerated strategy: read an n-bit window at the running bit offset,
/// copy the entry's precomputed bytes, advance by the bits those symbols
/// consumed. The window may read into the guard region near the end of the
/// block and may decode a few bytes past the file content; the copy is
/// truncated at original_size.
pub fn decode_block_lut(
    input: &[u8],
    original_size: usize,
    lut: &DecodeLut,
    out: &mut Vec<u8>,
) -> HuffzResult<()> {
    out.clear();
    out.reserve(original_size);

    let window_bits = lut.window_bits();
    let total_bits = input.len() * 8;
    let mut bit_offset = 0usize;

    while out.len() < original_size {
        if bit_offset + window_bits as usize > total_bits {
            return Err(HuffzError::corrupt(
                "compressed block exhausted before original size was reached",
            ));
        }
        let window = read_window(input, bit_offset, window_bits);
        let entry = lut.entry(window);
        let decoded = entry.decoded();
        if decoded.is_empty() {
            // Ruled out when the table is built; a hole here means the
            // table does not belong to this tree.
            return Err(HuffzError::corrupt("decode window completed no symbol"));
        }

        let remaining = original_size - out.len();
        let take = decoded.len().min(remaining);
        out.extend_from_slice(&decoded[..take]);
        bit_offset += entry.bits_used() as usize;
    }

    Ok(())
}
