//! Bit-level block encoding
//!
//! Codes are packed LSB-first into a wide accumulator and drained one byte
//! at a time. Every compressed block ends with a partial-byte flush followed
//! by four zero guard bytes; the guard lets the window-based decoder read
//! past the true end of the data without bounds-checking each access.

use crate::code_table::CodeTable;
use crate::error::{HuffzError, HuffzResult};

/// Zero padding appended after the flush byte of every block. Included in
/// the descriptor's compressed_size, never in decoded output.
pub const GUARD_BYTES: usize = 4;

/// Encode one raw block into `out`, which is cleared first and reused across
/// blocks by the orchestrator (Vec's geometric growth amortizes the
/// reallocation cost). Returns the compressed size including the guard.
pub fn encode_block(input: &[u8], table: &CodeTable, out: &mut Vec<u8>) -> HuffzResult<usize> {
    out.clear();

    // The accumulator must hold the longest code ORed in above up to 7
    // pending bits; u128 covers the 64-bit ceiling CodeTable enforces.
    let mut acc: u128 = 0;
    let mut pending: u32 = 0;

    for &b in input {
        let code = table.code(b);
        if code.len == 0 {
            return Err(HuffzError::corrupt(format!(
                "byte 0x{:02x} has no huffman code",
                b
            )));
        }
        acc |= (code.bits as u128) << pending;
        pending += code.len as u32;
        while pending >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            pending -= 8;
        }
    }

    // Flush the trailing partial byte, then the guard.
    if pending > 0 {
        out.push(acc as u8);
    }
    out.extend_from_slice(&[0u8; GUARD_BYTES]);

    Ok(out.len())
}
