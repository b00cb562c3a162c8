//! Archive wire format
//!
//! Layout, all fields little-endian:
//!
//! ```text
//! [fixed header]   frequency_table: 256 x u32
//!                  block_count: u32
//! [var header]     block_count x { original_size: u32,
//!                                  compressed_size: u32,
//!                                  original_offset: u32 }
//! [payload]        per block: compressed bytes (incl. 4 guard bytes)
//! ```
//!
//! No tree and no codes are stored; the decoder rebuilds both from the
//! frequency snapshot. The header size depends on the block count, so the
//! encoder reserves it up front and patches it in after the payload is
//! written, and the decoder reads it in two stages.

use crate::error::{HuffzError, HuffzResult};
use crate::freq::{FrequencyTable, SYMBOL_COUNT};

/// Frequency snapshot plus block count.
pub const FIXED_HEADER_SIZE: usize = SYMBOL_COUNT * 4 + 4;

pub const DESCRIPTOR_SIZE: usize = 12;

/// Smallest legal compressed block: one flush byte plus the guard.
pub const MIN_COMPRESSED_SIZE: u32 = 1 + crate::encode::GUARD_BYTES as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub original_size: u32,
    pub compressed_size: u32,
    pub original_offset: u32,
}

impl BlockDescriptor {
    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_SIZE] {
        let mut raw = [0u8; DESCRIPTOR_SIZE];
        raw[0..4].copy_from_slice(&self.original_size.to_le_bytes());
        raw[4..8].copy_from_slice(&self.compressed_size.to_le_bytes());
        raw[8..12].copy_from_slice(&self.original_offset.to_le_bytes());
        raw
    }

    pub fn from_bytes(raw: &[u8; DESCRIPTOR_SIZE]) -> Self {
        BlockDescriptor {
            original_size: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            compressed_size: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
            original_offset: u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveHeader {
    pub frequencies: FrequencyTable,
    pub blocks: Vec<BlockDescriptor>,
}

impl ArchiveHeader {
    pub fn full_size(block_count: usize) -> usize {
        FIXED_HEADER_SIZE + block_count * DESCRIPTOR_SIZE
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(Self::full_size(self.blocks.len()));
        for &count in self.frequencies.counts() {
            raw.extend_from_slice(&count.to_le_bytes());
        }
        raw.extend_from_slice(&(self.blocks.len() as u32).to_le_bytes());
        for block in &self.blocks {
            raw.extend_from_slice(&block.to_bytes());
        }
        raw
    }

    /// Stage one: the fixed prefix. Returns the frequency snapshot and the
    /// block count needed to size stage two.
    pub fn parse_fixed(raw: &[u8]) -> HuffzResult<(FrequencyTable, u32)> {
        if raw.len() < FIXED_HEADER_SIZE {
            return Err(HuffzError::format("archive header truncated"));
        }
        let mut counts = [0u32; SYMBOL_COUNT];
        for (i, slot) in counts.iter_mut().enumerate() {
            let at = i * 4;
            *slot = u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        }
        let at = SYMBOL_COUNT * 4;
        let block_count = u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        Ok((FrequencyTable::from_counts(counts), block_count))
    }

    /// Stage two: the descriptor array.
    pub fn parse_descriptors(raw: &[u8], block_count: u32) -> HuffzResult<Vec<BlockDescriptor>> {
        let expected = block_count as usize * DESCRIPTOR_SIZE;
        if raw.len() != expected {
            return Err(HuffzError::format(format!(
                "descriptor array truncated: expected {} bytes, got {}",
                expected,
                raw.len()
            )));
        }
        let mut blocks = Vec::with_capacity(block_count as usize);
        for chunk in raw.chunks_exact(DESCRIPTOR_SIZE) {
            let mut fixed = [0u8; DESCRIPTOR_SIZE];
            fixed.copy_from_slice(chunk);
            blocks.push(BlockDescriptor::from_bytes(&fixed));
        }
        Ok(blocks)
    }

    /// Cross-check descriptors against the payload that actually follows
    /// the header and against the frequency snapshot.
    pub fn validate(&self, payload_len: u64) -> HuffzResult<()> {
        if self.blocks.is_empty() {
            return Err(HuffzError::format("archive holds no blocks"));
        }

        let mut compressed_total: u64 = 0;
        let mut original_total: u64 = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            if block.original_size == 0 {
                return Err(HuffzError::format(format!("block {} has zero size", i)));
            }
            if block.compressed_size < MIN_COMPRESSED_SIZE {
                return Err(HuffzError::format(format!(
                    "block {} compressed size {} below minimum {}",
                    i, block.compressed_size, MIN_COMPRESSED_SIZE
                )));
            }
            compressed_total += block.compressed_size as u64;
            original_total += block.original_size as u64;
        }

        if compressed_total != payload_len {
            return Err(HuffzError::format(format!(
                "descriptors claim {} payload bytes, file holds {}",
                compressed_total, payload_len
            )));
        }
        if original_total != self.frequencies.total() {
            return Err(HuffzError::format(
                "block sizes disagree with the frequency table",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> ArchiveHeader {
        let mut freq = FrequencyTable::new();
        freq.accumulate(&[b'a'; 30]).unwrap();
        freq.accumulate(&[b'b'; 10]).unwrap();
        ArchiveHeader {
            frequencies: freq,
            blocks: vec![
                BlockDescriptor {
                    original_size: 32,
                    compressed_size: 9,
                    original_offset: 0,
                },
                BlockDescriptor {
                    original_size: 8,
                    compressed_size: 6,
                    original_offset: 32,
                },
            ],
        }
    }

    #[test]
    fn header_round_trips_through_bytes() {
        let header = sample_header();
        let raw = header.to_bytes();
        assert_eq!(raw.len(), ArchiveHeader::full_size(2));

        let (freq, block_count) = ArchiveHeader::parse_fixed(&raw).unwrap();
        assert_eq!(block_count, 2);
        assert_eq!(freq, header.frequencies);

        let blocks =
            ArchiveHeader::parse_descriptors(&raw[FIXED_HEADER_SIZE..], block_count).unwrap();
        assert_eq!(blocks, header.blocks);
    }

    #[test]
    fn fields_are_little_endian() {
        let bds = BlockDescriptor {
            original_size: 0x0102_0304,
            compressed_size: 0x1122_3344,
            original_offset: 0xAABB_CCDD,
        };
        let raw = bds.to_bytes();
        assert_eq!(&raw[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&raw[4..8], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&raw[8..12], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(BlockDescriptor::from_bytes(&raw), bds);
    }

    #[test]
    fn truncated_prefix_is_rejected() {
        let raw = sample_header().to_bytes();
        let err = ArchiveHeader::parse_fixed(&raw[..FIXED_HEADER_SIZE - 1]).unwrap_err();
        assert!(matches!(err, HuffzError::Format(_)));
    }

    #[test]
    fn short_descriptor_array_is_rejected() {
        let raw = sample_header().to_bytes();
        let err =
            ArchiveHeader::parse_descriptors(&raw[FIXED_HEADER_SIZE..raw.len() - 1], 2).unwrap_err();
        assert!(matches!(err, HuffzError::Format(_)));
    }

    #[test]
    fn validate_checks_payload_length() {
        let header = sample_header();
        assert!(header.validate(15).is_ok());
        assert!(matches!(
            header.validate(14).unwrap_err(),
            HuffzError::Format(_)
        ));
    }

    #[test]
    fn validate_checks_frequency_totals() {
        let mut header = sample_header();
        header.blocks[1].original_size = 9; // 41 bytes claimed, 40 counted
        assert!(matches!(
            header.validate(15).unwrap_err(),
            HuffzError::Format(_)
        ));
    }

    #[test]
    fn validate_rejects_undersized_compressed_blocks() {
        let mut header = sample_header();
        header.blocks[1].compressed_size = 4; // guard alone, no flush byte
        assert!(matches!(
            header.validate(13).unwrap_err(),
            HuffzError::Format(_)
        ));
    }
}
