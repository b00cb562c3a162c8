//! Byte frequency analysis
//!
//! One streaming pass over the input produces a 256-entry table of u32
//! counters. The counters are u32 on the wire (see `archive`), so overflow
//! is detected with `checked_add` instead of wrapping silently.

use crate::error::{HuffzError, HuffzResult};

/// Number of distinct byte values; the table is always fully populated.
pub const SYMBOL_COUNT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; SYMBOL_COUNT],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; SYMBOL_COUNT],
        }
    }

    /// Rebuild a table from counters stored in an archive header.
    pub fn from_counts(counts: [u32; SYMBOL_COUNT]) -> Self {
        FrequencyTable { counts }
    }

    /// Count every byte of `block` into the table. Fails if any counter
    /// would exceed u32::MAX.
    pub fn accumulate(&mut self, block: &[u8]) -> HuffzResult<()> {
        for &b in block {
            let slot = &mut self.counts[b as usize];
            *slot = slot.checked_add(1).ok_or_else(|| {
                HuffzError::corrupt(format!(
                    "frequency counter overflow for byte 0x{:02x} (input too large)",
                    b
                ))
            })?;
        }
        Ok(())
    }

    pub fn count(&self, byte: u8) -> u32 {
        self.counts[byte as usize]
    }

    pub fn counts(&self) -> &[u32; SYMBOL_COUNT] {
        &self.counts
    }

    /// Sum of all counters; equals the number of bytes scanned.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
