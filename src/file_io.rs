//! Sequential block I/O
//!
//! Thin collaborators around `std::fs::File`. The reader hands out
//! bounded-size blocks from an internal buffer, so memory use stays
//! independent of file size; both sides support repositioning, which the
//! encoder uses for its second input pass and for patching the reserved
//! header region.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::dump::Progress;
use crate::error::HuffzResult;

pub struct BlockReader {
    file: File,
    size: u64,
    position: u64,
    buf: Vec<u8>,
}

impl BlockReader {
    pub fn open(path: &Path) -> HuffzResult<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(BlockReader {
            file,
            size,
            position: 0,
            buf: Vec::new(),
        })
    }

    pub fn file_size(&self) -> u64 {
        self.size
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn has_next(&self) -> bool {
        self.position < self.size
    }

    /// Read up to `max_bytes`; shorter only at end of file. The returned
    /// slice borrows the reader's internal buffer and is valid until the
    /// next read.
    pub fn read_block(&mut self, max_bytes: usize) -> HuffzResult<&[u8]> {
        let remaining = self.size - self.position;
        let want = (max_bytes as u64).min(remaining) as usize;
        self.buf.resize(want, 0);
        self.file.read_exact(&mut self.buf)?;
        self.position += want as u64;
        Ok(&self.buf)
    }

    pub fn set_position(&mut self, offset: u64) -> HuffzResult<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }
}

pub struct BlockWriter {
    file: File,
}

impl BlockWriter {
    pub fn create(path: &Path) -> HuffzResult<Self> {
        Ok(BlockWriter {
            file: File::create(path)?,
        })
    }

    pub fn write_block(&mut self, data: &[u8]) -> HuffzResult<()> {
        self.file.write_all(data)?;
        Ok(())
    }

    pub fn set_position(&mut self, offset: u64) -> HuffzResult<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}

/// Dry-run mode: copy input to output through the same block-wise read and
/// write path the codec uses, as a plain I/O exercise.
pub fn copy_passthrough(
    input: &Path,
    output: &Path,
    block_size: usize,
    verbose: bool,
) -> HuffzResult<()> {
    let mut reader = BlockReader::open(input)?;
    let mut writer = BlockWriter::create(output)?;

    let blocks = reader.file_size().div_ceil(block_size.max(1) as u64);
    let mut progress = Progress::start(verbose, "Copying file", blocks);
    while reader.has_next() {
        let block = reader.read_block(block_size)?;
        writer.write_block(block)?;
        progress.step();
    }
    progress.finish();
    Ok(())
}
