//! Compression orchestration
//!
//! Two passes over the input: the first accumulates byte frequencies block
//! by block, the second encodes blocks into the payload region that follows
//! the reserved header space. The header itself is written last, once every
//! descriptor is known, so an interrupted run never leaves an archive whose
//! header claims blocks that were not written.

use crate::archive::{ArchiveHeader, BlockDescriptor};
use crate::cli::HuffzArgs;
use crate::code_table::CodeTable;
use crate::dump::{self, Progress};
use crate::encode::encode_block;
use crate::error::{HuffzError, HuffzResult};
use crate::file_io::{BlockReader, BlockWriter};
use crate::freq::FrequencyTable;
use crate::tree::HuffmanTree;

pub fn compress(args: &HuffzArgs) -> HuffzResult<()> {
    let mut reader = BlockReader::open(&args.input)?;
    let input_size = reader.file_size();
    if input_size == 0 {
        // Rejected before the output file is created, so a failed run
        // leaves no artifact behind.
        return Err(HuffzError::EmptyInput(args.input.display().to_string()));
    }
    // Descriptor fields are u32 on the wire.
    if input_size > u32::MAX as u64 {
        return Err(HuffzError::invalid_argument(
            "input larger than 4 GiB is not supported by the archive format",
        ));
    }

    let block_count = input_size.div_ceil(args.block_size as u64);
    if block_count > u32::MAX as u64 {
        return Err(HuffzError::invalid_argument(
            "block size produces more blocks than the archive format can describe",
        ));
    }

    // Pass 1: frequency statistics.
    let mut freq = FrequencyTable::new();
    let mut progress = Progress::start(args.verbose, "Building stat", block_count);
    while reader.has_next() {
        let block = reader.read_block(args.block_size)?;
        freq.accumulate(block)?;
        progress.step();
    }
    progress.finish();

    let tree = HuffmanTree::build(&freq)?;
    let table = CodeTable::from_tree(&tree)?;
    if args.verbose {
        eprintln!(
            "{} distinct bytes, longest code {} bits",
            freq.distinct_symbols(),
            table.max_code_len()
        );
    }

    if args.dump_tree {
        dump::write_tree_dot(&tree, std::path::Path::new("tree.dot"))?;
    }
    if args.dump_table {
        dump::print_code_table(&table, &freq);
    }

    // Reserve header space; its size is fixed by the block count.
    let header_size = ArchiveHeader::full_size(block_count as usize);
    let mut writer = BlockWriter::create(&args.output)?;
    writer.set_position(header_size as u64)?;

    // Pass 2: encode the payload.
    reader.set_position(0)?;
    let mut blocks: Vec<BlockDescriptor> = Vec::with_capacity(block_count as usize);
    let mut buf = Vec::new();
    let mut progress = Progress::start(args.verbose, "Encoding file", block_count);
    while reader.has_next() {
        let original_offset = reader.position() as u32;
        let block = reader.read_block(args.block_size)?;
        let original_size = block.len() as u32;
        let compressed_size = encode_block(block, &table, &mut buf)? as u32;
        writer.write_block(&buf)?;
        blocks.push(BlockDescriptor {
            original_size,
            compressed_size,
            original_offset,
        });
        progress.step();
    }
    progress.finish();

    if blocks.len() as u64 != block_count {
        return Err(HuffzError::corrupt(format!(
            "encoded {} blocks, expected {}",
            blocks.len(),
            block_count
        )));
    }

    // Patch the real header over the reserved region.
    let header = ArchiveHeader {
        frequencies: freq,
        blocks,
    };
    writer.set_position(0)?;
    writer.write_block(&header.to_bytes())?;

    if args.dump_blocks {
        dump::print_blocks_map(&header.blocks);
    }
    Ok(())
}
