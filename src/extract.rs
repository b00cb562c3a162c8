//! Extraction orchestration
//!
//! The header is read in two stages (the descriptor array length is only
//! known after the fixed prefix), the tree is rebuilt from the stored
//! frequency snapshot, and blocks are decoded in stream order. Descriptor
//! offsets stay informational; output is written sequentially.

use crate::archive::{ArchiveHeader, DESCRIPTOR_SIZE, FIXED_HEADER_SIZE};
use crate::cli::HuffzArgs;
use crate::code_table::CodeTable;
use crate::decode::{decode_block_lut, decode_block_naive};
use crate::dump::{self, Progress};
use crate::error::{HuffzError, HuffzResult};
use crate::file_io::{BlockReader, BlockWriter};
use crate::lut::DecodeLut;
use crate::tree::HuffmanTree;

pub fn extract(args: &HuffzArgs) -> HuffzResult<()> {
    let mut reader = BlockReader::open(&args.input)?;
    let input_size = reader.file_size();
    if input_size == 0 {
        return Err(HuffzError::EmptyInput(args.input.display().to_string()));
    }

    // Stage one: fixed prefix.
    let fixed = reader.read_block(FIXED_HEADER_SIZE)?;
    let (frequencies, block_count) = ArchiveHeader::parse_fixed(fixed)?;

    // Stage two: descriptor array, sized by the block count and checked
    // against what the file can actually hold.
    let descriptors_len = block_count as u64 * DESCRIPTOR_SIZE as u64;
    let after_fixed = input_size - FIXED_HEADER_SIZE as u64;
    if descriptors_len > after_fixed {
        return Err(HuffzError::format(format!(
            "block count {} inconsistent with file size",
            block_count
        )));
    }
    let raw = reader.read_block(descriptors_len as usize)?;
    let blocks = ArchiveHeader::parse_descriptors(raw, block_count)?;

    let header = ArchiveHeader {
        frequencies,
        blocks,
    };
    let payload_len = after_fixed - descriptors_len;
    header.validate(payload_len)?;

    // The rebuild is deterministic, so this tree is bit-identical to the
    // one the encoder derived its codes from.
    let tree = HuffmanTree::build(&header.frequencies)?;
    let table = CodeTable::from_tree(&tree)?;

    if args.dump_table {
        dump::print_code_table(&table, &header.frequencies);
    }
    if args.dump_blocks {
        dump::print_blocks_map(&header.blocks);
    }
    if args.dump_tree {
        dump::write_tree_dot(&tree, std::path::Path::new("tree.dot"))?;
    }

    let lut = match args.window_bits {
        0 => None,
        bits => match DecodeLut::build(&tree, bits, table.max_code_len()) {
            Ok(lut) => {
                if args.dump_lut {
                    dump::print_lookup_table(&lut);
                }
                Some(lut)
            }
            // A window too narrow for this tree is recoverable: the naive
            // decoder produces identical output, just slower.
            Err(HuffzError::Config(msg)) => {
                eprintln!("huffz: {}, falling back to bit-by-bit decoding", msg);
                None
            }
            Err(e) => return Err(e),
        },
    };

    let mut writer = BlockWriter::create(&args.output)?;
    let mut out = Vec::new();
    let mut progress = Progress::start(args.verbose, "Decoding file", header.blocks.len() as u64);
    for block in &header.blocks {
        let compressed = reader.read_block(block.compressed_size as usize)?;
        match &lut {
            Some(lut) => decode_block_lut(compressed, block.original_size as usize, lut, &mut out)?,
            None => decode_block_naive(compressed, block.original_size as usize, &tree, &mut out)?,
        }
        writer.write_block(&out)?;
        progress.step();
    }
    progress.finish();

    Ok(())
}
