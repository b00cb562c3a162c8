//! Human-readable dumps and progress reporting
//!
//! Everything here is a debugging aid fed read-only snapshots of codec
//! state; nothing in the codec depends on it.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::archive::BlockDescriptor;
use crate::code_table::{Code, CodeTable};
use crate::error::HuffzResult;
use crate::freq::FrequencyTable;
use crate::lut::DecodeLut;
use crate::tree::{HuffmanNode, HuffmanTree};

/// Render a code LSB-first, the order in which the decoder walks the tree.
pub fn code_to_string(code: &Code) -> String {
    (0..code.len)
        .map(|i| if code.bits >> i & 1 == 1 { '1' } else { '0' })
        .collect()
}

fn escape_symbol(byte: u8) -> String {
    let c = byte as char;
    if c.is_ascii_graphic() && c != '\\' {
        c.to_string()
    } else {
        format!("\\x{:02x}", byte)
    }
}

pub fn print_code_table(table: &CodeTable, freq: &FrequencyTable) {
    let mut weighted: u64 = 0;
    let mut total: u64 = 0;
    let mut min_len = u8::MAX;
    let mut max_len = 0u8;

    println!("Character    Frequency    Length    Huffman Code");
    for (byte, code) in table.iter_defined() {
        let count = freq.count(byte) as u64;
        weighted += count * code.len as u64;
        total += count;
        min_len = min_len.min(code.len);
        max_len = max_len.max(code.len);
        println!(
            "{:>9}{:>13}{:>10}      {}",
            escape_symbol(byte),
            count,
            code.len,
            code_to_string(&code)
        );
    }
    if total > 0 {
        println!(
            "min/max/mean code len: {}, {}, {:.3}",
            min_len,
            max_len,
            weighted as f64 / total as f64
        );
    }
}

pub fn print_blocks_map(blocks: &[BlockDescriptor]) {
    let entries: Vec<String> = blocks
        .iter()
        .map(|b| {
            format!(
                "{{\"original_size\": {}, \"compressed_size\": {}, \"original_offset\": {}}}",
                b.original_size, b.compressed_size, b.original_offset
            )
        })
        .collect();
    println!("Blocks map: [{}]", entries.join(", "));
}

pub fn print_lookup_table(lut: &DecodeLut) {
    let bits = lut.window_bits();
    for window in 0..lut.entry_count() as u32 {
        // Window value MSB-first, decoded bytes in decode order.
        let pattern: String = (0..bits)
            .rev()
            .map(|i| if window >> i & 1 == 1 { '1' } else { '0' })
            .collect();
        let entry = lut.entry(window);
        let decoded: String = entry.decoded().iter().map(|&b| escape_symbol(b)).collect();
        println!(
            "{}: {} ({} symbols, {} bits)",
            pattern,
            decoded,
            entry.decoded().len(),
            entry.bits_used()
        );
    }
}

/// Write the tree as a Graphviz digraph. Nodes are named by their
/// root-to-node path so the output is stable across runs.
pub fn write_tree_dot(tree: &HuffmanTree, path: &Path) -> HuffzResult<()> {
    let mut f = File::create(path)?;
    writeln!(f, "digraph huffman {{")?;

    let mut stack: Vec<(&HuffmanNode, String)> = vec![(tree.root(), "root".to_string())];
    while let Some((node, id)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { byte, freq } => {
                writeln!(
                    f,
                    "    \"{}\" [style=filled, fillcolor=yellow, label=\"{}\\n{}\"];",
                    id,
                    escape_symbol(*byte).replace('\\', "\\\\"),
                    freq
                )?;
            }
            HuffmanNode::Internal { freq, left, right } => {
                writeln!(
                    f,
                    "    \"{}\" [style=filled, fillcolor=gray, label=\"{}\"];",
                    id, freq
                )?;
                let left_id = format!("{}0", id);
                let right_id = format!("{}1", id);
                writeln!(f, "    \"{}\" -> \"{}\" [label=0];", id, left_id)?;
                writeln!(f, "    \"{}\" -> \"{}\" [label=1];", id, right_id)?;
                stack.push((right, right_id));
                stack.push((left, left_id));
            }
        }
    }

    writeln!(f, "}}")?;
    Ok(())
}

/// Verbose-mode dots on stderr, roughly one terminal line per phase.
pub struct Progress {
    enabled: bool,
    every: u64,
    count: u64,
}

impl Progress {
    pub fn start(enabled: bool, label: &str, total_steps: u64) -> Self {
        if enabled {
            eprint!("{}: ", label);
        }
        Progress {
            enabled,
            every: (total_steps / 58).max(1),
            count: 0,
        }
    }

    pub fn step(&mut self) {
        if !self.enabled {
            return;
        }
        self.count += 1;
        if self.count % self.every == 0 {
            eprint!(".");
            io::stderr().flush().ok();
        }
    }

    pub fn finish(&self) {
        if self.enabled {
            eprintln!(" done.");
        }
    }
}
