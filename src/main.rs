//! huffz - block-based static Huffman file archiver
//!
//! Compresses a file with a per-file Huffman code. The archive stores only
//! the byte frequency table; the decoder rebuilds the exact same tree from
//! it, so no codes travel on the wire. Decoding can run bit-by-bit or
//! through a precomputed window lookup table (`--window-bits`).

use std::process;

mod archive;
mod cli;
mod code_table;
mod compress;
mod decode;
mod dump;
mod encode;
mod error;
mod extract;
mod file_io;
mod freq;
mod lut;
mod tree;

#[cfg(test)]
#[macro_use]
mod test_utils;


use cli::Command;
use error::HuffzError;

const VERSION: &str = concat!("huffz ", env!("CARGO_PKG_VERSION"));

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("huffz: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run() -> Result<i32, HuffzError> {
    let args = match cli::parse() {
        Ok(Command::Help) => {
            print_help();
            return Ok(0);
        }
        Ok(Command::Version) => {
            println!("{}", VERSION);
            return Ok(0);
        }
        Ok(Command::Run(args)) => args,
        Err(e) => {
            eprintln!("huffz: {}", e);
            print_help();
            return Ok(1);
        }
    };

    if args.dry_run {
        if args.verbose {
            eprintln!(
                "Dry run: copying {} to {}.",
                args.input.display(),
                args.output.display()
            );
        }
        file_io::copy_passthrough(&args.input, &args.output, args.block_size, args.verbose)?;
        return Ok(0);
    }

    if args.extract {
        if args.verbose {
            eprintln!(
                "Extracting {} to {}.",
                args.input.display(),
                args.output.display()
            );
        }
        extract::extract(&args)?;
    } else {
        if args.verbose {
            eprintln!(
                "Compressing {} to {}.",
                args.input.display(),
                args.output.display()
            );
        }
        compress::compress(&args)?;
    }

    Ok(0)
}

fn print_help() {
    eprintln!("Usage: huffz INPUT [-c|-x] OUTPUT [OPTION]...");
    eprintln!("  -c OUTPUT            compress INPUT into OUTPUT");
    eprintln!("  -x OUTPUT            extract INPUT into OUTPUT");
    eprintln!("  -v                   verbose progress on stderr");
    eprintln!("  --block-size SIZE    encoder chunk size in bytes (default 131072)");
    eprintln!("  --window-bits BITS   decode lookup window, 8..24, 0 disables (default 0)");
    eprintln!("  --dump-tree          write the Huffman tree to tree.dot");
    eprintln!("  --dump-table         print the code table");
    eprintln!("  --dump-lookup-table  print the decode lookup table");
    eprintln!("  --dump-blocks-map    print per-block descriptors");
    eprintln!("  --dry-run            copy input to output (I/O test)");
    eprintln!("  -V                   print version");
    eprintln!("  -h                   print this message");
}
