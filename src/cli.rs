//! Command-line argument parsing
//!
//! Hand-rolled parser over `env::args`, gzip-style: one input positional,
//! `-c`/`-x` pick the direction and take the output path.

use std::env;
use std::path::PathBuf;

use crate::error::{HuffzError, HuffzResult};
use crate::lut::{MAX_WINDOW_BITS, MIN_WINDOW_BITS};

pub const DEFAULT_BLOCK_SIZE: usize = 128 * 1024;

#[derive(Debug, Clone)]
pub struct HuffzArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub extract: bool,
    pub block_size: usize,
    /// 0 disables the lookup-table accelerator.
    pub window_bits: u8,
    pub verbose: bool,
    pub dump_tree: bool,
    pub dump_table: bool,
    pub dump_lut: bool,
    pub dump_blocks: bool,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum Command {
    Run(HuffzArgs),
    Help,
    Version,
}

#[derive(Default)]
struct RawArgs {
    input: Option<String>,
    output: Option<String>,
    extract: bool,
    block_size: Option<String>,
    window_bits: Option<String>,
    verbose: bool,
    dump_tree: bool,
    dump_table: bool,
    dump_lut: bool,
    dump_blocks: bool,
    dry_run: bool,
}

pub fn parse() -> HuffzResult<Command> {
    parse_from(env::args().skip(1).collect())
}

fn parse_from(argv: Vec<String>) -> HuffzResult<Command> {
    let mut raw = RawArgs::default();
    let mut iter = argv.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "-x" => {
                raw.extract = arg == "-x";
                raw.output = Some(iter.next().ok_or_else(|| {
                    HuffzError::invalid_argument(format!("{} requires an output file", arg))
                })?);
            }
            "-v" => raw.verbose = true,
            "--dry-run" => raw.dry_run = true,
            "--dump-tree" => raw.dump_tree = true,
            "--dump-table" => raw.dump_table = true,
            "--dump-lookup-table" => raw.dump_lut = true,
            "--dump-blocks-map" => raw.dump_blocks = true,
            "--block-size" => {
                raw.block_size = Some(iter.next().ok_or_else(|| {
                    HuffzError::invalid_argument("--block-size requires a value")
                })?);
            }
            "--window-bits" => {
                raw.window_bits = Some(iter.next().ok_or_else(|| {
                    HuffzError::invalid_argument("--window-bits requires a value")
                })?);
            }
            _ if arg.starts_with('-') => {
                return Err(HuffzError::invalid_argument(format!(
                    "unknown option {}",
                    arg
                )));
            }
            _ => {
                if raw.input.is_some() {
                    return Err(HuffzError::invalid_argument(format!(
                        "unexpected argument {}",
                        arg
                    )));
                }
                raw.input = Some(arg);
            }
        }
    }

    finalize(raw).map(Command::Run)
}

fn finalize(raw: RawArgs) -> HuffzResult<HuffzArgs> {
    let input = raw
        .input
        .ok_or_else(|| HuffzError::invalid_argument("no input file given"))?;
    let output = raw
        .output
        .ok_or_else(|| HuffzError::invalid_argument("no output file given (use -c or -x)"))?;
    if input == output {
        return Err(HuffzError::invalid_argument(
            "reading and writing to the same file",
        ));
    }

    let block_size = match raw.block_size {
        None => DEFAULT_BLOCK_SIZE,
        Some(s) => {
            let n: usize = s.parse().map_err(|_| {
                HuffzError::invalid_argument(format!("bad --block-size value {}", s))
            })?;
            if n == 0 {
                return Err(HuffzError::invalid_argument("--block-size must be nonzero"));
            }
            n
        }
    };

    let window_bits = match raw.window_bits {
        None => 0,
        Some(s) => {
            let n: u8 = s.parse().map_err(|_| {
                HuffzError::invalid_argument(format!("bad --window-bits value {}", s))
            })?;
            if n != 0 && !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&n) {
                // Out-of-range window is recoverable: warn, run without
                // the accelerator.
                eprintln!(
                    "huffz: --window-bits {} outside [{}, {}], accelerator disabled",
                    n, MIN_WINDOW_BITS, MAX_WINDOW_BITS
                );
                0
            } else {
                n
            }
        }
    };

    Ok(HuffzArgs {
        input: PathBuf::from(input),
        output: PathBuf::from(output),
        extract: raw.extract,
        block_size,
        window_bits,
        verbose: raw.verbose,
        dump_tree: raw.dump_tree,
        dump_table: raw.dump_table,
        dump_lut: raw.dump_lut,
        dump_blocks: raw.dump_blocks,
        dry_run: raw.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> HuffzResult<Command> {
        parse_from(list.iter().map(|s| s.to_string()).collect())
    }

    fn run_args(list: &[&str]) -> HuffzArgs {
        match args(list).unwrap() {
            Command::Run(a) => a,
            _ => panic!("expected a run command"),
        }
    }

    #[test]
    fn compress_defaults() {
        let a = run_args(&["in.txt", "-c", "out.hz"]);
        assert!(!a.extract);
        assert_eq!(a.input, PathBuf::from("in.txt"));
        assert_eq!(a.output, PathBuf::from("out.hz"));
        assert_eq!(a.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(a.window_bits, 0);
        assert!(!a.verbose);
    }

    #[test]
    fn extract_with_options() {
        let a = run_args(&[
            "a.hz",
            "-x",
            "a.txt",
            "-v",
            "--window-bits",
            "12",
            "--block-size",
            "4096",
        ]);
        assert!(a.extract);
        assert_eq!(a.window_bits, 12);
        assert_eq!(a.block_size, 4096);
        assert!(a.verbose);
    }

    #[test]
    fn out_of_range_window_disables_accelerator() {
        let a = run_args(&["a.hz", "-x", "a.txt", "--window-bits", "30"]);
        assert_eq!(a.window_bits, 0);
        let a = run_args(&["a.hz", "-x", "a.txt", "--window-bits", "7"]);
        assert_eq!(a.window_bits, 0);
    }

    #[test]
    fn same_input_and_output_is_rejected() {
        assert!(matches!(
            args(&["f.txt", "-c", "f.txt"]).unwrap_err(),
            HuffzError::InvalidArgument(_)
        ));
    }

    #[test]
    fn missing_paths_are_usage_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["in.txt"]).is_err());
        assert!(args(&["in.txt", "-c"]).is_err());
    }

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(args(&["a", "-c", "b", "--block-size", "0"]).is_err());
    }

    // Tests report parse failures through Result adapters, which format
    // the success value on the error path.
    #[test]
    fn commands_are_debug_printable() {
        let rendered = format!("{:?}", args(&["in.txt", "-c", "out.hz"]).unwrap());
        assert!(rendered.contains("in.txt"));
        assert!(format!("{:?}", Command::Help).contains("Help"));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert!(matches!(args(&["-h"]).unwrap(), Command::Help));
        assert!(matches!(args(&["-V"]).unwrap(), Command::Version));
    }
}
