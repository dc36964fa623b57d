//! # idx
//!
//! A command-line tool for inspecting, validating and generating IDX files.
//!
//! ## Usage
//!
//! ```bash
//! # Show the header
//! idx info train-images-idx3-ubyte
//!
//! # Print the first three records
//! idx dump train-labels-idx1-ubyte --limit 3
//!
//! # Check integrity
//! idx validate t10k-images-idx3-ubyte
//!
//! # Generate test data
//! idx demo demo.idx --element-type f32 --count 4 --shape 2,3
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
