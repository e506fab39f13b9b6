//! # dep CLI
//!
//! Binary entry point for the `dep` command-line tool. It parses arguments
//! with `clap`, sets up logging, and dispatches to the command modules. The
//! mirror logic itself lives in the `dep_mirror` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
