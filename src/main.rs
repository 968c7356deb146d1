//! # myrepos CLI
//!
//! This is the binary entry point for the `myrepos` command-line tool.
//!
//! It parses command-line arguments with `clap` and hands them to the
//! matching command. The work itself lives in the `myrepos` library crate;
//! errors bubble up to `main`, which prints them and exits with status 1.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
