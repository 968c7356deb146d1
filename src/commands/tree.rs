//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, a dry run that draws the
//! layout as it would be walked: root directory, server domains with their
//! resolved settings, `dir|origin|upstream` organizations and repositories
//! with their clone URLs.
//!
//! This command is a safe, read-only operation that does not touch the
//! repositories or run git.

use anyhow::{Context, Result};
use clap::Args;
use std::io;
use std::path::PathBuf;

use myrepos::defaults;
use myrepos::printer::Printer;
use myrepos::tree::RootNode;

/// Show the layout tree without touching the disk
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Path to the layout file.
    #[arg(value_name = "CONFIG", env = "MYREPOS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs) -> Result<()> {
    let home = defaults::home_dir();
    let (_, layout) = super::load_layout(args.config.as_deref(), &home)?;
    let root = RootNode::build(&layout, &home)?;
    Printer::write_to(&root, io::stdout().lock()).context("Failed to display tree")?;
    Ok(())
}
