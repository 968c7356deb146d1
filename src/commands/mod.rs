//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `myrepos`
//! command-line tool, one file per subcommand.
//!
//! Each command module contains:
//! - An `Args` struct with the command-specific arguments, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `myrepos` library.

pub mod completions;
pub mod sync;
pub mod tree;
pub mod validate;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use myrepos::config::{self, Config};
use myrepos::defaults;

/// Finds and parses the layout file, returning where it was found.
pub fn load_layout(explicit: Option<&Path>, home: &Path) -> Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let path = defaults::locate_config(explicit, &cwd, home)?;
    log::info!("using layout {}", path.display());
    let layout = config::from_file(&path)
        .with_context(|| format!("Failed to load layout from {}", path.display()))?;
    Ok((path, layout))
}
