//! # Validate Command Implementation
//!
//! Parses a layout file, builds the tree and prints what a sync would work
//! with: the root directory, each server's resolved settings and how many
//! repositories sit under it. Configuration errors (bad YAML, unknown
//! scheme, malformed timeout, unusable names) fail the command.
//!
//! This command is a safe, read-only operation.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use myrepos::defaults;
use myrepos::tree::RootNode;

/// Check a layout file and show the resolved server settings
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the layout file.
    #[arg(value_name = "CONFIG", env = "MYREPOS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let home = defaults::home_dir();
    let (path, layout) = super::load_layout(args.config.as_deref(), &home)?;
    let root = RootNode::build(&layout, &home)?;

    println!("layout: {}", path.display());
    println!("root:   {}", root.abs_path().display());
    for server in root.servers() {
        let repos: usize = server.orgs().iter().map(|o| o.repos().len()).sum();
        println!(
            "  {:<30} {}  repos={}",
            server.domain().to_string(),
            server.server_spec(),
            repos
        );
    }
    println!("{} repositories", layout.repo_count());
    Ok(())
}
