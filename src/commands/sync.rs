//! # Sync Command Implementation
//!
//! Clones every repository of the layout that is missing locally and rebases
//! every one that is already there, printing one line per repository.
//!
//! The run stops early only for structural problems (missing root directory,
//! a file where a directory belongs). A failing git command is reported for
//! its repository and the run goes on; the exit status is non-zero if any
//! repository failed.

use anyhow::Result;
use clap::Args;
use log::info;
use std::io;
use std::path::PathBuf;

use myrepos::cloner::{Cloner, GIT_ABBREVIATIONS, GIT_PROGRAM};
use myrepos::defaults;
use myrepos::output::OutputConfig;
use myrepos::runner::Runner;
use myrepos::server_spec::{Scheme, DEFAULT_TIMEOUT};
use myrepos::ssh;
use myrepos::tree::RootNode;

/// Clone missing repositories and rebase existing ones
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the layout file.
    ///
    /// Defaults to .myrepos.yml or .myrepos.yaml in the current directory,
    /// then in the home directory.
    #[arg(value_name = "CONFIG", env = "MYREPOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not require a running ssh-agent with loaded keys.
    #[arg(long)]
    pub skip_agent_check: bool,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs, color_flag: &str) -> Result<()> {
    let home = defaults::home_dir();
    let (_, layout) = super::load_layout(args.config.as_deref(), &home)?;
    let root = RootNode::build(&layout, &home)?;

    let needs_agent = root
        .servers()
        .iter()
        .any(|s| s.server_spec().scheme() == Scheme::Ssh);
    if needs_agent && !args.skip_agent_check {
        ssh::check_agent()?;
    }

    let mut git = Runner::new(GIT_PROGRAM, DEFAULT_TIMEOUT, GIT_ABBREVIATIONS)?;
    let style = OutputConfig::from_env_and_flag(color_flag);
    let mut out = io::stdout().lock();
    let report = Cloner::new(&mut git, &mut out, style).run(&root);

    let repos = report.into_result()?;
    info!("{} repositories in sync", repos.len());
    Ok(())
}
