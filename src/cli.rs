//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// myrepos - Clone or rebase every repository in a layout file
#[derive(Parser, Debug)]
#[command(name = "myrepos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone missing repositories and rebase existing ones
    Sync(commands::sync::SyncArgs),

    /// Show the layout tree without touching the disk
    Tree(commands::tree::TreeArgs),

    /// Check a layout file and show the resolved server settings
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &self.color),
            Commands::Tree(args) => commands::tree::execute(args),
            Commands::Validate(args) => commands::validate::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
