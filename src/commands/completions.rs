//! # Completions Command Implementation
//!
//! Prints a shell completion script for `myrepos` to stdout, generated by
//! `clap_complete` from the same argument definitions the binary parses.
//!
//! ```bash
//! myrepos completions bash > ~/.local/share/bash-completion/completions/myrepos
//! myrepos completions zsh > ~/.zfunc/_myrepos
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

fn write_completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "myrepos", out);
}
