//! `stk completions` command - shell completion scripts
//!
//! Completes the `report`, `weights` and `materials` subcommands, the
//! `--format auto|tsv|json` values and file paths for the two exports.
//!
//! ```bash
//! # Bash, per session or from ~/.bashrc
//! source <(stk completions bash)
//!
//! # Zsh, into a directory on $fpath
//! stk completions zsh > ~/.zfunc/_stk
//!
//! # Fish
//! stk completions fish > ~/.config/fish/completions/stk.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io::{self, Write};

use crate::cli::Cli;

const BIN_NAME: &str = "stk";

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

/// Write the completion script for `shell`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}
