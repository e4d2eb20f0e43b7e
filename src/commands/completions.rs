//! # Completions Command Implementation
//!
//! `sf-toolbox completions <shell>` prints a completion script covering both
//! command families and their flags, generated by `clap_complete`.
//!
//! ```bash
//! sf-toolbox completions bash > ~/.local/share/bash-completion/completions/sf-toolbox
//! sf-toolbox completions zsh > ~/.zfunc/_sf-toolbox
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command, writing the script to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
