//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::cli::{Cli, CompletionsArgs, Shell};

pub fn execute(args: CompletionsArgs) -> crate::error::CliResult<()> {
    let mut cmd = Cli::command();
    let mut stdout = std::io::stdout();

    match args.shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, "trellis", &mut stdout),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, "trellis", &mut stdout),
        Shell::Fish => generate(shells::Fish, &mut cmd, "trellis", &mut stdout),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, "trellis", &mut stdout),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, "trellis", &mut stdout),
    };

    Ok(())
}
