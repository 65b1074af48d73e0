//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::cli::{Cli, CompletionArgs, Shell};

pub fn execute(args: CompletionArgs) -> crate::error::CliResult<()> {
    let mut cmd = Cli::command();
    let out = &mut std::io::stdout();

    match args.shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, "kscaff", out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, "kscaff", out),
        Shell::Fish => generate(shells::Fish, &mut cmd, "kscaff", out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, "kscaff", out),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, "kscaff", out),
    };

    Ok(())
}
