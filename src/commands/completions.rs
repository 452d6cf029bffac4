use crate::cli::args::Cli;
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Completion script for `shell`
pub fn script(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, bin_name, &mut buffer);
    buffer
}

pub fn run(shell: Shell) -> Result<()> {
    io::stdout().write_all(&script(shell))?;
    Ok(())
}
