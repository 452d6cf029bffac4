//! Command handlers behind the CLI
//!
//! Handlers collect whatever the flags did not provide, run the package
//! engine or the account provisioner, and print a summary (or a machine
//! envelope with `--format json|yaml`).

pub mod archive;
pub mod completions;
pub mod config;
pub mod packages;
pub mod summary;
pub mod users;

use crate::config::Settings;
use crate::runner::SystemRunner;
use crate::ui::prompt::TerminalPrompter;
use crate::utils::machine_output::OutputFormat;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Everything a handler needs besides its own arguments
pub struct CommandContext {
    pub settings: Settings,
    pub format: OutputFormat,
    pub assume_yes: bool,
    /// `--config` as given, for handlers that write the file
    pub config_override: Option<PathBuf>,
}

impl CommandContext {
    pub fn runner(&self) -> SystemRunner {
        SystemRunner::new(self.settings.privilege)
    }

    pub fn prompter(&self) -> TerminalPrompter {
        TerminalPrompter::new(self.assume_yes)
    }

    /// Whether missing input may be asked for on the terminal
    pub fn interactive(&self) -> bool {
        !self.format.is_machine() && std::io::stdin().is_terminal()
    }
}
