use crate::utils::machine_output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hostprep",
    about = "Provision Debian hosts: packages, local archives and user accounts",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalFlags {
    /// Verbose output (log every command)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Answer consent prompts with "yes"
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format for reports
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install and remove packages
    Packages {
        #[command(subcommand)]
        command: PackagesCommand,
    },

    /// Create, delete and modify user accounts
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum PackagesCommand {
    /// Install packages from the configured repositories
    Install {
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,
    },

    /// Remove packages, then autoremove what nothing needs
    Remove {
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,
    },

    /// Work with the package categories from the settings
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Install local .deb archives, recovering from missing dependencies
    Archive {
        /// Archive files; defaults to every .deb in the archive directory
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Pick discovered archives by number, e.g. "1,3"
        #[arg(long, value_name = "N,M", conflicts_with = "paths")]
        select: Option<String>,

        /// Never install missing dependencies; report them instead
        #[arg(long)]
        no_resolve: bool,

        /// Only list the archives that would be considered
        #[arg(long)]
        list: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Show categories and their packages
    List,

    /// Install every package of a category
    Install { name: String },

    /// Remove every package of a category
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create an account
    Create(CreateArgs),

    /// Delete an account, its processes and its home directory
    Delete { username: Option<String> },

    /// Rename an account and move its home directory
    Rename {
        old: String,
        new: String,

        /// Move leftover data from the old home without asking
        #[arg(long)]
        move_data: bool,
    },

    /// Change an account's password
    Password { username: Option<String> },

    /// Replace an account's authorized key
    Key {
        username: Option<String>,

        #[arg(long, value_enum)]
        auth: Option<KeyChoice>,

        /// Username at the identity provider
        #[arg(long, value_name = "NAME")]
        provider_user: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    pub username: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Add the account to the administrator group
    #[arg(long)]
    pub admin: bool,

    /// Do not add the account to the administrator group (skips the question)
    #[arg(long, conflicts_with = "admin")]
    pub no_admin: bool,

    #[arg(long, value_enum)]
    pub auth: Option<AuthChoice>,

    /// Username at the identity provider (launchpad, github)
    #[arg(long, value_name = "NAME")]
    pub provider_user: Option<String>,
}

/// Authentication for a new account
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthChoice {
    Password,
    Launchpad,
    Github,
    /// Generate a key pair without passphrase
    Generate,
    /// Generate a key pair protected by a passphrase
    GeneratePassphrase,
}

/// Key sources for replacing an account's key
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyChoice {
    Launchpad,
    Github,
    Generate,
    GeneratePassphrase,
}

impl From<KeyChoice> for AuthChoice {
    fn from(choice: KeyChoice) -> Self {
        match choice {
            KeyChoice::Launchpad => AuthChoice::Launchpad,
            KeyChoice::Github => AuthChoice::Github,
            KeyChoice::Generate => AuthChoice::Generate,
            KeyChoice::GeneratePassphrase => AuthChoice::GeneratePassphrase,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,

    /// Write the default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the settings file location
    Path,
}

#[cfg(test)]
mod tests;
