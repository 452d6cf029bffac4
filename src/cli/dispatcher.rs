//! Command dispatcher
//!
//! Routes CLI commands to their handlers.

use crate::cli::args::{
    CategoryCommand, Cli, Command, ConfigCommand, PackagesCommand, UserCommand,
};
use crate::commands::{self, CommandContext};
use crate::config::Settings;
use crate::error::Result;
use crate::ui;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    // Completions must work without a readable settings file
    if let Command::Completions { shell } = &args.command {
        return commands::completions::run(*shell);
    }

    // `config init` creates the file the other commands read
    let settings = match &args.command {
        Command::Config {
            command: ConfigCommand::Init { .. },
        } => Settings::default(),
        _ => Settings::load(args.global.config.as_deref())?,
    };
    ui::init_colors(&settings.color);

    let ctx = CommandContext {
        settings,
        format: args.global.format,
        assume_yes: args.global.yes,
        config_override: args.global.config.clone(),
    };

    match &args.command {
        Command::Packages { command } => dispatch_packages(&ctx, command),
        Command::User { command } => dispatch_user(&ctx, command),
        Command::Config { command } => match command {
            ConfigCommand::Show => commands::config::show(&ctx),
            ConfigCommand::Init { force } => commands::config::init(&ctx, *force),
            ConfigCommand::Path => commands::config::path(&ctx),
        },
        Command::Completions { shell } => commands::completions::run(*shell),
    }
}

fn dispatch_packages(ctx: &CommandContext, command: &PackagesCommand) -> Result<()> {
    match command {
        PackagesCommand::Install { packages } => commands::packages::install(ctx, packages),
        PackagesCommand::Remove { packages } => commands::packages::remove(ctx, packages),
        PackagesCommand::Category { command } => match command {
            CategoryCommand::List => commands::packages::category_list(ctx),
            CategoryCommand::Install { name } => commands::packages::category_install(ctx, name),
            CategoryCommand::Remove { name } => commands::packages::category_remove(ctx, name),
        },
        PackagesCommand::Archive {
            paths,
            select,
            no_resolve,
            list,
        } => commands::archive::run(
            ctx,
            commands::archive::ArchiveOptions {
                paths: paths.clone(),
                select: select.clone(),
                no_resolve: *no_resolve,
                list: *list,
            },
        ),
    }
}

fn dispatch_user(ctx: &CommandContext, command: &UserCommand) -> Result<()> {
    match command {
        UserCommand::Create(args) => commands::users::create(ctx, args.clone()),
        UserCommand::Delete { username } => commands::users::delete(ctx, username.clone()),
        UserCommand::Rename {
            old,
            new,
            move_data,
        } => commands::users::rename(ctx, old, new, *move_data),
        UserCommand::Password { username } => commands::users::password(ctx, username.clone()),
        UserCommand::Key {
            username,
            auth,
            provider_user,
        } => commands::users::key(ctx, username.clone(), *auth, provider_user.clone()),
    }
}
