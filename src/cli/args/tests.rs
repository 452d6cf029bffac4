use super::*;
use clap::{CommandFactory, Parser};

const BIN: &str = "hostprep";

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn parser_accepts_package_install() {
    let cli = Cli::try_parse_from([BIN, "packages", "install", "htop", "curl"]).expect("parse");
    match cli.command {
        Command::Packages {
            command: PackagesCommand::Install { packages },
        } => assert_eq!(packages, vec!["htop", "curl"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parser_requires_package_names() {
    assert!(Cli::try_parse_from([BIN, "packages", "install"]).is_err());
    assert!(Cli::try_parse_from([BIN, "packages", "remove"]).is_err());
}

#[test]
fn global_flags_work_after_subcommand() {
    let cli = Cli::try_parse_from([BIN, "packages", "remove", "htop", "--yes", "--format", "json"])
        .expect("parse");
    assert!(cli.global.yes);
    assert_eq!(cli.global.format, OutputFormat::Json);
}

#[test]
fn quiet_and_verbose_conflict() {
    assert!(Cli::try_parse_from([BIN, "-q", "-v", "config", "show"]).is_err());
}

#[test]
fn archive_select_conflicts_with_paths() {
    assert!(
        Cli::try_parse_from([BIN, "packages", "archive", "a.deb", "--select", "1"]).is_err()
    );
    let cli = Cli::try_parse_from([BIN, "packages", "archive", "--select", "1,3", "--no-resolve"])
        .expect("parse");
    match cli.command {
        Command::Packages {
            command:
                PackagesCommand::Archive {
                    select, no_resolve, ..
                },
        } => {
            assert_eq!(select.as_deref(), Some("1,3"));
            assert!(no_resolve);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn user_create_flags() {
    let cli = Cli::try_parse_from([
        BIN,
        "user",
        "create",
        "ada",
        "--first-name",
        "Ada",
        "--auth",
        "generate-passphrase",
        "--admin",
    ])
    .expect("parse");
    match cli.command {
        Command::User {
            command: UserCommand::Create(args),
        } => {
            assert_eq!(args.username.as_deref(), Some("ada"));
            assert_eq!(args.auth, Some(AuthChoice::GeneratePassphrase));
            assert!(args.admin);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn admin_flags_conflict() {
    assert!(Cli::try_parse_from([BIN, "user", "create", "ada", "--admin", "--no-admin"]).is_err());
}

#[test]
fn key_replacement_rejects_password_auth() {
    assert!(Cli::try_parse_from([BIN, "user", "key", "ada", "--auth", "password"]).is_err());
}
