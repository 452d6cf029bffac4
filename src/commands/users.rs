use super::CommandContext;
use super::summary;
use crate::accounts::{
    AccountProvisioner, AuthMethod, HttpKeyFetcher, IdentityProvider, Secret, UserAccountSpec,
};
use crate::cli::args::{AuthChoice, CreateArgs, KeyChoice};
use crate::error::{HostprepError, Result};
use crate::traits::Prompter;
use crate::ui;
use crate::utils::{preflight, sanitize};
use std::path::Path;

const AUTH_CHOICES: &[(AuthChoice, &str)] = &[
    (AuthChoice::Password, "Password"),
    (AuthChoice::Launchpad, "Key from Launchpad"),
    (AuthChoice::Github, "Key from GitHub"),
    (AuthChoice::Generate, "Generate key pair (no passphrase)"),
    (AuthChoice::GeneratePassphrase, "Generate key pair (with passphrase)"),
];

pub fn create(ctx: &CommandContext, args: CreateArgs) -> Result<()> {
    let prompter = ctx.prompter();
    let interactive = ctx.interactive();

    let username = required(args.username, "username", "Username", &prompter, interactive)?;
    sanitize::validate_username(&username)?;
    let first_name = optional(args.first_name, "First name", &prompter, interactive)?;
    let last_name = optional(args.last_name, "Last name", &prompter, interactive)?;
    let is_admin = if args.admin || args.no_admin || !interactive {
        args.admin
    } else {
        prompter.select("Administrator rights?", &["No", "Yes"])? == 1
    };

    preflight::require_tools(preflight::ACCOUNT_TOOLS, ctx.settings.privilege)?;
    let runner = ctx.runner();
    let fetcher = HttpKeyFetcher::new()?;
    let provisioner = AccountProvisioner::new(&runner, &fetcher, &ctx.settings.accounts);

    let mut choice = args.auth;
    let mut provider_user = args.provider_user;

    loop {
        let picked = match choice {
            Some(c) => c,
            None if interactive => choose_auth(&prompter, AUTH_CHOICES)?,
            None => {
                return Err(HostprepError::InvalidInput(
                    "--auth is required when not running interactively".to_string(),
                ));
            }
        };

        let auth_method =
            collect_auth(&prompter, picked, provider_user.as_deref(), interactive)?;
        let spec = UserAccountSpec {
            username: username.clone(),
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            is_admin,
            auth_method,
        };

        ui::info(&format!("Creating {} with {}", username, spec.auth_method.label()));
        match provisioner.create(&spec) {
            Ok(report) => return summary::finish_account(ctx, "user create", &report),
            Err(HostprepError::PasswordMismatch) if interactive => {
                ui::warning("Passwords do not match! Please try again.");
                choice = Some(picked);
            }
            Err(e) if interactive && e.is_key_acquisition() => {
                ui::warning(&format!("Failed to obtain key: {}", e));
                choice = None;
                provider_user = None;
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn delete(ctx: &CommandContext, username: Option<String>) -> Result<()> {
    let prompter = ctx.prompter();
    let interactive = ctx.interactive();
    let username = required(username, "username", "Username to delete", &prompter, interactive)?;

    preflight::require_tools(preflight::ACCOUNT_TOOLS, ctx.settings.privilege)?;
    let runner = ctx.runner();
    let fetcher = HttpKeyFetcher::new()?;
    let provisioner = AccountProvisioner::new(&runner, &fetcher, &ctx.settings.accounts);
    provisioner.require_existing(&username)?;

    if !prompter.confirm(&format!(
        "Delete {}, their processes and their home directory?",
        username
    ))? {
        ui::info("Cancelled");
        return Ok(());
    }

    let report = provisioner.delete(&username)?;
    summary::finish_account(ctx, "user delete", &report)
}

pub fn rename(ctx: &CommandContext, old: &str, new: &str, move_data: bool) -> Result<()> {
    let prompter = ctx.prompter();
    let interactive = ctx.interactive();

    preflight::require_tools(preflight::ACCOUNT_TOOLS, ctx.settings.privilege)?;
    let runner = ctx.runner();
    let fetcher = HttpKeyFetcher::new()?;
    let provisioner = AccountProvisioner::new(&runner, &fetcher, &ctx.settings.accounts);

    let mut consent = |old_home: &Path, new_home: &Path| -> Result<bool> {
        if move_data || ctx.assume_yes {
            return Ok(true);
        }
        if !interactive {
            return Ok(false);
        }
        prompter.confirm(&format!(
            "Move old user data from {} to {}?",
            old_home.display(),
            new_home.display()
        ))
    };

    let report = provisioner.rename(old, new, &mut consent)?;
    summary::finish_account(ctx, "user rename", &report)
}

pub fn password(ctx: &CommandContext, username: Option<String>) -> Result<()> {
    let prompter = ctx.prompter();
    let interactive = ctx.interactive();
    let username = required(username, "username", "Username", &prompter, interactive)?;
    require_terminal(interactive, "Password entry")?;

    preflight::require_tools(preflight::ACCOUNT_TOOLS, ctx.settings.privilege)?;
    let runner = ctx.runner();
    let fetcher = HttpKeyFetcher::new()?;
    let provisioner = AccountProvisioner::new(&runner, &fetcher, &ctx.settings.accounts);
    provisioner.require_existing(&username)?;

    loop {
        let (secret, confirmation) = prompter.secret_with_confirmation("New password")?;
        match provisioner.change_password(
            &username,
            &Secret::new(secret),
            &Secret::new(confirmation),
        ) {
            Ok(report) => return summary::finish_account(ctx, "user password", &report),
            Err(HostprepError::PasswordMismatch) => {
                ui::warning("Passwords do not match! Please try again.");
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn key(
    ctx: &CommandContext,
    username: Option<String>,
    auth: Option<KeyChoice>,
    provider_user: Option<String>,
) -> Result<()> {
    let prompter = ctx.prompter();
    let interactive = ctx.interactive();
    let username = required(username, "username", "Username", &prompter, interactive)?;

    preflight::require_tools(preflight::ACCOUNT_TOOLS, ctx.settings.privilege)?;
    let runner = ctx.runner();
    let fetcher = HttpKeyFetcher::new()?;
    let provisioner = AccountProvisioner::new(&runner, &fetcher, &ctx.settings.accounts);
    provisioner.require_existing(&username)?;

    let mut choice = auth.map(AuthChoice::from);
    let mut provider_user = provider_user;

    loop {
        let picked = match choice {
            Some(c) => c,
            None if interactive => choose_auth(&prompter, &AUTH_CHOICES[1..])?,
            None => {
                return Err(HostprepError::InvalidInput(
                    "--auth is required when not running interactively".to_string(),
                ));
            }
        };

        let method = collect_auth(&prompter, picked, provider_user.as_deref(), interactive)?;
        let Some(source) = method.key_source() else {
            return Err(HostprepError::InvalidInput(
                "A password is not a key source".to_string(),
            ));
        };

        match provisioner.replace_key(&username, &source) {
            Ok(report) => return summary::finish_account(ctx, "user key", &report),
            Err(e) if interactive && e.is_key_acquisition() => {
                ui::warning(&format!("Failed to obtain key: {}", e));
                choice = None;
                provider_user = None;
            }
            Err(e) => return Err(e),
        }
    }
}

fn choose_auth(prompter: &dyn Prompter, choices: &[(AuthChoice, &str)]) -> Result<AuthChoice> {
    let labels: Vec<&str> = choices.iter().map(|(_, label)| *label).collect();
    let index = prompter.select("Authentication method", &labels)?;
    choices
        .get(index)
        .map(|(choice, _)| *choice)
        .ok_or_else(|| HostprepError::InvalidInput(format!("No choice number {}", index + 1)))
}

/// Turn a choice into a concrete method, asking for whatever it needs
fn collect_auth(
    prompter: &dyn Prompter,
    choice: AuthChoice,
    provider_user: Option<&str>,
    interactive: bool,
) -> Result<AuthMethod> {
    match choice {
        AuthChoice::Password => {
            require_terminal(interactive, "Password entry")?;
            let (secret, confirmation) = prompter.secret_with_confirmation("Password")?;
            Ok(AuthMethod::password(&secret, &confirmation))
        }
        AuthChoice::Launchpad | AuthChoice::Github => {
            let provider = if choice == AuthChoice::Launchpad {
                IdentityProvider::Launchpad
            } else {
                IdentityProvider::GitHub
            };
            let provider_username = required(
                provider_user.map(str::to_string),
                "provider-user",
                &format!("{} username", provider),
                prompter,
                interactive,
            )?;
            Ok(AuthMethod::RemoteKey {
                provider,
                provider_username,
            })
        }
        AuthChoice::Generate => Ok(AuthMethod::GeneratedKey {
            has_passphrase: false,
            passphrase: None,
        }),
        AuthChoice::GeneratePassphrase => {
            require_terminal(interactive, "Passphrase entry")?;
            let passphrase = prompter.secret("Key passphrase")?;
            Ok(AuthMethod::GeneratedKey {
                has_passphrase: true,
                passphrase: Some(Secret::new(passphrase)),
            })
        }
    }
}

fn required(
    value: Option<String>,
    flag: &str,
    prompt: &str,
    prompter: &dyn Prompter,
    interactive: bool,
) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ if interactive => {
            let answer = prompter.input(prompt)?;
            if answer.is_empty() {
                Err(HostprepError::InvalidInput(format!("{} cannot be empty", prompt)))
            } else {
                Ok(answer)
            }
        }
        _ => Err(HostprepError::InvalidInput(format!(
            "--{} is required when not running interactively",
            flag
        ))),
    }
}

fn optional(
    value: Option<String>,
    prompt: &str,
    prompter: &dyn Prompter,
    interactive: bool,
) -> Result<String> {
    match value {
        Some(v) => Ok(v.trim().to_string()),
        None if interactive => prompter.input(prompt),
        None => Ok(String::new()),
    }
}

fn require_terminal(interactive: bool, what: &str) -> Result<()> {
    if interactive {
        Ok(())
    } else {
        Err(HostprepError::InvalidInput(format!(
            "{} needs an interactive terminal",
            what
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPrompter;

    #[test]
    fn test_choose_auth_maps_index() {
        let prompter = ScriptedPrompter::new().choose(2);
        assert_eq!(
            choose_auth(&prompter, AUTH_CHOICES).expect("choice"),
            AuthChoice::Github
        );

        let prompter = ScriptedPrompter::new().choose(0);
        assert_eq!(
            choose_auth(&prompter, &AUTH_CHOICES[1..]).expect("choice"),
            AuthChoice::Launchpad
        );
    }

    #[test]
    fn test_password_keeps_both_entries() {
        let prompter = ScriptedPrompter::new()
            .secret_answer("one")
            .secret_answer("two");
        let method = collect_auth(&prompter, AuthChoice::Password, None, true).expect("method");
        assert_eq!(method, AuthMethod::password("one", "two"));
    }

    #[test]
    fn test_remote_key_uses_flag_before_prompting() {
        let prompter = ScriptedPrompter::new();
        let method =
            collect_auth(&prompter, AuthChoice::Launchpad, Some("ada"), false).expect("method");
        assert_eq!(
            method,
            AuthMethod::RemoteKey {
                provider: IdentityProvider::Launchpad,
                provider_username: "ada".into(),
            }
        );
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_remote_key_asks_for_missing_username() {
        let prompter = ScriptedPrompter::new().answer("octocat");
        let method = collect_auth(&prompter, AuthChoice::Github, None, true).expect("method");
        assert!(matches!(
            method,
            AuthMethod::RemoteKey { ref provider_username, .. } if provider_username == "octocat"
        ));
    }

    #[test]
    fn test_non_interactive_needs_flags() {
        let prompter = ScriptedPrompter::new();
        assert!(collect_auth(&prompter, AuthChoice::Github, None, false).is_err());
        assert!(collect_auth(&prompter, AuthChoice::Password, None, false).is_err());
        assert!(collect_auth(&prompter, AuthChoice::GeneratePassphrase, None, false).is_err());
        assert!(collect_auth(&prompter, AuthChoice::Generate, None, false).is_ok());
    }

    #[test]
    fn test_passphrase_is_collected() {
        let prompter = ScriptedPrompter::new().secret_answer("pass phrase");
        let method =
            collect_auth(&prompter, AuthChoice::GeneratePassphrase, None, true).expect("method");
        assert_eq!(
            method,
            AuthMethod::GeneratedKey {
                has_passphrase: true,
                passphrase: Some(Secret::new("pass phrase")),
            }
        );
    }

    #[test]
    fn test_required_value() {
        let prompter = ScriptedPrompter::new().answer("ada");
        assert_eq!(
            required(None, "username", "Username", &prompter, true).expect("value"),
            "ada"
        );
        assert!(required(None, "username", "Username", &prompter, false).is_err());
        assert_eq!(
            required(Some(" grace ".into()), "username", "Username", &prompter, false)
                .expect("value"),
            "grace"
        );
    }
}
