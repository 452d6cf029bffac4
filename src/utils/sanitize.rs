//! Input validation for anything that ends up on a command line
//!
//! Arguments are passed to commands without a shell, but a value starting
//! with `-` would still be read as an option, and odd characters make
//! diagnostics unreadable. Everything is checked before the first command of
//! a flow runs.

use crate::error::{HostprepError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Debian package names, optionally with an `:arch` qualifier or `=version`
static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9.+-]*(:[a-z0-9-]+)?(=[A-Za-z0-9.+~:-]+)?$")
        .expect("Invalid regex pattern")
});

/// POSIX-portable account names as accepted by `useradd`
static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_-]{0,30}\$?$").expect("Invalid regex pattern")
});

/// Launchpad and GitHub handles; Launchpad also allows `+`
static PROVIDER_USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.+_-]{0,38}$").expect("Invalid regex pattern")
});

/// Characters that could be dangerous in shell contexts
static SHELL_DANGEROUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[;`$(){}|&<>\\'"\n\r\t ]"#).expect("Invalid regex pattern"));

pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(HostprepError::InvalidInput(
            "Package name cannot be empty".to_string(),
        ));
    }

    if name.len() > 256 {
        return Err(HostprepError::InvalidInput(format!(
            "Package name too long (max 256 chars): {}...",
            name.chars().take(50).collect::<String>()
        )));
    }

    if SHELL_DANGEROUS.is_match(name) {
        return Err(HostprepError::InvalidInput(format!(
            "Package name contains unsafe characters: {}",
            name
        )));
    }

    if !PACKAGE_NAME.is_match(name) {
        return Err(HostprepError::InvalidInput(format!(
            "Not a valid Debian package name: {}",
            name
        )));
    }

    Ok(())
}

pub fn validate_package_names(names: &[String]) -> Result<()> {
    for name in names {
        validate_package_name(name)?;
    }
    Ok(())
}

pub fn validate_username(name: &str) -> Result<()> {
    if USERNAME.is_match(name) {
        Ok(())
    } else {
        Err(HostprepError::InvalidInput(format!(
            "Invalid username '{}': use lowercase letters, digits, '_' or '-', starting with a letter or '_' (max 32)",
            name
        )))
    }
}

pub fn validate_provider_username(name: &str) -> Result<()> {
    if PROVIDER_USERNAME.is_match(name) {
        Ok(())
    } else {
        Err(HostprepError::InvalidInput(format!(
            "Invalid identity provider username: {}",
            name
        )))
    }
}

/// Real names go into the account comment field, where ':' and newlines
/// would corrupt the passwd database
pub fn validate_real_name(name: &str) -> Result<()> {
    if name.contains(':') || name.contains('\n') || name.contains(',') {
        return Err(HostprepError::InvalidInput(format!(
            "Name contains characters not allowed in the account comment: {}",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        assert!(validate_package_name("htop").is_ok());
        assert!(validate_package_name("python3-pip").is_ok());
        assert!(validate_package_name("docker.io").is_ok());
        assert!(validate_package_name("g++").is_ok());
        assert!(validate_package_name("libc6:i386").is_ok());
        assert!(validate_package_name("curl=7.88.1-10+deb12u5").is_ok());
    }

    #[test]
    fn test_shell_injection_blocked() {
        assert!(validate_package_name("foo; rm -rf /").is_err());
        assert!(validate_package_name("foo | cat").is_err());
        assert!(validate_package_name("foo$(cat)").is_err());
        assert!(validate_package_name("foo && echo").is_err());
    }

    #[test]
    fn test_option_like_names_rejected() {
        assert!(validate_package_name("-y").is_err());
        assert!(validate_package_name("--purge").is_err());
    }

    #[test]
    fn test_empty_and_long_names() {
        assert!(validate_package_name("").is_err());
        let long_name = "a".repeat(300);
        assert!(validate_package_name(&long_name).is_err());
    }

    #[test]
    fn test_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("_svc").is_ok());
        assert!(validate_username("deploy-bot2").is_ok());
        assert!(validate_username("Alice").is_err());
        assert!(validate_username("1alice").is_err());
        assert!(validate_username("-alice").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(40)).is_err());
    }

    #[test]
    fn test_provider_usernames() {
        assert!(validate_provider_username("Octocat").is_ok());
        assert!(validate_provider_username("jane.doe").is_ok());
        assert!(validate_provider_username("john+doe").is_ok());
        assert!(validate_provider_username("../etc").is_err());
        assert!(validate_provider_username("a/b").is_err());
    }

    #[test]
    fn test_real_names() {
        assert!(validate_real_name("Ada Lovelace").is_ok());
        assert!(validate_real_name("root:x").is_err());
    }
}
