//! Account creation, deletion and modification
//!
//! Preconditions (existence, matching passwords, a usable key) are settled
//! before the first mutating command. After that, the only fatal failures
//! are the ones that leave nothing to continue with: `useradd`, `userdel`
//! and the rename itself. Every other step is recorded on the
//! [`AccountReport`] and the flow carries on.

use super::credentials::{self, SshLayout};
use super::keys::{KeyProvider, KeySource, ObtainedKey};
use super::report::AccountReport;
use super::spec::{AuthMethod, Secret, UserAccountSpec};
use crate::config::AccountSettings;
use crate::error::{HostprepError, Result};
use crate::runner::{CommandResult, CommandRunner, Invocation};
use crate::traits::KeyFetcher;
use crate::ui;
use crate::utils::{paths, sanitize};
use std::path::{Path, PathBuf};

pub struct AccountProvisioner<'a> {
    runner: &'a dyn CommandRunner,
    keys: KeyProvider<'a>,
    settings: &'a AccountSettings,
}

impl<'a> AccountProvisioner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        fetcher: &'a dyn KeyFetcher,
        settings: &'a AccountSettings,
    ) -> Self {
        Self {
            runner,
            keys: KeyProvider::new(runner, fetcher),
            settings,
        }
    }

    /// Whether the identity database knows `username`
    pub fn exists(&self, username: &str) -> bool {
        self.runner
            .run(&Invocation::new("id").args(["-u", username]).unprivileged())
            .succeeded
    }

    /// `AccountNotFound` unless `username` is valid and known
    pub fn require_existing(&self, username: &str) -> Result<()> {
        sanitize::validate_username(username)?;
        if self.exists(username) {
            Ok(())
        } else {
            Err(HostprepError::AccountNotFound(username.to_string()))
        }
    }

    pub fn home_of(&self, username: &str) -> PathBuf {
        paths::home_dir_for(&self.settings.home_base, username)
    }

    pub fn create(&self, spec: &UserAccountSpec) -> Result<AccountReport> {
        sanitize::validate_username(&spec.username)?;
        sanitize::validate_real_name(&spec.first_name)?;
        sanitize::validate_real_name(&spec.last_name)?;

        if self.exists(&spec.username) {
            return Err(HostprepError::AccountAlreadyExists(spec.username.clone()));
        }

        let password = match &spec.auth_method {
            AuthMethod::Password {
                secret,
                confirmation,
            } => Some(checked_password(secret, confirmation)?),
            _ => None,
        };
        let key = match spec.auth_method.key_source() {
            Some(source) => Some(self.keys.obtain(&source)?),
            None => None,
        };

        let username = spec.username.as_str();
        let mut report = AccountReport::new("create", username);

        let useradd = Invocation::new("useradd")
            .args(["-m", "-s", self.settings.shell.as_str(), "-c"])
            .arg(spec.comment())
            .arg(username);
        let result = self.runner.run(&useradd);
        if !result.succeeded {
            return Err(HostprepError::AccountMutationFailed(format!(
                "useradd {}: {}",
                username,
                result.failure_message()
            )));
        }
        report.record("useradd", true, None);
        ui::success(&format!("User {} created", username));

        if let Some(password) = password {
            let chpasswd = Invocation::new("chpasswd")
                .stdin(format!("{}:{}", username, password.expose()));
            let result = self.runner.run(&chpasswd);
            self.record(&mut report, "set password", &result);
        }

        if let Some(key) = &key {
            self.install_key(username, key, &mut report);
        }

        if spec.is_admin {
            let usermod = Invocation::new("usermod").args([
                "-aG",
                self.settings.admin_group.as_str(),
                username,
            ]);
            let result = self.runner.run(&usermod);
            self.record(
                &mut report,
                &format!("add to {}", self.settings.admin_group),
                &result,
            );
        }

        self.populate_home(username, &mut report);

        Ok(report)
    }

    pub fn delete(&self, username: &str) -> Result<AccountReport> {
        self.require_existing(username)?;

        let mut report = AccountReport::new("delete", username);

        let graceful = self
            .runner
            .run(&Invocation::new("pkill").args(["-u", username]));
        if graceful.succeeded {
            report.record("terminate processes", true, None);
        } else {
            report.note(format!(
                "Graceful termination of {}'s processes failed; forcing",
                username
            ));
            let forced = self
                .runner
                .run(&Invocation::new("pkill").args(["-9", "-u", username]));
            if forced.succeeded {
                report.record("force-terminate processes", true, None);
            } else {
                report.note(format!(
                    "No processes terminated for {} ({})",
                    username,
                    non_empty_or(forced.failure_message(), "none running")
                ));
            }
        }

        let result = self
            .runner
            .run(&Invocation::new("userdel").args(["-r", username]));
        if !result.succeeded {
            return Err(HostprepError::AccountMutationFailed(format!(
                "userdel {}: {}",
                username,
                result.failure_message()
            )));
        }
        report.record("userdel", true, None);
        ui::success(&format!("User {} deleted", username));

        Ok(report)
    }

    /// Rename `old` to `new` and move its home directory.
    ///
    /// `consent` is asked whether leftover data under the old home should be
    /// moved over. Declining leaves it where it is; the report notes that.
    /// A consent error (an interrupted prompt) is recorded as a failed step,
    /// since the login has already been renamed by then.
    pub fn rename(
        &self,
        old: &str,
        new: &str,
        consent: &mut dyn FnMut(&Path, &Path) -> Result<bool>,
    ) -> Result<AccountReport> {
        self.require_existing(old)?;
        sanitize::validate_username(new)?;
        if self.exists(new) {
            return Err(HostprepError::AccountAlreadyExists(new.to_string()));
        }

        let mut report = AccountReport::new("rename", new);

        let result = self
            .runner
            .run(&Invocation::new("usermod").args(["-l", new, old]));
        if !result.succeeded {
            return Err(HostprepError::AccountMutationFailed(format!(
                "usermod -l {} {}: {}",
                new,
                old,
                result.failure_message()
            )));
        }
        report.record("rename login", true, None);

        let old_home = self.home_of(old);
        let new_home = self.home_of(new);
        let new_home_arg = new_home.display().to_string();

        let result = self.runner.run(
            &Invocation::new("usermod").args(["-d", new_home_arg.as_str(), "-m", new]),
        );
        self.record(&mut report, "move home directory", &result);

        let moving = match consent(&old_home, &new_home) {
            Ok(answer) => answer,
            Err(e) => {
                ui::warning(&format!("Data move question not answered: {}", e));
                report.record("move old home data", false, Some(e.to_string()));
                false
            }
        };

        if moving {
            let old_home_arg = old_home.display().to_string();
            let leftover = self
                .runner
                .run(&Invocation::new("test").args(["-e", old_home_arg.as_str()]))
                .succeeded;

            if leftover {
                let copy = self.runner.run(&Invocation::new("cp").args([
                    "-a".to_string(),
                    format!("{}/.", old_home_arg),
                    new_home_arg.clone(),
                ]));
                self.record(&mut report, "copy old home data", &copy);
                if copy.succeeded {
                    let cleanup = self
                        .runner
                        .run(&Invocation::new("rm").args(["-rf", old_home_arg.as_str()]));
                    self.record(&mut report, "remove old home", &cleanup);
                }
            }

            let chown = self.runner.run(&Self::chown_recursive(new, &new_home));
            self.record(&mut report, "fix home ownership", &chown);
        } else {
            report.note(format!(
                "Old data was not moved: anything left under {} is not part of {}'s home",
                old_home.display(),
                new
            ));
        }

        ui::success(&format!("Username changed from {} to {}", old, new));
        Ok(report)
    }

    pub fn change_password(
        &self,
        username: &str,
        secret: &Secret,
        confirmation: &Secret,
    ) -> Result<AccountReport> {
        self.require_existing(username)?;
        let password = checked_password(secret, confirmation)?;

        let passwd = Invocation::new("passwd").arg(username).stdin(format!(
            "{0}\n{0}\n",
            password.expose()
        ));
        let result = self.runner.run(&passwd);
        if !result.succeeded {
            return Err(HostprepError::AccountMutationFailed(format!(
                "passwd {}: {}",
                username,
                result.failure_message()
            )));
        }

        let mut report = AccountReport::new("change-password", username);
        report.record("set password", true, None);
        ui::success(&format!("Password for {} changed", username));
        Ok(report)
    }

    /// Install a new key from `source`, replacing `authorized_keys`
    pub fn replace_key(&self, username: &str, source: &KeySource) -> Result<AccountReport> {
        self.require_existing(username)?;

        let key = self.keys.obtain(source)?;
        let mut report = AccountReport::new("replace-key", username);
        self.install_key(username, &key, &mut report);
        Ok(report)
    }

    fn install_key(&self, username: &str, key: &ObtainedKey, report: &mut AccountReport) {
        let layout = SshLayout::new(&self.home_of(username), username);

        let mkdir = self.runner.run(
            &Invocation::new("mkdir")
                .args(["-p".to_string(), layout.ssh_dir().display().to_string()]),
        );
        self.record(report, "create .ssh", &mkdir);

        let tee = self.runner.run(
            &Invocation::new("tee")
                .arg(layout.authorized_keys().display().to_string())
                .stdin(format!("{}\n", key.public_key)),
        );
        self.record(report, "write authorized_keys", &tee);

        if let Some(pair) = &key.key_pair {
            for (from, to, label) in [
                (&pair.private_key, layout.private_key(), "install id_rsa"),
                (&pair.public_key, layout.public_key(), "install id_rsa.pub"),
            ] {
                let mv = self.runner.run(&Invocation::new("mv").args([
                    from.display().to_string(),
                    to.display().to_string(),
                ]));
                self.record(report, label, &mv);
            }
        }

        credentials::enforce(
            self.runner,
            &layout.artifacts(key.key_pair.is_some()),
            report,
        );

        if report.all_succeeded() {
            ui::success(&format!(
                "Key installed to {}",
                layout.authorized_keys().display()
            ));
        }
    }

    fn populate_home(&self, username: &str, report: &mut AccountReport) {
        let home = self.home_of(username);

        let copy = self.runner.run(&Invocation::new("cp").args([
            "-r".to_string(),
            format!("{}/.", self.settings.skeleton.display()),
            home.display().to_string(),
        ]));
        self.record(report, "copy skeleton", &copy);

        let chown = self.runner.run(&Self::chown_recursive(username, &home));
        self.record(report, "fix home ownership", &chown);
    }

    fn chown_recursive(username: &str, path: &Path) -> Invocation {
        Invocation::new("chown").args([
            "-R".to_string(),
            format!("{0}:{0}", username),
            path.display().to_string(),
        ])
    }

    fn record(&self, report: &mut AccountReport, step: &str, result: &CommandResult) {
        if result.succeeded {
            report.record(step, true, None);
        } else {
            let detail = result.failure_message().to_string();
            ui::warning(&format!("{} failed: {}", step, detail));
            report.record(step, false, Some(detail));
        }
    }
}

fn checked_password<'s>(secret: &'s Secret, confirmation: &Secret) -> Result<&'s Secret> {
    if secret != confirmation {
        return Err(HostprepError::PasswordMismatch);
    }
    if secret.is_empty() {
        return Err(HostprepError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(secret)
}

fn non_empty_or<'s>(text: &'s str, fallback: &'s str) -> &'s str {
    if text.is_empty() { fallback } else { text }
}
