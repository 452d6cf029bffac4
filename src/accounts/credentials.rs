//! Ownership and permission invariants for SSH credential files
//!
//! | path                  | mode |
//! |-----------------------|------|
//! | `.ssh/`               | 700  |
//! | `.ssh/authorized_keys`| 600  |
//! | `.ssh/id_rsa`         | 600  |
//! | `.ssh/id_rsa.pub`     | 644  |
//!
//! Everything is owned by the account and its primary group, whatever
//! produced the key.

use super::report::AccountReport;
use crate::runner::{CommandRunner, Invocation};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialArtifact {
    pub path: PathBuf,
    pub owner_user: String,
    pub owner_group: String,
    pub mode: u32,
}

impl CredentialArtifact {
    fn new(path: PathBuf, username: &str, mode: u32) -> Self {
        Self {
            path,
            owner_user: username.to_string(),
            owner_group: username.to_string(),
            mode,
        }
    }

    pub fn chown(&self) -> Invocation {
        Invocation::new("chown")
            .arg(format!("{}:{}", self.owner_user, self.owner_group))
            .arg(self.path.display().to_string())
    }

    pub fn chmod(&self) -> Invocation {
        Invocation::new("chmod")
            .arg(format!("{:o}", self.mode))
            .arg(self.path.display().to_string())
    }
}

/// Paths of an account's SSH material
#[derive(Debug, Clone)]
pub struct SshLayout {
    username: String,
    ssh_dir: PathBuf,
}

impl SshLayout {
    pub fn new(home: &Path, username: &str) -> Self {
        Self {
            username: username.to_string(),
            ssh_dir: home.join(".ssh"),
        }
    }

    pub fn ssh_dir(&self) -> &Path {
        &self.ssh_dir
    }

    pub fn authorized_keys(&self) -> PathBuf {
        self.ssh_dir.join("authorized_keys")
    }

    pub fn private_key(&self) -> PathBuf {
        self.ssh_dir.join("id_rsa")
    }

    pub fn public_key(&self) -> PathBuf {
        self.ssh_dir.join("id_rsa.pub")
    }

    /// Artifacts that must exist; the key pair only when one was installed
    pub fn artifacts(&self, with_key_pair: bool) -> Vec<CredentialArtifact> {
        let mut artifacts = vec![
            CredentialArtifact::new(self.ssh_dir.clone(), &self.username, 0o700),
            CredentialArtifact::new(self.authorized_keys(), &self.username, 0o600),
        ];
        if with_key_pair {
            artifacts.push(CredentialArtifact::new(
                self.private_key(),
                &self.username,
                0o600,
            ));
            artifacts.push(CredentialArtifact::new(
                self.public_key(),
                &self.username,
                0o644,
            ));
        }
        artifacts
    }
}

/// Apply ownership then mode to every artifact, recording each command
pub fn enforce(
    runner: &dyn CommandRunner,
    artifacts: &[CredentialArtifact],
    report: &mut AccountReport,
) {
    for artifact in artifacts {
        for (label, invocation) in [("chown", artifact.chown()), ("chmod", artifact.chmod())] {
            let result = runner.run(&invocation);
            report.record(
                format!("{} {}", label, artifact.path.display()),
                result.succeeded,
                (!result.succeeded).then(|| result.failure_message().to_string()),
            );
        }
    }
}
