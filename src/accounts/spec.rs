//! What an operator asks for when creating an account

use super::keys::{IdentityProvider, KeySource};
use std::fmt;

/// A password or passphrase. `Debug` never shows the value.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(********)")
    }
}

/// How the new account authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Both entries are kept so the provisioner can reject a mismatch
    /// before touching the system
    Password {
        secret: Secret,
        confirmation: Secret,
    },
    RemoteKey {
        provider: IdentityProvider,
        provider_username: String,
    },
    GeneratedKey {
        has_passphrase: bool,
        passphrase: Option<Secret>,
    },
}

impl AuthMethod {
    pub fn password(secret: &str, confirmation: &str) -> Self {
        AuthMethod::Password {
            secret: Secret::new(secret),
            confirmation: Secret::new(confirmation),
        }
    }

    /// The key source this method draws from; `None` for passwords
    pub fn key_source(&self) -> Option<KeySource> {
        match self {
            AuthMethod::Password { .. } => None,
            AuthMethod::RemoteKey {
                provider,
                provider_username,
            } => Some(KeySource::RemoteFetch {
                provider: *provider,
                username: provider_username.clone(),
            }),
            AuthMethod::GeneratedKey {
                has_passphrase,
                passphrase,
            } => Some(KeySource::LocalGenerate {
                has_passphrase: *has_passphrase,
                passphrase: passphrase.clone(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthMethod::Password { .. } => "password",
            AuthMethod::RemoteKey { .. } => "remote key",
            AuthMethod::GeneratedKey { .. } => "generated key",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccountSpec {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub auth_method: AuthMethod,
}

impl UserAccountSpec {
    /// GECOS comment: "first last", without stray spaces when a part is empty
    pub fn comment(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
