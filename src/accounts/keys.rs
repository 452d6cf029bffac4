//! Authentication key sources
//!
//! A key comes either from an identity provider that publishes a user's
//! public keys over HTTPS, or from a fresh local `ssh-keygen` run. Both end as
//! an [`ObtainedKey`]; only generated keys carry key files that still have
//! to be moved into the account's `.ssh` directory.

use super::spec::Secret;
use crate::error::{HostprepError, Result};
use crate::runner::{CommandRunner, Invocation};
use crate::traits::{FetchResponse, KeyFetcher};
use crate::ui;
use crate::utils::sanitize;
use reqwest::blocking::Client;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProvider {
    Launchpad,
    GitHub,
}

impl IdentityProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "launchpad" | "lp" => Some(IdentityProvider::Launchpad),
            "github" | "gh" => Some(IdentityProvider::GitHub),
            _ => None,
        }
    }

    /// Where the provider publishes `username`'s public keys.
    /// Provider usernames are case-insensitive and always sent lower-cased.
    pub fn key_url(&self, username: &str) -> String {
        let username = username.to_lowercase();
        match self {
            IdentityProvider::Launchpad => format!("https://launchpad.net/~{}/+sshkeys", username),
            IdentityProvider::GitHub => format!("https://github.com/{}.keys", username),
        }
    }
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityProvider::Launchpad => write!(f, "Launchpad"),
            IdentityProvider::GitHub => write!(f, "GitHub"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    RemoteFetch {
        provider: IdentityProvider,
        username: String,
    },
    LocalGenerate {
        has_passphrase: bool,
        passphrase: Option<Secret>,
    },
}

/// Freshly generated key files, alive as long as this value is
#[derive(Debug)]
pub struct GeneratedKeyPair {
    _dir: TempDir,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

#[derive(Debug)]
pub struct ObtainedKey {
    /// Public key text that goes into `authorized_keys`
    pub public_key: String,
    /// Files to install as `id_rsa` / `id_rsa.pub`; `None` for fetched keys
    pub key_pair: Option<GeneratedKeyPair>,
}

/// Key text from a provider response, or `None` when the response is not
/// key material (error status, empty body, an HTML page)
pub fn validate_key_material(response: &FetchResponse) -> Option<String> {
    if !response.is_success() {
        return None;
    }

    let body = response.body.trim();
    if body.is_empty()
        || body.to_ascii_lowercase().starts_with("<!doctype html")
        || body.contains("Error: Page not found")
    {
        return None;
    }

    Some(body.to_string())
}

/// Production fetcher over blocking HTTPS
pub struct HttpKeyFetcher {
    client: Client,
}

impl HttpKeyFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hostprep/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| HostprepError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl KeyFetcher for HttpKeyFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<FetchResponse, String> {
        let resp = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| e.to_string())?;
        Ok(FetchResponse { status, body })
    }
}

pub struct KeyProvider<'a> {
    runner: &'a dyn CommandRunner,
    fetcher: &'a dyn KeyFetcher,
}

impl<'a> KeyProvider<'a> {
    pub fn new(runner: &'a dyn CommandRunner, fetcher: &'a dyn KeyFetcher) -> Self {
        Self { runner, fetcher }
    }

    /// Obtain a key from `source`.
    ///
    /// A provider answer that is not key material becomes `KeyFetchInvalid`,
    /// distinct from the transport failure `KeyFetchFailed`.
    pub fn obtain(&self, source: &KeySource) -> Result<ObtainedKey> {
        match source {
            KeySource::RemoteFetch { provider, username } => {
                match self.fetch_remote(*provider, username)? {
                    Some(public_key) => Ok(ObtainedKey {
                        public_key,
                        key_pair: None,
                    }),
                    None => Err(HostprepError::KeyFetchInvalid {
                        provider: provider.to_string(),
                        username: username.to_lowercase(),
                    }),
                }
            }
            KeySource::LocalGenerate {
                has_passphrase,
                passphrase,
            } => {
                let pair = self.generate(*has_passphrase, passphrase.as_ref())?;
                let public_key = fs::read_to_string(&pair.public_key)
                    .map_err(|e| {
                        HostprepError::KeyGenerationFailed(format!(
                            "cannot read {}: {}",
                            pair.public_key.display(),
                            e
                        ))
                    })?
                    .trim()
                    .to_string();
                Ok(ObtainedKey {
                    public_key,
                    key_pair: Some(pair),
                })
            }
        }
    }

    pub fn fetch_remote(
        &self,
        provider: IdentityProvider,
        username: &str,
    ) -> Result<Option<String>> {
        sanitize::validate_provider_username(username).map_err(|_| {
            HostprepError::KeyFetchInvalid {
                provider: provider.to_string(),
                username: username.to_string(),
            }
        })?;
        let url = provider.key_url(username);
        ui::verbose(&format!("Fetching keys from {}", url));

        let response = self
            .fetcher
            .fetch(&url)
            .map_err(|reason| HostprepError::KeyFetchFailed {
                url: url.clone(),
                reason,
            })?;

        Ok(validate_key_material(&response))
    }

    /// Generate an RSA key pair in a private temporary directory.
    ///
    /// A requested passphrase must be non-empty; that is checked before
    /// `ssh-keygen` runs.
    pub fn generate(
        &self,
        has_passphrase: bool,
        passphrase: Option<&Secret>,
    ) -> Result<GeneratedKeyPair> {
        let passphrase = if has_passphrase {
            match passphrase {
                Some(p) if !p.is_empty() => p.expose(),
                _ => return Err(HostprepError::PassphraseEmpty),
            }
        } else {
            ""
        };

        let dir = tempfile::Builder::new()
            .prefix("hostprep-key-")
            .tempdir()
            .map_err(|e| HostprepError::KeyGenerationFailed(e.to_string()))?;
        let private_key = dir.path().join("id_rsa");
        let public_key = dir.path().join("id_rsa.pub");

        let invocation = Invocation::new("ssh-keygen")
            .args(["-q", "-t", "rsa", "-f"])
            .arg(private_key.display().to_string())
            .arg("-N")
            .secret_arg(passphrase)
            .unprivileged();

        let result = self.runner.run(&invocation);
        if !result.succeeded {
            return Err(HostprepError::KeyGenerationFailed(
                result.failure_message().to_string(),
            ));
        }
        if !public_key.is_file() {
            return Err(HostprepError::KeyGenerationFailed(format!(
                "ssh-keygen did not produce {}",
                public_key.display()
            )));
        }

        Ok(GeneratedKeyPair {
            _dir: dir,
            private_key,
            public_key,
        })
    }
}

#[cfg(test)]
mod tests;
