use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostprepError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("System dependency missing: {0}")]
    DependencyMissing(String),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    YamlError(#[from] serde_yml::Error),

    /// Transport-level failure while talking to an identity provider
    #[error("Failed to fetch key from {url}: {reason}")]
    KeyFetchFailed { url: String, reason: String },

    /// The provider answered, but not with key material (HTML page, 404, empty body)
    #[error("No public key found for '{username}' on {provider}")]
    KeyFetchInvalid { provider: String, username: String },

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Passphrase cannot be empty")]
    PassphraseEmpty,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("User '{0}' already exists")]
    AccountAlreadyExists(String),

    #[error("User '{0}' does not exist")]
    AccountNotFound(String),

    #[error("Account operation failed: {0}")]
    AccountMutationFailed(String),

    /// Some items of a batch or steps of an account flow failed; the
    /// summary has already been printed
    #[error("{failed} of {total} operations failed")]
    Incomplete { failed: usize, total: usize },

    #[error("{0}")]
    Other(String),
}

impl HostprepError {
    /// Errors from the key source that the caller may answer by choosing
    /// another source instead of aborting the whole flow.
    pub fn is_key_acquisition(&self) -> bool {
        matches!(
            self,
            HostprepError::KeyFetchFailed { .. }
                | HostprepError::KeyFetchInvalid { .. }
                | HostprepError::KeyGenerationFailed(_)
                | HostprepError::PassphraseEmpty
        )
    }
}

pub type Result<T> = std::result::Result<T, HostprepError>;
