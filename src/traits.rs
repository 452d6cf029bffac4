//! Core traits for dependency injection and testability
//!
//! Flows never talk to the terminal or the network directly. They depend on
//! these traits so the interactive adapter, the HTTP client and the test
//! doubles can be swapped freely. Commands themselves go through
//! [`crate::runner::CommandRunner`].

use crate::error::Result;

/// Answers the questions a flow has to ask the operator.
///
/// An `Err` (typically [`crate::error::HostprepError::Interrupted`]) means the
/// question could not be answered at all.
pub trait Prompter {
    /// Yes/no consent
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Free-form single line
    fn input(&self, prompt: &str) -> Result<String>;

    /// Hidden single entry (passphrases)
    fn secret(&self, prompt: &str) -> Result<String>;

    /// Hidden entry asked twice; returns both answers so the caller decides
    /// what a mismatch means
    fn secret_with_confirmation(&self, prompt: &str) -> Result<(String, String)>;

    /// Pick one of `items`, returning its index
    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize>;
}

/// Raw HTTP answer from an identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves remote content by address.
///
/// `Err(reason)` is a transport failure (DNS, TLS, connection); any HTTP
/// answer, including 404, is an `Ok`.
pub trait KeyFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<FetchResponse, String>;
}
