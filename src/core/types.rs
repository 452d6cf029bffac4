use serde::Serialize;
use std::fmt;

pub use crate::runner::CommandResult;

/// A package requested by name from the configured repositories
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRequest {
    pub name: String,
}

impl PackageRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn from_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Self::new).collect()
    }
}

/// Why installing or removing a repository package failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    NotFound,
    AlreadyInstalled,
    /// Raw error text kept for the operator
    Other(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "Package not found"),
            FailureReason::AlreadyInstalled => write!(f, "Package already installed"),
            FailureReason::Other(text) if text.is_empty() => write!(f, "Unknown error"),
            FailureReason::Other(text) => write!(f, "{}", text),
        }
    }
}

/// Why installing a local archive failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ArchiveFailureReason {
    Package(FailureReason),
    MissingDependencies(Vec<String>),
    DependencyInstallDeclined,
    RetryFailedAfterDependencyInstall,
    UnparsableDependencyError,
}

impl fmt::Display for ArchiveFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveFailureReason::Package(reason) => write!(f, "{}", reason),
            ArchiveFailureReason::MissingDependencies(deps) => {
                write!(f, "Missing dependencies: {}", deps.join(", "))
            }
            ArchiveFailureReason::DependencyInstallDeclined => {
                write!(f, "Dependency installation declined by user")
            }
            ArchiveFailureReason::RetryFailedAfterDependencyInstall => {
                write!(f, "Failed after dependency installation")
            }
            ArchiveFailureReason::UnparsableDependencyError => {
                write!(f, "Dependency issues, but unable to parse dependencies")
            }
        }
    }
}

/// Terminal result for one item of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<R> {
    pub name: String,
    pub succeeded: bool,
    pub failure_reason: Option<R>,
}

impl<R> Outcome<R> {
    pub fn success(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            succeeded: true,
            failure_reason: None,
        }
    }

    pub fn failure(name: impl Into<String>, reason: R) -> Self {
        Self {
            name: name.into(),
            succeeded: false,
            failure_reason: Some(reason),
        }
    }
}

pub type PackageOutcome = Outcome<FailureReason>;
pub type ArchivePackageOutcome = Outcome<ArchiveFailureReason>;

/// Ordered, append-only record of a batch.
///
/// Outcomes are terminal once recorded; there is no way to edit one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport<R> {
    pub operation: String,
    outcomes: Vec<Outcome<R>>,
    warnings: Vec<String>,
}

impl<R> BatchReport<R> {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            outcomes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: Outcome<R>) {
        self.outcomes.push(outcome);
    }

    /// Batch-level problem that did not belong to a single item
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn outcomes(&self) -> &[Outcome<R>] {
        &self.outcomes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.succeeded)
            .map(|o| o.name.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &R)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.failure_reason.as_ref().map(|r| (o.name.as_str(), r)))
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }

    pub fn outcome(&self, name: &str) -> Option<&Outcome<R>> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}
