//! Archive installation state machine
//!
//! ```text
//! Pending -> Installing -> Succeeded
//!                       -> AwaitingConsent(deps) -> ResolvingDependencies(deps) -> Retrying -> Succeeded
//!                       |                        |                                          -> Failed(RetryFailedAfterDependencyInstall)
//!                       |                        -> Failed(DependencyInstallDeclined)
//!                       |                        -> Failed(MissingDependencies)   (resolution disabled)
//!                       -> Failed(UnparsableDependencyError)
//! ```
//!
//! [`transition`] is pure; the package engine performs the side effect each
//! state asks for and feeds the result back in as an [`ArchiveEvent`].
//! `Retrying` has no edge back into dependency handling, so an archive is
//! retried at most once.

use super::dependencies::extract_dependencies;
use super::types::{ArchiveFailureReason, CommandResult, FailureReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveState {
    Pending,
    Installing,
    AwaitingConsent(Vec<String>),
    ResolvingDependencies(Vec<String>),
    Retrying,
    Succeeded,
    Failed(ArchiveFailureReason),
}

impl ArchiveState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ArchiveState::Succeeded | ArchiveState::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveEvent {
    /// The archive file is present; start installing
    Start,
    /// The archive file does not exist
    ArchiveMissing,
    /// `dpkg -i` finished (first attempt or retry)
    InstallFinished(CommandResult),
    ConsentGiven,
    ConsentDeclined,
    /// Dependency resolution is switched off; record what was missing
    ResolutionDisabled,
    DependenciesResolved,
}

/// Next state for `state` after `event`.
///
/// Terminal states absorb every event. An event that makes no sense for a
/// non-terminal state ends the archive as failed instead of looping.
pub fn transition(state: ArchiveState, event: ArchiveEvent) -> ArchiveState {
    use ArchiveEvent as E;
    use ArchiveState as S;

    match (state, event) {
        (terminal, _) if terminal.is_terminal() => terminal,

        (S::Pending, E::Start) => S::Installing,
        (S::Pending, E::ArchiveMissing) => {
            S::Failed(ArchiveFailureReason::Package(FailureReason::NotFound))
        }

        (S::Installing, E::InstallFinished(result)) => {
            if result.succeeded {
                return S::Succeeded;
            }
            let dependencies = extract_dependencies(result.failure_message());
            if dependencies.is_empty() {
                S::Failed(ArchiveFailureReason::UnparsableDependencyError)
            } else {
                S::AwaitingConsent(dependencies)
            }
        }

        (S::AwaitingConsent(deps), E::ConsentGiven) => S::ResolvingDependencies(deps),
        (S::AwaitingConsent(_), E::ConsentDeclined) => {
            S::Failed(ArchiveFailureReason::DependencyInstallDeclined)
        }
        (S::AwaitingConsent(deps), E::ResolutionDisabled) => {
            S::Failed(ArchiveFailureReason::MissingDependencies(deps))
        }

        (S::ResolvingDependencies(_), E::DependenciesResolved) => S::Retrying,

        (S::Retrying, E::InstallFinished(result)) => {
            if result.succeeded {
                S::Succeeded
            } else {
                S::Failed(ArchiveFailureReason::RetryFailedAfterDependencyInstall)
            }
        }

        (state, event) => S::Failed(ArchiveFailureReason::Package(FailureReason::Other(
            format!("unexpected {:?} while {:?}", event, state),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dependency_failure() -> CommandResult {
        CommandResult::failure(" app depends on libfoo (>= 1.0), libbar; however:")
    }

    #[test]
    fn test_clean_install_succeeds() {
        let state = transition(ArchiveState::Pending, ArchiveEvent::Start);
        assert_eq!(state, ArchiveState::Installing);

        let state = transition(
            state,
            ArchiveEvent::InstallFinished(CommandResult::success("Setting up app")),
        );
        assert_eq!(state, ArchiveState::Succeeded);
    }

    #[test]
    fn test_dependency_failure_asks_for_consent() {
        let state = transition(
            ArchiveState::Installing,
            ArchiveEvent::InstallFinished(dependency_failure()),
        );
        assert_eq!(
            state,
            ArchiveState::AwaitingConsent(vec!["libfoo".into(), "libbar".into()])
        );
    }

    #[test]
    fn test_unparsable_failure_is_terminal() {
        let state = transition(
            ArchiveState::Installing,
            ArchiveEvent::InstallFinished(CommandResult::failure(
                "dpkg: error processing archive app.deb: not a Debian format archive",
            )),
        );
        assert_eq!(
            state,
            ArchiveState::Failed(ArchiveFailureReason::UnparsableDependencyError)
        );
    }

    #[test]
    fn test_declined_consent_fails_without_retry() {
        let state = transition(
            ArchiveState::AwaitingConsent(vec!["libfoo".into()]),
            ArchiveEvent::ConsentDeclined,
        );
        assert_eq!(
            state,
            ArchiveState::Failed(ArchiveFailureReason::DependencyInstallDeclined)
        );
    }

    #[test]
    fn test_resolution_disabled_records_missing_dependencies() {
        let state = transition(
            ArchiveState::AwaitingConsent(vec!["libfoo".into()]),
            ArchiveEvent::ResolutionDisabled,
        );
        assert_eq!(
            state,
            ArchiveState::Failed(ArchiveFailureReason::MissingDependencies(vec![
                "libfoo".into()
            ]))
        );
    }

    #[test]
    fn test_failed_retry_never_reenters_resolution() {
        let state = transition(
            ArchiveState::AwaitingConsent(vec!["libfoo".into()]),
            ArchiveEvent::ConsentGiven,
        );
        let state = transition(state, ArchiveEvent::DependenciesResolved);
        assert_eq!(state, ArchiveState::Retrying);

        // Even if the retry fails with a parsable dependency error again
        let state = transition(state, ArchiveEvent::InstallFinished(dependency_failure()));
        assert_eq!(
            state,
            ArchiveState::Failed(ArchiveFailureReason::RetryFailedAfterDependencyInstall)
        );
    }

    #[test]
    fn test_terminal_states_absorb_events() {
        let done = transition(ArchiveState::Succeeded, ArchiveEvent::ConsentGiven);
        assert_eq!(done, ArchiveState::Succeeded);

        let failed = ArchiveState::Failed(ArchiveFailureReason::DependencyInstallDeclined);
        let still = transition(
            failed.clone(),
            ArchiveEvent::InstallFinished(CommandResult::success("")),
        );
        assert_eq!(still, failed);
    }

    #[test]
    fn test_missing_archive_fails_before_install() {
        let state = transition(ArchiveState::Pending, ArchiveEvent::ArchiveMissing);
        assert_eq!(
            state,
            ArchiveState::Failed(ArchiveFailureReason::Package(FailureReason::NotFound))
        );
    }

    #[test]
    fn test_unexpected_event_terminates() {
        let state = transition(ArchiveState::Installing, ArchiveEvent::ConsentGiven);
        assert!(state.is_terminal());
    }
}
