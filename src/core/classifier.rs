//! Outcome classification
//!
//! Maps the error text of a failed package operation onto a [`FailureReason`].
//! The rules are an ordered table; the first rule whose marker appears in the
//! text wins, so "not found" beats "already installed" when both are present.

use super::types::{CommandResult, FailureReason};

/// Markers checked in order. Matching is case-sensitive.
const RULES: &[(&str, FailureReason)] = &[
    ("Unable to locate package", FailureReason::NotFound),
    ("already installed", FailureReason::AlreadyInstalled),
];

/// Classify the error text of a failed operation
pub fn classify_failure(error_text: &str) -> FailureReason {
    RULES
        .iter()
        .find(|(marker, _)| error_text.contains(marker))
        .map(|(_, reason)| reason.clone())
        .unwrap_or_else(|| FailureReason::Other(error_text.trim().to_string()))
}

/// `None` for a successful result, otherwise its classified reason
pub fn classify(result: &CommandResult) -> Option<FailureReason> {
    if result.succeeded {
        None
    } else {
        Some(classify_failure(result.failure_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unable_to_locate_is_not_found() {
        let text = "Reading package lists...\nE: Unable to locate package nosuchpkg";
        assert_eq!(classify_failure(text), FailureReason::NotFound);
    }

    #[test]
    fn test_already_installed() {
        let text = "htop is already installed and at the newest version";
        assert_eq!(classify_failure(text), FailureReason::AlreadyInstalled);
    }

    #[test]
    fn test_not_found_wins_over_already_installed() {
        let text = "foo is already installed\nE: Unable to locate package bar";
        assert_eq!(classify_failure(text), FailureReason::NotFound);

        let reversed = "E: Unable to locate package bar\nfoo is already installed";
        assert_eq!(classify_failure(reversed), FailureReason::NotFound);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let text = "E: unable to locate package bar";
        assert_eq!(
            classify_failure(text),
            FailureReason::Other("E: unable to locate package bar".to_string())
        );
    }

    #[test]
    fn test_other_keeps_trimmed_text() {
        let text = "\n  E: Could not get lock /var/lib/dpkg/lock-frontend  \n";
        assert_eq!(
            classify_failure(text),
            FailureReason::Other("E: Could not get lock /var/lib/dpkg/lock-frontend".to_string())
        );
    }

    #[test]
    fn test_classify_result() {
        assert_eq!(classify(&CommandResult::success("ok")), None);
        assert_eq!(
            classify(&CommandResult::failure("E: Unable to locate package x")),
            Some(FailureReason::NotFound)
        );
    }
}
