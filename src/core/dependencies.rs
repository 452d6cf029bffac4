//! Missing-dependency recovery for local archive installs
//!
//! `dpkg -i` reports unmet dependencies in human-readable lines such as
//!
//! ```text
//!  foo depends on libbar (>= 1.2), libbaz; however:
//! ```
//!
//! The extractor is a best-effort parse of that text. Anything it does not
//! recognise yields an empty list, which callers treat as "unparsable" rather
//! than "no dependencies".

use super::classifier::classify;
use super::types::{BatchReport, CommandResult, FailureReason, Outcome};
use crate::ui;

const DEPENDS_MARKER: &str = "depends on";

/// Dependency names mentioned in a dpkg failure, first-seen order, no duplicates
pub fn extract_dependencies(error_text: &str) -> Vec<String> {
    let mut dependencies: Vec<String> = Vec::new();

    for line in error_text.lines() {
        let Some((_, after)) = line.split_once(DEPENDS_MARKER) else {
            continue;
        };
        let clauses = after.split(';').next().unwrap_or_default();

        for clause in clauses.split(',') {
            // "libfoo (>= 1.0)" -> "libfoo"; "liba | libb" -> "liba"
            let Some(name) = clause.split_whitespace().next() else {
                continue;
            };
            if !dependencies.iter().any(|d| d == name) {
                dependencies.push(name.to_string());
            }
        }
    }

    dependencies
}

/// Install each dependency with `install`, continuing past failures.
///
/// A partially resolved set is not fatal; the caller retries the original
/// archive and that retry reports its own outcome. Dependencies of the
/// dependencies are left to the package manager.
pub fn resolve_dependencies<F>(dependencies: &[String], mut install: F) -> BatchReport<FailureReason>
where
    F: FnMut(&str) -> CommandResult,
{
    let mut report = BatchReport::new("resolve-dependencies");

    for dependency in dependencies {
        let result = install(dependency);
        match classify(&result) {
            None => {
                ui::success(&format!("Installing dependency {} completed", dependency));
                report.record(Outcome::success(dependency.clone()));
            }
            Some(reason) => {
                ui::warning(&format!("Installing dependency {} failed: {}", dependency, reason));
                report.record(Outcome::failure(dependency.clone(), reason));
            }
        }
    }

    report
}
