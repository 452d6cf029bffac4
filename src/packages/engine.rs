//! Batch package operations
//!
//! Every batch runs to completion: a failing item is recorded in the
//! [`BatchReport`] and the next item still runs. Nothing here aborts a batch.

use crate::core::archive::{ArchiveEvent, ArchiveState, transition};
use crate::core::classifier::classify;
use crate::core::dependencies::resolve_dependencies;
use crate::core::types::{
    ArchiveFailureReason, BatchReport, FailureReason, Outcome, PackageRequest,
};
use crate::packages::apt;
use crate::runner::{CommandRunner, Invocation};
use crate::traits::Prompter;
use crate::ui;
use crate::ui::progress::BatchProgress;
use std::path::{Path, PathBuf};

/// What to do when an archive reports missing dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyPolicy {
    /// Ask the operator before installing anything
    #[default]
    Ask,
    /// Install without asking (`--yes`)
    AssumeYes,
    /// Never install; record what was missing (`--no-resolve`)
    Never,
}

pub struct PackageEngine<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> PackageEngine<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Install `packages` in order.
    ///
    /// The index is refreshed and the system upgraded once, before the first
    /// package. A failure there becomes a warning on the report.
    pub fn install(&self, packages: &[PackageRequest]) -> BatchReport<FailureReason> {
        let mut report = BatchReport::new("install");
        if packages.is_empty() {
            return report;
        }

        self.prepare(&mut report);

        let mut progress = BatchProgress::new(packages.len());
        for package in packages {
            if ui::is_interrupted() {
                report.warn(format!("Interrupted before installing {}", package.name));
                break;
            }
            progress.step(&format!("Installing {}", package.name));
            let outcome = self.run_classified(&package.name, &apt::install(&package.name));
            report.record(outcome);
        }

        report
    }

    /// Remove `packages` in order, then drop orphaned dependencies once
    pub fn remove(&self, packages: &[PackageRequest]) -> BatchReport<FailureReason> {
        let mut report = BatchReport::new("remove");
        if packages.is_empty() {
            return report;
        }

        let mut progress = BatchProgress::new(packages.len());
        for package in packages {
            if ui::is_interrupted() {
                report.warn(format!("Interrupted before removing {}", package.name));
                break;
            }
            progress.step(&format!("Removing {}", package.name));
            let outcome = self.run_classified(&package.name, &apt::remove(&package.name));
            report.record(outcome);
        }

        let cleanup = self.runner.run(&apt::autoremove());
        if !cleanup.succeeded {
            let message = format!("Autoremove failed: {}", cleanup.failure_message());
            ui::warning(&message);
            report.warn(message);
        }

        report
    }

    /// Install local archives, recovering from missing dependencies.
    ///
    /// Each archive is driven through [`transition`] until it reaches a
    /// terminal state. It is retried at most once, after its dependencies
    /// were installed.
    pub fn install_archives(
        &self,
        archives: &[PathBuf],
        policy: DependencyPolicy,
        prompter: &dyn Prompter,
    ) -> BatchReport<ArchiveFailureReason> {
        let mut report = BatchReport::new("install-archives");
        if archives.is_empty() {
            return report;
        }

        let mut progress = BatchProgress::new(archives.len());
        for path in archives {
            let name = archive_name(path);
            if ui::is_interrupted() {
                report.warn(format!("Interrupted before installing {}", name));
                break;
            }
            progress.step(&format!("Installing {}", name));

            match self.drive_archive(path, &name, policy, prompter, &mut report) {
                ArchiveState::Failed(reason) => report.record(Outcome::failure(name, reason)),
                _ => report.record(Outcome::success(name)),
            }
        }

        report
    }

    fn drive_archive(
        &self,
        path: &Path,
        name: &str,
        policy: DependencyPolicy,
        prompter: &dyn Prompter,
        report: &mut BatchReport<ArchiveFailureReason>,
    ) -> ArchiveState {
        let mut state = ArchiveState::Pending;

        loop {
            let event = match &state {
                ArchiveState::Succeeded | ArchiveState::Failed(_) => break,
                ArchiveState::Pending => {
                    if path.is_file() {
                        ArchiveEvent::Start
                    } else {
                        ArchiveEvent::ArchiveMissing
                    }
                }
                ArchiveState::Installing => {
                    ArchiveEvent::InstallFinished(self.runner.run(&apt::install_archive(path)))
                }
                ArchiveState::AwaitingConsent(deps) => {
                    Self::consent(name, deps, policy, prompter)
                }
                ArchiveState::ResolvingDependencies(deps) => {
                    let resolved =
                        resolve_dependencies(deps, |dep| self.runner.run(&apt::install(dep)));
                    for (dep, reason) in resolved.failed() {
                        report.warn(format!("{}: dependency {} failed: {}", name, dep, reason));
                    }
                    ArchiveEvent::DependenciesResolved
                }
                ArchiveState::Retrying => {
                    ui::info(&format!("Retrying {}", name));
                    ArchiveEvent::InstallFinished(self.runner.run(&apt::install_archive(path)))
                }
            };
            state = transition(state, event);
        }

        state
    }

    fn consent(
        name: &str,
        deps: &[String],
        policy: DependencyPolicy,
        prompter: &dyn Prompter,
    ) -> ArchiveEvent {
        match policy {
            DependencyPolicy::Never => ArchiveEvent::ResolutionDisabled,
            DependencyPolicy::AssumeYes => ArchiveEvent::ConsentGiven,
            DependencyPolicy::Ask => {
                ui::warning(&format!(
                    "{} is missing dependencies: {}",
                    name,
                    deps.join(", ")
                ));
                match prompter.confirm("Install the missing dependencies?") {
                    Ok(true) => ArchiveEvent::ConsentGiven,
                    Ok(false) => ArchiveEvent::ConsentDeclined,
                    Err(e) => {
                        ui::warning(&format!("No answer ({}); skipping dependencies", e));
                        ArchiveEvent::ConsentDeclined
                    }
                }
            }
        }
    }

    fn prepare(&self, report: &mut BatchReport<FailureReason>) {
        ui::info("Refreshing package index");
        for (label, invocation) in [
            ("Package index refresh", apt::refresh_index()),
            ("System upgrade", apt::upgrade_all()),
        ] {
            let result = self.runner.run(&invocation);
            if !result.succeeded {
                let message = format!("{} failed: {}", label, result.failure_message());
                ui::warning(&message);
                report.warn(message);
            }
        }
    }

    fn run_classified(&self, name: &str, invocation: &Invocation) -> Outcome<FailureReason> {
        let result = self.runner.run(invocation);
        match classify(&result) {
            None => Outcome::success(name),
            Some(reason) => Outcome::failure(name, reason),
        }
    }
}

/// Display name of an archive: its file name, or the path when there is none
pub fn archive_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
