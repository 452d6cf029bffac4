//! End-of-flow summaries

use super::CommandContext;
use crate::accounts::AccountReport;
use crate::core::types::BatchReport;
use crate::error::{HostprepError, Result};
use crate::ui;
use crate::utils::machine_output;
use colored::Colorize;
use serde::Serialize;
use std::fmt;

/// Headings for the two halves of a batch summary
pub struct Titles {
    pub succeeded: &'static str,
    pub failed: &'static str,
}

pub const INSTALLED: Titles = Titles {
    succeeded: "Successfully installed packages:",
    failed: "Unsuccessful packages:",
};

pub const REMOVED: Titles = Titles {
    succeeded: "Successfully uninstalled packages:",
    failed: "Unsuccessful uninstallations:",
};

pub const ARCHIVES: Titles = Titles {
    succeeded: "Successfully installed archives:",
    failed: "Unsuccessful archives:",
};

/// Numbered summary lines: "1. name" and "1. name: reason"
pub fn batch_lines<R: fmt::Display>(report: &BatchReport<R>) -> (Vec<String>, Vec<String>) {
    let succeeded = report
        .succeeded()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect();
    let failed = report
        .failed()
        .enumerate()
        .map(|(i, (name, reason))| format!("{}. {}: {}", i + 1, name, reason))
        .collect();
    (succeeded, failed)
}

fn print_batch<R: fmt::Display>(report: &BatchReport<R>, titles: &Titles) {
    let (succeeded, failed) = batch_lines(report);

    ui::separator();
    if !succeeded.is_empty() {
        println!("{}", titles.succeeded.green().bold());
        for line in &succeeded {
            ui::indent(line, 1);
        }
    }
    if !failed.is_empty() {
        println!("{}", titles.failed.red().bold());
        for line in &failed {
            ui::indent(line, 1);
        }
    }
    for warning in report.warnings() {
        ui::warning(warning);
    }
}

/// Print or emit a batch report; `Incomplete` when anything failed
pub fn finish_batch<R>(
    ctx: &CommandContext,
    command: &str,
    report: &BatchReport<R>,
    titles: &Titles,
) -> Result<()>
where
    R: fmt::Display + Serialize,
{
    let failed = report.failed().count();

    if ctx.format.is_machine() {
        let errors = report
            .failed()
            .map(|(name, reason)| format!("{}: {}", name, reason))
            .collect();
        machine_output::emit_v1(
            command,
            report,
            report.warnings().to_vec(),
            errors,
            ctx.format,
        )?;
    } else if !ui::is_quiet() {
        print_batch(report, titles);
    }

    if failed > 0 {
        return Err(HostprepError::Incomplete {
            failed,
            total: report.len(),
        });
    }
    Ok(())
}

fn print_account(report: &AccountReport) {
    ui::separator();
    ui::header(&format!("{} {}", report.operation, report.username));
    for step in &report.steps {
        match &step.detail {
            None if step.succeeded => ui::indent(&format!("{} {}", "✓".green(), step.step), 1),
            None => ui::indent(&format!("{} {}", "✗".red(), step.step), 1),
            Some(detail) => ui::indent(&format!("{} {}: {}", "✗".red(), step.step, detail), 1),
        }
    }
    for note in &report.notes {
        ui::warning(note);
    }
}

/// Print or emit an account report; `Incomplete` when a step failed
pub fn finish_account(ctx: &CommandContext, command: &str, report: &AccountReport) -> Result<()> {
    let failed = report.failed_steps().count();

    if ctx.format.is_machine() {
        let errors = report
            .failed_steps()
            .map(|s| format!("{}: {}", s.step, s.detail.as_deref().unwrap_or("failed")))
            .collect();
        machine_output::emit_v1(command, report, report.notes.clone(), errors, ctx.format)?;
    } else if !ui::is_quiet() {
        print_account(report);
    }

    if failed > 0 {
        return Err(HostprepError::Incomplete {
            failed,
            total: report.steps.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FailureReason, Outcome};

    #[test]
    fn test_numbered_lines_follow_input_order() {
        let mut report = BatchReport::new("install");
        report.record(Outcome::success("htop"));
        report.record(Outcome::failure("ghost", FailureReason::NotFound));
        report.record(Outcome::success("curl"));
        report.record(Outcome::failure("vim", FailureReason::AlreadyInstalled));

        let (succeeded, failed) = batch_lines(&report);
        assert_eq!(succeeded, vec!["1. htop", "2. curl"]);
        assert_eq!(
            failed,
            vec![
                "1. ghost: Package not found",
                "2. vim: Package already installed"
            ]
        );
    }
}
