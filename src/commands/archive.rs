use super::CommandContext;
use super::summary::{self, ARCHIVES};
use crate::error::Result;
use crate::packages::archives::{discover_archives, select_archives};
use crate::packages::engine::archive_name;
use crate::packages::{DependencyPolicy, PackageEngine};
use crate::traits::Prompter;
use crate::ui;
use crate::utils::{machine_output, preflight};
use std::path::PathBuf;

pub struct ArchiveOptions {
    pub paths: Vec<PathBuf>,
    pub select: Option<String>,
    pub no_resolve: bool,
    pub list: bool,
}

pub fn run(ctx: &CommandContext, options: ArchiveOptions) -> Result<()> {
    let prompter = ctx.prompter();
    let explicit = !options.paths.is_empty();

    let candidates = if explicit {
        options.paths.clone()
    } else {
        discover_archives(&ctx.settings.archive_dir)?
    };

    if candidates.is_empty() {
        ui::info(&format!(
            "No .deb files found in {}. Place archives there and run again.",
            ctx.settings.archive_dir.display()
        ));
        return Ok(());
    }

    if options.list {
        return list(ctx, &candidates);
    }

    let selected = match (&options.select, explicit) {
        (Some(selection), _) => select_archives(&candidates, selection)?,
        (None, false) if ctx.interactive() && !ctx.assume_yes => {
            list(ctx, &candidates)?;
            let answer =
                prompter.input("Archives to install (e.g. 1,3; leave empty for all)")?;
            if answer.trim().is_empty() {
                candidates
            } else {
                select_archives(&candidates, &answer)?
            }
        }
        _ => candidates,
    };

    let policy = if options.no_resolve {
        DependencyPolicy::Never
    } else if ctx.assume_yes {
        DependencyPolicy::AssumeYes
    } else {
        DependencyPolicy::Ask
    };

    preflight::check_distribution();
    preflight::require_tools(preflight::PACKAGE_TOOLS, ctx.settings.privilege)?;

    ui::header(&format!("Installing {} archive(s)", selected.len()));
    let runner = ctx.runner();
    let report = PackageEngine::new(&runner).install_archives(
        &selected,
        policy,
        &prompter,
    );
    summary::finish_batch(ctx, "packages archive", &report, &ARCHIVES)
}

fn list(ctx: &CommandContext, archives: &[PathBuf]) -> Result<()> {
    let names: Vec<String> = archives.iter().map(|p| archive_name(p)).collect();

    if ctx.format.is_machine() {
        return machine_output::emit_v1("packages archive", &names, vec![], vec![], ctx.format);
    }

    ui::header("Available archives");
    for (i, name) in names.iter().enumerate() {
        ui::indent(&format!("{}. {}", i + 1, name), 1);
    }
    Ok(())
}
