use super::CommandContext;
use super::summary::{self, INSTALLED, REMOVED};
use crate::config::Category;
use crate::core::types::PackageRequest;
use crate::error::{HostprepError, Result};
use crate::packages::PackageEngine;
use crate::ui;
use crate::utils::{machine_output, preflight, sanitize};
use colored::Colorize;

pub fn install(ctx: &CommandContext, names: &[String]) -> Result<()> {
    sanitize::validate_package_names(names)?;
    preflight::check_distribution();
    preflight::require_tools(preflight::PACKAGE_TOOLS, ctx.settings.privilege)?;

    ui::header(&format!("Installing {} package(s)", names.len()));
    let runner = ctx.runner();
    let report = PackageEngine::new(&runner).install(&PackageRequest::from_names(names));
    summary::finish_batch(ctx, "packages install", &report, &INSTALLED)
}

pub fn remove(ctx: &CommandContext, names: &[String]) -> Result<()> {
    sanitize::validate_package_names(names)?;
    preflight::require_tools(preflight::PACKAGE_TOOLS, ctx.settings.privilege)?;

    ui::header(&format!("Removing {} package(s)", names.len()));
    let runner = ctx.runner();
    let report = PackageEngine::new(&runner).remove(&PackageRequest::from_names(names));
    summary::finish_batch(ctx, "packages remove", &report, &REMOVED)
}

pub fn category_list(ctx: &CommandContext) -> Result<()> {
    if ctx.format.is_machine() {
        return machine_output::emit_v1(
            "packages category list",
            &ctx.settings.categories,
            vec![],
            vec![],
            ctx.format,
        );
    }

    ui::header("Package categories");
    for (i, category) in ctx.settings.categories.iter().enumerate() {
        println!("{}. {}", i + 1, category.name.cyan().bold());
        ui::indent(&category.packages.join(", "), 1);
    }
    Ok(())
}

pub fn category_install(ctx: &CommandContext, name: &str) -> Result<()> {
    let category = find_category(ctx, name)?;
    ui::info(&format!("Category {}", category.name));
    install(ctx, &category.packages)
}

pub fn category_remove(ctx: &CommandContext, name: &str) -> Result<()> {
    let category = find_category(ctx, name)?;
    ui::info(&format!("Category {}", category.name));
    remove(ctx, &category.packages)
}

fn find_category<'c>(ctx: &'c CommandContext, name: &str) -> Result<&'c Category> {
    ctx.settings.category(name).ok_or_else(|| {
        let known: Vec<&str> = ctx
            .settings
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        HostprepError::InvalidInput(format!(
            "Unknown category '{}'. Known categories: {}",
            name,
            known.join(", ")
        ))
    })
}
