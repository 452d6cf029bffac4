use super::CommandContext;
use crate::config::Settings;
use crate::error::{HostprepError, Result};
use crate::ui;
use crate::utils::{machine_output, paths};
use std::path::PathBuf;

fn settings_path(ctx: &CommandContext) -> Result<PathBuf> {
    match &ctx.config_override {
        Some(path) => paths::expand_home(path),
        None => paths::config_file(),
    }
}

pub fn show(ctx: &CommandContext) -> Result<()> {
    if ctx.format.is_machine() {
        return machine_output::emit_v1("config show", &ctx.settings, vec![], vec![], ctx.format);
    }
    print!("{}", ctx.settings.render_kdl());
    Ok(())
}

pub fn init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = settings_path(ctx)?;
    if path.exists() && !force {
        return Err(HostprepError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Settings::default().save_to(&path)?;
    ui::success(&format!("Wrote default settings to {}", path.display()));
    Ok(())
}

pub fn path(ctx: &CommandContext) -> Result<()> {
    println!("{}", settings_path(ctx)?.display());
    Ok(())
}
