//! Terminal implementation of [`Prompter`]

use crate::error::{HostprepError, Result};
use crate::traits::Prompter;
use crate::ui;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};

pub struct TerminalPrompter {
    theme: ColorfulTheme,
    assume_yes: bool,
}

impl TerminalPrompter {
    /// With `assume_yes`, consent questions are answered "yes" without asking
    pub fn new(assume_yes: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            assume_yes,
        }
    }
}

fn prompt_error(err: dialoguer::Error) -> HostprepError {
    if ui::is_interrupted() {
        HostprepError::Interrupted
    } else {
        HostprepError::Other(format!("Prompt failed: {}", err))
    }
}

fn check_interrupt() -> Result<()> {
    if ui::is_interrupted() {
        Err(HostprepError::Interrupted)
    } else {
        Ok(())
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        check_interrupt()?;
        if self.assume_yes {
            ui::info(&format!("{} yes (--yes)", question));
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn input(&self, prompt: &str) -> Result<String> {
        check_interrupt()?;
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()
            .map(|s| s.trim().to_string())
            .map_err(prompt_error)
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        check_interrupt()?;
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(prompt_error)
    }

    fn secret_with_confirmation(&self, prompt: &str) -> Result<(String, String)> {
        let first = self.secret(prompt)?;
        let second = self.secret("Confirm")?;
        Ok((first, second))
    }

    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize> {
        check_interrupt()?;
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(prompt_error)
    }
}
