//! Real prompter implementation using `dialoguer`.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Select};

use super::Prompter;

/// Real prompter — delegates to `dialoguer` for interactive terminal prompts.
pub struct RealPrompter;

impl Prompter for RealPrompter {
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .context("prompt interaction failed")
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("prompt interaction failed")
    }
}
