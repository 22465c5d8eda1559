//! Implementations of the `Confirm` port.

use anyhow::Result;

use crate::application::ports::Confirm;

/// Asks on the terminal with `dialoguer`. Defaults to "no".
pub struct DialoguerConfirm;

impl Confirm for DialoguerConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}

/// Answers "yes" without asking (`--yes`).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        tracing::debug!(prompt, "confirmation skipped (--yes)");
        Ok(true)
    }
}
