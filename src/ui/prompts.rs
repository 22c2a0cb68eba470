//! Interactive prompts.

use console::Term;
use dialoguer::Confirm;

use crate::error::{LaunchkitError, Result};

use super::Prompt;

fn map_dialoguer_err(e: dialoguer::Error) -> LaunchkitError {
    LaunchkitError::Io(e.into())
}

/// Ask a yes/no question on the terminal.
pub fn confirm(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::new()
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}
