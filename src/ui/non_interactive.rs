//! Non-interactive UI for CI/headless environments.
//!
//! Questions are answered from `LAUNCHKIT_PROMPT_<KEY>` environment variables
//! (`LAUNCHKIT_PROMPT_RESTART=yes`), falling back to each prompt's default.

use std::collections::HashMap;

use crate::error::{LaunchkitError, Result};

use super::{parse_answer, OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "LAUNCHKIT_PROMPT_";

/// UI implementation for non-interactive mode.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI, reading overrides from the environment.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    /// Environment variable that answers `key`.
    pub fn env_key(key: &str) -> String {
        format!("{}{}", PROMPT_ENV_PREFIX, key.to_uppercase())
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn ask(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = Self::env_key(&prompt.key);
        let answer = match self.env_overrides.get(&env_key) {
            Some(value) => parse_answer(value).ok_or_else(|| {
                LaunchkitError::ConfigValidationError {
                    message: format!("{}={} is not a yes/no answer", env_key, value),
                }
            })?,
            None => prompt.default,
        };

        if self.mode.shows_messages() {
            println!(
                "{} {}",
                prompt.question,
                if answer { "yes" } else { "no" }
            );
        }
        Ok(answer)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints only the final status line.
struct LineSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("  ✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }
}
