//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! The launcher only ever asks yes/no questions, so [`Prompt`] is a
//! confirmation with a key, a question and a default answer.
//!
//! # Example
//!
//! ```
//! use launchkit::ui::{create_ui, OutputMode, Prompt};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Launcher");
//! let again = ui.ask(&Prompt::confirm("restart", "Run again?", false)).unwrap();
//! assert!(!again);
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::confirm;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, LaunchkitTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question and block until it is answered.
    fn ask(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A yes/no question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Unique key, used for `LAUNCHKIT_PROMPT_<KEY>` overrides and mocks.
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer used when the operator just presses enter, or when nobody can
    /// be asked.
    pub default: bool,
}

impl Prompt {
    pub fn confirm(key: &str, question: impl Into<String>, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            default,
        }
    }
}

/// Interpret a textual yes/no answer. `None` if it is neither.
pub fn parse_answer(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_builds_prompt() {
        let prompt = Prompt::confirm("restart", "Run again?", false);
        assert_eq!(prompt.key, "restart");
        assert_eq!(prompt.question, "Run again?");
        assert!(!prompt.default);
    }

    #[test]
    fn parse_answer_accepts_common_forms() {
        for yes in ["y", "Yes", "TRUE", "1", " yes "] {
            assert_eq!(parse_answer(yes), Some(true), "{}", yes);
        }
        for no in ["n", "No", "false", "0"] {
            assert_eq!(parse_answer(no), Some(false), "{}", no);
        }
    }

    #[test]
    fn parse_answer_rejects_other_text() {
        assert_eq!(parse_answer("maybe"), None);
        assert_eq!(parse_answer(""), None);
    }
}
