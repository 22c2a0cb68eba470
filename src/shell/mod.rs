//! External command execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{
    display_command, execute, execute_check, execute_quiet, CommandOptions, CommandResult,
};
pub use platform::{is_ci, is_windows};
