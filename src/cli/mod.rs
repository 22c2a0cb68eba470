//! Command-line interface for launchkit.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, HistoryArgs, RunArgs, StatusArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
