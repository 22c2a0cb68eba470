//! Persistent launcher state.
//!
//! The launcher keeps no structured state between passes; the only thing it
//! persists is the append-only [`RunLog`].

pub mod run_log;

pub use run_log::{format_line, LogLevel, RunLog};
