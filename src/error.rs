//! Error types for launchkit operations.
//!
//! This module defines [`LaunchkitError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is a fatal condition: the bootstrap pass stops and the
//!   process exits with status 1
//! - Warnings (declined repairs, abnormal exits) never become errors; they are
//!   reported through the UI and the run log instead
//! - Messages always name the precondition that failed

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for launchkit operations.
#[derive(Debug, Error)]
pub enum LaunchkitError {
    /// Failed to parse the launcher configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No usable interpreter was found, even after attempting acquisition.
    #[error("Python interpreter unavailable: {message}")]
    InterpreterUnavailable { message: String },

    /// The compatibility policy blocks the detected interpreter.
    #[error("Python {version} is not supported by this launcher")]
    InterpreterBlocked { version: String },

    /// Creating the isolated environment failed.
    #[error("Failed to create virtual environment at {path}: {message}")]
    EnvironmentCreationFailed { path: PathBuf, message: String },

    /// The environment exists but its interpreter does not run.
    #[error("Virtual environment at {path} is not usable: {message}")]
    EnvironmentUnusable { path: PathBuf, message: String },

    /// Dependency manifest is missing.
    #[error("Dependency manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Bulk install from the manifest exited non-zero.
    #[error("Dependency installation from {manifest} failed with exit code {code:?}")]
    BulkInstallFailed {
        manifest: PathBuf,
        code: Option<i32>,
    },

    /// Application entry point is missing.
    #[error("Application entry point not found: {path}")]
    EntryPointNotFound { path: PathBuf },

    /// An external command could not be spawned.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for launchkit operations.
pub type Result<T> = std::result::Result<T, LaunchkitError>;
