//! launchkit - self-healing bootstrapper for Python applications.
//!
//! launchkit finds a compatible interpreter, provisions a virtual
//! environment, installs what the dependency manifest declares, repairs
//! critical modules that fail to import, and then supervises the
//! application with an optional restart after each exit.
//!
//! # Modules
//!
//! - [`bootstrap`] - The staged bootstrap pass and read-only status report
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, layering, and validation
//! - [`dependencies`] - Manifest parsing and dependency reconciliation
//! - [`environment`] - Virtual environment provisioning
//! - [`error`] - Error types and result aliases
//! - [`interpreter`] - Interpreter discovery, compatibility policy, acquisition
//! - [`launch`] - Application supervision and run outcomes
//! - [`shell`] - Process execution
//! - [`state`] - The append-only run log
//! - [`toolchain`] - The seam every external process goes through
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`verify`] - Critical module verification and repair
//!
//! # Example
//!
//! ```
//! use launchkit::dependencies::{parse_manifest, unsatisfied, InstalledPackageSet};
//!
//! let specs = parse_manifest("PyQt5==5.15.10\nrequests>=2\n# tools\n");
//! let installed = InstalledPackageSet::from_freeze("pyqt5==5.15.10\n");
//!
//! let missing: Vec<&str> = unsatisfied(&specs, &installed)
//!     .into_iter()
//!     .map(|s| s.name.as_str())
//!     .collect();
//! assert_eq!(missing, vec!["requests"]);
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod dependencies;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod launch;
pub mod shell;
pub mod state;
pub mod toolchain;
pub mod ui;
pub mod verify;

pub use error::{LaunchkitError, Result};
