//! The isolated dependency environment.
//!
//! A directory is provisioned when it contains [`ENVIRONMENT_MARKER`]; it is
//! usable when its own interpreter answers `--version`.

pub mod manager;

pub use manager::{is_provisioned, EnvironmentManager, EnvironmentReady, ENVIRONMENT_MARKER};
