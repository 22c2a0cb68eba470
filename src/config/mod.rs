//! Launcher configuration.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, layering and validation in [`loader`]
//!
//! # Example
//!
//! ```
//! use launchkit::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".launchkit")).unwrap();
//! fs::write(temp.path().join(".launchkit/config.yml"), "entry_point: app.py").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.entry_point_path(), temp.path().join("app.py"));
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, validate, ConfigPaths, CONFIG_DIR};
pub use schema::{default_critical_modules, InterpreterConfig, LaunchConfig, ModuleSpec};
