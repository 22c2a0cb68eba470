//! Configuration file discovery and loading.
//!
//! Merge order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Project config (`.launchkit/config.yml`)
//! 3. Local overrides (`.launchkit/config.local.yml`)
//!
//! An explicit `--config` path replaces discovery: only that file is read.

use crate::config::schema::LaunchConfig;
use crate::error::{LaunchkitError, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding launcher configuration inside a project.
pub const CONFIG_DIR: &str = ".launchkit";

/// Paths to configuration files in merge order.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .launchkit/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .launchkit/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Load a config file as a raw YAML value.
fn load_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LaunchkitError::ConfigParseError {
                path: path.to_path_buf(),
                message: "file does not exist".to_string(),
            }
        } else {
            LaunchkitError::Io(e)
        }
    })?;

    // An empty file parses as null; treat it as an empty mapping.
    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| LaunchkitError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(if value.is_null() {
        Value::Mapping(Default::default())
    } else {
        value
    })
}

/// Overlay `top` onto `base`. Mappings merge key by key; anything else is
/// replaced wholesale, so lists such as `critical_modules` never interleave.
fn overlay(base: Value, top: Value) -> Value {
    match (base, top) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(existing) => overlay(existing, value),
                    None => value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, replacement) => replacement,
    }
}

/// Load the launcher configuration for a project.
///
/// # Errors
///
/// Returns `ConfigParseError` if a config file is unreadable or invalid and
/// `ConfigValidationError` if the merged configuration is inconsistent.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<LaunchConfig> {
    let (sources, reported_path) = match config_override {
        Some(path) => (vec![path.to_path_buf()], path.to_path_buf()),
        None => {
            let paths = ConfigPaths::discover(project_root);
            let sources: Vec<PathBuf> = paths.all_existing().into_iter().cloned().collect();
            (sources, project_root.join(CONFIG_DIR).join("config.yml"))
        }
    };

    let mut merged = Value::Mapping(Default::default());
    for path in &sources {
        tracing::debug!("Loading config from {}", path.display());
        merged = overlay(merged, load_value(path)?);
    }

    let mut config: LaunchConfig =
        serde_yaml::from_value(merged).map_err(|e| LaunchkitError::ConfigParseError {
            path: reported_path,
            message: e.to_string(),
        })?;
    config.project_root = project_root.to_path_buf();

    validate(&config)?;
    Ok(config)
}

/// Reject configurations no bootstrap pass could succeed with.
pub fn validate(config: &LaunchConfig) -> Result<()> {
    let invalid = |message: String| Err(LaunchkitError::ConfigValidationError { message });

    if config.interpreter.commands.is_empty() {
        return invalid("interpreter.commands must list at least one command".to_string());
    }
    if let Err(message) = config.compatibility.validate() {
        return invalid(message);
    }
    for module in &config.critical_modules {
        if module.import_name.trim().is_empty() {
            return invalid(format!(
                "critical module '{}' has an empty import name",
                module.capability
            ));
        }
    }
    Ok(())
}
