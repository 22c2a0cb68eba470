//! Mock toolchain for testing.
//!
//! `MockToolchain` implements [`Toolchain`] without starting processes. It
//! keeps a small model of an interpreter, a virtual environment and its
//! installed packages, and records every call for later assertion.
//!
//! # Example
//!
//! ```
//! use launchkit::toolchain::{MockToolchain, ToolCall, Toolchain};
//! use std::path::Path;
//!
//! let tools = MockToolchain::new().with_installable("python-dotenv", "dotenv");
//! let env = Path::new("/tmp/.venv");
//!
//! assert!(!tools.can_import(env, "dotenv"));
//! assert!(tools.install_package(env, "python-dotenv").unwrap().success);
//! assert!(tools.can_import(env, "dotenv"));
//! assert!(tools.calls().contains(&ToolCall::InstallPackage("python-dotenv".to_string())));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dependencies::parse_manifest;
use crate::error::{LaunchkitError, Result};
use crate::shell::CommandResult;

use super::Toolchain;

/// A recorded toolchain invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    InterpreterVersion(String),
    CreateEnvironment(PathBuf),
    EnvironmentVersion(PathBuf),
    ListInstalled,
    InstallManifest(PathBuf),
    InstallPackage(String),
    Import(String),
    Launch(PathBuf),
}

/// Mock toolchain implementation for testing.
///
/// Environment creation writes a real `pyvenv.cfg` marker into the target
/// directory so environment checks behave as they would on disk.
#[derive(Debug)]
pub struct MockToolchain {
    interpreters: RefCell<HashMap<String, String>>,
    create_succeeds: bool,
    environment_usable: bool,
    listing_fails: bool,
    bulk_install_succeeds: bool,
    installed: RefCell<Vec<String>>,
    importable: RefCell<HashSet<String>>,
    installable: HashMap<String, String>,
    exit_codes: RefCell<VecDeque<Option<i32>>>,
    calls: RefCell<Vec<ToolCall>>,
}

impl Default for MockToolchain {
    fn default() -> Self {
        Self::new()
    }
}

fn ok(stdout: &str) -> Result<CommandResult> {
    Ok(CommandResult::success(
        stdout.to_string(),
        String::new(),
        Duration::ZERO,
    ))
}

fn failed(code: Option<i32>, stderr: &str) -> Result<CommandResult> {
    Ok(CommandResult::failure(
        code,
        String::new(),
        stderr.to_string(),
        Duration::ZERO,
    ))
}

impl MockToolchain {
    /// A toolchain where everything succeeds and nothing is installed.
    pub fn new() -> Self {
        Self {
            interpreters: RefCell::new(HashMap::new()),
            create_succeeds: true,
            environment_usable: true,
            listing_fails: false,
            bulk_install_succeeds: true,
            installed: RefCell::new(Vec::new()),
            importable: RefCell::new(HashSet::new()),
            installable: HashMap::new(),
            exit_codes: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make `command --version` print `Python <version>`.
    pub fn with_interpreter(self, command: &str, version: &str) -> Self {
        self.add_interpreter(command, version);
        self
    }

    /// Install an interpreter after construction (used by acquisition mocks).
    pub fn add_interpreter(&self, command: &str, version: &str) {
        self.interpreters
            .borrow_mut()
            .insert(command.to_string(), format!("Python {}", version));
    }

    pub fn with_create_failure(mut self) -> Self {
        self.create_succeeds = false;
        self
    }

    pub fn with_unusable_environment(mut self) -> Self {
        self.environment_usable = false;
        self
    }

    pub fn with_listing_failure(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn with_bulk_install_failure(mut self) -> Self {
        self.bulk_install_succeeds = false;
        self
    }

    /// Add a `pip freeze` line to the installed set.
    pub fn with_installed(self, freeze_line: &str) -> Self {
        self.installed.borrow_mut().push(freeze_line.to_string());
        self
    }

    /// Make a module importable from the start.
    pub fn with_importable(self, module: &str) -> Self {
        self.importable.borrow_mut().insert(module.to_string());
        self
    }

    /// Installing `package` succeeds and makes `module` importable.
    pub fn with_installable(mut self, package: &str, module: &str) -> Self {
        self.installable
            .insert(package.to_string(), module.to_string());
        self
    }

    /// Exit codes returned by successive launches. Defaults to 0 once
    /// exhausted.
    pub fn with_exit_codes(self, codes: &[Option<i32>]) -> Self {
        self.exit_codes.borrow_mut().extend(codes.iter().copied());
        self
    }

    /// All recorded calls in order.
    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls matching a predicate.
    pub fn count(&self, predicate: impl Fn(&ToolCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    pub fn create_calls(&self) -> usize {
        self.count(|c| matches!(c, ToolCall::CreateEnvironment(_)))
    }

    pub fn bulk_install_calls(&self) -> usize {
        self.count(|c| matches!(c, ToolCall::InstallManifest(_)))
    }

    pub fn launch_calls(&self) -> usize {
        self.count(|c| matches!(c, ToolCall::Launch(_)))
    }

    /// Packages passed to single installs, in order.
    pub fn installed_packages(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ToolCall::InstallPackage(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ToolCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Toolchain for MockToolchain {
    fn interpreter_version(&self, command: &str) -> Result<CommandResult> {
        self.record(ToolCall::InterpreterVersion(command.to_string()));
        match self.interpreters.borrow().get(command) {
            Some(output) => ok(output),
            None => Err(LaunchkitError::CommandFailed {
                command: format!("{} --version", command),
                code: None,
            }),
        }
    }

    fn create_environment(&self, _interpreter: &str, env_dir: &Path) -> Result<CommandResult> {
        self.record(ToolCall::CreateEnvironment(env_dir.to_path_buf()));
        if !self.create_succeeds {
            return failed(Some(1), "Error: ensurepip is not available");
        }
        fs::create_dir_all(env_dir)?;
        fs::write(env_dir.join("pyvenv.cfg"), "home = /usr/bin\n")?;
        ok("")
    }

    fn environment_version(&self, env_dir: &Path) -> Result<CommandResult> {
        self.record(ToolCall::EnvironmentVersion(env_dir.to_path_buf()));
        if self.environment_usable {
            ok("Python 3.12.4")
        } else {
            failed(Some(127), "No such file or directory")
        }
    }

    fn list_installed(&self, _env_dir: &Path) -> Result<CommandResult> {
        self.record(ToolCall::ListInstalled);
        if self.listing_fails {
            return failed(Some(1), "No module named pip");
        }
        ok(&self.installed.borrow().join("\n"))
    }

    fn install_manifest(&self, _env_dir: &Path, manifest: &Path) -> Result<CommandResult> {
        self.record(ToolCall::InstallManifest(manifest.to_path_buf()));
        if !self.bulk_install_succeeds {
            return failed(Some(1), "ERROR: No matching distribution found");
        }
        let content = fs::read_to_string(manifest)?;
        let mut installed = self.installed.borrow_mut();
        for spec in parse_manifest(&content) {
            installed.push(format!("{}==0.0.0", spec.name));
        }
        ok("")
    }

    fn install_package(&self, _env_dir: &Path, package: &str) -> Result<CommandResult> {
        self.record(ToolCall::InstallPackage(package.to_string()));
        match self.installable.get(package) {
            Some(module) => {
                self.importable.borrow_mut().insert(module.clone());
                self.installed
                    .borrow_mut()
                    .push(format!("{}==0.0.0", package));
                ok("")
            }
            None => failed(Some(1), "ERROR: No matching distribution found"),
        }
    }

    fn can_import(&self, _env_dir: &Path, module: &str) -> bool {
        self.record(ToolCall::Import(module.to_string()));
        self.importable.borrow().contains(module)
    }

    fn launch(&self, _env_dir: &Path, entry_point: &Path, _cwd: &Path) -> Result<CommandResult> {
        self.record(ToolCall::Launch(entry_point.to_path_buf()));
        match self.exit_codes.borrow_mut().pop_front().unwrap_or(Some(0)) {
            Some(0) => ok(""),
            code => failed(code, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unknown_interpreter_is_an_error() {
        let tools = MockToolchain::new();
        assert!(tools.interpreter_version("python3").is_err());
    }

    #[test]
    fn added_interpreter_reports_version() {
        let tools = MockToolchain::new();
        tools.add_interpreter("python3", "3.12.1");
        let result = tools.interpreter_version("python3").unwrap();
        assert_eq!(result.stdout, "Python 3.12.1");
    }

    #[test]
    fn create_environment_writes_marker() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".venv");
        let tools = MockToolchain::new();
        assert!(tools.create_environment("python3", &env).unwrap().success);
        assert!(env.join("pyvenv.cfg").exists());
        assert_eq!(tools.create_calls(), 1);
    }

    #[test]
    fn bulk_install_adds_manifest_entries() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("requirements.txt");
        fs::write(&manifest, "requests>=2\n# comment\nflask\n").unwrap();
        let tools = MockToolchain::new();

        tools.install_manifest(temp.path(), &manifest).unwrap();
        let listing = tools.list_installed(temp.path()).unwrap();
        assert!(listing.stdout.contains("requests==0.0.0"));
        assert!(listing.stdout.contains("flask==0.0.0"));
    }

    #[test]
    fn launch_pops_exit_codes() {
        let tools = MockToolchain::new().with_exit_codes(&[Some(137), None]);
        let entry = Path::new("main.py");
        assert_eq!(
            tools.launch(entry, entry, entry).unwrap().exit_code,
            Some(137)
        );
        assert_eq!(tools.launch(entry, entry, entry).unwrap().exit_code, None);
        assert_eq!(tools.launch(entry, entry, entry).unwrap().exit_code, Some(0));
        assert_eq!(tools.launch_calls(), 3);
    }
}
