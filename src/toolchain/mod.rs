//! External tool invocations.
//!
//! Every process the bootstrap pass starts goes through the [`Toolchain`]
//! trait: interpreter probes, virtual environment creation, pip, import
//! checks and the application itself. [`PythonToolchain`] drives a real
//! interpreter; [`MockToolchain`] records calls for tests.
//!
//! All methods block until the child exits and return the structured
//! [`CommandResult`]; none of them interpret the status.

pub mod mock;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::shell::{execute, execute_quiet, CommandOptions, CommandResult};

pub use mock::{MockToolchain, ToolCall};

/// The external collaborators of a bootstrap pass.
pub trait Toolchain {
    /// Run `<command> --version`. `Err` when the command cannot be spawned.
    fn interpreter_version(&self, command: &str) -> Result<CommandResult>;

    /// Create a virtual environment at `env_dir` using `interpreter`.
    fn create_environment(&self, interpreter: &str, env_dir: &Path) -> Result<CommandResult>;

    /// Run the environment's own interpreter with `--version`.
    fn environment_version(&self, env_dir: &Path) -> Result<CommandResult>;

    /// List installed packages in `pip freeze` format.
    fn list_installed(&self, env_dir: &Path) -> Result<CommandResult>;

    /// Install every dependency declared in `manifest`.
    fn install_manifest(&self, env_dir: &Path, manifest: &Path) -> Result<CommandResult>;

    /// Install a single package.
    fn install_package(&self, env_dir: &Path, package: &str) -> Result<CommandResult>;

    /// Whether `import <module>` succeeds inside the environment.
    fn can_import(&self, env_dir: &Path, module: &str) -> bool;

    /// Run the application with inherited stdio until it exits.
    fn launch(&self, env_dir: &Path, entry_point: &Path, cwd: &Path) -> Result<CommandResult>;
}

/// Path of the interpreter inside a virtual environment.
pub fn environment_python(env_dir: &Path) -> PathBuf {
    if crate::shell::is_windows() {
        env_dir.join("Scripts").join("python.exe")
    } else {
        env_dir.join("bin").join("python")
    }
}

/// [`Toolchain`] backed by a Python interpreter and pip.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonToolchain;

impl PythonToolchain {
    pub fn new() -> Self {
        Self
    }

    fn pip<S: AsRef<OsStr>>(env_dir: &Path, args: &[S]) -> Result<CommandResult> {
        let mut full: Vec<OsString> = vec!["-m".into(), "pip".into()];
        full.extend(args.iter().map(|a| AsRef::<OsStr>::as_ref(a).to_os_string()));
        // pip output goes straight to the terminal so long installs show progress.
        execute(
            &environment_python(env_dir),
            &full,
            &CommandOptions::inherited(),
        )
    }
}

impl Toolchain for PythonToolchain {
    fn interpreter_version(&self, command: &str) -> Result<CommandResult> {
        execute_quiet(Path::new(command), &["--version"], None)
    }

    fn create_environment(&self, interpreter: &str, env_dir: &Path) -> Result<CommandResult> {
        execute_quiet(
            Path::new(interpreter),
            &[OsStr::new("-m"), OsStr::new("venv"), env_dir.as_os_str()],
            None,
        )
    }

    fn environment_version(&self, env_dir: &Path) -> Result<CommandResult> {
        execute_quiet(&environment_python(env_dir), &["--version"], None)
    }

    fn list_installed(&self, env_dir: &Path) -> Result<CommandResult> {
        execute_quiet(
            &environment_python(env_dir),
            &["-m", "pip", "freeze", "--all"],
            None,
        )
    }

    fn install_manifest(&self, env_dir: &Path, manifest: &Path) -> Result<CommandResult> {
        Self::pip(
            env_dir,
            &[OsStr::new("install"), OsStr::new("-r"), manifest.as_os_str()],
        )
    }

    fn install_package(&self, env_dir: &Path, package: &str) -> Result<CommandResult> {
        Self::pip(env_dir, &["install", package])
    }

    fn can_import(&self, env_dir: &Path, module: &str) -> bool {
        let statement = format!("import {}", module);
        execute_quiet(&environment_python(env_dir), &["-c", statement.as_str()], None)
            .map(|r| r.success)
            .unwrap_or(false)
    }

    fn launch(&self, env_dir: &Path, entry_point: &Path, cwd: &Path) -> Result<CommandResult> {
        let options = CommandOptions {
            cwd: Some(cwd.to_path_buf()),
            ..CommandOptions::inherited()
        };
        execute(&environment_python(env_dir), &[entry_point], &options)
    }
}
