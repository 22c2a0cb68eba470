//! Isolated environment provisioning.

use std::path::{Path, PathBuf};

use crate::error::{LaunchkitError, Result};
use crate::toolchain::Toolchain;

/// File whose presence marks a directory as a provisioned environment.
pub const ENVIRONMENT_MARKER: &str = "pyvenv.cfg";

/// Whether `env_dir` carries the environment marker.
pub fn is_provisioned(env_dir: &Path) -> bool {
    env_dir.join(ENVIRONMENT_MARKER).is_file()
}

/// A usable environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentReady {
    pub path: PathBuf,
    /// Whether this pass created it.
    pub created: bool,
    /// `--version` output of the environment's interpreter.
    pub interpreter_version: String,
}

/// Ensures the isolated environment exists and its interpreter runs.
pub struct EnvironmentManager<'a> {
    toolchain: &'a dyn Toolchain,
    base_interpreter: &'a str,
}

impl<'a> EnvironmentManager<'a> {
    /// `base_interpreter` is the probed command used to create environments.
    pub fn new(toolchain: &'a dyn Toolchain, base_interpreter: &'a str) -> Self {
        Self {
            toolchain,
            base_interpreter,
        }
    }

    /// Create the environment at `env_path` if it is not provisioned, then
    /// verify its interpreter. Idempotent: a provisioned environment is only
    /// verified.
    ///
    /// # Errors
    ///
    /// `EnvironmentCreationFailed` if creation fails; `EnvironmentUnusable`
    /// if the environment's interpreter does not run, even when the marker
    /// was already present.
    pub fn ensure(&self, env_path: &Path) -> Result<EnvironmentReady> {
        let created = if is_provisioned(env_path) {
            tracing::debug!("Environment already provisioned at {}", env_path.display());
            false
        } else {
            self.create(env_path)?;
            true
        };

        let version = self.verify(env_path)?;
        Ok(EnvironmentReady {
            path: env_path.to_path_buf(),
            created,
            interpreter_version: version,
        })
    }

    fn create(&self, env_path: &Path) -> Result<()> {
        tracing::info!(
            "Creating environment at {} with {}",
            env_path.display(),
            self.base_interpreter
        );
        let failure = |message: String| LaunchkitError::EnvironmentCreationFailed {
            path: env_path.to_path_buf(),
            message,
        };

        let result = self
            .toolchain
            .create_environment(self.base_interpreter, env_path)
            .map_err(|e| failure(e.to_string()))?;
        if !result.success {
            return Err(failure(format!(
                "exit code {:?}: {}",
                result.exit_code,
                result.combined_output()
            )));
        }
        Ok(())
    }

    fn verify(&self, env_path: &Path) -> Result<String> {
        let unusable = |message: String| LaunchkitError::EnvironmentUnusable {
            path: env_path.to_path_buf(),
            message,
        };

        let result = self
            .toolchain
            .environment_version(env_path)
            .map_err(|e| unusable(e.to_string()))?;
        if !result.success {
            return Err(unusable(format!(
                "interpreter exited with {:?}: {}",
                result.exit_code,
                result.combined_output()
            )));
        }
        Ok(result.combined_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::MockToolchain;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_environment() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".venv");
        let tools = MockToolchain::new();

        let ready = EnvironmentManager::new(&tools, "python3").ensure(&env).unwrap();

        assert!(ready.created);
        assert!(is_provisioned(&env));
        assert_eq!(tools.create_calls(), 1);
        assert_eq!(ready.interpreter_version, "Python 3.12.4");
    }

    #[test]
    fn second_ensure_does_not_recreate() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".venv");
        let tools = MockToolchain::new();
        let manager = EnvironmentManager::new(&tools, "python3");

        assert!(manager.ensure(&env).unwrap().created);
        assert!(!manager.ensure(&env).unwrap().created);
        assert_eq!(tools.create_calls(), 1);
    }

    #[test]
    fn existing_marker_skips_creation() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(ENVIRONMENT_MARKER), "home = /usr\n").unwrap();
        let tools = MockToolchain::new();

        let ready = EnvironmentManager::new(&tools, "python3")
            .ensure(temp.path())
            .unwrap();

        assert!(!ready.created);
        assert_eq!(tools.create_calls(), 0);
    }

    #[test]
    fn directory_without_marker_is_recreated() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".venv");
        fs::create_dir_all(env.join("lib")).unwrap();
        let tools = MockToolchain::new();

        EnvironmentManager::new(&tools, "python3").ensure(&env).unwrap();

        assert_eq!(tools.create_calls(), 1);
    }

    #[test]
    fn creation_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".venv");
        let tools = MockToolchain::new().with_create_failure();

        let err = EnvironmentManager::new(&tools, "python3")
            .ensure(&env)
            .unwrap_err();

        match err {
            LaunchkitError::EnvironmentCreationFailed { path, message } => {
                assert_eq!(path, env);
                assert!(message.contains("ensurepip"));
            }
            other => panic!("expected EnvironmentCreationFailed, got {:?}", other),
        }
    }

    #[test]
    fn unusable_interpreter_is_fatal_even_with_marker() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(ENVIRONMENT_MARKER), "").unwrap();
        let tools = MockToolchain::new().with_unusable_environment();

        let err = EnvironmentManager::new(&tools, "python3")
            .ensure(temp.path())
            .unwrap_err();

        assert!(matches!(err, LaunchkitError::EnvironmentUnusable { .. }));
        assert_eq!(tools.create_calls(), 0);
    }
}
