//! Read-only inspection of a project's launch readiness.
//!
//! Runs the same probes as a bootstrap pass but never creates, installs or
//! launches anything.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::LaunchConfig;
use crate::dependencies::{capture_snapshot, load_manifest, unsatisfied};
use crate::environment::is_provisioned;
use crate::error::LaunchkitError;
use crate::interpreter::{PolicyAction, VersionProbe};
use crate::toolchain::Toolchain;
use crate::verify::{ModuleStatus, ModuleVerifier};

#[derive(Debug, Clone, Serialize)]
pub struct InterpreterStatus {
    pub command: String,
    pub version: String,
    pub policy: PolicyAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentStatus {
    pub path: PathBuf,
    pub provisioned: bool,
    pub usable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub declared: usize,
    /// Declared names with no installed match. Empty when the environment
    /// is not provisioned.
    pub unsatisfied: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleStatusLine {
    pub capability: String,
    pub import_name: String,
    pub importable: bool,
}

/// Everything `launchkit status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub app_name: String,
    pub interpreter: Option<InterpreterStatus>,
    pub environment: EnvironmentStatus,
    pub manifest: ManifestStatus,
    pub modules: Vec<ModuleStatusLine>,
    pub entry_point: PathBuf,
    pub entry_point_exists: bool,
}

impl StatusReport {
    /// Whether a `run` would get as far as launching without installing.
    pub fn is_ready(&self) -> bool {
        self.interpreter
            .as_ref()
            .is_some_and(|i| i.policy != PolicyAction::Block)
            && self.environment.usable
            && self.manifest.exists
            && self.manifest.unsatisfied.is_empty()
            && self.modules.iter().all(|m| m.importable)
            && self.entry_point_exists
    }
}

/// Inspect `config`'s project through `toolchain`.
pub fn inspect(config: &LaunchConfig, toolchain: &dyn Toolchain) -> StatusReport {
    let probe = VersionProbe::new(
        toolchain,
        &config.interpreter.commands,
        &config.compatibility,
    );
    let interpreter = probe.probe().map(|found| {
        let decision = config.compatibility.evaluate(&found.info);
        InterpreterStatus {
            command: found.command,
            version: found.info.to_string(),
            policy: decision.action,
            reason: decision.reason,
        }
    });

    let env_dir = config.environment_path();
    let provisioned = is_provisioned(&env_dir);
    let usable = provisioned
        && toolchain
            .environment_version(&env_dir)
            .map(|r| r.success)
            .unwrap_or(false);

    let manifest_path = config.manifest_path();
    let (exists, specs) = match load_manifest(&manifest_path) {
        Ok(specs) => (true, specs),
        Err(LaunchkitError::ManifestNotFound { .. }) => (false, Vec::new()),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", manifest_path.display(), e);
            (true, Vec::new())
        }
    };
    let missing = if usable {
        let snapshot = capture_snapshot(toolchain, &env_dir).packages;
        unsatisfied(&specs, &snapshot)
            .into_iter()
            .map(|s| s.name.clone())
            .collect()
    } else {
        Vec::new()
    };

    let modules = if usable {
        ModuleVerifier::new(toolchain, &env_dir)
            .inspect(&config.critical_modules)
            .entries
            .into_iter()
            .map(|e| ModuleStatusLine {
                importable: e.status == ModuleStatus::Ok,
                capability: e.capability,
                import_name: e.import_name,
            })
            .collect()
    } else {
        config
            .critical_modules
            .iter()
            .map(|m| ModuleStatusLine {
                capability: m.capability.clone(),
                import_name: m.import_name.clone(),
                importable: false,
            })
            .collect()
    };

    let entry_point = config.entry_point_path();
    StatusReport {
        app_name: config.app_name.clone(),
        interpreter,
        environment: EnvironmentStatus {
            path: env_dir,
            provisioned,
            usable,
        },
        manifest: ManifestStatus {
            path: manifest_path,
            exists,
            declared: specs.len(),
            unsatisfied: missing,
        },
        modules,
        entry_point_exists: entry_point.is_file(),
        entry_point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleSpec;
    use crate::toolchain::{MockToolchain, ToolCall};
    use std::fs;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> LaunchConfig {
        let mut config = LaunchConfig::for_project(temp.path());
        config.critical_modules = vec![ModuleSpec::new("web", "flask", Some("Flask"))];
        config
    }

    #[test]
    fn empty_project_reports_nothing_ready() {
        let temp = TempDir::new().unwrap();
        let tools = MockToolchain::new();

        let report = inspect(&config(&temp), &tools);

        assert!(report.interpreter.is_none());
        assert!(!report.environment.provisioned);
        assert!(!report.manifest.exists);
        assert!(!report.modules[0].importable);
        assert!(!report.is_ready());
    }

    #[test]
    fn provisioned_project_lists_unsatisfied() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);
        fs::write(temp.path().join("requirements.txt"), "Flask\naiohttp\n").unwrap();
        fs::write(temp.path().join("main.py"), "").unwrap();
        fs::create_dir_all(cfg.environment_path()).unwrap();
        fs::write(cfg.environment_path().join("pyvenv.cfg"), "").unwrap();
        let tools = MockToolchain::new()
            .with_interpreter("python3", "3.13.2")
            .with_installed("flask==3.0.0")
            .with_importable("flask");

        let report = inspect(&cfg, &tools);

        let interpreter = report.interpreter.as_ref().unwrap();
        assert_eq!(interpreter.version, "3.13.2");
        assert_eq!(interpreter.policy, PolicyAction::WarnAndConfirm);
        assert!(report.environment.usable);
        assert_eq!(report.manifest.declared, 2);
        assert_eq!(report.manifest.unsatisfied, vec!["aiohttp"]);
        assert!(report.modules[0].importable);
        assert!(!report.is_ready());
    }

    #[test]
    fn inspection_never_mutates() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);
        fs::write(temp.path().join("requirements.txt"), "flask\n").unwrap();
        fs::create_dir_all(cfg.environment_path()).unwrap();
        fs::write(cfg.environment_path().join("pyvenv.cfg"), "").unwrap();
        let tools = MockToolchain::new()
            .with_interpreter("python3", "3.12.1")
            .with_installable("Flask", "flask");

        inspect(&cfg, &tools);

        assert_eq!(tools.create_calls(), 0);
        assert_eq!(tools.bulk_install_calls(), 0);
        assert_eq!(tools.launch_calls(), 0);
        assert_eq!(tools.count(|c| matches!(c, ToolCall::InstallPackage(_))), 0);
    }

    #[test]
    fn serializes_to_json() {
        let temp = TempDir::new().unwrap();
        let tools = MockToolchain::new().with_interpreter("python3", "3.12.1");

        let report = inspect(&config(&temp), &tools);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["interpreter"]["version"], "3.12.1");
        assert_eq!(json["interpreter"]["policy"], "allow");
        assert_eq!(json["environment"]["provisioned"], false);
    }
}
