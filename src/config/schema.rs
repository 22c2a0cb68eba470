//! Configuration schema definitions for launchkit.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file. Every field has a default, so an absent or empty
//! file yields a working configuration for the bundled application.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::interpreter::CompatibilityPolicy;

/// Root configuration structure for `.launchkit/config.yml`.
///
/// Constructed once at startup and passed by reference to every stage;
/// nothing mutates it after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Application name (for display purposes)
    pub app_name: String,

    /// Interpreter discovery and acquisition
    pub interpreter: InterpreterConfig,

    /// Version ranges and what to do about them
    pub compatibility: CompatibilityPolicy,

    /// Isolated environment directory (relative to project root)
    pub environment_dir: PathBuf,

    /// Dependency manifest (relative to project root)
    pub manifest: PathBuf,

    /// Application entry point (relative to project root)
    pub entry_point: PathBuf,

    /// Append-only run log (relative to project root)
    pub log_file: PathBuf,

    /// Modules verified and repaired before every launch, in check order
    pub critical_modules: Vec<ModuleSpec>,

    /// Project root all relative paths resolve against. Set by the loader.
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            app_name: "TCG Pocket Team Rocket Tool".to_string(),
            interpreter: InterpreterConfig::default(),
            compatibility: CompatibilityPolicy::default(),
            environment_dir: PathBuf::from(".venv"),
            manifest: PathBuf::from("requirements.txt"),
            entry_point: PathBuf::from("main.py"),
            log_file: PathBuf::from("logs").join("launcher.log"),
            critical_modules: default_critical_modules(),
            project_root: PathBuf::new(),
        }
    }
}

impl LaunchConfig {
    /// Default configuration rooted at `project_root`.
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            ..Default::default()
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn environment_path(&self) -> PathBuf {
        self.resolve(&self.environment_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.manifest)
    }

    pub fn entry_point_path(&self) -> PathBuf {
        self.resolve(&self.entry_point)
    }

    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }
}

/// Interpreter discovery and acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Commands tried in order with `--version`
    pub commands: Vec<String>,

    /// Installer downloaded when no interpreter is found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_url: Option<String>,

    /// Expected SHA-256 of the installer, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_sha256: Option<String>,

    /// Arguments for an unattended install
    pub installer_args: Vec<String>,

    /// Download timeout in seconds
    pub download_timeout_secs: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        let commands = if cfg!(target_os = "windows") {
            vec!["python".to_string(), "py".to_string()]
        } else {
            vec!["python3".to_string(), "python".to_string()]
        };
        Self {
            commands,
            installer_url: None,
            installer_sha256: None,
            installer_args: vec![
                "/quiet".to_string(),
                "InstallAllUsers=0".to_string(),
                "PrependPath=1".to_string(),
                "Include_launcher=1".to_string(),
            ],
            download_timeout_secs: 300,
        }
    }
}

/// One critical module: what to import, and what to install when the import
/// fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Logical capability name shown to the operator
    pub capability: String,

    /// Module name passed to `import`
    #[serde(rename = "import")]
    pub import_name: String,

    /// Package name for pip; the import name is used when absent
    #[serde(
        rename = "install",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub install_alias: Option<String>,
}

impl ModuleSpec {
    pub fn new(capability: &str, import_name: &str, install_alias: Option<&str>) -> Self {
        Self {
            capability: capability.to_string(),
            import_name: import_name.to_string(),
            install_alias: install_alias.map(String::from),
        }
    }

    /// Package to install when the import fails.
    pub fn install_target(&self) -> &str {
        self.install_alias.as_deref().unwrap_or(&self.import_name)
    }
}

/// The modules the bundled application cannot start without.
///
/// The `audioop` shim comes first: on 3.13+ it is gone from the standard
/// library and `discord` fails to import until `audioop-lts` is present.
pub fn default_critical_modules() -> Vec<ModuleSpec> {
    vec![
        ModuleSpec::new("voice codec shim", "audioop", Some("audioop-lts")),
        ModuleSpec::new("environment files", "dotenv", Some("python-dotenv")),
        ModuleSpec::new("desktop UI", "PyQt5", Some("PyQt5")),
        ModuleSpec::new("image processing", "PIL", Some("Pillow")),
        ModuleSpec::new("card recognition", "cv2", Some("opencv-python")),
        ModuleSpec::new("numerics", "numpy", None),
        ModuleSpec::new("Discord client", "discord", Some("discord.py")),
        ModuleSpec::new("HTTP client", "aiohttp", None),
        ModuleSpec::new("HTML parsing", "bs4", Some("beautifulsoup4")),
        ModuleSpec::new("web server", "flask", Some("Flask")),
    ]
}
