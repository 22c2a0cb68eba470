//! Status command implementation.
//!
//! `launchkit status` reports what a run would find without changing
//! anything.

use std::path::{Path, PathBuf};

use crate::bootstrap::{inspect, StatusReport};
use crate::cli::args::StatusArgs;
use crate::config::load_config;
use crate::error::{LaunchkitError, Result};
use crate::interpreter::PolicyAction;
use crate::toolchain::{PythonToolchain, Toolchain};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: StatusArgs,
}

impl StatusCommand {
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    pub fn execute_with(
        &self,
        toolchain: &dyn Toolchain,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let report = inspect(&config, toolchain);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| LaunchkitError::Other(e.into()))?;
            println!("{}", json);
        } else {
            Self::render(&report, ui);
        }
        Ok(CommandResult::success())
    }

    fn render(report: &StatusReport, ui: &mut dyn UserInterface) {
        ui.show_header(&report.app_name);

        match &report.interpreter {
            Some(i) => {
                let line = format!("Python {} ({})", i.version, i.command);
                match i.policy {
                    PolicyAction::Allow => ui.success(&line),
                    PolicyAction::WarnAndConfirm => ui.warning(&format!(
                        "{}: {}",
                        line,
                        i.reason.as_deref().unwrap_or("needs confirmation")
                    )),
                    PolicyAction::Block => ui.error(&format!("{}: blocked", line)),
                }
            }
            None => ui.error("Python: not found"),
        }

        let env = &report.environment;
        if env.usable {
            ui.success(&format!("Environment: {}", env.path.display()));
        } else if env.provisioned {
            ui.error(&format!("Environment: {} (not usable)", env.path.display()));
        } else {
            ui.warning(&format!("Environment: {} (not created)", env.path.display()));
        }

        let manifest = &report.manifest;
        if !manifest.exists {
            ui.error(&format!("Manifest: {} (missing)", manifest.path.display()));
        } else if manifest.unsatisfied.is_empty() {
            ui.success(&format!(
                "Manifest: {} ({} declared)",
                manifest.path.display(),
                manifest.declared
            ));
        } else {
            ui.warning(&format!(
                "Manifest: {} not installed: {}",
                manifest.unsatisfied.len(),
                manifest.unsatisfied.join(", ")
            ));
        }

        for module in &report.modules {
            let line = format!("Module {} ({})", module.import_name, module.capability);
            if module.importable {
                ui.success(&line);
            } else {
                ui.warning(&format!("{}: not importable", line));
            }
        }

        if report.entry_point_exists {
            ui.success(&format!("Entry point: {}", report.entry_point.display()));
        } else {
            ui.error(&format!("Entry point: {} (missing)", report.entry_point.display()));
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(&PythonToolchain::new(), ui)
    }
}
