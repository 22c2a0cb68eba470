//! Run command implementation.
//!
//! `launchkit run` performs a full bootstrap pass and supervises the
//! application until the operator declines a restart.

use std::path::{Path, PathBuf};

use crate::bootstrap::{BootstrapOutcome, BootstrapPipeline};
use crate::cli::args::RunArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::interpreter::{InstallerDownload, InterpreterAcquirer};
use crate::toolchain::{PythonToolchain, Toolchain};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Run against explicit collaborators. `acquirer` replaces the configured
    /// installer download when given.
    pub fn execute_with(
        &self,
        toolchain: &dyn Toolchain,
        acquirer: Option<&dyn InterpreterAcquirer>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let download = InstallerDownload::from_config(&config.interpreter);
        let acquirer = acquirer.unwrap_or(&download);

        let outcome = BootstrapPipeline::new(&config, toolchain, acquirer)?
            .once(self.args.once)
            .run(ui)?;

        match outcome {
            BootstrapOutcome::Completed(report) => {
                tracing::debug!("Supervision ended after {} run(s)", report.runs());
            }
            BootstrapOutcome::UserAborted => {
                tracing::debug!("Bootstrap aborted at the compatibility prompt");
            }
        }
        // Both endings are the operator's choice, not failures.
        Ok(CommandResult::success())
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(&PythonToolchain::new(), None, ui)
    }
}
