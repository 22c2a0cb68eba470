//! The bootstrap pass.
//!
//! Stages run strictly in order and each one either continues or stops the
//! pass:
//!
//! 1. Interpreter probe and compatibility gate
//! 2. Environment provisioning
//! 3. Dependency reconciliation
//! 4. Critical module verification
//! 5. Supervised launch
//!
//! Fatal errors are written to the run log as `ERROR` lines before they are
//! returned. Declining either prompt ends the pass as [`BootstrapOutcome::UserAborted`].

use crate::config::LaunchConfig;
use crate::dependencies::{capture_snapshot, DependencyReconciler, ReconcileOutcome};
use crate::environment::EnvironmentManager;
use crate::error::Result;
use crate::interpreter::{
    DetectedInterpreter, InterpreterAcquirer, PolicyAction, ProbeOutcome, VersionProbe,
};
use crate::launch::{LaunchSupervisor, SupervisionReport};
use crate::state::RunLog;
use crate::toolchain::Toolchain;
use crate::ui::UserInterface;
use crate::verify::ModuleVerifier;

/// How a bootstrap pass ended without a fatal error.
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// The application ran and the operator chose not to restart it.
    Completed(SupervisionReport),
    /// The operator declined to continue past the compatibility warning.
    UserAborted,
}

/// Runs every stage against one configuration.
pub struct BootstrapPipeline<'a> {
    config: &'a LaunchConfig,
    toolchain: &'a dyn Toolchain,
    acquirer: &'a dyn InterpreterAcquirer,
    log: RunLog,
    once: bool,
}

impl<'a> BootstrapPipeline<'a> {
    /// Opens the run log named in the config.
    pub fn new(
        config: &'a LaunchConfig,
        toolchain: &'a dyn Toolchain,
        acquirer: &'a dyn InterpreterAcquirer,
    ) -> Result<Self> {
        Ok(Self {
            config,
            toolchain,
            acquirer,
            log: RunLog::open(config.log_path())?,
            once: false,
        })
    }

    /// Terminate after one application run.
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Run the whole pass.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<BootstrapOutcome> {
        match self.run_stages(ui) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if let Err(log_err) = self.log.error(&e.to_string()) {
                    tracing::warn!("Could not write to run log: {}", log_err);
                }
                Err(e)
            }
        }
    }

    fn run_stages(&self, ui: &mut dyn UserInterface) -> Result<BootstrapOutcome> {
        ui.show_header(&self.config.app_name);
        self.log.info("bootstrap started")?;

        let Some(interpreter) = self.check_interpreter(ui)? else {
            return Ok(BootstrapOutcome::UserAborted);
        };
        let env_dir = self.config.environment_path();

        self.prepare_environment(&interpreter, ui)?;
        self.reconcile_dependencies(ui)?;
        self.verify_modules(ui)?;

        let report = LaunchSupervisor::new(
            self.toolchain,
            &env_dir,
            &self.config.project_root,
            &self.log,
        )
        .once(self.once)
        .run(&self.config.entry_point_path(), ui)?;

        self.log
            .info(&format!("session ended after {} run(s)", report.runs()))?;
        Ok(BootstrapOutcome::Completed(report))
    }

    /// `None` when the operator declined to continue.
    fn check_interpreter(
        &self,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<DetectedInterpreter>> {
        let probe = VersionProbe::new(
            self.toolchain,
            &self.config.interpreter.commands,
            &self.config.compatibility,
        );

        match probe.run(self.acquirer, ui)? {
            ProbeOutcome::Declined { interpreter, .. } => {
                self.log.info(&format!(
                    "compatibility prompt declined for Python {}",
                    interpreter.info
                ))?;
                ui.message("Aborted.");
                Ok(None)
            }
            ProbeOutcome::Accepted {
                interpreter,
                decision,
            } => {
                if decision.action == PolicyAction::WarnAndConfirm {
                    self.log.warn(&format!(
                        "compatibility warning overridden for Python {}{}",
                        interpreter.info,
                        decision
                            .reason
                            .as_deref()
                            .map(|r| format!(": {}", r))
                            .unwrap_or_default()
                    ))?;
                }
                self.log.info(&format!(
                    "using Python {} ({})",
                    interpreter.info, interpreter.command
                ))?;
                ui.success(&format!(
                    "Python {} ({})",
                    interpreter.info, interpreter.command
                ));
                Ok(Some(interpreter))
            }
        }
    }

    fn prepare_environment(
        &self,
        interpreter: &DetectedInterpreter,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let env_dir = self.config.environment_path();
        let mut spinner = ui.start_spinner("Preparing virtual environment");

        let ready = match EnvironmentManager::new(self.toolchain, &interpreter.command)
            .ensure(&env_dir)
        {
            Ok(ready) => ready,
            Err(e) => {
                spinner.finish_error("Virtual environment unavailable");
                return Err(e);
            }
        };

        let verb = if ready.created { "created" } else { "reused" };
        spinner.finish_success(&format!(
            "Virtual environment {} at {}",
            verb,
            env_dir.display()
        ));
        self.log
            .info(&format!("environment {} at {}", verb, env_dir.display()))
    }

    fn reconcile_dependencies(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let env_dir = self.config.environment_path();
        let manifest = self.config.manifest_path();

        let snapshot = capture_snapshot(self.toolchain, &env_dir);
        if let Some(warning) = &snapshot.warning {
            ui.warning(warning);
            self.log.warn(warning)?;
        }

        match DependencyReconciler::new(self.toolchain, &env_dir)
            .reconcile(&manifest, &snapshot.packages)?
        {
            ReconcileOutcome::Satisfied { declared } => {
                ui.success(&format!("All {} declared dependencies present", declared));
                self.log.info("dependencies satisfied")
            }
            ReconcileOutcome::Installed { missing } => {
                ui.success(&format!("Installed dependencies from {}", manifest.display()));
                self.log.info(&format!(
                    "dependencies installed (missing: {})",
                    missing.join(", ")
                ))
            }
        }
    }

    fn verify_modules(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let env_dir = self.config.environment_path();
        let report =
            ModuleVerifier::new(self.toolchain, &env_dir).verify(&self.config.critical_modules);

        for entry in report.repaired() {
            self.log.info(&format!(
                "repaired module {} by installing {}",
                entry.import_name, entry.install_alias
            ))?;
        }

        match report.warning() {
            Some(warning) => {
                ui.warning(&warning);
                self.log.warn(&warning)
            }
            None => {
                ui.success(&format!(
                    "{} critical modules importable",
                    report.entries.len()
                ));
                Ok(())
            }
        }
    }
}
