//! Interpreter detection and the compatibility gate.

use crate::error::{LaunchkitError, Result};
use crate::toolchain::Toolchain;
use crate::ui::{Prompt, UserInterface};

use super::{CompatibilityPolicy, InterpreterAcquirer, InterpreterInfo, PolicyAction, PolicyDecision};

/// Prompt key for the compatibility question.
pub const COMPAT_PROMPT_KEY: &str = "python_compat";

/// An interpreter command that answered `--version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedInterpreter {
    pub command: String,
    pub info: InterpreterInfo,
}

/// How the compatibility gate resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Continue with this interpreter. `decision.action` is
    /// `WarnAndConfirm` when the operator overrode a warning.
    Accepted {
        interpreter: DetectedInterpreter,
        decision: PolicyDecision,
    },
    /// The operator declined to continue past a warning.
    Declined {
        interpreter: DetectedInterpreter,
        decision: PolicyDecision,
    },
}

/// Finds an interpreter and applies the compatibility policy.
pub struct VersionProbe<'a> {
    toolchain: &'a dyn Toolchain,
    commands: &'a [String],
    policy: &'a CompatibilityPolicy,
}

impl<'a> VersionProbe<'a> {
    pub fn new(
        toolchain: &'a dyn Toolchain,
        commands: &'a [String],
        policy: &'a CompatibilityPolicy,
    ) -> Self {
        Self {
            toolchain,
            commands,
            policy,
        }
    }

    /// Try each candidate command in order. `None` means not found.
    pub fn probe(&self) -> Option<DetectedInterpreter> {
        self.commands.iter().find_map(|command| {
            let result = match self.toolchain.interpreter_version(command) {
                Ok(result) if result.success => result,
                Ok(result) => {
                    tracing::debug!("{} --version exited with {:?}", command, result.exit_code);
                    return None;
                }
                Err(e) => {
                    tracing::debug!("{} not runnable: {}", command, e);
                    return None;
                }
            };
            // Older interpreters print the version on stderr.
            let info = InterpreterInfo::parse(&result.combined_output())?;
            tracing::debug!("Found Python {} via {}", info, command);
            Some(DetectedInterpreter {
                command: command.clone(),
                info,
            })
        })
    }

    /// Probe, and on a miss acquire once and probe again.
    ///
    /// # Errors
    ///
    /// `InterpreterUnavailable` if acquisition fails or the second probe
    /// also finds nothing.
    pub fn probe_or_acquire(
        &self,
        acquirer: &dyn InterpreterAcquirer,
        ui: &mut dyn UserInterface,
    ) -> Result<DetectedInterpreter> {
        if let Some(found) = self.probe() {
            return Ok(found);
        }

        ui.warning(&format!(
            "No Python interpreter found (tried {})",
            self.commands.join(", ")
        ));
        acquirer
            .acquire(ui)
            .map_err(|e| LaunchkitError::InterpreterUnavailable {
                message: format!("acquisition failed: {}", e),
            })?;

        self.probe()
            .ok_or_else(|| LaunchkitError::InterpreterUnavailable {
                message: format!(
                    "still not found after installation (tried {})",
                    self.commands.join(", ")
                ),
            })
    }

    /// Apply the policy to a detected interpreter. Asks at most once.
    ///
    /// # Errors
    ///
    /// `InterpreterBlocked` when a `block` rule matches.
    pub fn gate(
        &self,
        interpreter: DetectedInterpreter,
        ui: &mut dyn UserInterface,
    ) -> Result<ProbeOutcome> {
        let decision = self.policy.evaluate(&interpreter.info);
        match decision.action {
            PolicyAction::Allow => Ok(ProbeOutcome::Accepted {
                interpreter,
                decision,
            }),
            PolicyAction::Block => Err(LaunchkitError::InterpreterBlocked {
                version: interpreter.info.to_string(),
            }),
            PolicyAction::WarnAndConfirm => {
                let reason = decision
                    .reason
                    .clone()
                    .unwrap_or_else(|| "this version is not known to work".to_string());
                ui.warning(&format!("Python {}: {}", interpreter.info, reason));

                let prompt = Prompt::confirm(
                    COMPAT_PROMPT_KEY,
                    format!("Continue with Python {} anyway?", interpreter.info),
                    false,
                );
                if ui.ask(&prompt)? {
                    Ok(ProbeOutcome::Accepted {
                        interpreter,
                        decision,
                    })
                } else {
                    Ok(ProbeOutcome::Declined {
                        interpreter,
                        decision,
                    })
                }
            }
        }
    }

    /// Detect (acquiring if needed) and gate.
    pub fn run(
        &self,
        acquirer: &dyn InterpreterAcquirer,
        ui: &mut dyn UserInterface,
    ) -> Result<ProbeOutcome> {
        let interpreter = self.probe_or_acquire(acquirer, ui)?;
        self.gate(interpreter, ui)
    }
}
