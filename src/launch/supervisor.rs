//! Supervised launch loop.
//!
//! ```text
//! Idle -> Running -> Completed -> AwaitingDecision -> Running
//!                                                  -> Terminated
//! ```
//!
//! There is no cap on restarts; the loop ends only when the operator
//! declines (or `once` is set).

use chrono::Utc;
use std::path::Path;

use crate::error::{LaunchkitError, Result};
use crate::state::RunLog;
use crate::toolchain::Toolchain;
use crate::ui::{Prompt, UserInterface};

use super::RunOutcome;

/// Prompt key for the restart question.
pub const RESTART_PROMPT_KEY: &str = "restart";

/// Supervisor states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Running,
    Completed(RunOutcome),
    AwaitingDecision,
    Terminated,
}

impl SupervisorState {
    /// State name without payload, for traces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed(_) => "completed",
            Self::AwaitingDecision => "awaiting_decision",
            Self::Terminated => "terminated",
        }
    }
}

/// Everything a supervision session did.
#[derive(Debug, Clone, Default)]
pub struct SupervisionReport {
    /// Outcomes in run order.
    pub outcomes: Vec<RunOutcome>,
    /// Names of the states visited, in order.
    pub trace: Vec<&'static str>,
}

impl SupervisionReport {
    pub fn runs(&self) -> usize {
        self.outcomes.len()
    }
}

/// Runs the application and offers restarts.
pub struct LaunchSupervisor<'a> {
    toolchain: &'a dyn Toolchain,
    env_dir: &'a Path,
    working_dir: &'a Path,
    log: &'a RunLog,
    once: bool,
}

impl<'a> LaunchSupervisor<'a> {
    pub fn new(
        toolchain: &'a dyn Toolchain,
        env_dir: &'a Path,
        working_dir: &'a Path,
        log: &'a RunLog,
    ) -> Self {
        Self {
            toolchain,
            env_dir,
            working_dir,
            log,
            once: false,
        }
    }

    /// Stop after the first run instead of asking to restart.
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Run `entry_point` until the operator declines a restart.
    ///
    /// # Errors
    ///
    /// `EntryPointNotFound` if the entry point is missing, or the error from
    /// spawning the interpreter or writing the log.
    pub fn run(
        &self,
        entry_point: &Path,
        ui: &mut dyn UserInterface,
    ) -> Result<SupervisionReport> {
        if !entry_point.is_file() {
            return Err(LaunchkitError::EntryPointNotFound {
                path: entry_point.to_path_buf(),
            });
        }

        let mut report = SupervisionReport::default();
        let mut state = SupervisorState::Idle;

        loop {
            report.trace.push(state.name());
            tracing::debug!("Supervisor state: {}", state.name());

            state = match state {
                SupervisorState::Idle => SupervisorState::Running,
                SupervisorState::Running => {
                    let outcome = self.run_once(entry_point, ui)?;
                    SupervisorState::Completed(outcome)
                }
                SupervisorState::Completed(outcome) => {
                    self.record(&outcome, ui)?;
                    report.outcomes.push(outcome);
                    if self.once {
                        SupervisorState::Terminated
                    } else {
                        SupervisorState::AwaitingDecision
                    }
                }
                SupervisorState::AwaitingDecision => {
                    let prompt = Prompt::confirm(
                        RESTART_PROMPT_KEY,
                        "Restart the application?",
                        false,
                    );
                    if ui.ask(&prompt)? {
                        self.log.info("restart requested")?;
                        SupervisorState::Running
                    } else {
                        SupervisorState::Terminated
                    }
                }
                SupervisorState::Terminated => break,
            };
        }

        Ok(report)
    }

    fn run_once(&self, entry_point: &Path, ui: &mut dyn UserInterface) -> Result<RunOutcome> {
        ui.message(&format!("Starting {}", entry_point.display()));
        self.log
            .info(&format!("launch started: {}", entry_point.display()))?;

        let started_at = Utc::now();
        let result = self
            .toolchain
            .launch(self.env_dir, entry_point, self.working_dir)?;
        Ok(RunOutcome::new(result.exit_code, started_at, Utc::now()))
    }

    fn record(&self, outcome: &RunOutcome, ui: &mut dyn UserInterface) -> Result<()> {
        self.log.record_outcome(outcome)?;
        if outcome.is_normal() {
            ui.success("Application exited normally");
        } else {
            ui.warning(&format!(
                "Application exited abnormally (exit {})",
                outcome.exit_label()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::MockToolchain;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        log: RunLog,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join("main.py"), "print('hi')\n").unwrap();
            let log = RunLog::open(temp.path().join("logs/launcher.log")).unwrap();
            Self { temp, log }
        }

        fn entry(&self) -> std::path::PathBuf {
            self.temp.path().join("main.py")
        }

        fn supervisor<'a>(&'a self, tools: &'a MockToolchain) -> LaunchSupervisor<'a> {
            LaunchSupervisor::new(tools, self.temp.path(), self.temp.path(), &self.log)
        }
    }

    #[test]
    fn normal_exit_reaches_decision_and_terminates_on_no() {
        let fx = Fixture::new();
        let tools = MockToolchain::new().with_exit_codes(&[Some(0)]);
        let mut ui = MockUI::new();
        ui.set_prompt_response(RESTART_PROMPT_KEY, "no");

        let report = fx.supervisor(&tools).run(&fx.entry(), &mut ui).unwrap();

        assert_eq!(
            report.trace,
            vec![
                "idle",
                "running",
                "completed",
                "awaiting_decision",
                "terminated"
            ]
        );
        assert_eq!(report.runs(), 1);
        assert_eq!(ui.prompts_shown(), &[RESTART_PROMPT_KEY]);
        assert!(ui.has_success("exited normally"));
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn abnormal_exit_warns_and_still_asks() {
        let fx = Fixture::new();
        let tools = MockToolchain::new().with_exit_codes(&[Some(137)]);
        let mut ui = MockUI::new();

        let report = fx.supervisor(&tools).run(&fx.entry(), &mut ui).unwrap();

        assert!(report.trace.contains(&"awaiting_decision"));
        assert_eq!(report.outcomes[0].exit_code(), Some(137));
        assert!(ui.has_warning("exit 137"));
        assert_eq!(ui.prompts_shown(), &[RESTART_PROMPT_KEY]);

        let lines = fx.log.tail(10).unwrap();
        assert!(lines
            .iter()
            .any(|l| l.contains("WARN launch finished: exit=137 class=abnormal")));
    }

    #[test]
    fn restart_runs_again_until_declined() {
        let fx = Fixture::new();
        let tools = MockToolchain::new().with_exit_codes(&[Some(1), None, Some(0)]);
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(RESTART_PROMPT_KEY, vec!["yes", "yes", "no"]);

        let report = fx.supervisor(&tools).run(&fx.entry(), &mut ui).unwrap();

        assert_eq!(report.runs(), 3);
        assert_eq!(tools.launch_calls(), 3);
        assert_eq!(ui.prompts_shown().len(), 3);
        assert_eq!(report.outcomes[1].exit_label(), "signal");
        assert_eq!(report.trace.last(), Some(&"terminated"));
    }

    #[test]
    fn restart_reenters_running() {
        let fx = Fixture::new();
        let tools = MockToolchain::new().with_exit_codes(&[Some(0), Some(0)]);
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(RESTART_PROMPT_KEY, vec!["yes", "no"]);

        let report = fx.supervisor(&tools).run(&fx.entry(), &mut ui).unwrap();

        assert_eq!(
            report.trace,
            vec![
                "idle",
                "running",
                "completed",
                "awaiting_decision",
                "running",
                "completed",
                "awaiting_decision",
                "terminated"
            ]
        );
        assert_eq!(tools.launch_calls(), 2);
    }

    #[test]
    fn each_run_is_logged() {
        let fx = Fixture::new();
        let tools = MockToolchain::new().with_exit_codes(&[Some(0), Some(2)]);
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(RESTART_PROMPT_KEY, vec!["yes", "no"]);

        fx.supervisor(&tools).run(&fx.entry(), &mut ui).unwrap();

        let lines = fx.log.tail(20).unwrap();
        let finished = lines.iter().filter(|l| l.contains("launch finished")).count();
        assert_eq!(finished, 2);
        assert!(lines.iter().any(|l| l.contains("INFO restart requested")));
    }

    #[test]
    fn once_skips_restart_question() {
        let fx = Fixture::new();
        let tools = MockToolchain::new().with_exit_codes(&[Some(3)]);
        let mut ui = MockUI::new();
        ui.set_prompt_response(RESTART_PROMPT_KEY, "yes");

        let report = fx
            .supervisor(&tools)
            .once(true)
            .run(&fx.entry(), &mut ui)
            .unwrap();

        assert_eq!(report.runs(), 1);
        assert!(ui.prompts_shown().is_empty());
        assert_eq!(report.trace, vec!["idle", "running", "completed", "terminated"]);
    }

    #[test]
    fn missing_entry_point_is_fatal() {
        let fx = Fixture::new();
        let tools = MockToolchain::new();
        let mut ui = MockUI::new();
        let missing = fx.temp.path().join("bot.py");

        let err = fx.supervisor(&tools).run(&missing, &mut ui).unwrap_err();

        assert!(matches!(err, LaunchkitError::EntryPointNotFound { .. }));
        assert_eq!(tools.launch_calls(), 0);
    }
}
