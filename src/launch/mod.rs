//! Application launch and restart supervision.

pub mod outcome;
pub mod supervisor;

pub use outcome::{OutcomeClass, RunOutcome};
pub use supervisor::{LaunchSupervisor, SupervisionReport, SupervisorState, RESTART_PROMPT_KEY};
