//! Launch outcomes.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    /// Exit status 0.
    Normal,
    /// Any other status, including termination by a signal.
    Abnormal,
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Abnormal => "abnormal",
        })
    }
}

/// One completed application run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    exit_code: Option<i32>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn new(
        exit_code: Option<i32>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            exit_code,
            started_at,
            finished_at,
        }
    }

    /// Exit code, `None` when the process was killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn class(&self) -> OutcomeClass {
        match self.exit_code {
            Some(0) => OutcomeClass::Normal,
            _ => OutcomeClass::Abnormal,
        }
    }

    pub fn is_normal(&self) -> bool {
        self.class() == OutcomeClass::Normal
    }

    /// `137` or `signal` for display.
    pub fn exit_label(&self) -> String {
        match self.exit_code {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "launch finished: exit={} class={} started={} finished={}",
            self.exit_label(),
            self.class(),
            self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.finished_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}
