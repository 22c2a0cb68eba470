//! Append-only run log.
//!
//! Every line has the form `[<RFC 3339 timestamp>] <LEVEL> <message>`. The
//! file is opened in append mode for each write and is never truncated, so
//! it accumulates one history across all bootstrap passes.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::launch::RunOutcome;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// Format one log line, without the trailing newline.
pub fn format_line(at: DateTime<Utc>, level: LogLevel, message: &str) -> String {
    // Entries stay one line each so `history` can tail the file.
    let message = message.replace(['\r', '\n'], " ");
    format!(
        "[{}] {} {}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true),
        level,
        message
    )
}

/// Handle to the run log file.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Use `path` as the log, creating its parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    /// A handle for reading an existing log without creating anything.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry.
    pub fn append(&self, level: LogLevel, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(Utc::now(), level, message))?;
        Ok(())
    }

    pub fn info(&self, message: &str) -> Result<()> {
        self.append(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> Result<()> {
        self.append(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> Result<()> {
        self.append(LogLevel::Error, message)
    }

    /// Append a launch outcome. Abnormal exits are logged as warnings.
    pub fn record_outcome(&self, outcome: &RunOutcome) -> Result<()> {
        let level = if outcome.is_normal() {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };
        self.append(level, &outcome.to_string())
    }

    /// The last `limit` lines of the log, oldest first. A missing log reads
    /// as empty.
    pub fn tail(&self, limit: usize) -> Result<Vec<String>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut lines: Vec<String> = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<_>>()?;
        let skip = lines.len().saturating_sub(limit);
        Ok(lines.split_off(skip))
    }
}
