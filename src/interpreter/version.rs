//! Interpreter version triples.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A `major.minor.patch` interpreter version.
///
/// Field order matters: the derived `Ord` compares `major`, then `minor`,
/// then `patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InterpreterInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("version pattern is valid")
    })
}

impl InterpreterInfo {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first version triple from free-form text such as
    /// `Python 3.12.1` or `3.13.0rc2`. A missing patch component is 0.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = version_pattern().captures(text)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for InterpreterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for InterpreterInfo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("not a version: '{}'", s))
    }
}

impl TryFrom<String> for InterpreterInfo {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InterpreterInfo> for String {
    fn from(value: InterpreterInfo) -> Self {
        value.to_string()
    }
}
