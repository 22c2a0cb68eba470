//! Interpreter discovery, acquisition and compatibility gating.

pub mod acquire;
pub mod policy;
pub mod probe;
pub mod version;

pub use acquire::{InstallerDownload, InterpreterAcquirer};
pub use policy::{CompatibilityPolicy, CompatibilityRule, PolicyAction, PolicyDecision};
pub use probe::{DetectedInterpreter, ProbeOutcome, VersionProbe, COMPAT_PROMPT_KEY};
pub use version::InterpreterInfo;
