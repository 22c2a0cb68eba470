//! Interpreter compatibility policy.
//!
//! A policy is an ordered list of version ranges, each mapped to a
//! [`PolicyAction`]. The first rule whose range contains the detected version
//! decides; versions no rule matches are allowed.

use serde::{Deserialize, Serialize};

use super::InterpreterInfo;

/// What to do with a detected interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAction {
    /// Continue without comment.
    Allow,
    /// Ask the operator before continuing.
    #[serde(alias = "warn")]
    WarnAndConfirm,
    /// Refuse to continue.
    Block,
}

/// One range-to-action mapping.
///
/// The range is half-open: `min` is inclusive, `max` exclusive. A missing
/// bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<InterpreterInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<InterpreterInfo>,

    pub action: PolicyAction,

    /// Shown to the operator when the rule fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CompatibilityRule {
    /// Whether `version` falls inside this rule's range.
    pub fn matches(&self, version: &InterpreterInfo) -> bool {
        let above_min = self.min.is_none_or(|min| *version >= min);
        let below_max = self.max.is_none_or(|max| *version < max);
        above_min && below_max
    }
}

/// Ordered compatibility rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityPolicy {
    rules: Vec<CompatibilityRule>,
}

/// Result of evaluating a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub action: PolicyAction,
    pub reason: Option<String>,
}

impl Default for CompatibilityPolicy {
    /// 3.13 removed `audioop` from the standard library and breaks the voice
    /// dependency of the bundled Discord client.
    fn default() -> Self {
        Self {
            rules: vec![CompatibilityRule {
                min: Some(InterpreterInfo::new(3, 13, 0)),
                max: None,
                action: PolicyAction::WarnAndConfirm,
                reason: Some(
                    "Python 3.13+ removed the audioop module and is known to break \
                     discord.py voice support"
                        .to_string(),
                ),
            }],
        }
    }
}

impl CompatibilityPolicy {
    pub fn new(rules: Vec<CompatibilityRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CompatibilityRule] {
        &self.rules
    }

    /// Evaluate the policy. Pure: the same version always yields the same
    /// decision.
    pub fn evaluate(&self, version: &InterpreterInfo) -> PolicyDecision {
        self.rules
            .iter()
            .find(|rule| rule.matches(version))
            .map(|rule| PolicyDecision {
                action: rule.action,
                reason: rule.reason.clone(),
            })
            .unwrap_or(PolicyDecision {
                action: PolicyAction::Allow,
                reason: None,
            })
    }

    /// Check rule ranges for inverted bounds.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for rule in &self.rules {
            if let (Some(min), Some(max)) = (rule.min, rule.max) {
                if min >= max {
                    return Err(format!(
                        "compatibility rule range is empty: min {} is not below max {}",
                        min, max
                    ));
                }
            }
        }
        Ok(())
    }
}
