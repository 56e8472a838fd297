// SPDX-License-Identifier: PMPL-1.0-or-later
//! Evaluation configuration, validated before any rule runs.
//!
//! Configuration mistakes are caller programming errors and fail fast
//! as [`ConfigError`]s; they are never folded into the finding list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

/// WCAG conformance level. The engine's catalog targets AA; asking for
/// any other level is rejected at validation time rather than silently
/// evaluated against the wrong bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WcagLevel {
    A,
    #[default]
    AA,
    AAA,
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported WCAG level {0}; this catalog covers level AA")]
    UnsupportedLevel(WcagLevel),
    #[error("unknown rule id \"{0}\"")]
    UnknownRule(String),
    #[error("invalid minimum target size {0}; must be finite and positive")]
    InvalidTargetSize(f64),
}

/// Configuration for one evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Conformance level; fixed to AA for this catalog
    pub level: WcagLevel,
    /// Minimum interactive target size in logical units (both axes)
    pub min_target_size: f64,
    /// Rule ids to skip; all rules run by default
    pub disabled_rules: BTreeSet<String>,
    /// Optional wall-clock budget per rule invocation. Exceeding it is
    /// treated identically to a rule fault. Off by default because a
    /// clock check trades away strict determinism.
    #[serde(skip)]
    pub rule_time_budget: Option<Duration>,
    /// Evaluate rule/node applications across worker threads
    pub parallel: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            level: WcagLevel::AA,
            min_target_size: 44.0,
            disabled_rules: BTreeSet::new(),
            rule_time_budget: None,
            parallel: true,
        }
    }
}

impl AuditConfig {
    /// Validate against the set of registered rule ids. Must be called
    /// (and pass) before evaluation begins.
    pub fn validate(&self, known_rules: &[&str]) -> Result<(), ConfigError> {
        if self.level != WcagLevel::AA {
            return Err(ConfigError::UnsupportedLevel(self.level));
        }
        if !self.min_target_size.is_finite() || self.min_target_size <= 0.0 {
            return Err(ConfigError::InvalidTargetSize(self.min_target_size));
        }
        for id in &self.disabled_rules {
            if !known_rules.contains(&id.as_str()) {
                return Err(ConfigError::UnknownRule(id.clone()));
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.contains(rule_id)
    }

    pub fn disable(mut self, rule_id: &str) -> Self {
        self.disabled_rules.insert(rule_id.to_string());
        self
    }
}
