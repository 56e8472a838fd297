// SPDX-License-Identifier: PMPL-1.0-or-later
//! Finding and severity model - the structured output contract.
//!
//! Findings are plain values: the engine aggregates them into a
//! [`FindingSet`] and returns it. Nothing here carries timestamps or
//! random identifiers; two identical passes must serialize identically.

use crate::model::NodePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity levels for findings, ordered worst-first.
///
/// The ordering is load-bearing: report sorting and the caller's
/// pass/fail threshold both rely on `Critical < High < Medium < Low`
/// in the derived `Ord` (so "worst" is the minimum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks a class of users entirely (e.g. keyboard lockout)
    Critical,
    /// Content or control is inaccessible to some users
    High,
    /// Degrades the experience; should be addressed
    Medium,
    /// Advisory, indeterminate result, or engine meta-finding
    Low,
}

impl Severity {
    /// All levels, worst first. Used by the text report grouping.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// Impact assessment: which user groups an issue affects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    /// Screen reader users
    pub blind: bool,
    /// Low-vision users
    pub low_vision: bool,
    /// Users with motor disabilities (keyboard-only, switch access)
    pub motor: bool,
    /// Users with cognitive or vestibular disabilities
    pub cognitive: bool,
}

impl ImpactAssessment {
    pub fn blind() -> Self {
        Self { blind: true, ..Self::default() }
    }

    pub fn low_vision() -> Self {
        Self { low_vision: true, ..Self::default() }
    }

    pub fn motor() -> Self {
        Self { motor: true, ..Self::default() }
    }

    pub fn cognitive() -> Self {
        Self { cognitive: true, ..Self::default() }
    }

    /// Blind + low-vision
    pub fn visual() -> Self {
        Self { blind: true, low_vision: true, ..Self::default() }
    }

    /// Names of the affected groups, for display.
    pub fn affected_groups(&self) -> Vec<&'static str> {
        let mut groups = Vec::new();
        if self.blind {
            groups.push("blind");
        }
        if self.low_vision {
            groups.push("low-vision");
        }
        if self.motor {
            groups.push("motor");
        }
        if self.cognitive {
            groups.push("cognitive");
        }
        groups
    }
}

/// A single reported violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule identifier (e.g. "text-contrast")
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Path of the node the finding concerns
    pub path: NodePath,
    /// Human-readable message
    pub message: String,
    /// Suggested fix, when one is known
    pub suggestion: Option<String>,
    /// WCAG success criterion reference (e.g. "1.4.3")
    pub wcag_criterion: Option<String>,
    /// Set when the underlying computation could not be resolved
    /// (e.g. no opaque ancestor background) rather than failed
    pub indeterminate: bool,
    /// Affected user groups
    pub impact: ImpactAssessment,
}

impl Finding {
    pub fn new(rule_id: &str, severity: Severity, path: NodePath, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            path,
            message: message.into(),
            suggestion: None,
            wcag_criterion: None,
            indeterminate: false,
            impact: ImpactAssessment::default(),
        }
    }

    pub fn with_wcag(mut self, criterion: &str) -> Self {
        self.wcag_criterion = Some(criterion.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_impact(mut self, impact: ImpactAssessment) -> Self {
        self.impact = impact;
        self
    }

    pub fn as_indeterminate(mut self) -> Self {
        self.indeterminate = true;
        self
    }
}

/// An ordered collection of findings with aggregation views.
///
/// The engine guarantees deterministic ordering (severity desc, then
/// document order, then rule id); this type never reorders on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingSet {
    pub findings: Vec<Finding>,
}

impl FindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity == severity).collect()
    }

    pub fn by_rule(&self, rule_id: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule_id == rule_id).collect()
    }

    /// Count-by-severity summary. Derived on demand, never stored.
    pub fn summary(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for f in &self.findings {
            *counts.entry(f.severity).or_insert(0) += 1;
        }
        counts
    }

    /// Worst severity present, if any. Pass/fail is the caller's call:
    /// compare this against a threshold of their choosing.
    pub fn worst(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).min()
    }

    /// Whether any finding is at or above the given threshold
    /// (e.g. `at_or_above(Severity::High)` covers Critical and High).
    pub fn at_or_above(&self, threshold: Severity) -> bool {
        self.findings.iter().any(|f| f.severity <= threshold)
    }
}
