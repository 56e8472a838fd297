// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for finding sets.
//!
//! Formats:
//! - Text: human-readable, grouped by severity, with WCAG references
//! - JSON: the serialized finding set plus its severity summary
//! - SARIF: Static Analysis Results Interchange Format 2.1.0 for CI/IDE

use crate::finding::{FindingSet, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Sarif,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Render a finding set in the requested format.
pub fn generate_report(findings: &FindingSet, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text_report(findings),
        OutputFormat::Json => json_report(findings),
        OutputFormat::Sarif => sarif_report(findings),
    }
}

fn text_report(findings: &FindingSet) -> String {
    let mut output = String::new();
    output.push_str("=== Accessibility Conformance Report (WCAG AA) ===\n\n");

    if findings.is_empty() {
        output.push_str("No findings. All enabled checks passed.\n");
        return output;
    }

    let summary = findings.summary();
    let counts: Vec<String> = Severity::ALL
        .iter()
        .filter_map(|sev| summary.get(sev).map(|count| format!("{} {}", count, sev)))
        .collect();
    output.push_str(&format!("{} finding(s): {}\n\n", findings.len(), counts.join(", ")));

    for severity in Severity::ALL {
        let group = findings.by_severity(severity);
        if group.is_empty() {
            continue;
        }
        output.push_str(&format!("--- {} ({}) ---\n", severity, group.len()));
        for finding in group {
            output.push_str(&format!("[{}] {}\n", finding.rule_id, finding.message));
            output.push_str(&format!("  Node: {}\n", finding.path));
            if let Some(criterion) = &finding.wcag_criterion {
                output.push_str(&format!("  WCAG: {}\n", criterion));
            }
            if let Some(suggestion) = &finding.suggestion {
                output.push_str(&format!("  Fix: {}\n", suggestion));
            }
            if finding.indeterminate {
                output.push_str("  Note: indeterminate (could not be fully resolved)\n");
            }
            let groups = finding.impact.affected_groups();
            if !groups.is_empty() {
                output.push_str(&format!("  Affects: {}\n", groups.join(", ")));
            }
            output.push('\n');
        }
    }
    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    findings: &'a FindingSet,
    summary: std::collections::BTreeMap<Severity, usize>,
}

fn json_report(findings: &FindingSet) -> String {
    let report = JsonReport { findings, summary: findings.summary() };
    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize findings: {}\"}}", e))
}

#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "logicalLocations")]
    logical_locations: Vec<SarifLogicalLocation>,
}

#[derive(Serialize)]
struct SarifLogicalLocation {
    #[serde(rename = "fullyQualifiedName")]
    fully_qualified_name: String,
}

fn sarif_report(findings: &FindingSet) -> String {
    let results: Vec<SarifResult> = findings
        .findings
        .iter()
        .map(|f| SarifResult {
            rule_id: f.rule_id.clone(),
            level: match f.severity {
                Severity::Critical | Severity::High => "error",
                Severity::Medium => "warning",
                Severity::Low => "note",
            },
            message: SarifMessage { text: f.message.clone() },
            locations: vec![SarifLocation {
                logical_locations: vec![SarifLogicalLocation {
                    fully_qualified_name: f.path.to_string(),
                }],
            }],
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json",
        version: "2.1.0",
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver { name: "a11y-audit", version: env!("CARGO_PKG_VERSION") },
            },
            results,
        }],
    };
    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize SARIF report: {}\"}}", e))
}
