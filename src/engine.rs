// SPDX-License-Identifier: PMPL-1.0-or-later
//! The evaluation engine: computes derived facts once, dispatches every
//! enabled rule over every applicable node, isolates rule faults, and
//! returns a deduplicated, deterministically ordered finding list.
//!
//! Dispatch is node-major (nodes in document order, rules in catalog
//! registration order). That generation order is the "keep first" key
//! for deduplication; parallel workers receive contiguous node ranges
//! and merge in range order, so parallel and sequential passes produce
//! byte-identical output.

use crate::aria::{self, AriaViolation};
use crate::config::{AuditConfig, ConfigError};
use crate::finding::{Finding, FindingSet, Severity};
use crate::focus::FocusGraph;
use crate::model::{DocumentModel, ModelViolation, NodeId, NodePath};
use crate::rules::{self, Rule, RuleContext};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// Rule id used for fault meta-findings.
pub const RULE_FAULT_ID: &str = "engine-rule-fault";
/// Rule id used for structural model violations.
pub const MODEL_INVALID_ID: &str = "model-invalid";

/// Node count below which a pass runs sequentially; thread setup costs
/// more than it saves on small trees.
const PARALLEL_THRESHOLD: usize = 64;

/// One rule invocation's outcome inside a worker.
struct ChunkOutput {
    findings: Vec<Finding>,
    /// (failing rule id, node path) in generation order
    faults: Vec<(String, NodePath)>,
}

/// The conformance engine: a rule catalog and nothing else. Stateless
/// between passes by construction.
pub struct Engine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine over the full built-in catalog.
    pub fn new() -> Self {
        Self { rules: rules::catalog() }
    }

    /// Engine over an explicit rule set. Used by callers embedding
    /// custom rules and by fault-injection tests.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Run one evaluation pass. Pure: identical (document, config)
    /// pairs produce identical finding lists.
    pub fn evaluate(
        &self,
        doc: &DocumentModel,
        config: &AuditConfig,
    ) -> Result<FindingSet, ConfigError> {
        config.validate(&self.rule_ids())?;

        let start = Instant::now();
        let index = doc.index();
        let focus = FocusGraph::build(doc, &index);
        let violations: Vec<Vec<AriaViolation>> =
            doc.nodes.iter().map(aria::check_node).collect();
        debug!(
            nodes = doc.len(),
            focusable = focus.order.len(),
            scopes = focus.scopes.len(),
            "derived facts computed"
        );

        let cx = RuleContext { doc, index: &index, focus: &focus, aria: &violations, config };

        // Structural violations come first in generation order.
        let mut findings: Vec<Finding> = index
            .violations
            .iter()
            .map(|violation| model_invalid_finding(violation, &cx))
            .collect();

        let enabled: Vec<&dyn Rule> = self
            .rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| config.is_enabled(r.id()))
            .collect();

        let nodes = &index.order;
        let outputs = if config.parallel && nodes.len() >= PARALLEL_THRESHOLD {
            run_parallel(&enabled, &cx, nodes)
        } else {
            vec![run_chunk(&enabled, &cx, nodes)]
        };

        // Merge worker outputs in range order, then fold faults into
        // one meta-finding per failing rule (first occurrence wins).
        let mut faulted: Vec<(String, NodePath)> = Vec::new();
        for output in outputs {
            findings.extend(output.findings);
            for fault in output.faults {
                if !faulted.iter().any(|(id, _)| *id == fault.0) {
                    faulted.push(fault);
                }
            }
        }
        for (rule_id, path) in faulted {
            findings.push(
                Finding::new(
                    RULE_FAULT_ID,
                    Severity::Low,
                    path,
                    format!("Rule \"{}\" failed internally and was isolated from this pass", rule_id),
                )
                .with_suggestion(format!("Report a catalog defect against rule \"{}\"", rule_id)),
            );
        }

        // Dedupe on (rule id, node path), keeping the first.
        let mut seen: HashSet<(String, NodePath)> = HashSet::new();
        findings.retain(|f| seen.insert((f.rule_id.clone(), f.path.clone())));

        // Severity worst-first, then document order, then rule id.
        findings.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.path.cmp(&b.path))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });

        info!(
            findings = findings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "evaluation pass complete"
        );
        Ok(FindingSet::from_findings(findings))
    }
}

/// Evaluate the full built-in catalog over a document.
pub fn evaluate(doc: &DocumentModel, config: &AuditConfig) -> Result<FindingSet, ConfigError> {
    Engine::new().evaluate(doc, config)
}

fn model_invalid_finding(violation: &ModelViolation, cx: &RuleContext) -> Finding {
    let (parent, message) = match violation {
        ModelViolation::ChildOutOfBounds { parent, child } => (
            *parent,
            format!("Child reference #{} points outside the document arena", child.0),
        ),
        ModelViolation::SharedChild { parent, child } => (
            *parent,
            format!("Node #{} is claimed by more than one parent", child.0),
        ),
    };
    Finding::new(MODEL_INVALID_ID, Severity::High, cx.path(parent), message)
        .with_suggestion("Fix the loader producing this document model")
}

/// Run the node-major dispatch loop over one contiguous node range.
fn run_chunk(rules: &[&dyn Rule], cx: &RuleContext, nodes: &[NodeId]) -> ChunkOutput {
    let mut output = ChunkOutput { findings: Vec::new(), faults: Vec::new() };
    for &id in nodes {
        for rule in rules {
            if !rule.applies(id, cx) {
                continue;
            }
            let started = Instant::now();
            let result = catch_unwind(AssertUnwindSafe(|| rule.evaluate(id, cx)));
            match result {
                Ok(findings) => {
                    let overran = cx
                        .config
                        .rule_time_budget
                        .is_some_and(|budget| started.elapsed() > budget);
                    if overran {
                        // Treated identically to a fault: the rule's
                        // output for this node is discarded.
                        output.faults.push((rule.id().to_string(), cx.path(id)));
                    } else {
                        output.findings.extend(findings);
                    }
                }
                Err(_) => {
                    debug!(rule = rule.id(), node = %cx.path(id), "rule panicked; isolated");
                    output.faults.push((rule.id().to_string(), cx.path(id)));
                }
            }
        }
    }
    output
}

/// Chunked scoped-thread dispatch; outputs come back in range order.
fn run_parallel(rules: &[&dyn Rule], cx: &RuleContext, nodes: &[NodeId]) -> Vec<ChunkOutput> {
    let workers = thread::available_parallelism().map(|p| p.get()).unwrap_or(4).min(nodes.len());
    if workers <= 1 {
        return vec![run_chunk(rules, cx, nodes)];
    }
    let chunk_size = nodes.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = nodes
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || run_chunk(rules, cx, chunk)))
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(output) => output,
                // A worker can only die if a fault escaped catch_unwind
                // (e.g. a panic in a panic payload's Drop). Surface it
                // as an empty chunk rather than poisoning the pass.
                Err(_) => ChunkOutput { findings: Vec::new(), faults: Vec::new() },
            })
            .collect()
    })
}
