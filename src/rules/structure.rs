// SPDX-License-Identifier: PMPL-1.0-or-later
//! Structure rules: heading hierarchy and landmark regions.

use super::{Rule, RuleContext};
use crate::aria::{effective_role, is_landmark};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::NodeId;
use std::collections::BTreeMap;

/// Exactly one top-level heading per document.
pub struct SingleH1;

impl Rule for SingleH1 {
    fn id(&self) -> &'static str {
        "heading-single-h1"
    }

    fn name(&self) -> &'static str {
        "Single top-level heading"
    }

    fn wcag(&self) -> &'static str {
        "1.3.1"
    }

    fn description(&self) -> &'static str {
        "Each document carries exactly one level-1 heading"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.is_root(id)
    }

    fn evaluate(&self, _id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let h1s: Vec<NodeId> = cx
            .index
            .order
            .iter()
            .copied()
            .filter(|&id| cx.node(id).and_then(|n| n.heading_level()) == Some(1))
            .collect();

        match h1s.len() {
            1 => Vec::new(),
            0 => {
                // An empty shell with no headings at all is not penalized.
                let has_any_heading = cx
                    .index
                    .order
                    .iter()
                    .any(|&id| cx.node(id).and_then(|n| n.heading_level()).is_some());
                if !has_any_heading {
                    return Vec::new();
                }
                vec![Finding::new(
                    self.id(),
                    Severity::Medium,
                    cx.path(cx.doc.root()),
                    "Document has headings but no level-1 heading",
                )
                .with_wcag(self.wcag())
                .with_suggestion("Make the document's primary heading an <h1>")
                .with_impact(ImpactAssessment::blind())]
            }
            n => h1s
                .iter()
                .skip(1)
                .map(|&id| {
                    Finding::new(
                        self.id(),
                        Severity::Medium,
                        cx.path(id),
                        format!("Document has {} level-1 headings; expected exactly one", n),
                    )
                    .with_wcag(self.wcag())
                    .with_suggestion("Demote additional <h1> elements to <h2>")
                    .with_impact(ImpactAssessment::blind())
                })
                .collect(),
        }
    }
}

/// No heading level skips two or more levels in forward document order.
pub struct HeadingSkip;

impl Rule for HeadingSkip {
    fn id(&self) -> &'static str {
        "heading-skip"
    }

    fn name(&self) -> &'static str {
        "Heading hierarchy"
    }

    fn wcag(&self) -> &'static str {
        "1.3.1"
    }

    fn description(&self) -> &'static str {
        "Heading levels descend one step at a time"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.is_root(id)
    }

    fn evaluate(&self, _id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let headings: Vec<(NodeId, u8)> = cx
            .index
            .order
            .iter()
            .filter_map(|&id| cx.node(id).and_then(|n| n.heading_level()).map(|l| (id, l)))
            .collect();

        headings
            .windows(2)
            .filter(|pair| pair[1].1 > pair[0].1 + 1)
            .map(|pair| {
                let (prev_level, (id, level)) = (pair[0].1, pair[1]);
                Finding::new(
                    self.id(),
                    Severity::Medium,
                    cx.path(id),
                    format!("Heading level skips from h{} to h{}", prev_level, level),
                )
                .with_wcag(self.wcag())
                .with_suggestion(format!("Use h{} here, or restructure the outline", prev_level + 1))
                .with_impact(ImpactAssessment::blind())
            })
            .collect()
    }
}

/// Landmark regions exist on documents with real content.
pub struct LandmarkMissing;

impl Rule for LandmarkMissing {
    fn id(&self) -> &'static str {
        "landmark-missing"
    }

    fn name(&self) -> &'static str {
        "Landmark regions present"
    }

    fn wcag(&self) -> &'static str {
        "1.3.1"
    }

    fn description(&self) -> &'static str {
        "Documents with content expose landmark regions for non-visual navigation"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.is_root(id)
    }

    fn evaluate(&self, _id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let has_landmark = cx
            .index
            .order
            .iter()
            .any(|&id| cx.node(id).is_some_and(is_landmark));
        if has_landmark {
            return Vec::new();
        }
        // Only documents that actually have text or interactive content
        // are expected to structure it.
        let has_content = cx.index.order.iter().any(|&id| {
            cx.node(id).is_some_and(|n| n.own_text().is_some() || n.is_native_interactive())
        });
        if !has_content {
            return Vec::new();
        }
        vec![Finding::new(
            self.id(),
            Severity::Medium,
            cx.path(cx.doc.root()),
            "Document has content but no landmark regions",
        )
        .with_wcag(self.wcag())
        .with_suggestion("Wrap primary content in <main> and navigation in <nav>")
        .with_impact(ImpactAssessment::blind())]
    }
}

/// Repeated landmark kinds must be distinguishable by label.
pub struct LandmarkDuplicate;

impl Rule for LandmarkDuplicate {
    fn id(&self) -> &'static str {
        "landmark-duplicate"
    }

    fn name(&self) -> &'static str {
        "Unique landmark labels"
    }

    fn wcag(&self) -> &'static str {
        "1.3.1"
    }

    fn description(&self) -> &'static str {
        "When a landmark kind appears more than once, each instance is uniquely labeled"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.is_root(id)
    }

    fn evaluate(&self, _id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        // kind -> [(node, label)] in document order
        let mut by_kind: BTreeMap<&'static str, Vec<(NodeId, Option<String>)>> = BTreeMap::new();
        for &id in &cx.index.order {
            let Some(node) = cx.node(id) else { continue };
            if !is_landmark(node) {
                continue;
            }
            let Some(spec) = effective_role(node) else { continue };
            let label = node
                .attr("aria-label")
                .or_else(|| node.attr("aria-labelledby"))
                .map(str::to_string);
            by_kind.entry(spec.name).or_default().push((id, label));
        }

        let mut findings = Vec::new();
        for (kind, instances) in by_kind {
            if instances.len() < 2 {
                continue;
            }
            for (id, label) in &instances {
                let duplicated = instances
                    .iter()
                    .filter(|(other, other_label)| other != id && other_label == label)
                    .count();
                if label.is_none() || duplicated > 0 {
                    findings.push(
                        Finding::new(
                            self.id(),
                            Severity::Medium,
                            cx.path(*id),
                            format!(
                                "Landmark \"{}\" appears {} times without a unique label",
                                kind,
                                instances.len()
                            ),
                        )
                        .with_wcag(self.wcag())
                        .with_suggestion("Add a distinct aria-label to each repeated landmark")
                        .with_impact(ImpactAssessment::blind()),
                    );
                }
            }
        }
        findings
    }
}
