// SPDX-License-Identifier: PMPL-1.0-or-later
//! Focus rules: traps, order mismatches, unreachable and hidden
//! focusables, and the positive tab-index advisory.
//!
//! All of these consume facts from the prebuilt [`crate::focus::FocusGraph`];
//! none of them walk the tree themselves.

use super::{Rule, RuleContext};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::NodeId;

/// A scope that confines focus with no modeled keyboard escape.
pub struct FocusTrap;

impl Rule for FocusTrap {
    fn id(&self) -> &'static str {
        "focus-trap"
    }

    fn name(&self) -> &'static str {
        "Keyboard focus trap"
    }

    fn wcag(&self) -> &'static str {
        "2.1.2"
    }

    fn description(&self) -> &'static str {
        "Focus-restricting scopes model a keyboard escape"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.is_root(id)
    }

    fn evaluate(&self, _id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        cx.focus
            .trap_candidates()
            .map(|scope| {
                Finding::new(
                    self.id(),
                    Severity::Critical,
                    cx.path(scope.container),
                    format!(
                        "Scope confines {} focusable node(s) with no keyboard way out",
                        scope.members.len()
                    ),
                )
                .with_wcag(self.wcag())
                .with_suggestion("Bind Escape to close the scope, or add a focusable close control")
                .with_impact(ImpactAssessment::motor())
            })
            .collect()
    }
}

/// Tab order deviating from geometric (top-to-bottom, left-to-right)
/// order.
pub struct FocusOrderMismatch;

impl Rule for FocusOrderMismatch {
    fn id(&self) -> &'static str {
        "focus-order-mismatch"
    }

    fn name(&self) -> &'static str {
        "Focus order matches visual order"
    }

    fn wcag(&self) -> &'static str {
        "2.4.3"
    }

    fn description(&self) -> &'static str {
        "The tab sequence follows the visual reading order"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.is_root(id)
    }

    fn evaluate(&self, _id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        // Geometric order: row-major by bounding box origin. Nodes
        // without area carry no visual position and are skipped.
        let mut geometric: Vec<NodeId> = cx
            .focus
            .order
            .iter()
            .copied()
            .filter(|&id| cx.node(id).is_some_and(|n| n.style.bounds.has_area()))
            .collect();
        geometric.sort_by(|&a, &b| {
            let ra = cx.node(a).map(|n| n.style.bounds).unwrap_or_default();
            let rb = cx.node(b).map(|n| n.style.bounds).unwrap_or_default();
            ra.y.partial_cmp(&rb.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ra.x.partial_cmp(&rb.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let tab_sequence: Vec<NodeId> = cx
            .focus
            .order
            .iter()
            .copied()
            .filter(|id| geometric.contains(id))
            .collect();

        tab_sequence
            .iter()
            .zip(&geometric)
            .filter(|(tab, geo)| tab != geo)
            .map(|(&tab, _)| {
                Finding::new(
                    self.id(),
                    Severity::Medium,
                    cx.path(tab),
                    "Tab order diverges from the visual order at this node",
                )
                .with_wcag(self.wcag())
                .with_suggestion("Reorder the markup or remove explicit tab-order overrides")
                .with_impact(ImpactAssessment::motor())
            })
            .collect()
    }
}

/// Focusable nodes cut off by every active restricting scope.
pub struct FocusUnreachable;

impl Rule for FocusUnreachable {
    fn id(&self) -> &'static str {
        "focus-unreachable"
    }

    fn name(&self) -> &'static str {
        "Unreachable interactive node"
    }

    fn wcag(&self) -> &'static str {
        "2.1.1"
    }

    fn description(&self) -> &'static str {
        "Interactive nodes stay reachable under active scopes"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.is_root(id)
    }

    fn evaluate(&self, _id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        cx.focus
            .unreachable
            .iter()
            .map(|&id| {
                let tag = cx.node(id).map(|n| n.tag.clone()).unwrap_or_default();
                Finding::new(
                    self.id(),
                    Severity::High,
                    cx.path(id),
                    format!("<{}> is focusable but unreachable while a scope restricts focus", tag),
                )
                .with_wcag(self.wcag())
                .with_suggestion("Mark content behind the scope inert, or close the scope")
                .with_impact(ImpactAssessment::motor())
            })
            .collect()
    }
}

/// Focusable nodes with zero visible dimension.
pub struct HiddenFocusable;

impl Rule for HiddenFocusable {
    fn id(&self) -> &'static str {
        "hidden-focusable"
    }

    fn name(&self) -> &'static str {
        "Hidden focusable node"
    }

    fn wcag(&self) -> &'static str {
        "2.4.7"
    }

    fn description(&self) -> &'static str {
        "Nodes in the tab order render with visible dimensions"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.focus.is_focusable(id)
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        if node.style.bounds.has_area() {
            return Vec::new();
        }
        vec![Finding::new(
            self.id(),
            Severity::Medium,
            cx.path(id),
            format!("<{}> receives focus but has zero visible dimension", node.tag),
        )
        .with_wcag(self.wcag())
        .with_suggestion("Remove it from the tab order with tabindex=\"-1\", or give it a visible box")
        .with_impact(ImpactAssessment::motor())]
    }
}

/// Advisory: explicit positive tab-order overrides are modeled
/// faithfully by the graph, and flagged (not forbidden) here.
pub struct PositiveTabindex;

impl Rule for PositiveTabindex {
    fn id(&self) -> &'static str {
        "positive-tabindex"
    }

    fn name(&self) -> &'static str {
        "Explicit positive tab order"
    }

    fn wcag(&self) -> &'static str {
        "2.4.3"
    }

    fn description(&self) -> &'static str {
        "Positive tab-index overrides are reported for review"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id).is_some_and(|n| n.tabindex().is_some_and(|t| t > 0))
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        let value = node.tabindex().unwrap_or(0);
        vec![Finding::new(
            self.id(),
            Severity::Low,
            cx.path(id),
            format!("<{}> overrides the tab order with tabindex={}", node.tag, value),
        )
        .with_wcag(self.wcag())
        .with_suggestion("Prefer document order; use tabindex=\"0\" if the node must be focusable")
        .with_impact(ImpactAssessment::motor())]
    }
}
