// SPDX-License-Identifier: PMPL-1.0-or-later
//! Target-size rule: interactive nodes meet the configured minimum
//! bounding box.

use super::{Rule, RuleContext};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::NodeId;

/// Interactive targets below the minimum in both dimensions are
/// flagged, with the raw measured box in the message for reviewer
/// judgment. Inline links inside text flow are exempt (the
/// overlapping-but-adjacent carve-out).
pub struct TargetSize;

impl Rule for TargetSize {
    fn id(&self) -> &'static str {
        "target-size"
    }

    fn name(&self) -> &'static str {
        "Minimum target size"
    }

    fn wcag(&self) -> &'static str {
        "2.5.8"
    }

    fn description(&self) -> &'static str {
        "Interactive targets meet the configured minimum box"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        let Some(node) = cx.node(id) else { return false };
        (node.is_native_interactive() || cx.focus.is_keyboard_activatable(id))
            && node.style.is_visible()
            && node.style.bounds.has_area()
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        let min = cx.config.min_target_size;
        let bounds = node.style.bounds;
        if bounds.width >= min || bounds.height >= min {
            return Vec::new();
        }
        // Inline link in text flow: sizing follows the line box.
        if node.tag == "a" {
            let in_text_flow = cx
                .index
                .parent(id)
                .and_then(|p| cx.node(p))
                .is_some_and(|parent| parent.own_text().is_some());
            if in_text_flow {
                return Vec::new();
            }
        }
        vec![Finding::new(
            self.id(),
            Severity::Medium,
            cx.path(id),
            format!(
                "<{}> target measures {:.0}x{:.0}, below the {:.0}x{:.0} minimum",
                node.tag, bounds.width, bounds.height, min, min
            ),
        )
        .with_wcag(self.wcag())
        .with_suggestion(format!("Grow the target or its padding to at least {:.0} units on one axis", min))
        .with_impact(ImpactAssessment::motor())]
    }
}
