// SPDX-License-Identifier: PMPL-1.0-or-later
//! Motion-preference rule: continuous animation must be gated by a
//! reduced-motion style condition.

use super::{Rule, RuleContext};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::NodeId;

pub struct MotionGating;

impl Rule for MotionGating {
    fn id(&self) -> &'static str {
        "motion-gating"
    }

    fn name(&self) -> &'static str {
        "Reduced-motion gating"
    }

    fn wcag(&self) -> &'static str {
        "2.3.3"
    }

    fn description(&self) -> &'static str {
        "Continuous animation honors the reduced-motion preference"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id).is_some_and(|n| n.style.animated && n.style.is_visible())
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        if node.style.reduced_motion_gated {
            return Vec::new();
        }
        vec![Finding::new(
            self.id(),
            Severity::Medium,
            cx.path(id),
            format!(
                "<{}> animates continuously without a reduced-motion condition",
                node.tag
            ),
        )
        .with_wcag(self.wcag())
        .with_suggestion(
            "Wrap the animation in an @media (prefers-reduced-motion: no-preference) condition",
        )
        .with_impact(ImpactAssessment::cognitive())]
    }
}
