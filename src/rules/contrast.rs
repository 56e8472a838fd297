// SPDX-License-Identifier: PMPL-1.0-or-later
//! Contrast rules for text and non-text UI boundaries.
//!
//! The color math lives in [`crate::color`]; these rules only compare
//! the resolved ratio against the pair's applicable threshold and
//! report indeterminate compositing as a Low finding rather than
//! silently passing it.

use super::{Rule, RuleContext};
use crate::color::{resolve_boundary_pair, resolve_text_pair, ResolvedPair};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::NodeId;

/// Text nodes meet the size-appropriate AA ratio.
pub struct TextContrast;

impl Rule for TextContrast {
    fn id(&self) -> &'static str {
        "text-contrast"
    }

    fn name(&self) -> &'static str {
        "Text contrast"
    }

    fn wcag(&self) -> &'static str {
        "1.4.3"
    }

    fn description(&self) -> &'static str {
        "Text meets 4.5:1, or 3:1 when large"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id)
            .is_some_and(|n| n.own_text().is_some() && n.style.color.is_some() && n.style.is_visible())
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        match resolve_text_pair(cx.doc, cx.index, id) {
            Some(ResolvedPair::Resolved(check)) if !check.passes() => {
                vec![Finding::new(
                    self.id(),
                    Severity::High,
                    cx.path(id),
                    format!(
                        "Text contrast {:.2}:1 is below the required {:.1}:1{}",
                        check.ratio,
                        check.required,
                        if check.large_text { " (large text)" } else { "" }
                    ),
                )
                .with_wcag(self.wcag())
                .with_suggestion(format!(
                    "Adjust foreground or background to reach {:.1}:1",
                    check.required
                ))
                .with_impact(ImpactAssessment::low_vision())]
            }
            Some(ResolvedPair::Indeterminate) => {
                vec![Finding::new(
                    self.id(),
                    Severity::Low,
                    cx.path(id),
                    "Contrast is indeterminate: no fully opaque ancestor background",
                )
                .with_wcag(self.wcag())
                .with_suggestion("Give an ancestor an opaque background color")
                .with_impact(ImpactAssessment::low_vision())
                .as_indeterminate()]
            }
            _ => Vec::new(),
        }
    }
}

/// Non-text UI element boundaries meet 3:1 against their background.
pub struct UiContrast;

impl Rule for UiContrast {
    fn id(&self) -> &'static str {
        "ui-contrast"
    }

    fn name(&self) -> &'static str {
        "UI component contrast"
    }

    fn wcag(&self) -> &'static str {
        "1.4.11"
    }

    fn description(&self) -> &'static str {
        "Component boundaries meet the 3:1 non-text minimum"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        let Some(node) = cx.node(id) else { return false };
        node.style.border_color.is_some()
            && node.style.is_visible()
            && (node.is_native_interactive() || cx.focus.is_focusable(id))
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        match resolve_boundary_pair(cx.doc, cx.index, id) {
            Some(ResolvedPair::Resolved(check)) if !check.passes() => {
                vec![Finding::new(
                    self.id(),
                    Severity::Medium,
                    cx.path(id),
                    format!("Component boundary contrast {:.2}:1 is below 3:1", check.ratio),
                )
                .with_wcag(self.wcag())
                .with_suggestion("Darken or thicken the component boundary to reach 3:1")
                .with_impact(ImpactAssessment::low_vision())]
            }
            Some(ResolvedPair::Indeterminate) => {
                vec![Finding::new(
                    self.id(),
                    Severity::Low,
                    cx.path(id),
                    "Boundary contrast is indeterminate: no fully opaque ancestor background",
                )
                .with_wcag(self.wcag())
                .with_impact(ImpactAssessment::low_vision())
                .as_indeterminate()]
            }
            _ => Vec::new(),
        }
    }
}
