// SPDX-License-Identifier: PMPL-1.0-or-later
//! Interactive-semantics rules: pointer bindings need keyboard
//! equivalents.

use super::{Rule, RuleContext};
use crate::aria::{effective_role, RoleKind};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::{NodeId, Trigger};

/// Click bindings on non-native-interactive elements need either an
/// equivalent keyboard-activation binding, or a correct interactive
/// role plus tab reachability.
pub struct ClickNoKeyboard;

impl Rule for ClickNoKeyboard {
    fn id(&self) -> &'static str {
        "click-no-keyboard"
    }

    fn name(&self) -> &'static str {
        "Click-only interaction"
    }

    fn wcag(&self) -> &'static str {
        "2.1.1"
    }

    fn description(&self) -> &'static str {
        "Pointer-activated elements must be operable from the keyboard"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id)
            .is_some_and(|n| n.has_binding(Trigger::Click) && !n.is_native_interactive())
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };

        if node.has_keyboard_activation() {
            return Vec::new();
        }

        // A correct widget role combined with tab reachability is the
        // accepted custom-control pattern.
        let has_widget_role =
            effective_role(node).is_some_and(|spec| spec.kind == RoleKind::Widget);
        if has_widget_role && cx.focus.is_focusable(id) {
            return Vec::new();
        }

        let suggestion = if has_widget_role {
            "Make the element tab-reachable with tabindex=\"0\""
        } else {
            "Use a native <button>, or add an interactive role, tabindex, and keyboard binding"
        };

        vec![Finding::new(
            self.id(),
            Severity::Critical,
            cx.path(id),
            format!(
                "<{}> has a click binding but no keyboard equivalent and no reachable interactive role",
                node.tag
            ),
        )
        .with_wcag(self.wcag())
        .with_suggestion(suggestion)
        .with_impact(ImpactAssessment::motor())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Binding, DocumentModel, Node, NodeId};
    use crate::rules::tests::evaluate_document;

    fn body(children: &[usize]) -> Node {
        Node {
            tag: "body".into(),
            children: children.iter().map(|&i| NodeId(i)).collect(),
            ..Node::default()
        }
    }

    fn clickable_div() -> Node {
        Node {
            tag: "div".into(),
            bindings: vec![Binding::activate(Trigger::Click)],
            ..Node::default()
        }
    }

    #[test]
    fn div_as_button_flagged_once() {
        let doc = DocumentModel::new(vec![body(&[1]), clickable_div()]);
        let findings = evaluate_document(&doc, &ClickNoKeyboard);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].path.to_string(), "/0");
    }

    #[test]
    fn keyboard_binding_clears_it() {
        let mut div = clickable_div();
        div.bindings.push(Binding::activate(Trigger::Enter));
        let doc = DocumentModel::new(vec![body(&[1]), div]);
        assert!(evaluate_document(&doc, &ClickNoKeyboard).is_empty());
    }

    #[test]
    fn native_button_never_applies() {
        let mut button = clickable_div();
        button.tag = "button".into();
        let doc = DocumentModel::new(vec![body(&[1]), button]);
        assert!(evaluate_document(&doc, &ClickNoKeyboard).is_empty());
    }

    #[test]
    fn widget_role_with_tab_reachability_accepted() {
        let mut div = clickable_div();
        div.attributes.insert("role".into(), "button".into());
        div.attributes.insert("tabindex".into(), "0".into());
        let doc = DocumentModel::new(vec![body(&[1]), div]);
        assert!(evaluate_document(&doc, &ClickNoKeyboard).is_empty());
    }

    #[test]
    fn widget_role_without_reachability_flagged() {
        let mut div = clickable_div();
        div.attributes.insert("role".into(), "button".into());
        let doc = DocumentModel::new(vec![body(&[1]), div]);
        let findings = evaluate_document(&doc, &ClickNoKeyboard);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].suggestion.as_deref().unwrap().contains("tab-reachable"));
    }
}
