// SPDX-License-Identifier: PMPL-1.0-or-later
//! Labeling rules: form controls need label relations, controls need
//! accessible names, graphics need text alternatives.
//!
//! Accessible-name resolution here is deliberately shallow: an explicit
//! aria-label/aria-labelledby, an alt attribute, a label element
//! associated by `for`/id, or visible text content. Full name
//! computation is a user-agent concern; rules only need "is there a
//! non-empty name source".

use super::{Rule, RuleContext};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::{Node, NodeId};

/// A non-empty explicit name attribute on the node itself.
fn explicit_name(node: &Node) -> bool {
    ["aria-label", "aria-labelledby", "alt", "title"]
        .iter()
        .any(|attr| node.attr(attr).is_some_and(|v| !v.trim().is_empty()))
}

/// A `<label for="...">` in the document pointing at this control's id.
fn has_label_relation(node: &Node, cx: &RuleContext) -> bool {
    if node
        .attr("aria-label")
        .or(node.attr("aria-labelledby"))
        .is_some_and(|v| !v.trim().is_empty())
    {
        return true;
    }
    let Some(control_id) = node.attr("id") else { return false };
    cx.index.order.iter().any(|&other| {
        cx.node(other)
            .is_some_and(|n| n.tag == "label" && n.attr("for") == Some(control_id))
    })
}

/// The nearest interactive ancestor, if any.
fn interactive_ancestor(id: NodeId, cx: &RuleContext) -> Option<NodeId> {
    cx.index.ancestors(id).into_iter().find(|&ancestor| {
        cx.node(ancestor)
            .is_some_and(|n| n.is_native_interactive() || cx.focus.is_keyboard_activatable(ancestor))
    })
}

/// Any name source in a subtree: own text, explicit name, or a named
/// non-decorative graphic.
fn subtree_has_name(id: NodeId, cx: &RuleContext) -> bool {
    let Some(node) = cx.node(id) else { return false };
    if node.own_text().is_some() || explicit_name(node) {
        return true;
    }
    node.children.iter().any(|&child| subtree_has_name(child, cx))
}

/// Every form control has an associated label relation; a placeholder
/// is not a label.
pub struct ControlLabel;

impl Rule for ControlLabel {
    fn id(&self) -> &'static str {
        "control-label"
    }

    fn name(&self) -> &'static str {
        "Form control label"
    }

    fn wcag(&self) -> &'static str {
        "3.3.2"
    }

    fn description(&self) -> &'static str {
        "Form controls carry a label relation, not merely a placeholder"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id).is_some_and(|n| n.is_form_control() && n.style.is_visible())
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        // Hidden inputs and buttons label themselves.
        if matches!(node.attr("type"), Some("hidden") | Some("submit") | Some("button")) {
            return Vec::new();
        }
        if has_label_relation(node, cx) {
            return Vec::new();
        }
        let message = if node.attr("placeholder").is_some() {
            format!(
                "<{}> relies on a placeholder for its label; placeholders disappear on input",
                node.tag
            )
        } else {
            format!("<{}> has no associated label", node.tag)
        };
        vec![Finding::new(self.id(), Severity::High, cx.path(id), message)
            .with_wcag(self.wcag())
            .with_suggestion("Associate a <label for=\"...\"> or add aria-label")
            .with_impact(ImpactAssessment::visual())]
    }
}

/// Interactive controls whose content is only graphical need a name.
pub struct ControlName;

impl Rule for ControlName {
    fn id(&self) -> &'static str {
        "control-name"
    }

    fn name(&self) -> &'static str {
        "Control accessible name"
    }

    fn wcag(&self) -> &'static str {
        "4.1.2"
    }

    fn description(&self) -> &'static str {
        "Interactive controls expose a non-empty accessible name"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        let Some(node) = cx.node(id) else { return false };
        // Form controls are ControlLabel's concern.
        (node.is_native_interactive() || cx.focus.is_keyboard_activatable(id))
            && !node.is_form_control()
            && node.style.is_visible()
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        if explicit_name(node) || subtree_has_name(id, cx) {
            return Vec::new();
        }
        vec![Finding::new(
            self.id(),
            Severity::High,
            cx.path(id),
            format!("<{}> control has no text content and no accessible-name source", node.tag),
        )
        .with_wcag(self.wcag())
        .with_suggestion("Add visible text, or aria-label on the control")
        .with_impact(ImpactAssessment::blind())]
    }
}

/// Graphical nodes need a text alternative unless marked decorative.
pub struct ImageAlt;

impl Rule for ImageAlt {
    fn id(&self) -> &'static str {
        "image-alt"
    }

    fn name(&self) -> &'static str {
        "Text alternative for graphics"
    }

    fn wcag(&self) -> &'static str {
        "1.1.1"
    }

    fn description(&self) -> &'static str {
        "Graphical content carries a text alternative or is marked decorative"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id).is_some_and(|n| n.is_graphical() && n.style.is_visible())
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        if node.is_decorative() || explicit_name(node) {
            return Vec::new();
        }
        // Inside an interactive control the name belongs on the control;
        // ControlName reports that case.
        if interactive_ancestor(id, cx).is_some() {
            return Vec::new();
        }
        vec![Finding::new(
            self.id(),
            Severity::High,
            cx.path(id),
            format!("<{}> has no text alternative and is not marked decorative", node.tag),
        )
        .with_wcag(self.wcag())
        .with_suggestion("Add a meaningful alt attribute, or alt=\"\" if purely decorative")
        .with_impact(ImpactAssessment::blind())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentModel, Node, NodeId};
    use crate::rules::tests::evaluate_document;

    fn body(children: &[usize]) -> Node {
        Node {
            tag: "body".into(),
            children: children.iter().map(|&i| NodeId(i)).collect(),
            ..Node::default()
        }
    }

    fn input() -> Node {
        Node { tag: "input".into(), ..Node::default() }
    }

    #[test]
    fn placeholder_only_input_flagged() {
        let mut control = input();
        control.attributes.insert("placeholder".into(), "Email".into());
        let doc = DocumentModel::new(vec![body(&[1]), control]);
        let findings = evaluate_document(&doc, &ControlLabel);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("placeholder"));
    }

    #[test]
    fn label_for_relation_clears_it() {
        let mut control = input();
        control.attributes.insert("placeholder".into(), "Email".into());
        control.attributes.insert("id".into(), "email".into());
        let mut label = Node { tag: "label".into(), text: Some("Email".into()), ..Node::default() };
        label.attributes.insert("for".into(), "email".into());
        let doc = DocumentModel::new(vec![body(&[1, 2]), label, control]);
        assert!(evaluate_document(&doc, &ControlLabel).is_empty());
    }

    #[test]
    fn aria_label_clears_it() {
        let mut control = input();
        control.attributes.insert("aria-label".into(), "Email".into());
        let doc = DocumentModel::new(vec![body(&[1]), control]);
        assert!(evaluate_document(&doc, &ControlLabel).is_empty());
    }

    fn icon_button(named: bool) -> DocumentModel {
        let mut button = Node {
            tag: "button".into(),
            children: vec![NodeId(2)],
            ..Node::default()
        };
        if named {
            button.attributes.insert("aria-label".into(), "Close".into());
        }
        let icon = Node { tag: "svg".into(), ..Node::default() };
        DocumentModel::new(vec![body(&[1]), button, icon])
    }

    #[test]
    fn icon_only_control_produces_one_labeling_finding() {
        let doc = icon_button(false);
        let control = evaluate_document(&doc, &ControlName);
        let image = evaluate_document(&doc, &ImageAlt);
        assert_eq!(control.len(), 1, "control-name should fire once");
        assert!(image.is_empty(), "image-alt defers to the enclosing control");
        assert_eq!(control[0].path.to_string(), "/0");
    }

    #[test]
    fn naming_the_control_clears_it() {
        let doc = icon_button(true);
        assert!(evaluate_document(&doc, &ControlName).is_empty());
        assert!(evaluate_document(&doc, &ImageAlt).is_empty());
    }

    #[test]
    fn standalone_image_needs_alt() {
        let doc = DocumentModel::new(vec![body(&[1]), Node { tag: "img".into(), ..Node::default() }]);
        assert_eq!(evaluate_document(&doc, &ImageAlt).len(), 1);
    }

    #[test]
    fn decorative_image_is_clean() {
        let mut img = Node { tag: "img".into(), ..Node::default() };
        img.attributes.insert("alt".into(), "".into());
        let doc = DocumentModel::new(vec![body(&[1]), img]);
        assert!(evaluate_document(&doc, &ImageAlt).is_empty());
    }

    #[test]
    fn text_button_is_clean() {
        let button = Node { tag: "button".into(), text: Some("Save".into()), ..Node::default() };
        let doc = DocumentModel::new(vec![body(&[1]), button]);
        assert!(evaluate_document(&doc, &ControlName).is_empty());
    }
}
