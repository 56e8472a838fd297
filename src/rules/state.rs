// SPDX-License-Identifier: PMPL-1.0-or-later
//! State-exposure rule: visually implied states must be mirrored by the
//! matching ARIA state attribute.

use super::{Rule, RuleContext};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::{Node, NodeId};

/// class token -> required ARIA state attribute.
const STATE_CLASSES: &[(&str, &str)] = &[
    ("checked", "aria-checked"),
    ("selected", "aria-selected"),
    ("expanded", "aria-expanded"),
    ("open", "aria-expanded"),
    ("pressed", "aria-pressed"),
    ("active", "aria-pressed"),
    ("invalid", "aria-invalid"),
    ("error", "aria-invalid"),
];

fn class_tokens(node: &Node) -> Vec<&str> {
    node.attr("class").map(|c| c.split_whitespace().collect()).unwrap_or_default()
}

/// Visual state classes whose ARIA counterpart is absent or negated.
fn unsynced_states<'a>(node: &'a Node) -> Vec<(&'a str, &'static str)> {
    let tokens = class_tokens(node);
    let mut missing = Vec::new();
    for &(class, attribute) in STATE_CLASSES {
        if !tokens.contains(&class) {
            continue;
        }
        match node.attr(attribute) {
            // "is-checked" class with aria-checked="false" is the
            // mismatch case; absence is the unexposed case.
            Some("false") | None => missing.push((class, attribute)),
            Some(_) => {}
        }
    }
    missing
}

pub struct StateSync;

impl Rule for StateSync {
    fn id(&self) -> &'static str {
        "state-sync"
    }

    fn name(&self) -> &'static str {
        "Exposed state matches visual state"
    }

    fn wcag(&self) -> &'static str {
        "4.1.2"
    }

    fn description(&self) -> &'static str {
        "Visually implied states carry synchronized ARIA state attributes"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id).is_some_and(|n| !class_tokens(n).is_empty() && n.style.is_visible())
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        unsynced_states(node)
            .into_iter()
            .map(|(class, attribute)| {
                let exposed = node.attr(attribute);
                let message = match exposed {
                    Some(value) => format!(
                        "Class \"{}\" implies a state but {}=\"{}\" contradicts it",
                        class, attribute, value
                    ),
                    None => format!(
                        "Class \"{}\" implies a state but {} is not exposed",
                        class, attribute
                    ),
                };
                Finding::new(self.id(), Severity::Medium, cx.path(id), message)
                    .with_wcag(self.wcag())
                    .with_suggestion(format!("Set {}=\"true\" whenever the visual state applies", attribute))
                    .with_impact(ImpactAssessment::blind())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentModel, Node, NodeId};
    use crate::rules::tests::evaluate_document;

    fn doc_with_classes(class: &str, aria: Option<(&str, &str)>) -> DocumentModel {
        let mut node = Node { tag: "button".into(), text: Some("toggle".into()), ..Node::default() };
        node.attributes.insert("class".into(), class.to_string());
        if let Some((k, v)) = aria {
            node.attributes.insert(k.to_string(), v.to_string());
        }
        DocumentModel::new(vec![
            Node { tag: "body".into(), children: vec![NodeId(1)], ..Node::default() },
            node,
        ])
    }

    #[test]
    fn visual_state_without_aria_flagged() {
        let doc = doc_with_classes("btn expanded", None);
        let findings = evaluate_document(&doc, &StateSync);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("aria-expanded"));
    }

    #[test]
    fn false_value_is_a_mismatch() {
        let doc = doc_with_classes("checked", Some(("aria-checked", "false")));
        let findings = evaluate_document(&doc, &StateSync);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("contradicts"));
    }

    #[test]
    fn synchronized_state_is_clean() {
        let doc = doc_with_classes("checked", Some(("aria-checked", "true")));
        assert!(evaluate_document(&doc, &StateSync).is_empty());
    }

    #[test]
    fn unrelated_classes_ignored() {
        let doc = doc_with_classes("btn btn-primary large", None);
        assert!(evaluate_document(&doc, &StateSync).is_empty());
    }
}
