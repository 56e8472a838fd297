// SPDX-License-Identifier: PMPL-1.0-or-later
//! Live-region rule: announcement wiring must be valid and the region
//! must actually be exposed.

use super::{Rule, RuleContext};
use crate::aria::{effective_role, RoleKind};
use crate::finding::{Finding, ImpactAssessment, Severity};
use crate::model::{Node, NodeId};

const POLITENESS_LEVELS: &[&str] = &["off", "polite", "assertive"];

fn is_live(node: &Node) -> bool {
    effective_role(node).is_some_and(|spec| spec.kind == RoleKind::Live)
        || matches!(node.attr("aria-live"), Some("polite") | Some("assertive"))
}

/// Status messages (WCAG 4.1.3): a region wired for announcements must
/// carry a valid politeness level and must not be hidden from the
/// accessibility tree, or its updates are never spoken.
pub struct LiveRegion;

impl Rule for LiveRegion {
    fn id(&self) -> &'static str {
        "live-region"
    }

    fn name(&self) -> &'static str {
        "Live region announces"
    }

    fn wcag(&self) -> &'static str {
        "4.1.3"
    }

    fn description(&self) -> &'static str {
        "Live regions carry a valid politeness level and stay exposed"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.node(id).is_some_and(|n| n.attr("aria-live").is_some() || is_live(n))
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        let Some(node) = cx.node(id) else { return Vec::new() };
        let mut findings = Vec::new();

        if let Some(value) = node.attr("aria-live") {
            if !POLITENESS_LEVELS.contains(&value) {
                findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Medium,
                        cx.path(id),
                        format!("aria-live=\"{}\" is not a valid politeness level", value),
                    )
                    .with_wcag(self.wcag())
                    .with_suggestion("Use aria-live=\"polite\" or \"assertive\"")
                    .with_impact(ImpactAssessment::blind()),
                );
            }
        }

        let exposed = node.attr("aria-hidden") != Some("true") && !node.style.display_none;
        if is_live(node) && !exposed {
            findings.push(
                Finding::new(
                    self.id(),
                    Severity::Medium,
                    cx.path(id),
                    format!("<{}> live region is hidden; its updates are never announced", node.tag),
                )
                .with_wcag(self.wcag())
                .with_suggestion("Keep the region in the accessibility tree; hide it visually with a clipping technique instead")
                .with_impact(ImpactAssessment::blind()),
            );
        }

        findings
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

    fn region(attrs: &[(&str, &str)]) -> Node {
        let mut node = Node { tag: "div".into(), ..Node::default() };
        for (k, v) in attrs {
            node.attributes.insert(k.to_string(), v.to_string());
        }
        node
    }

    #[test]
    fn polite_region_is_clean() {
        let doc = DocumentModel::new(vec![body(&[1]), region(&[("aria-live", "polite")])]);
        assert!(evaluate_document(&doc, &LiveRegion).is_empty());
    }

    #[test]
    fn invalid_politeness_level_flagged() {
        let doc = DocumentModel::new(vec![body(&[1]), region(&[("aria-live", "rude")])]);
        let findings = evaluate_document(&doc, &LiveRegion);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("rude"));
    }

    #[test]
    fn hidden_live_region_flagged() {
        let doc = DocumentModel::new(vec![
            body(&[1]),
            region(&[("role", "status"), ("aria-hidden", "true")]),
        ]);
        let findings = evaluate_document(&doc, &LiveRegion);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("hidden"));
    }

    #[test]
    fn display_none_alert_flagged() {
        let mut alert = region(&[("role", "alert")]);
        alert.style.display_none = true;
        let doc = DocumentModel::new(vec![body(&[1]), alert]);
        assert_eq!(evaluate_document(&doc, &LiveRegion).len(), 1);
    }

    #[test]
    fn off_region_may_be_hidden() {
        let doc = DocumentModel::new(vec![
            body(&[1]),
            region(&[("aria-live", "off"), ("aria-hidden", "true")]),
        ]);
        assert!(evaluate_document(&doc, &LiveRegion).is_empty());
    }
}
