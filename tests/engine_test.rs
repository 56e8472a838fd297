// SPDX-License-Identifier: PMPL-1.0-or-later
//! End-to-end tests driving the full catalog through [`a11y_audit::evaluate`]
//! on small handcrafted document models.

use a11y_audit::model::{Binding, Color, Rect, StyleFacts, Trigger};
use a11y_audit::report::{generate_report, OutputFormat};
use a11y_audit::{evaluate, AuditConfig, DocumentModel, Node, NodeId, Severity};

const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 1.0 };
const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };

fn body(children: &[usize]) -> Node {
    Node {
        tag: "body".into(),
        style: StyleFacts { background: Some(WHITE), ..StyleFacts::default() },
        children: children.iter().map(|&i| NodeId(i)).collect(),
        ..Node::default()
    }
}

fn main_region(children: &[usize]) -> Node {
    Node {
        tag: "main".into(),
        children: children.iter().map(|&i| NodeId(i)).collect(),
        ..Node::default()
    }
}

fn text(tag: &str, content: &str) -> Node {
    Node { tag: tag.into(), text: Some(content.into()), ..Node::default() }
}

fn sized(mut node: Node, x: f64, y: f64, width: f64, height: f64) -> Node {
    node.style.bounds = Rect { x, y, width, height };
    node
}

/// A small, fully conformant page: landmark, single h1, labeled input,
/// named button, readable text, adequate target sizes.
fn clean_page() -> DocumentModel {
    let mut copy = text("p", "All orders ship within two days");
    copy.style.color = Some(BLACK);

    let mut label = text("label", "Email");
    label.attributes.insert("for".into(), "email".into());

    let mut input = sized(Node { tag: "input".into(), ..Node::default() }, 0.0, 40.0, 220.0, 44.0);
    input.attributes.insert("id".into(), "email".into());

    let button = sized(text("button", "Save"), 0.0, 100.0, 80.0, 44.0);

    DocumentModel::new(vec![
        body(&[1]),
        main_region(&[2, 3, 4, 5, 6]),
        text("h1", "Orders"),
        copy,
        label,
        input,
        button,
    ])
}

#[test]
fn clean_page_has_no_findings() {
    let findings = evaluate(&clean_page(), &AuditConfig::default()).unwrap();
    assert!(
        findings.is_empty(),
        "expected a clean pass, got: {:?}",
        findings.findings.iter().map(|f| &f.rule_id).collect::<Vec<_>>()
    );
    assert_eq!(findings.worst(), None);
}

#[test]
fn div_as_button_yields_exactly_one_interactive_finding() {
    let mut div = sized(text("div", "Open menu"), 0.0, 0.0, 100.0, 44.0);
    div.bindings.push(Binding::activate(Trigger::Click));
    let doc = DocumentModel::new(vec![body(&[1]), main_region(&[2]), div]);

    let findings = evaluate(&doc, &AuditConfig::default()).unwrap();
    assert_eq!(findings.len(), 1);
    let finding = &findings.findings[0];
    assert_eq!(finding.rule_id, "click-no-keyboard");
    assert_eq!(finding.severity, Severity::Critical);
    assert_eq!(finding.path.to_string(), "/0/0");
}

#[test]
fn widget_role_and_tabindex_repair_the_div() {
    let mut div = sized(text("div", "Open menu"), 0.0, 0.0, 100.0, 44.0);
    div.bindings.push(Binding::activate(Trigger::Click));
    div.attributes.insert("role".into(), "button".into());
    div.attributes.insert("tabindex".into(), "0".into());
    let doc = DocumentModel::new(vec![body(&[1]), main_region(&[2]), div]);

    let findings = evaluate(&doc, &AuditConfig::default()).unwrap();
    assert!(findings.is_empty());
}

#[test]
fn placeholder_only_input_flagged_and_label_repairs_it() {
    let mut unlabeled = sized(Node { tag: "input".into(), ..Node::default() }, 0.0, 0.0, 220.0, 44.0);
    unlabeled.attributes.insert("placeholder".into(), "Email".into());
    let doc = DocumentModel::new(vec![body(&[1]), main_region(&[2]), unlabeled.clone()]);

    let findings = evaluate(&doc, &AuditConfig::default()).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings.findings[0].rule_id, "control-label");
    assert_eq!(findings.findings[0].severity, Severity::High);

    unlabeled.attributes.insert("id".into(), "email".into());
    let mut label = text("label", "Email");
    label.attributes.insert("for".into(), "email".into());
    let repaired = DocumentModel::new(vec![body(&[1]), main_region(&[2, 3]), label, unlabeled]);
    assert!(evaluate(&repaired, &AuditConfig::default()).unwrap().is_empty());
}

#[test]
fn icon_only_button_yields_one_labeling_finding_on_the_control() {
    let mut button = sized(Node { tag: "button".into(), ..Node::default() }, 0.0, 0.0, 44.0, 44.0);
    button.children.push(NodeId(3));
    let icon = Node { tag: "svg".into(), ..Node::default() };
    let doc = DocumentModel::new(vec![body(&[1]), main_region(&[2]), button.clone(), icon.clone()]);

    let findings = evaluate(&doc, &AuditConfig::default()).unwrap();
    assert_eq!(findings.len(), 1, "the name belongs on the control, not the icon");
    assert_eq!(findings.findings[0].rule_id, "control-name");
    assert_eq!(findings.findings[0].path.to_string(), "/0/0");

    button.attributes.insert("aria-label".into(), "Close".into());
    let repaired = DocumentModel::new(vec![body(&[1]), main_region(&[2]), button, icon]);
    assert!(evaluate(&repaired, &AuditConfig::default()).unwrap().is_empty());
}

#[test]
fn ungated_animation_flagged_and_gating_repairs_it() {
    let mut spinner = Node { tag: "div".into(), ..Node::default() };
    spinner.style.animated = true;
    let doc = DocumentModel::new(vec![body(&[1]), spinner.clone()]);

    let findings = evaluate(&doc, &AuditConfig::default()).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings.findings[0].rule_id, "motion-gating");

    spinner.style.reduced_motion_gated = true;
    let repaired = DocumentModel::new(vec![body(&[1]), spinner]);
    assert!(evaluate(&repaired, &AuditConfig::default()).unwrap().is_empty());
}

#[test]
fn modal_without_escape_is_a_critical_trap() {
    let mut dialog = Node {
        tag: "div".into(),
        restricts_focus: true,
        children: vec![NodeId(3), NodeId(4)],
        ..Node::default()
    };
    dialog.style.bounds = Rect { x: 0.0, y: 0.0, width: 400.0, height: 200.0 };
    let ok = sized(text("button", "OK"), 0.0, 0.0, 60.0, 44.0);
    let cancel = sized(text("button", "Cancel"), 70.0, 0.0, 80.0, 44.0);
    let doc =
        DocumentModel::new(vec![body(&[1]), main_region(&[2]), dialog.clone(), ok.clone(), cancel.clone()]);

    let findings = evaluate(&doc, &AuditConfig::default()).unwrap();
    assert_eq!(findings.len(), 1);
    let finding = &findings.findings[0];
    assert_eq!(finding.rule_id, "focus-trap");
    assert_eq!(finding.severity, Severity::Critical);
    assert_eq!(finding.path.to_string(), "/0/0");

    let mut ok_with_escape = ok;
    ok_with_escape.bindings.push(Binding::escape_close());
    let repaired =
        DocumentModel::new(vec![body(&[1]), main_region(&[2]), dialog, ok_with_escape, cancel]);
    assert!(evaluate(&repaired, &AuditConfig::default()).unwrap().is_empty());
}

/// A page combining several distinct violations, for order and
/// determinism checks.
fn messy_page() -> DocumentModel {
    // Low-contrast gray, well under 4.5:1 on white.
    let mut dim = text("p", "fine print");
    dim.style.color = Some(Color::rgb(170, 170, 170));

    let unlabeled_img = Node { tag: "img".into(), ..Node::default() };

    let mut jumpy = sized(text("button", "Go"), 0.0, 0.0, 60.0, 44.0);
    jumpy.attributes.insert("tabindex".into(), "5".into());

    DocumentModel::new(vec![body(&[1]), main_region(&[2, 3, 4]), dim, unlabeled_img, jumpy])
}

#[test]
fn repeated_passes_serialize_identically() {
    let doc = messy_page();
    let config = AuditConfig::default();
    let first = evaluate(&doc, &config).unwrap();
    let second = evaluate(&doc, &config).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert!(first.len() >= 3);
}

#[test]
fn findings_come_back_severity_first_then_document_order() {
    let findings = evaluate(&messy_page(), &AuditConfig::default()).unwrap();
    let keys: Vec<_> = findings
        .findings
        .iter()
        .map(|f| (f.severity, f.path.clone(), f.rule_id.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn disabling_a_rule_suppresses_only_that_rule() {
    let doc = messy_page();
    let baseline = evaluate(&doc, &AuditConfig::default()).unwrap();
    assert!(!baseline.by_rule("text-contrast").is_empty());

    let config = AuditConfig::default().disable("text-contrast");
    let filtered = evaluate(&doc, &config).unwrap();
    assert!(filtered.by_rule("text-contrast").is_empty());
    assert_eq!(filtered.len(), baseline.len() - baseline.by_rule("text-contrast").len());
}

#[test]
fn threshold_gate_reflects_worst_finding() {
    let findings = evaluate(&messy_page(), &AuditConfig::default()).unwrap();
    assert!(findings.at_or_above(Severity::High), "image-alt and text-contrast are High");
    assert!(!findings.at_or_above(Severity::Critical));
}

#[test]
fn text_report_names_rules_and_paths() {
    let findings = evaluate(&messy_page(), &AuditConfig::default()).unwrap();
    let report = generate_report(&findings, OutputFormat::Text);
    assert!(report.contains("[text-contrast]"));
    assert!(report.contains("[image-alt]"));
    assert!(report.contains("WCAG: 1.4.3"));
}
