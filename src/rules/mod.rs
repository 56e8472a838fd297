// SPDX-License-Identifier: PMPL-1.0-or-later
//! The rule catalog: independent, pure rule units registered in a table.
//!
//! Each rule carries a stable id, an applicability filter, and an
//! evaluation function over read-only derived facts. Rules never mutate
//! shared state and never observe another rule's findings, which is
//! what makes parallel dispatch and per-rule fault isolation sound.
//!
//! Document-scoped rules (heading structure, landmarks, focus traps)
//! declare applicability on the root node only, so they run exactly
//! once per pass.

pub mod contrast;
pub mod focus;
pub mod interactive;
pub mod labeling;
pub mod live;
pub mod motion;
pub mod state;
pub mod structure;
pub mod target_size;

use crate::aria::AriaViolation;
use crate::config::AuditConfig;
use crate::finding::Finding;
use crate::focus::FocusGraph;
use crate::model::{DocumentIndex, DocumentModel, Node, NodeId, NodePath};

/// Read-only view of the document and its derived facts, handed to
/// every rule invocation.
pub struct RuleContext<'a> {
    pub doc: &'a DocumentModel,
    pub index: &'a DocumentIndex,
    pub focus: &'a FocusGraph,
    /// ARIA validity violations per arena slot
    pub aria: &'a [Vec<AriaViolation>],
    pub config: &'a AuditConfig,
}

impl<'a> RuleContext<'a> {
    pub fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.doc.get(id)
    }

    /// Path of a node; unreachable slots report as the root path, which
    /// indexing has already flagged as a model violation.
    pub fn path(&self, id: NodeId) -> NodePath {
        self.index.path(id).cloned().unwrap_or_else(NodePath::root)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.doc.root()
    }

    /// Descendants of `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.index
            .order
            .iter()
            .copied()
            .filter(|&other| self.index.is_ancestor(id, other))
            .collect()
    }
}

/// A single conformance rule.
pub trait Rule: Send + Sync {
    /// Stable identifier, unique within the catalog
    fn id(&self) -> &'static str;
    /// Human-readable name
    fn name(&self) -> &'static str;
    /// WCAG success criterion this rule enforces
    fn wcag(&self) -> &'static str;
    /// One-line description for catalog listings
    fn description(&self) -> &'static str;
    /// Applicability filter: which nodes this rule inspects
    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool;
    /// Pure evaluation producing zero or more findings
    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding>;
}

/// Build the full catalog, in registration order. Registration order is
/// part of the dedupe contract ("keep first"), so additions belong at
/// the end of their family block.
pub fn catalog() -> Vec<Box<dyn Rule>> {
    vec![
        // Structure
        Box::new(structure::SingleH1),
        Box::new(structure::HeadingSkip),
        Box::new(structure::LandmarkMissing),
        Box::new(structure::LandmarkDuplicate),
        // Interactive semantics
        Box::new(interactive::ClickNoKeyboard),
        // Labeling
        Box::new(labeling::ControlLabel),
        Box::new(labeling::ControlName),
        Box::new(labeling::ImageAlt),
        // Contrast
        Box::new(contrast::TextContrast),
        Box::new(contrast::UiContrast),
        // Motion
        Box::new(motion::MotionGating),
        // Focus
        Box::new(focus::FocusTrap),
        Box::new(focus::FocusOrderMismatch),
        Box::new(focus::FocusUnreachable),
        Box::new(focus::HiddenFocusable),
        Box::new(focus::PositiveTabindex),
        // Target size
        Box::new(target_size::TargetSize),
        // State exposure
        Box::new(state::StateSync),
        // Live regions
        Box::new(live::LiveRegion),
        // ARIA validity
        Box::new(AriaValidity),
    ]
}

/// Ids of every registered rule, for config validation and listings.
pub fn rule_ids() -> Vec<&'static str> {
    catalog().iter().map(|r| r.id()).collect()
}


/// Consumes the ARIA checker's typed violations and assigns severity.
pub struct AriaValidity;

impl Rule for AriaValidity {
    fn id(&self) -> &'static str {
        "aria-validity"
    }

    fn name(&self) -> &'static str {
        "ARIA role and attribute validity"
    }

    fn wcag(&self) -> &'static str {
        "4.1.2"
    }

    fn description(&self) -> &'static str {
        "Roles must exist, carry their required states, and not contradict native semantics"
    }

    fn applies(&self, id: NodeId, cx: &RuleContext) -> bool {
        cx.aria.get(id.0).is_some_and(|v| !v.is_empty())
    }

    fn evaluate(&self, id: NodeId, cx: &RuleContext) -> Vec<Finding> {
        use crate::finding::{ImpactAssessment, Severity};
        let Some(violations) = cx.aria.get(id.0) else { return Vec::new() };
        violations
            .iter()
            .map(|violation| {
                let severity = match violation {
                    AriaViolation::MissingRequired { .. } | AriaViolation::NativeConflict { .. } => {
                        Severity::High
                    }
                    AriaViolation::UnknownRole { .. }
                    | AriaViolation::NotPermitted { .. }
                    | AriaViolation::Unscoped { .. } => Severity::Medium,
                };
                let suggestion = match violation {
                    AriaViolation::UnknownRole { role } => {
                        format!("Replace \"{}\" with a role from the ARIA specification", role)
                    }
                    AriaViolation::MissingRequired { attribute, .. } => {
                        format!("Add the {} attribute with a meaningful value", attribute)
                    }
                    AriaViolation::NotPermitted { attribute, .. } => {
                        format!("Remove the {} attribute or change the role", attribute)
                    }
                    AriaViolation::NativeConflict { tag, .. } => {
                        format!("Remove the role attribute and keep the native <{}> semantics", tag)
                    }
                    AriaViolation::Unscoped { attribute } => {
                        format!("Give the element a role that supports {}, or remove it", attribute)
                    }
                };
                Finding::new(self.id(), severity, cx.path(id), violation.to_string())
                    .with_wcag(self.wcag())
                    .with_suggestion(suggestion)
                    .with_impact(ImpactAssessment::blind())
            })
            .collect()
    }
}
