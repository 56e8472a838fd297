// SPDX-License-Identifier: PMPL-1.0-or-later
//! Normalized document model consumed by the conformance engine.
//!
//! The model is an arena tree: nodes live in a flat vector and refer to
//! children by index. It is supplied fully built by an external loader;
//! the engine only ever holds read-only references to it. Structural
//! problems (child references pointing outside the arena, a node claimed
//! by two parents) are collected as [`ModelViolation`]s during indexing
//! and surfaced as `model-invalid` findings, never as panics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Index of a node in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Stable identity of a node: the chain of child indices from the root.
///
/// Lexicographic ordering on the index chain is exactly preorder
/// document order, which the engine's deterministic sort relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

/// A resolved RGBA color. Alpha is in [0, 1]; 1.0 is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque_alpha")]
    pub a: f64,
}

fn opaque_alpha() -> f64 {
    1.0
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

/// Resolved bounding box in logical units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Computed style snapshot attached to a node by the loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleFacts {
    /// Foreground (text) color, when the node renders text
    pub color: Option<Color>,
    /// Background color; `None` means transparent
    pub background: Option<Color>,
    /// Border/boundary color for non-text UI elements
    pub border_color: Option<Color>,
    /// Font size in points
    pub font_size_pt: f64,
    /// Bold weight (>= 700)
    pub bold: bool,
    /// Resolved bounding box
    pub bounds: Rect,
    /// display: none
    pub display_none: bool,
    /// visibility: hidden
    pub visibility_hidden: bool,
    /// A continuous or auto-playing animation applies to the node
    pub animated: bool,
    /// The animation is wrapped in a reduced-motion style condition
    pub reduced_motion_gated: bool,
}

impl StyleFacts {
    /// Whether the node is rendered at all.
    pub fn is_visible(&self) -> bool {
        !self.display_none && !self.visibility_hidden
    }
}

/// What a keyboard or pointer gesture is bound to on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Click,
    Enter,
    Space,
    Escape,
}

/// The modeled effect of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Activates the control
    Activate,
    /// Closes the nearest enclosing focus-restricting scope
    CloseScope,
}

/// An interaction binding on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub trigger: Trigger,
    pub effect: Effect,
}

impl Binding {
    pub fn activate(trigger: Trigger) -> Self {
        Self { trigger, effect: Effect::Activate }
    }

    pub fn escape_close() -> Self {
        Self { trigger: Trigger::Escape, effect: Effect::CloseScope }
    }
}

/// Tags that are natively keyboard-focusable and activatable.
pub const NATIVE_INTERACTIVE_TAGS: &[&str] =
    &["a", "button", "input", "select", "textarea", "details", "summary"];

/// Tags whose content is graphical rather than textual.
pub const GRAPHICAL_TAGS: &[&str] = &["img", "svg", "canvas", "icon"];

/// Tags that are form controls and need a label relation.
pub const FORM_CONTROL_TAGS: &[&str] = &["input", "select", "textarea"];

/// A single node of the document model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Element tag, lowercase
    pub tag: String,
    /// Attribute map; `role` and `aria-*` attributes live here
    pub attributes: BTreeMap<String, String>,
    /// Direct text content, if any
    pub text: Option<String>,
    /// Interaction bindings
    pub bindings: Vec<Binding>,
    /// The node is an active focus-restricting scope (e.g. open modal)
    pub restricts_focus: bool,
    /// Computed style snapshot
    pub style: StyleFacts,
    /// Ordered child references into the arena
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Explicit ARIA role, if any.
    pub fn role(&self) -> Option<&str> {
        self.attr("role")
    }

    /// Parsed tab-index-equivalent attribute.
    pub fn tabindex(&self) -> Option<i32> {
        self.attr("tabindex").and_then(|v| v.parse().ok())
    }

    pub fn has_binding(&self, trigger: Trigger) -> bool {
        self.bindings.iter().any(|b| b.trigger == trigger)
    }

    /// Any Enter/Space activation binding.
    pub fn has_keyboard_activation(&self) -> bool {
        self.bindings.iter().any(|b| {
            matches!(b.trigger, Trigger::Enter | Trigger::Space) && b.effect == Effect::Activate
        })
    }

    /// A modeled keyboard-triggered close of the enclosing scope.
    pub fn has_escape_close(&self) -> bool {
        self.bindings
            .iter()
            .any(|b| b.trigger == Trigger::Escape && b.effect == Effect::CloseScope)
    }

    pub fn is_native_interactive(&self) -> bool {
        if self.tag == "a" {
            // An anchor without href is not focusable
            return self.attr("href").is_some();
        }
        NATIVE_INTERACTIVE_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_form_control(&self) -> bool {
        FORM_CONTROL_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_graphical(&self) -> bool {
        GRAPHICAL_TAGS.contains(&self.tag.as_str()) || self.role() == Some("img")
    }

    /// Heading level for h1..h6 tags or role=heading with aria-level.
    pub fn heading_level(&self) -> Option<u8> {
        if let Some(level) = self.tag.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=6).contains(&level) && self.tag.len() == 2 {
                return Some(level);
            }
        }
        if self.role() == Some("heading") {
            // Out-of-range aria-level values fall back to the default.
            return self
                .attr("aria-level")
                .and_then(|v| v.parse::<u8>().ok())
                .filter(|level| (1..=6).contains(level))
                .or(Some(2));
        }
        None
    }

    /// Non-empty trimmed text content of this node alone.
    pub fn own_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Marked decorative: empty alt, aria-hidden, or a semantics-stripping role.
    pub fn is_decorative(&self) -> bool {
        self.attr("alt") == Some("")
            || self.attr("aria-hidden") == Some("true")
            || matches!(self.role(), Some("presentation") | Some("none"))
    }
}

/// Errors constructing a document model from external input.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("document model is empty")]
    Empty,
    #[error("failed to parse document model: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A structural precondition violated by the supplied model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelViolation {
    /// A child reference points outside the arena.
    ChildOutOfBounds { parent: NodeId, child: NodeId },
    /// A node is referenced by more than one parent (or forms a cycle).
    SharedChild { parent: NodeId, child: NodeId },
}

/// The immutable document tree, owned by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentModel {
    pub nodes: Vec<Node>,
}

impl DocumentModel {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Deserialize a model from its JSON form.
    pub fn from_json(input: &str) -> Result<Self, ModelError> {
        let model: DocumentModel = serde_json::from_str(input)?;
        if model.nodes.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(model)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build the traversal index for this model, collecting structural
    /// violations instead of failing.
    pub fn index(&self) -> DocumentIndex {
        DocumentIndex::build(self)
    }
}

/// Preorder traversal facts derived once per evaluation pass.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    /// Reachable nodes in preorder document order
    pub order: Vec<NodeId>,
    /// Path per arena slot; `None` for unreachable or invalid slots
    paths: Vec<Option<NodePath>>,
    /// Parent per arena slot
    parents: Vec<Option<NodeId>>,
    /// Position in `order` per arena slot
    positions: Vec<Option<usize>>,
    /// Structural violations found while indexing
    pub violations: Vec<ModelViolation>,
}

impl DocumentIndex {
    fn build(doc: &DocumentModel) -> Self {
        let n = doc.nodes.len();
        let mut index = DocumentIndex {
            order: Vec::with_capacity(n),
            paths: vec![None; n],
            parents: vec![None; n],
            positions: vec![None; n],
            violations: Vec::new(),
        };
        if n == 0 {
            return index;
        }

        // Iterative preorder walk; a stack of (id, path) pairs.
        let mut stack = vec![(doc.root(), NodePath::root())];
        index.paths[0] = Some(NodePath::root());
        while let Some((id, path)) = stack.pop() {
            index.positions[id.0] = Some(index.order.len());
            index.order.push(id);
            let node = &doc.nodes[id.0];
            // Push in reverse so children pop in document order.
            for (child_index, &child) in node.children.iter().enumerate().rev() {
                if child.0 >= n {
                    index
                        .violations
                        .push(ModelViolation::ChildOutOfBounds { parent: id, child });
                    continue;
                }
                if index.paths[child.0].is_some() || child == doc.root() {
                    index
                        .violations
                        .push(ModelViolation::SharedChild { parent: id, child });
                    continue;
                }
                let child_path = path.child(child_index);
                index.paths[child.0] = Some(child_path.clone());
                index.parents[child.0] = Some(id);
                stack.push((child, child_path));
            }
        }
        index
    }

    pub fn path(&self, id: NodeId) -> Option<&NodePath> {
        self.paths.get(id.0).and_then(Option::as_ref)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// Position of the node in document order.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.positions.get(id.0).copied().flatten()
    }

    /// Ancestor chain from the node's parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    /// Whether `ancestor` is on the path from `id` to the root.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }
}
