// SPDX-License-Identifier: PMPL-1.0-or-later
//! Focus graph construction: tab order, scope reachability, and
//! keyboard-trap candidates.
//!
//! Built once per evaluation pass from the immutable document model and
//! never mutated in place; a changed model means a rebuilt graph.
//!
//! Explicit positive tab-index overrides are modeled faithfully:
//! positive values sort ahead of document order (ascending, ties broken
//! by document order), exactly as user agents sequence them. The
//! pattern itself is reported by an advisory rule, not suppressed here.

use crate::model::{DocumentIndex, DocumentModel, NodeId};
use std::collections::HashSet;

/// An active focus-restricting scope (e.g. an open modal) and the
/// focusable nodes confined within it.
#[derive(Debug, Clone)]
pub struct FocusScope {
    /// The scope container node
    pub container: NodeId,
    /// Focusable descendants, in tab order
    pub members: Vec<NodeId>,
    /// A modeled keyboard escape (Escape -> close) exists in the scope
    pub has_escape: bool,
}

impl FocusScope {
    /// A scope that confines focus but models no keyboard way out.
    pub fn is_trap_candidate(&self) -> bool {
        !self.members.is_empty() && !self.has_escape
    }
}

/// Derived keyboard-navigation facts for one document.
#[derive(Debug, Clone)]
pub struct FocusGraph {
    /// Strict total tab order over focusable nodes
    pub order: Vec<NodeId>,
    /// Active focus-restricting scopes in document order
    pub scopes: Vec<FocusScope>,
    /// Focusable nodes outside every active scope (empty when no scope
    /// is active)
    pub unreachable: Vec<NodeId>,
    activatable: HashSet<NodeId>,
    positions: Vec<Option<usize>>,
}

impl FocusGraph {
    /// Build the graph by traversing the model in document order.
    pub fn build(doc: &DocumentModel, index: &DocumentIndex) -> Self {
        // (tabindex, document position, id) for every focusable node.
        let mut entries: Vec<(i32, usize, NodeId)> = Vec::new();
        let mut activatable = HashSet::new();

        for (position, &id) in index.order.iter().enumerate() {
            let Some(node) = doc.get(id) else { continue };
            if node.is_native_interactive() || node.has_keyboard_activation() {
                activatable.insert(id);
            }
            if !is_focusable(doc, id) {
                continue;
            }
            let tabindex = node.tabindex().unwrap_or(0).max(0);
            entries.push((tabindex, position, id));
        }

        // Positive overrides first (ascending), then document order.
        entries.sort_by_key(|&(tabindex, position, _)| {
            (if tabindex > 0 { (0, tabindex) } else { (1, 0) }, position)
        });
        let order: Vec<NodeId> = entries.iter().map(|&(_, _, id)| id).collect();

        let mut positions = vec![None; doc.len()];
        for (position, &id) in order.iter().enumerate() {
            positions[id.0] = Some(position);
        }

        // Active restricting scopes and their confined members.
        let mut scopes = Vec::new();
        for &container in &index.order {
            let restricts = doc.get(container).map(|n| n.restricts_focus).unwrap_or(false);
            if !restricts {
                continue;
            }
            let members: Vec<NodeId> = order
                .iter()
                .copied()
                .filter(|&id| index.is_ancestor(container, id))
                .collect();
            let has_escape = index
                .order
                .iter()
                .filter(|&&id| id == container || index.is_ancestor(container, id))
                .any(|&id| doc.get(id).is_some_and(|n| n.has_escape_close()));
            scopes.push(FocusScope { container, members, has_escape });
        }

        // While any scope is active, focus cannot reach nodes outside
        // all of them.
        let unreachable = if scopes.is_empty() {
            Vec::new()
        } else {
            let confined: HashSet<NodeId> =
                scopes.iter().flat_map(|s| s.members.iter().copied()).collect();
            order.iter().copied().filter(|id| !confined.contains(id)).collect()
        };

        FocusGraph { order, scopes, unreachable, activatable, positions }
    }

    /// Position of a node in the tab order.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.positions.get(id.0).copied().flatten()
    }

    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    /// Whether Enter/Space activate the node (natively or by binding).
    pub fn is_keyboard_activatable(&self, id: NodeId) -> bool {
        self.activatable.contains(&id)
    }

    /// Scopes that confine focus without a modeled keyboard escape.
    pub fn trap_candidates(&self) -> impl Iterator<Item = &FocusScope> {
        self.scopes.iter().filter(|s| s.is_trap_candidate())
    }
}

/// A node participates in the tab order if it is rendered and either
/// natively focusable or carries a non-negative tab-index-equivalent.
/// Zero-area nodes stay in the order; the hidden-focusable rule flags
/// them separately.
fn is_focusable(doc: &DocumentModel, id: NodeId) -> bool {
    let Some(node) = doc.get(id) else { return false };
    if !node.style.is_visible() {
        return false;
    }
    if node.attr("disabled").is_some() {
        return false;
    }
    match node.tabindex() {
        Some(value) => value >= 0,
        None => node.is_native_interactive(),
    }
}
