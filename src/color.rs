// SPDX-License-Identifier: PMPL-1.0-or-later
//! Contrast math per WCAG 2.x.
//!
//! Relative luminance uses the piecewise sRGB linearization and the
//! 0.2126/0.7152/0.0722 channel weights; the contrast ratio is
//! `(L1 + 0.05) / (L2 + 0.05)` with L1 >= L2.
//! <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
//!
//! Compositing is transparency-aware: a translucent background is
//! blended over ancestor backgrounds until a fully opaque one is found.
//! When no opaque ancestor exists the pair is [`Indeterminate`] - a
//! reportable condition, not an error.

use crate::model::{Color, DocumentIndex, DocumentModel, NodeId};

/// AA minimum ratio for normal text.
pub const NORMAL_TEXT_RATIO: f64 = 4.5;
/// AA minimum ratio for large text and non-text UI boundaries.
pub const LARGE_TEXT_RATIO: f64 = 3.0;

/// Large text per WCAG: >= 18pt, or >= 14pt bold.
pub fn is_large_text(font_size_pt: f64, bold: bool) -> bool {
    font_size_pt >= 18.0 || (bold && font_size_pt >= 14.0)
}

/// Relative luminance of an opaque color.
pub fn relative_luminance(color: Color) -> f64 {
    let channel = |c: u8| {
        let v = c as f64 / 255.0;
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(color.r) + 0.7152 * channel(color.g) + 0.0722 * channel(color.b)
}

/// Contrast ratio between two opaque colors, always >= 1.0.
pub fn contrast_ratio(fg: Color, bg: Color) -> f64 {
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Alpha-blend `top` over an opaque `bottom`.
fn composite(top: Color, bottom: Color) -> Color {
    let a = top.a.clamp(0.0, 1.0);
    let blend = |t: u8, b: u8| ((t as f64 * a) + (b as f64 * (1.0 - a))).round() as u8;
    Color::rgb(blend(top.r, bottom.r), blend(top.g, bottom.g), blend(top.b, bottom.b))
}

/// A resolved foreground/background pair with its applicable threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastCheck {
    pub ratio: f64,
    /// The AA ratio this pair must meet (4.5 normal, 3.0 large)
    pub required: f64,
    pub large_text: bool,
}

impl ContrastCheck {
    pub fn passes(&self) -> bool {
        self.ratio >= self.required
    }
}

/// Outcome of resolving a node's effective color pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedPair {
    Resolved(ContrastCheck),
    /// No fully opaque background could be found up the ancestor chain.
    Indeterminate,
}

/// Resolve the effective background color behind a node by walking its
/// ancestor chain, compositing translucent layers front to back.
pub fn effective_background(
    doc: &DocumentModel,
    index: &DocumentIndex,
    id: NodeId,
) -> Option<Color> {
    let mut layers: Vec<Color> = Vec::new();
    let mut current = Some(id);
    while let Some(node_id) = current {
        if let Some(bg) = doc.get(node_id).and_then(|n| n.style.background) {
            if bg.is_opaque() {
                // Blend the collected translucent layers back-to-front.
                let mut resolved = bg;
                while let Some(top) = layers.pop() {
                    resolved = composite(top, resolved);
                }
                return Some(resolved);
            }
            layers.push(bg);
        }
        current = index.parent(node_id);
    }
    None
}

/// Resolve the contrast check for a text-bearing node.
///
/// Returns `None` when the node has no foreground color (nothing to
/// check), `Indeterminate` when the background cannot be resolved.
pub fn resolve_text_pair(
    doc: &DocumentModel,
    index: &DocumentIndex,
    id: NodeId,
) -> Option<ResolvedPair> {
    let node = doc.get(id)?;
    let fg = node.style.color?;
    let large = is_large_text(node.style.font_size_pt, node.style.bold);
    let required = if large { LARGE_TEXT_RATIO } else { NORMAL_TEXT_RATIO };
    match effective_background(doc, index, id) {
        Some(bg) => {
            // A translucent foreground renders blended with its background.
            let fg = if fg.is_opaque() { fg } else { composite(fg, bg) };
            Some(ResolvedPair::Resolved(ContrastCheck {
                ratio: contrast_ratio(fg, bg),
                required,
                large_text: large,
            }))
        }
        None => Some(ResolvedPair::Indeterminate),
    }
}

/// Resolve the contrast check for a non-text UI element boundary.
pub fn resolve_boundary_pair(
    doc: &DocumentModel,
    index: &DocumentIndex,
    id: NodeId,
) -> Option<ResolvedPair> {
    let node = doc.get(id)?;
    let border = node.style.border_color?;
    match effective_background(doc, index, id) {
        Some(bg) => {
            let border = if border.is_opaque() { border } else { composite(border, bg) };
            Some(ResolvedPair::Resolved(ContrastCheck {
                ratio: contrast_ratio(border, bg),
                required: LARGE_TEXT_RATIO,
                large_text: false,
            }))
        }
        None => Some(ResolvedPair::Indeterminate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentModel, Node, NodeId, StyleFacts};

    #[test]
    fn luminance_extremes() {
        assert!((relative_luminance(Color::rgb(255, 255, 255)) - 1.0).abs() < 0.01);
        assert!(relative_luminance(Color::rgb(0, 0, 0)).abs() < 0.01);
    }

    #[test]
    fn black_on_white_is_21_to_1() {
        let ratio = contrast_ratio(Color::rgb(0, 0, 0), Color::rgb(255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.1, "got {:.3}", ratio);
    }

    #[test]
    fn same_color_is_1_to_1() {
        let gray = Color::rgb(128, 128, 128);
        assert!((contrast_ratio(gray, gray) - 1.0).abs() < 0.001);
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = Color::rgb(40, 60, 200);
        let b = Color::rgb(250, 250, 240);
        assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    #[test]
    fn threshold_comparison_is_exact() {
        // Meeting the ratio exactly passes; any shortfall fails.
        let pass = ContrastCheck { ratio: 4.5, required: NORMAL_TEXT_RATIO, large_text: false };
        let fail = ContrastCheck { ratio: 4.49999, required: NORMAL_TEXT_RATIO, large_text: false };
        assert!(pass.passes());
        assert!(!fail.passes());
        let pass = ContrastCheck { ratio: 3.0, required: LARGE_TEXT_RATIO, large_text: true };
        let fail = ContrastCheck { ratio: 2.99, required: LARGE_TEXT_RATIO, large_text: true };
        assert!(pass.passes());
        assert!(!fail.passes());
    }

    #[test]
    fn large_text_thresholds() {
        assert!(is_large_text(18.0, false));
        assert!(!is_large_text(17.9, false));
        assert!(is_large_text(14.0, true));
        assert!(!is_large_text(14.0, false));
    }

    fn doc_with_backgrounds(node_bg: Option<Color>, parent_bg: Option<Color>) -> DocumentModel {
        DocumentModel::new(vec![
            Node {
                tag: "body".into(),
                style: StyleFacts { background: parent_bg, ..StyleFacts::default() },
                children: vec![NodeId(1)],
                ..Node::default()
            },
            Node {
                tag: "p".into(),
                text: Some("hello".into()),
                style: StyleFacts {
                    color: Some(Color::rgb(0, 0, 0)),
                    background: node_bg,
                    ..StyleFacts::default()
                },
                ..Node::default()
            },
        ])
    }

    #[test]
    fn background_composites_through_translucent_layer() {
        // 50% white over opaque black resolves to mid gray.
        let doc = doc_with_backgrounds(
            Some(Color::rgba(255, 255, 255, 0.5)),
            Some(Color::rgb(0, 0, 0)),
        );
        let index = doc.index();
        let bg = effective_background(&doc, &index, NodeId(1)).unwrap();
        assert_eq!((bg.r, bg.g, bg.b), (128, 128, 128));
    }

    #[test]
    fn no_opaque_ancestor_is_indeterminate() {
        let doc = doc_with_backgrounds(Some(Color::rgba(255, 255, 255, 0.5)), None);
        let index = doc.index();
        assert_eq!(resolve_text_pair(&doc, &index, NodeId(1)), Some(ResolvedPair::Indeterminate));
    }

    #[test]
    fn resolved_pair_carries_threshold() {
        let doc = doc_with_backgrounds(None, Some(Color::rgb(255, 255, 255)));
        let index = doc.index();
        match resolve_text_pair(&doc, &index, NodeId(1)) {
            Some(ResolvedPair::Resolved(check)) => {
                assert_eq!(check.required, NORMAL_TEXT_RATIO);
                assert!(check.passes());
            }
            other => panic!("expected resolved pair, got {:?}", other),
        }
    }
}
