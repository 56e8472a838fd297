// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA role/attribute validity checking against a static
//! compatibility table.
//!
//! The checker reports typed violations and assigns no severities;
//! the `aria-validity` rule decides how each violation kind weighs.
//! An unknown role is reported here and treated as "no role" by every
//! other consumer (the safe fallback of the error-handling design).

use crate::model::Node;

/// Broad classification of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Landmark,
    Widget,
    Structure,
    Live,
}

/// One row of the static compatibility table.
#[derive(Debug, Clone, Copy)]
pub struct RoleSpec {
    pub name: &'static str,
    pub kind: RoleKind,
    /// States that must be present on any node carrying the role
    pub required: &'static [&'static str],
    /// Role-specific states permitted beyond the global set
    pub permitted: &'static [&'static str],
    /// Native tags that already carry this role implicitly
    pub implicit_for: &'static [&'static str],
}

/// ARIA attributes permitted on any role (naming, relationships,
/// visibility, live-region wiring).
pub const GLOBAL_ATTRIBUTES: &[&str] = &[
    "aria-label",
    "aria-labelledby",
    "aria-describedby",
    "aria-hidden",
    "aria-live",
    "aria-atomic",
    "aria-busy",
    "aria-controls",
    "aria-owns",
    "aria-level",
];

/// The static role compatibility table (WCAG AA relevant subset).
pub const ROLE_TABLE: &[RoleSpec] = &[
    // Landmarks
    RoleSpec { name: "banner", kind: RoleKind::Landmark, required: &[], permitted: &[], implicit_for: &["header"] },
    RoleSpec { name: "complementary", kind: RoleKind::Landmark, required: &[], permitted: &[], implicit_for: &["aside"] },
    RoleSpec { name: "contentinfo", kind: RoleKind::Landmark, required: &[], permitted: &[], implicit_for: &["footer"] },
    RoleSpec { name: "form", kind: RoleKind::Landmark, required: &[], permitted: &[], implicit_for: &["form"] },
    RoleSpec { name: "main", kind: RoleKind::Landmark, required: &[], permitted: &[], implicit_for: &["main"] },
    RoleSpec { name: "navigation", kind: RoleKind::Landmark, required: &[], permitted: &[], implicit_for: &["nav"] },
    RoleSpec { name: "region", kind: RoleKind::Landmark, required: &["aria-label"], permitted: &[], implicit_for: &["section"] },
    RoleSpec { name: "search", kind: RoleKind::Landmark, required: &[], permitted: &[], implicit_for: &[] },
    // Widgets
    RoleSpec { name: "button", kind: RoleKind::Widget, required: &[], permitted: &["aria-expanded", "aria-pressed", "aria-disabled"], implicit_for: &["button"] },
    RoleSpec { name: "checkbox", kind: RoleKind::Widget, required: &["aria-checked"], permitted: &["aria-disabled", "aria-invalid"], implicit_for: &[] },
    RoleSpec { name: "combobox", kind: RoleKind::Widget, required: &["aria-expanded"], permitted: &["aria-activedescendant", "aria-autocomplete", "aria-disabled"], implicit_for: &[] },
    RoleSpec { name: "dialog", kind: RoleKind::Widget, required: &[], permitted: &["aria-modal"], implicit_for: &["dialog"] },
    RoleSpec { name: "link", kind: RoleKind::Widget, required: &[], permitted: &["aria-disabled", "aria-expanded"], implicit_for: &["a"] },
    RoleSpec { name: "menuitem", kind: RoleKind::Widget, required: &[], permitted: &["aria-disabled", "aria-expanded", "aria-posinset", "aria-setsize"], implicit_for: &[] },
    RoleSpec { name: "option", kind: RoleKind::Widget, required: &["aria-selected"], permitted: &["aria-disabled", "aria-posinset", "aria-setsize"], implicit_for: &["option"] },
    RoleSpec { name: "progressbar", kind: RoleKind::Widget, required: &[], permitted: &["aria-valuenow", "aria-valuemin", "aria-valuemax", "aria-valuetext"], implicit_for: &["progress"] },
    RoleSpec { name: "radio", kind: RoleKind::Widget, required: &["aria-checked"], permitted: &["aria-disabled", "aria-posinset", "aria-setsize"], implicit_for: &[] },
    RoleSpec { name: "scrollbar", kind: RoleKind::Widget, required: &["aria-controls", "aria-valuenow"], permitted: &["aria-valuemin", "aria-valuemax", "aria-orientation"], implicit_for: &[] },
    RoleSpec { name: "slider", kind: RoleKind::Widget, required: &["aria-valuenow"], permitted: &["aria-valuemin", "aria-valuemax", "aria-valuetext", "aria-orientation", "aria-disabled"], implicit_for: &[] },
    RoleSpec { name: "spinbutton", kind: RoleKind::Widget, required: &["aria-valuenow"], permitted: &["aria-valuemin", "aria-valuemax", "aria-valuetext", "aria-disabled"], implicit_for: &[] },
    RoleSpec { name: "switch", kind: RoleKind::Widget, required: &["aria-checked"], permitted: &["aria-disabled"], implicit_for: &[] },
    RoleSpec { name: "tab", kind: RoleKind::Widget, required: &[], permitted: &["aria-selected", "aria-disabled", "aria-posinset", "aria-setsize"], implicit_for: &[] },
    RoleSpec { name: "tabpanel", kind: RoleKind::Widget, required: &[], permitted: &[], implicit_for: &[] },
    RoleSpec { name: "textbox", kind: RoleKind::Widget, required: &[], permitted: &["aria-multiline", "aria-placeholder", "aria-readonly", "aria-required", "aria-invalid", "aria-disabled"], implicit_for: &["textarea"] },
    RoleSpec { name: "tree", kind: RoleKind::Widget, required: &[], permitted: &["aria-multiselectable", "aria-orientation"], implicit_for: &[] },
    RoleSpec { name: "treeitem", kind: RoleKind::Widget, required: &[], permitted: &["aria-expanded", "aria-selected", "aria-posinset", "aria-setsize"], implicit_for: &[] },
    // Composite widget containers
    RoleSpec { name: "listbox", kind: RoleKind::Widget, required: &[], permitted: &["aria-multiselectable", "aria-orientation", "aria-disabled"], implicit_for: &["select"] },
    RoleSpec { name: "menu", kind: RoleKind::Widget, required: &[], permitted: &["aria-orientation"], implicit_for: &[] },
    RoleSpec { name: "menubar", kind: RoleKind::Widget, required: &[], permitted: &["aria-orientation"], implicit_for: &[] },
    RoleSpec { name: "radiogroup", kind: RoleKind::Widget, required: &[], permitted: &["aria-required", "aria-invalid", "aria-disabled"], implicit_for: &[] },
    RoleSpec { name: "tablist", kind: RoleKind::Widget, required: &[], permitted: &["aria-orientation", "aria-multiselectable"], implicit_for: &[] },
    // Document structure
    RoleSpec { name: "article", kind: RoleKind::Structure, required: &[], permitted: &["aria-posinset", "aria-setsize"], implicit_for: &["article"] },
    RoleSpec { name: "group", kind: RoleKind::Structure, required: &[], permitted: &["aria-activedescendant", "aria-disabled"], implicit_for: &["fieldset"] },
    RoleSpec { name: "heading", kind: RoleKind::Structure, required: &["aria-level"], permitted: &[], implicit_for: &["h1", "h2", "h3", "h4", "h5", "h6"] },
    RoleSpec { name: "img", kind: RoleKind::Structure, required: &[], permitted: &[], implicit_for: &["img"] },
    RoleSpec { name: "list", kind: RoleKind::Structure, required: &[], permitted: &[], implicit_for: &["ul", "ol"] },
    RoleSpec { name: "listitem", kind: RoleKind::Structure, required: &[], permitted: &["aria-posinset", "aria-setsize"], implicit_for: &["li"] },
    RoleSpec { name: "none", kind: RoleKind::Structure, required: &[], permitted: &[], implicit_for: &[] },
    RoleSpec { name: "presentation", kind: RoleKind::Structure, required: &[], permitted: &[], implicit_for: &[] },
    RoleSpec { name: "separator", kind: RoleKind::Structure, required: &[], permitted: &["aria-orientation", "aria-valuenow", "aria-valuemin", "aria-valuemax"], implicit_for: &["hr"] },
    RoleSpec { name: "table", kind: RoleKind::Structure, required: &[], permitted: &["aria-colcount", "aria-rowcount"], implicit_for: &["table"] },
    // Live regions
    RoleSpec { name: "alert", kind: RoleKind::Live, required: &[], permitted: &[], implicit_for: &[] },
    RoleSpec { name: "log", kind: RoleKind::Live, required: &[], permitted: &[], implicit_for: &[] },
    RoleSpec { name: "status", kind: RoleKind::Live, required: &[], permitted: &[], implicit_for: &["output"] },
    RoleSpec { name: "timer", kind: RoleKind::Live, required: &[], permitted: &[], implicit_for: &[] },
];

/// Look up a role in the compatibility table.
pub fn role_spec(name: &str) -> Option<&'static RoleSpec> {
    ROLE_TABLE.iter().find(|spec| spec.name == name)
}

/// The effective role of a node: explicit when valid, otherwise the
/// implicit role of its tag, otherwise none.
pub fn effective_role(node: &Node) -> Option<&'static RoleSpec> {
    if let Some(explicit) = node.role().and_then(role_spec) {
        return Some(explicit);
    }
    implicit_role(node)
}

/// The implicit role of a native tag. `<input>` maps by its type.
fn implicit_role(node: &Node) -> Option<&'static RoleSpec> {
    if node.tag == "input" {
        let name = match node.attr("type") {
            Some("checkbox") => "checkbox",
            Some("radio") => "radio",
            Some("range") => "slider",
            Some("button") | Some("submit") | Some("reset") => "button",
            _ => "textbox",
        };
        return role_spec(name);
    }
    ROLE_TABLE.iter().find(|spec| spec.implicit_for.contains(&node.tag.as_str()))
}

/// Landmark kinds recognized by the structure rules.
pub fn is_landmark(node: &Node) -> bool {
    effective_role(node).is_some_and(|spec| spec.kind == RoleKind::Landmark)
}

/// A single validity violation on one node. No severity here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AriaViolation {
    /// Role string not present in the compatibility table
    UnknownRole { role: String },
    /// A required state for the role is absent
    MissingRequired { role: &'static str, attribute: &'static str },
    /// An aria-* attribute not permitted for the effective role
    NotPermitted { role: &'static str, attribute: String },
    /// The role strips or contradicts strong native semantics
    NativeConflict { tag: String, role: String },
    /// An aria-* attribute present with no role to scope it and not global
    Unscoped { attribute: String },
}

/// Validate a node's role and ARIA attributes against the table.
pub fn check_node(node: &Node) -> Vec<AriaViolation> {
    let mut violations = Vec::new();

    let explicit = node.role();
    let spec = match explicit {
        Some(role) => match role_spec(role) {
            Some(spec) => {
                // Semantics-stripping roles on natively interactive
                // elements remove required native behavior.
                if matches!(role, "presentation" | "none") && node.is_native_interactive() {
                    violations.push(AriaViolation::NativeConflict {
                        tag: node.tag.clone(),
                        role: role.to_string(),
                    });
                }
                Some(spec)
            }
            None => {
                violations.push(AriaViolation::UnknownRole { role: role.to_string() });
                // Fall back to the implicit role for attribute checks.
                effective_role(node)
            }
        },
        None => effective_role(node),
    };

    if let Some(spec) = spec {
        for required in spec.required {
            // An implicit native equivalent satisfies the requirement
            // (e.g. <h2> needs no aria-level).
            if node.attr(required).is_none() && explicit.is_some() && node.role() == Some(spec.name)
            {
                violations.push(AriaViolation::MissingRequired { role: spec.name, attribute: required });
            }
        }
    }

    for attribute in node.attributes.keys() {
        if !attribute.starts_with("aria-") {
            continue;
        }
        if GLOBAL_ATTRIBUTES.contains(&attribute.as_str()) {
            continue;
        }
        match spec {
            Some(spec) => {
                if !spec.permitted.contains(&attribute.as_str())
                    && !spec.required.contains(&attribute.as_str())
                {
                    violations.push(AriaViolation::NotPermitted {
                        role: spec.name,
                        attribute: attribute.clone(),
                    });
                }
            }
            None => violations.push(AriaViolation::Unscoped { attribute: attribute.clone() }),
        }
    }

    violations
}

impl std::fmt::Display for AriaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AriaViolation::UnknownRole { role } => {
                write!(f, "role \"{}\" is not a known ARIA role", role)
            }
            AriaViolation::MissingRequired { role, attribute } => {
                write!(f, "role \"{}\" requires the {} attribute", role, attribute)
            }
            AriaViolation::NotPermitted { role, attribute } => {
                write!(f, "attribute {} is not permitted on role \"{}\"", attribute, role)
            }
            AriaViolation::NativeConflict { tag, role } => {
                write!(
                    f,
                    "role \"{}\" strips the native semantics of <{}>, which carries required behavior",
                    role, tag
                )
            }
            AriaViolation::Unscoped { attribute } => {
                write!(f, "attribute {} has no role or native semantics to apply to", attribute)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn node_with(tag: &str, attrs: &[(&str, &str)]) -> Node {
        let mut node = Node { tag: tag.to_string(), ..Node::default() };
        for (k, v) in attrs {
            node.attributes.insert(k.to_string(), v.to_string());
        }
        node
    }

    #[test]
    fn valid_role_passes() {
        let node = node_with("div", &[("role", "button")]);
        assert!(check_node(&node).is_empty());
    }

    #[test]
    fn unknown_role_reported() {
        let node = node_with("div", &[("role", "buton")]);
        let violations = check_node(&node);
        assert_eq!(violations, vec![AriaViolation::UnknownRole { role: "buton".into() }]);
    }

    #[test]
    fn missing_required_state() {
        let node = node_with("div", &[("role", "checkbox")]);
        let violations = check_node(&node);
        assert_eq!(
            violations,
            vec![AriaViolation::MissingRequired { role: "checkbox", attribute: "aria-checked" }]
        );
        let ok = node_with("div", &[("role", "checkbox"), ("aria-checked", "false")]);
        assert!(check_node(&ok).is_empty());
    }

    #[test]
    fn implicit_role_needs_no_required_attrs() {
        // <h2> has the implicit heading role; aria-level is implied.
        let node = node_with("h2", &[]);
        assert!(check_node(&node).is_empty());
    }

    #[test]
    fn not_permitted_attribute() {
        let node = node_with("div", &[("role", "button"), ("aria-checked", "true")]);
        let violations = check_node(&node);
        assert_eq!(
            violations,
            vec![AriaViolation::NotPermitted { role: "button", attribute: "aria-checked".into() }]
        );
    }

    #[test]
    fn global_attributes_allowed_everywhere() {
        let node = node_with("div", &[("role", "button"), ("aria-label", "Close")]);
        assert!(check_node(&node).is_empty());
    }

    #[test]
    fn presentation_on_native_interactive_conflicts() {
        let node = node_with("button", &[("role", "presentation")]);
        let violations = check_node(&node);
        assert!(violations
            .iter()
            .any(|v| matches!(v, AriaViolation::NativeConflict { .. })));
    }

    #[test]
    fn unscoped_state_attribute() {
        let node = node_with("div", &[("aria-checked", "true")]);
        let violations = check_node(&node);
        assert_eq!(violations, vec![AriaViolation::Unscoped { attribute: "aria-checked".into() }]);
    }

    #[test]
    fn input_implicit_role_follows_type() {
        // A native checkbox carries the checkbox role, so its state
        // attribute is in scope.
        let checkbox = node_with("input", &[("type", "checkbox"), ("aria-checked", "true")]);
        assert!(check_node(&checkbox).is_empty());
        assert_eq!(effective_role(&checkbox).map(|s| s.name), Some("checkbox"));

        let radio = node_with("input", &[("type", "radio")]);
        assert_eq!(effective_role(&radio).map(|s| s.name), Some("radio"));
        let range = node_with("input", &[("type", "range"), ("aria-valuenow", "3")]);
        assert!(check_node(&range).is_empty());

        // Text-entry inputs stay textboxes.
        let text = node_with("input", &[("aria-multiline", "false")]);
        assert_eq!(effective_role(&text).map(|s| s.name), Some("textbox"));
        assert!(check_node(&text).is_empty());
    }

    #[test]
    fn landmark_detection() {
        assert!(is_landmark(&node_with("nav", &[])));
        assert!(is_landmark(&node_with("div", &[("role", "main")])));
        assert!(!is_landmark(&node_with("div", &[])));
    }
}
