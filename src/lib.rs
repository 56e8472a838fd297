// SPDX-License-Identifier: PMPL-1.0-or-later
//! Deterministic WCAG AA conformance engine.
//!
//! The engine inspects a normalized document model (tree, computed
//! style facts, interaction bindings) and evaluates a catalog of
//! independent accessibility rules over it, producing an ordered,
//! reproducible list of findings. It is a pure function of
//! (document model, configuration): no I/O, no persisted state, no
//! dependence on prior passes.
//!
//! ## Pipeline
//!
//! Document model -> derived facts (focus graph, color resolution,
//! ARIA validity) -> rule catalog -> ordered finding list.
//!
//! ## Rule families
//!
//! - **Structure** (1.3.1): heading hierarchy, landmark regions
//! - **Interactive semantics** (2.1.1): keyboard equivalents for
//!   pointer bindings
//! - **Labeling** (1.1.1/3.3.2/4.1.2): label relations, accessible
//!   names, text alternatives
//! - **Contrast** (1.4.3/1.4.11): text and UI-boundary ratios
//! - **Motion** (2.3.3): reduced-motion gating
//! - **Focus** (2.1.2/2.4.3/2.4.7): traps, order, reachability
//! - **Target size** (2.5.8): minimum interactive box
//! - **State exposure** (4.1.2): visual state vs ARIA state sync
//! - **Live regions** (4.1.3): valid, exposed announcement wiring
//!
//! Acquiring and parsing raw markup into the model, rendering, and
//! report presentation are external collaborators; see the `report`
//! module and binary for the thin shells shipped alongside the core.

pub mod aria;
pub mod color;
pub mod config;
pub mod engine;
pub mod finding;
pub mod focus;
pub mod model;
pub mod report;
pub mod rules;

pub use config::{AuditConfig, ConfigError, WcagLevel};
pub use engine::{evaluate, Engine};
pub use finding::{Finding, FindingSet, ImpactAssessment, Severity};
pub use model::{DocumentModel, Node, NodeId, NodePath};
