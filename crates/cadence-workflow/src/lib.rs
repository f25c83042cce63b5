//! Cadence Workflow
//!
//! This crate provides the validated workflow representation for cadence.
//! A [`Workflow`] wraps a declarative definition and owns the dependency
//! graph: referential-integrity checks, cycle detection, and a deterministic
//! topological execution order.
//!
//! Key differences from `cadence-config`:
//! - Stage IDs are checked for uniqueness
//! - Every `depends_on` reference is checked against declared stages
//! - The dependency graph is checked for cycles (Kahn's algorithm)
//! - The execution order is computed once and cached

mod error;
mod graph;
mod workflow;

pub use error::WorkflowError;
pub use graph::Graph;
pub use workflow::Workflow;
