//! Cadence Config
//!
//! This crate contains the serializable workflow definition types for cadence.
//! These types represent workflow declarations before they are validated and
//! locked by `cadence-workflow` for execution.
//!
//! Definitions can be loaded from:
//! - JSON files (via CLI with `cadence validate workflow.json`)
//! - Database storage (as JSON blobs)
//!
//! The orchestrator takes these definition types, validates the dependency
//! graph, and computes a deterministic execution order.

mod stage;
mod workflow;

pub use stage::StageDef;
pub use workflow::WorkflowDef;
