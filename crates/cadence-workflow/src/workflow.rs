use std::sync::OnceLock;

use cadence_config::{StageDef, WorkflowDef};

use crate::error::WorkflowError;
use crate::graph::Graph;

/// A validated workflow ready for orchestration.
///
/// Wraps a declarative [`WorkflowDef`] and owns the dependency graph.
/// Constructed once from a parsed definition and read-only thereafter; the
/// execution order is computed on first use and cached.
#[derive(Debug)]
pub struct Workflow {
  pub workflow_id: String,
  pub name: String,
  pub description: String,
  pub version: String,
  stages: Vec<StageDef>,
  order: OnceLock<Vec<String>>,
}

impl From<WorkflowDef> for Workflow {
  fn from(def: WorkflowDef) -> Self {
    Self {
      workflow_id: def.workflow_id,
      name: def.name,
      description: def.description,
      version: def.version,
      stages: def.stages,
      order: OnceLock::new(),
    }
  }
}

impl Workflow {
  /// Get the stage definitions in declaration order.
  pub fn stages(&self) -> &[StageDef] {
    &self.stages
  }

  /// Get a stage by ID.
  pub fn stage(&self, stage_id: &str) -> Option<&StageDef> {
    self.stages.iter().find(|s| s.id == stage_id)
  }

  /// Build the dependency graph for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.stages)
  }

  /// Check the dependency graph and return every detected problem.
  ///
  /// Reports duplicate stage IDs, each `depends_on` reference that names no
  /// declared stage, and a single cycle error if the graph is not acyclic.
  /// An empty result means the workflow is safe to orchestrate.
  pub fn validate_dag(&self) -> Vec<WorkflowError> {
    let mut errors = Vec::new();

    let mut seen = std::collections::HashSet::new();
    for stage in &self.stages {
      if !seen.insert(stage.id.as_str()) {
        errors.push(WorkflowError::DuplicateStage(stage.id.clone()));
      }
    }

    for stage in &self.stages {
      for dep in &stage.depends_on {
        if self.stage(dep).is_none() {
          errors.push(WorkflowError::MissingDependency {
            stage: stage.id.clone(),
            dependency: dep.clone(),
          });
        }
      }
    }

    if let Err(e) = self.graph().topo_sort() {
      errors.push(e);
    }

    errors
  }

  /// Get the deterministic execution order, computing it on first use.
  ///
  /// The order is a topological sort with ties broken by declaration order,
  /// so repeated calls - and repeated runs - always see the same sequence.
  pub fn execution_order(&self) -> Result<&[String], WorkflowError> {
    if let Some(order) = self.order.get() {
      return Ok(order);
    }
    let order = self.graph().topo_sort()?;
    Ok(self.order.get_or_init(|| order))
  }
}
