use std::collections::{HashMap, HashSet};

use cadence_config::StageDef;

use crate::error::WorkflowError;

/// Dependency graph over a workflow's stages.
///
/// Edges point from a dependency to its dependents. Declaration order is
/// kept so the topological sort can break ties deterministically.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: stage_id -> stages that depend on it.
  dependents: HashMap<String, Vec<String>>,
  /// Number of declared dependencies per stage.
  in_degree: HashMap<String, usize>,
  /// Stage IDs in declaration order.
  declared: Vec<String>,
}

impl Graph {
  /// Build a graph from stage definitions, preserving declaration order.
  ///
  /// Edges whose dependency does not name a declared stage are skipped here;
  /// referential integrity and duplicate IDs are reported separately by
  /// workflow validation. A repeated stage ID keeps its first declaration.
  pub fn new(stages: &[StageDef]) -> Self {
    let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
    let mut in_degree: HashMap<String, usize> = HashMap::new();
    let mut declared: Vec<String> = Vec::with_capacity(stages.len());
    for stage in stages {
      if !declared.contains(&stage.id) {
        declared.push(stage.id.clone());
      }
    }
    let known: HashSet<&str> = declared.iter().map(String::as_str).collect();

    for stage in stages {
      dependents.entry(stage.id.clone()).or_default();
      in_degree.entry(stage.id.clone()).or_insert(0);
    }

    for stage in stages {
      for dep in &stage.depends_on {
        if !known.contains(dep.as_str()) {
          continue;
        }
        dependents
          .entry(dep.clone())
          .or_default()
          .push(stage.id.clone());
        *in_degree.entry(stage.id.clone()).or_insert(0) += 1;
      }
    }

    Self {
      dependents,
      in_degree,
      declared,
    }
  }

  /// Get the stages that depend on the given stage.
  pub fn dependents(&self, stage_id: &str) -> &[String] {
    self
      .dependents
      .get(stage_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Compute a topological order with Kahn's algorithm.
  ///
  /// When several stages are eligible at once, the earliest-declared stage is
  /// emitted first, so the same definition always yields the same order.
  /// Returns `CycleDetected` if the graph cannot be fully drained.
  pub fn topo_sort(&self) -> Result<Vec<String>, WorkflowError> {
    let mut remaining = self.in_degree.clone();
    let mut emitted: HashSet<String> = HashSet::with_capacity(self.declared.len());
    let mut order = Vec::with_capacity(self.declared.len());

    loop {
      let next = self
        .declared
        .iter()
        .find(|id| !emitted.contains(*id) && remaining.get(*id).copied() == Some(0));

      let Some(stage_id) = next.cloned() else {
        break;
      };

      for dependent in self.dependents(&stage_id) {
        if let Some(count) = remaining.get_mut(dependent) {
          *count -= 1;
        }
      }

      emitted.insert(stage_id.clone());
      order.push(stage_id);
    }

    if order.len() != self.declared.len() {
      return Err(WorkflowError::CycleDetected);
    }

    Ok(order)
  }
}
