use serde::{Deserialize, Serialize};

use crate::stage::StageDef;

/// A declarative workflow: an ordered list of stages plus metadata.
///
/// Stage declaration order matters - when several stages become eligible at
/// the same time, the engine breaks the tie by declaration order, so the
/// computed execution order is reproducible across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDef {
  pub workflow_id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default = "default_version")]
  pub version: String,
  pub stages: Vec<StageDef>,
}

fn default_version() -> String {
  "1.0.0".to_string()
}

impl WorkflowDef {
  /// Create a workflow definition with no stages.
  pub fn new(workflow_id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      workflow_id: workflow_id.into(),
      name: name.into(),
      description: String::new(),
      version: default_version(),
      stages: Vec::new(),
    }
  }

  /// Append a stage, preserving declaration order.
  pub fn stage(mut self, stage: StageDef) -> Self {
    self.stages.push(stage);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_applied_on_deserialize() {
    let def: WorkflowDef = serde_json::from_str(
      r#"{
        "workflow_id": "wf-1",
        "name": "Example",
        "stages": [
          { "id": "stage1", "script": "generate.sh" },
          { "id": "stage2", "depends_on": ["stage1"], "required": false }
        ]
      }"#,
    )
    .unwrap();

    assert_eq!(def.version, "1.0.0");
    assert_eq!(def.description, "");

    let stage1 = &def.stages[0];
    assert!(stage1.required);
    assert!(!stage1.retryable);
    assert_eq!(stage1.max_retries, 0);
    assert_eq!(stage1.timeout_seconds, 300);
    assert!(stage1.depends_on.is_empty());

    let stage2 = &def.stages[1];
    assert!(!stage2.required);
    assert_eq!(stage2.depends_on, vec!["stage1".to_string()]);
  }
}
