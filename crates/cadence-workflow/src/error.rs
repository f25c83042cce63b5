use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
  #[error("duplicate stage id: {0}")]
  DuplicateStage(String),

  #[error("stage '{stage}' depends on unknown stage '{dependency}'")]
  MissingDependency { stage: String, dependency: String },

  #[error("dependency graph contains a cycle")]
  CycleDetected,

  #[error("stage not found: {0}")]
  StageNotFound(String),
}
