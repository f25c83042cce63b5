//! Orchestrator errors.

use cadence_workflow::WorkflowError;

/// Errors that can occur while constructing or driving a workflow run.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
  /// The workflow definition failed DAG validation. Carries every detected
  /// problem, not just the first.
  #[error("invalid workflow definition: {}", format_errors(.0))]
  InvalidDefinition(Vec<WorkflowError>),

  /// A stage in the execution order has no registered executor.
  #[error("no executor registered for stage '{stage_id}'")]
  ExecutorNotRegistered { stage_id: String },

  /// `resume` was called on an orchestrator without a checkpoint store.
  #[error("checkpointing is not configured for this orchestrator")]
  CheckpointingDisabled,

  /// A checkpoint read or write failed.
  #[error("checkpoint error: {0}")]
  Checkpoint(#[from] cadence_state::Error),

  /// A graph operation failed outside validation.
  #[error(transparent)]
  Workflow(#[from] WorkflowError),
}

fn format_errors(errors: &[WorkflowError]) -> String {
  errors
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}
