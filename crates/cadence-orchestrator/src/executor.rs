//! The stage executor capability.

use async_trait::async_trait;
use cadence_state::{StageResult, WorkflowState};

/// The capability contract a concrete stage implementation must satisfy.
///
/// The orchestrator is polymorphic over any number of implementations and
/// holds no knowledge of how a stage accomplishes its work (file generation,
/// network calls, test running, ...). Executors are bound to stage IDs via
/// [`WorkflowOrchestrator::register_stage`](crate::WorkflowOrchestrator::register_stage).
///
/// `execute` is mandatory - there is no default body, so an unimplemented
/// stage cannot be mistaken for a real result. The orchestrator stamps
/// `stage_id` and `duration_ms` on the returned [`StageResult`]; executors
/// only decide status, output and error.
#[async_trait]
pub trait StageExecutor: Send + Sync {
  /// Perform the stage's work against the current run state.
  ///
  /// The state gives read access to prior stage outputs (`stage_outputs`),
  /// the run context, and the caller's request/config. Failures are
  /// expressed as a result with [`StageStatus::Failed`](cadence_state::StageStatus),
  /// not by panicking.
  async fn execute(&self, state: &WorkflowState) -> StageResult;

  /// Optional pre-check before `execute` is invoked.
  ///
  /// Returning `false` records an immediate failed result without calling
  /// `execute`. The default is `true` ("proceed").
  async fn validate_input(&self, _state: &WorkflowState) -> bool {
    true
  }

  /// Optional hook invoked after a stage's final failed result, e.g. for
  /// cleanup or alerting. The default is a no-op. The hook returns `()` and
  /// must not panic; a panicking hook is a defect in the stage implementation.
  async fn on_failure(&self, _state: &WorkflowState, _error: &str) {}
}
