use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status of a single stage within one workflow run.
///
/// Statuses only move forward: `Pending -> Running -> {Success | Failed}`.
/// A stage left `Pending` at the end of a run was never reached (an upstream
/// required stage failed first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
  Pending,
  Running,
  Success,
  Failed,
}

impl StageStatus {
  /// Whether the stage reached a terminal state for this run.
  pub fn is_terminal(self) -> bool {
    matches!(self, StageStatus::Success | StageStatus::Failed)
  }
}

impl std::fmt::Display for StageStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      StageStatus::Pending => "pending",
      StageStatus::Running => "running",
      StageStatus::Success => "success",
      StageStatus::Failed => "failed",
    };
    f.write_str(s)
  }
}

/// Outcome of one stage attempt. Produced once per attempt and never mutated
/// afterwards; the orchestrator stamps `stage_id` and `duration_ms` on the
/// result returned by an executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
  pub stage_id: String,
  pub status: StageStatus,
  pub duration_ms: u64,
  pub output: Value,
  pub error: Option<String>,
}

impl StageResult {
  /// A successful result carrying the stage's output payload.
  pub fn success(output: Value) -> Self {
    Self {
      stage_id: String::new(),
      status: StageStatus::Success,
      duration_ms: 0,
      output,
      error: None,
    }
  }

  /// A failed result carrying an error message.
  pub fn failure(error: impl Into<String>) -> Self {
    Self {
      stage_id: String::new(),
      status: StageStatus::Failed,
      duration_ms: 0,
      output: Value::Null,
      error: Some(error.into()),
    }
  }
}

/// Mutable record of one workflow run's progress.
///
/// Created at the start of `execute()`, mutated exclusively by the owning
/// orchestrator, and closed (`end_time` set) when the run loop exits. The
/// serialized form is the checkpoint representation: exactly these fields,
/// with statuses as lowercase strings and timestamps as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
  pub workflow_id: String,
  pub conversation_id: String,
  pub user_request: String,
  pub context: Map<String, Value>,
  pub stage_outputs: HashMap<String, Value>,
  pub stage_statuses: HashMap<String, StageStatus>,
  pub start_time: DateTime<Utc>,
  pub end_time: Option<DateTime<Utc>>,
  pub current_stage: Option<String>,
  pub config: Map<String, Value>,
}

impl WorkflowState {
  /// Create a fresh run state with every stage `Pending`.
  pub fn new(
    workflow_id: impl Into<String>,
    conversation_id: impl Into<String>,
    user_request: impl Into<String>,
    stage_ids: &[String],
    config: Map<String, Value>,
  ) -> Self {
    let stage_statuses = stage_ids
      .iter()
      .map(|id| (id.clone(), StageStatus::Pending))
      .collect();

    Self {
      workflow_id: workflow_id.into(),
      conversation_id: conversation_id.into(),
      user_request: user_request.into(),
      context: Map::new(),
      stage_outputs: HashMap::new(),
      stage_statuses,
      start_time: Utc::now(),
      end_time: None,
      current_stage: None,
      config,
    }
  }

  /// Get a stage's status, defaulting to `Pending` for unknown stages.
  pub fn status(&self, stage_id: &str) -> StageStatus {
    self
      .stage_statuses
      .get(stage_id)
      .copied()
      .unwrap_or(StageStatus::Pending)
  }

  /// Record the terminal result of a stage attempt.
  pub fn record(&mut self, result: &StageResult) {
    self
      .stage_outputs
      .insert(result.stage_id.clone(), result.output.clone());
    self
      .stage_statuses
      .insert(result.stage_id.clone(), result.status);
  }

  /// Serialize to the checkpoint representation.
  pub fn to_value(&self) -> Result<Value, serde_json::Error> {
    serde_json::to_value(self)
  }

  /// Reconstruct a state from its checkpoint representation.
  pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
    serde_json::from_value(value)
  }
}
