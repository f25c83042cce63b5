//! Workflow orchestration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cadence_config::StageDef;
use cadence_state::{CheckpointStore, StageResult, StageStatus, WorkflowState};
use cadence_workflow::{Workflow, WorkflowError};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{error, info, instrument, warn};

use crate::error::OrchestratorError;
use crate::executor::StageExecutor;

/// Drives one workflow's execution: status transitions, failure propagation,
/// retries, timeouts, checkpoint writes and resume.
///
/// Owns a validated [`Workflow`], a cached execution order, and a registry
/// mapping stage IDs to [`StageExecutor`] instances. The orchestrator is the
/// only component that mutates a [`WorkflowState`].
pub struct WorkflowOrchestrator {
  workflow: Workflow,
  order: Vec<String>,
  executors: HashMap<String, Arc<dyn StageExecutor>>,
  checkpoints: Option<Arc<dyn CheckpointStore>>,
}

impl WorkflowOrchestrator {
  /// Create an orchestrator without checkpointing.
  ///
  /// Fails fast with every DAG problem if the workflow does not validate;
  /// no execution state is created for an invalid definition.
  pub fn new(workflow: Workflow) -> Result<Self, OrchestratorError> {
    let errors = workflow.validate_dag();
    if !errors.is_empty() {
      return Err(OrchestratorError::InvalidDefinition(errors));
    }

    let order = workflow.execution_order()?.to_vec();

    Ok(Self {
      workflow,
      order,
      executors: HashMap::new(),
      checkpoints: None,
    })
  }

  /// Create an orchestrator that persists the run state to `store` after
  /// every completed stage.
  pub fn with_checkpoints(
    workflow: Workflow,
    store: Arc<dyn CheckpointStore>,
  ) -> Result<Self, OrchestratorError> {
    let mut orchestrator = Self::new(workflow)?;
    orchestrator.checkpoints = Some(store);
    Ok(orchestrator)
  }

  /// Bind an executor to a stage ID. Re-registration overwrites the
  /// previous binding.
  pub fn register_stage(&mut self, stage_id: impl Into<String>, executor: Arc<dyn StageExecutor>) {
    self.executors.insert(stage_id.into(), executor);
  }

  /// Get the workflow this orchestrator drives.
  pub fn workflow(&self) -> &Workflow {
    &self.workflow
  }

  /// Get the cached execution order.
  pub fn execution_order(&self) -> &[String] {
    &self.order
  }

  /// Execute the workflow from scratch.
  ///
  /// Returns the final [`WorkflowState`]: every stage that ran is terminal,
  /// every stage never reached stays `Pending`, and `end_time` is set
  /// whether the run completed or aborted.
  pub async fn execute(
    &self,
    user_request: &str,
    conversation_id: &str,
  ) -> Result<WorkflowState, OrchestratorError> {
    self
      .execute_with_config(user_request, conversation_id, Map::new())
      .await
  }

  /// Execute the workflow from scratch with an initial config map.
  #[instrument(
    name = "workflow_execute",
    skip(self, user_request, config),
    fields(
      workflow_id = %self.workflow.workflow_id,
      run_id = %uuid::Uuid::new_v4(),
    )
  )]
  pub async fn execute_with_config(
    &self,
    user_request: &str,
    conversation_id: &str,
    config: Map<String, Value>,
  ) -> Result<WorkflowState, OrchestratorError> {
    let mut state = WorkflowState::new(
      &self.workflow.workflow_id,
      conversation_id,
      user_request,
      &self.order,
      config,
    );

    info!(
      workflow_id = %state.workflow_id,
      conversation_id = %state.conversation_id,
      stages = self.order.len(),
      "workflow_started"
    );

    self.run(&mut state).await?;
    Ok(state)
  }

  /// Resume a checkpointed run.
  ///
  /// Loads the latest checkpoint for `workflow_id` and re-executes in the
  /// original order starting at the first stage that is not `Success`.
  /// Recorded successes keep their outputs; previously failed or in-flight
  /// stages are re-run, not skipped.
  #[instrument(
    name = "workflow_resume",
    skip(self),
    fields(run_id = %uuid::Uuid::new_v4())
  )]
  pub async fn resume(&self, workflow_id: &str) -> Result<WorkflowState, OrchestratorError> {
    let store = self
      .checkpoints
      .as_ref()
      .ok_or(OrchestratorError::CheckpointingDisabled)?;

    let mut state = store.load(workflow_id).await?;

    let completed = state
      .stage_statuses
      .values()
      .filter(|s| **s == StageStatus::Success)
      .count();
    info!(
      workflow_id = %workflow_id,
      completed_stages = completed,
      "workflow_resumed"
    );

    // Non-success stages start over; the final state must reflect what this
    // run actually did, so stale failed/running marks go back to pending.
    state.end_time = None;
    for status in state.stage_statuses.values_mut() {
      if *status == StageStatus::Failed || *status == StageStatus::Running {
        *status = StageStatus::Pending;
      }
    }

    self.run(&mut state).await?;
    Ok(state)
  }

  /// Run the stage loop, then close the state.
  async fn run(&self, state: &mut WorkflowState) -> Result<(), OrchestratorError> {
    let outcome = self.run_stages(state).await;

    // end_time is always set when the loop exits, success or abort.
    state.current_stage = None;
    state.end_time = Some(Utc::now());
    let final_save = self.checkpoint(state).await;

    match &outcome {
      Ok(()) => info!(workflow_id = %state.workflow_id, "workflow_completed"),
      Err(e) => error!(workflow_id = %state.workflow_id, error = %e, "workflow_failed"),
    }

    outcome.and(final_save)
  }

  /// Execute stages in order, honoring the failure-propagation rule.
  async fn run_stages(&self, state: &mut WorkflowState) -> Result<(), OrchestratorError> {
    for stage_id in &self.order {
      // Resume path: completed work is preserved, never re-run.
      if state.status(stage_id) == StageStatus::Success {
        continue;
      }

      let stage = self
        .workflow
        .stage(stage_id)
        .ok_or_else(|| WorkflowError::StageNotFound(stage_id.clone()))?;

      // A reachable stage without an executor is a configuration error,
      // never a silent skip. The stage stays pending - it never ran.
      let Some(executor) = self.executors.get(stage_id) else {
        error!(stage_id = %stage_id, "no executor registered for stage");
        return Err(OrchestratorError::ExecutorNotRegistered {
          stage_id: stage_id.clone(),
        });
      };

      state
        .stage_statuses
        .insert(stage_id.clone(), StageStatus::Running);
      state.current_stage = Some(stage_id.clone());
      info!(stage_id = %stage_id, "stage_started");

      let mut result = if executor.validate_input(state).await {
        self.run_with_retries(stage, executor.as_ref(), state).await
      } else {
        warn!(stage_id = %stage_id, "input validation rejected stage");
        StageResult::failure(format!("input validation failed for stage '{stage_id}'"))
      };
      result.stage_id = stage_id.clone();

      state.record(&result);

      let failed = result.status == StageStatus::Failed;
      if failed {
        let message = result
          .error
          .clone()
          .unwrap_or_else(|| "stage failed".to_string());
        error!(stage_id = %stage_id, error = %message, "stage_failed");
        executor.on_failure(state, &message).await;
      } else {
        info!(
          stage_id = %stage_id,
          duration_ms = result.duration_ms,
          "stage_completed"
        );
      }

      // Persist after every completed stage so a crash mid-run loses at
      // most the in-flight stage.
      self.checkpoint(state).await?;

      if failed && stage.required {
        warn!(stage_id = %stage_id, "required stage failed, halting workflow");
        break;
      }
    }

    Ok(())
  }

  /// Invoke the executor, re-attempting failed retryable stages.
  async fn run_with_retries(
    &self,
    stage: &StageDef,
    executor: &dyn StageExecutor,
    state: &WorkflowState,
  ) -> StageResult {
    let max_attempts = if stage.retryable {
      1 + stage.max_retries
    } else {
      1
    };

    let mut attempt = 1;
    loop {
      let result = self.run_attempt(stage, executor, state).await;
      if result.status != StageStatus::Failed || attempt >= max_attempts {
        return result;
      }

      warn!(
        stage_id = %stage.id,
        attempt,
        max_attempts,
        error = result.error.as_deref().unwrap_or(""),
        "stage attempt failed, retrying"
      );
      attempt += 1;
    }
  }

  /// Run one attempt, bounded by the stage's timeout.
  async fn run_attempt(
    &self,
    stage: &StageDef,
    executor: &dyn StageExecutor,
    state: &WorkflowState,
  ) -> StageResult {
    let started = Instant::now();

    let mut result = match tokio::time::timeout(
      Duration::from_secs(stage.timeout_seconds),
      executor.execute(state),
    )
    .await
    {
      Ok(result) => result,
      Err(_) => StageResult::failure(format!(
        "stage '{}' timed out after {}s",
        stage.id, stage.timeout_seconds
      )),
    };

    result.duration_ms = started.elapsed().as_millis() as u64;
    result
  }

  /// Persist the state if a checkpoint store is configured.
  async fn checkpoint(&self, state: &WorkflowState) -> Result<(), OrchestratorError> {
    if let Some(store) = &self.checkpoints {
      store.save(state).await?;
    }
    Ok(())
  }
}
