//! Cadence Orchestrator
//!
//! This crate composes a validated workflow with registered stage executors
//! and drives execution: deterministic ordering, status transitions, failure
//! propagation, retries, timeouts, checkpoint writes and resume.
//!
//! # Architecture
//!
//! ```text
//! WorkflowOrchestrator
//! ├── new(workflow) / with_checkpoints(workflow, store)
//! │     fails fast if the DAG does not validate
//! ├── register_stage(stage_id, executor)
//! ├── execute(user_request, conversation_id) -> WorkflowState
//! │     runs stages one at a time in topological order,
//! │     checkpointing after each completed stage
//! └── resume(workflow_id) -> WorkflowState
//!       reloads the checkpoint and continues from the first
//!       stage that is not Success
//! ```
//!
//! # Failure propagation
//!
//! A failed **required** stage halts the run - downstream stages stay
//! `Pending` and are never invoked. A failed **optional** stage is recorded
//! and execution continues with the next stage in order.
//!
//! # Usage
//!
//! ```ignore
//! use cadence_orchestrator::{StageExecutor, WorkflowOrchestrator};
//!
//! let mut orchestrator = WorkflowOrchestrator::with_checkpoints(workflow, store)?;
//! orchestrator.register_stage("generate", Arc::new(GenerateStage));
//! orchestrator.register_stage("publish", Arc::new(PublishStage));
//!
//! let state = orchestrator.execute("build the report", "conv-42").await?;
//!
//! // After a crash or a failed required stage:
//! let state = orchestrator.resume("my-workflow").await?;
//! ```

mod error;
mod executor;
mod orchestrator;

pub use error::OrchestratorError;
pub use executor::StageExecutor;
pub use orchestrator::WorkflowOrchestrator;
