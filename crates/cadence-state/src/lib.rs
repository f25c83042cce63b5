//! Cadence State
//!
//! This crate provides the mutable record of one workflow run - per-stage
//! statuses and outputs, timestamps, context - together with the checkpoint
//! storage trait and its implementations.
//!
//! The [`CheckpointStore`] trait defines operations for:
//! - Persisting a [`WorkflowState`] snapshot after each completed stage
//! - Loading the latest snapshot for a workflow ID so a run can resume
//!
//! Two backends are provided: [`FsCheckpointStore`] (one JSON file per
//! workflow under a base directory) and [`SqliteCheckpointStore`] (one row
//! per workflow in a SQLite database).

mod fs;
mod sqlite;
mod types;

pub use fs::FsCheckpointStore;
pub use sqlite::SqliteCheckpointStore;
pub use types::{StageResult, StageStatus, WorkflowState};

use async_trait::async_trait;

/// Error type for state and checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// No checkpoint exists for the requested workflow ID.
  #[error("no checkpoint found for workflow: {0}")]
  NotFound(String),

  /// A filesystem error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Checkpoint (de)serialization failed.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// Storage trait for workflow checkpoints.
///
/// Checkpoints are keyed by `workflow_id`; `save` overwrites any previous
/// snapshot for the same workflow, and each write is atomic so a crash never
/// leaves a partially written checkpoint behind.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
  /// Persist a snapshot of the workflow state.
  async fn save(&self, state: &WorkflowState) -> Result<(), Error>;

  /// Load the latest snapshot for a workflow ID.
  async fn load(&self, workflow_id: &str) -> Result<WorkflowState, Error>;

  /// Delete the snapshot for a workflow ID.
  async fn delete(&self, workflow_id: &str) -> Result<(), Error>;
}
