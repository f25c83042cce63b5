use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{CheckpointStore, Error, WorkflowState};

/// SQLite-based checkpoint store.
///
/// Keeps one row per workflow ID; `save` upserts, so the table always holds
/// the latest snapshot for each workflow.
pub struct SqliteCheckpointStore {
  pool: SqlitePool,
}

impl SqliteCheckpointStore {
  /// Create a new SQLite store with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Create the checkpoint table if it does not exist.
  pub async fn init(&self) -> Result<(), Error> {
    sqlx::query(
      r#"
            CREATE TABLE IF NOT EXISTS workflow_checkpoints (
                workflow_id TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
    )
    .execute(&self.pool)
    .await?;

    Ok(())
  }
}

#[async_trait]
impl CheckpointStore for SqliteCheckpointStore {
  async fn save(&self, state: &WorkflowState) -> Result<(), Error> {
    let snapshot = serde_json::to_string(state)?;

    sqlx::query(
      r#"
            INSERT INTO workflow_checkpoints (workflow_id, state, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(workflow_id) DO UPDATE
            SET state = excluded.state, updated_at = excluded.updated_at
            "#,
    )
    .bind(&state.workflow_id)
    .bind(&snapshot)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn load(&self, workflow_id: &str) -> Result<WorkflowState, Error> {
    let row: Option<(String,)> = sqlx::query_as(
      r#"
            SELECT state FROM workflow_checkpoints
            WHERE workflow_id = ?
            "#,
    )
    .bind(workflow_id)
    .fetch_optional(&self.pool)
    .await?;

    match row {
      Some((snapshot,)) => Ok(serde_json::from_str(&snapshot)?),
      None => Err(Error::NotFound(workflow_id.to_string())),
    }
  }

  async fn delete(&self, workflow_id: &str) -> Result<(), Error> {
    let result = sqlx::query(
      r#"
            DELETE FROM workflow_checkpoints
            WHERE workflow_id = ?
            "#,
    )
    .bind(workflow_id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(Error::NotFound(workflow_id.to_string()));
    }

    Ok(())
  }
}
