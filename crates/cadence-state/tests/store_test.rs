//! Checkpoint store integration tests (filesystem and SQLite backends).

use cadence_state::{
  CheckpointStore, Error, FsCheckpointStore, SqliteCheckpointStore, StageResult, WorkflowState,
};
use serde_json::{Map, json};
use sqlx::sqlite::SqlitePoolOptions;

fn state_for(workflow_id: &str) -> WorkflowState {
  let stage_ids = vec!["stage1".to_string(), "stage2".to_string()];
  WorkflowState::new(workflow_id, "conv-1", "request", &stage_ids, Map::new())
}

async fn sqlite_store() -> SqliteCheckpointStore {
  // One connection so the in-memory database is shared across queries.
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("failed to open in-memory sqlite");

  let store = SqliteCheckpointStore::new(pool);
  store.init().await.expect("failed to init checkpoint table");
  store
}

#[tokio::test]
async fn fs_store_round_trips() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let store = FsCheckpointStore::new(dir.path());

  let state = state_for("wf-fs");
  store.save(&state).await.unwrap();

  let loaded = store.load("wf-fs").await.unwrap();
  assert_eq!(loaded, state);
}

#[tokio::test]
async fn fs_store_overwrites_by_workflow_id() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let store = FsCheckpointStore::new(dir.path());

  let mut state = state_for("wf-fs");
  store.save(&state).await.unwrap();

  let mut result = StageResult::success(json!({ "done": true }));
  result.stage_id = "stage1".to_string();
  state.record(&result);
  store.save(&state).await.unwrap();

  let loaded = store.load("wf-fs").await.unwrap();
  assert_eq!(loaded, state);

  // Exactly one checkpoint file, no leftover temp file.
  let entries: Vec<_> = std::fs::read_dir(dir.path())
    .unwrap()
    .map(|e| e.unwrap().file_name())
    .collect();
  assert_eq!(entries, vec![std::ffi::OsString::from("wf-fs.json")]);
}

#[tokio::test]
async fn fs_store_load_missing_is_not_found() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let store = FsCheckpointStore::new(dir.path());

  match store.load("wf-missing").await {
    Err(Error::NotFound(id)) => assert_eq!(id, "wf-missing"),
    other => panic!("expected NotFound, got {other:?}"),
  }
}

#[tokio::test]
async fn fs_store_delete_removes_checkpoint() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let store = FsCheckpointStore::new(dir.path());

  store.save(&state_for("wf-fs")).await.unwrap();
  store.delete("wf-fs").await.unwrap();

  assert!(matches!(
    store.load("wf-fs").await,
    Err(Error::NotFound(_))
  ));
  assert!(matches!(
    store.delete("wf-fs").await,
    Err(Error::NotFound(_))
  ));
}

#[tokio::test]
async fn sqlite_store_round_trips() {
  let store = sqlite_store().await;

  let state = state_for("wf-sql");
  store.save(&state).await.unwrap();

  let loaded = store.load("wf-sql").await.unwrap();
  assert_eq!(loaded, state);
}

#[tokio::test]
async fn sqlite_store_upserts_by_workflow_id() {
  let store = sqlite_store().await;

  let mut state = state_for("wf-sql");
  store.save(&state).await.unwrap();

  let mut result = StageResult::failure("boom");
  result.stage_id = "stage2".to_string();
  state.record(&result);
  store.save(&state).await.unwrap();

  let loaded = store.load("wf-sql").await.unwrap();
  assert_eq!(loaded, state);
}

#[tokio::test]
async fn sqlite_store_missing_is_not_found() {
  let store = sqlite_store().await;

  assert!(matches!(
    store.load("wf-missing").await,
    Err(Error::NotFound(_))
  ));
  assert!(matches!(
    store.delete("wf-missing").await,
    Err(Error::NotFound(_))
  ));
}
