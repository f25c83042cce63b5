use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::{CheckpointStore, Error, WorkflowState};

/// Filesystem-based checkpoint store.
///
/// Stores one JSON snapshot per workflow at `{base_path}/{workflow_id}.json`.
/// Writes go through a temp file followed by a rename, so readers never
/// observe a half-written checkpoint.
pub struct FsCheckpointStore {
  base_path: PathBuf,
}

impl FsCheckpointStore {
  /// Create a new filesystem store rooted at the given directory.
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  fn checkpoint_path(&self, workflow_id: &str) -> PathBuf {
    self.base_path.join(format!("{workflow_id}.json"))
  }
}

#[async_trait]
impl CheckpointStore for FsCheckpointStore {
  async fn save(&self, state: &WorkflowState) -> Result<(), Error> {
    fs::create_dir_all(&self.base_path).await?;

    let path = self.checkpoint_path(&state.workflow_id);
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(state)?;

    fs::write(&tmp, &data).await?;
    fs::rename(&tmp, &path).await?;
    Ok(())
  }

  async fn load(&self, workflow_id: &str) -> Result<WorkflowState, Error> {
    let path = self.checkpoint_path(workflow_id);
    let data = fs::read(&path).await.map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(workflow_id.to_string())
      } else {
        Error::Io(e)
      }
    })?;

    Ok(serde_json::from_slice(&data)?)
  }

  async fn delete(&self, workflow_id: &str) -> Result<(), Error> {
    let path = self.checkpoint_path(workflow_id);
    fs::remove_file(&path).await.map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(workflow_id.to_string())
      } else {
        Error::Io(e)
      }
    })
  }
}
