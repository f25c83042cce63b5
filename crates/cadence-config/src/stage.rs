use serde::{Deserialize, Serialize};

/// Declarative metadata for one stage in a workflow.
///
/// A stage names a unit of work and the stages it depends on. The engine
/// never interprets `script` - the actual work is supplied at runtime by a
/// registered stage executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
  /// Stage ID, unique within a workflow.
  pub id: String,

  /// Descriptive metadata about what the stage does (not invoked by the engine).
  #[serde(default)]
  pub script: String,

  /// Whether a failure of this stage halts the workflow.
  #[serde(default = "default_required")]
  pub required: bool,

  /// Stage IDs this stage depends on.
  #[serde(default)]
  pub depends_on: Vec<String>,

  /// Whether a failed execution may be retried.
  #[serde(default)]
  pub retryable: bool,

  /// Maximum number of additional attempts after the first failure.
  #[serde(default)]
  pub max_retries: u32,

  /// Upper bound on a single attempt, in seconds.
  #[serde(default = "default_timeout_seconds")]
  pub timeout_seconds: u64,
}

fn default_required() -> bool {
  true
}

fn default_timeout_seconds() -> u64 {
  300
}

impl StageDef {
  /// Create a stage definition with default flags and no dependencies.
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      script: String::new(),
      required: true,
      depends_on: Vec::new(),
      retryable: false,
      max_retries: 0,
      timeout_seconds: default_timeout_seconds(),
    }
  }

  /// Add a dependency on another stage.
  pub fn depends_on(mut self, stage_id: impl Into<String>) -> Self {
    self.depends_on.push(stage_id.into());
    self
  }

  /// Mark the stage as optional (failure does not halt the workflow).
  pub fn optional(mut self) -> Self {
    self.required = false;
    self
  }

  /// Allow up to `max_retries` additional attempts after a failure.
  pub fn retryable(mut self, max_retries: u32) -> Self {
    self.retryable = true;
    self.max_retries = max_retries;
    self
  }

  /// Bound a single attempt to `seconds`.
  pub fn timeout_seconds(mut self, seconds: u64) -> Self {
    self.timeout_seconds = seconds;
    self
  }
}
