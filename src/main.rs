use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cadence_config::WorkflowDef;
use cadence_state::{CheckpointStore, FsCheckpointStore};
use cadence_workflow::Workflow;

/// Cadence - a DAG-based workflow orchestration engine
#[derive(Parser)]
#[command(name = "cadence")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the checkpoint directory (default: ~/.cadence/checkpoints)
  #[arg(long, global = true)]
  checkpoint_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate a workflow definition's dependency graph
  Validate {
    /// Path to the workflow definition file (JSON)
    workflow_file: PathBuf,
  },

  /// Print the deterministic execution order for a workflow definition
  Order {
    /// Path to the workflow definition file (JSON)
    workflow_file: PathBuf,
  },

  /// Show per-stage statuses from the latest checkpoint of a workflow
  Status {
    /// The workflow ID to look up
    workflow_id: String,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let checkpoint_dir = cli.checkpoint_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".cadence")
      .join("checkpoints")
  });

  match cli.command {
    Some(Commands::Validate { workflow_file }) => validate(workflow_file)?,
    Some(Commands::Order { workflow_file }) => order(workflow_file)?,
    Some(Commands::Status { workflow_id }) => status(workflow_id, checkpoint_dir)?,
    None => {
      println!("cadence - use --help to see available commands");
    }
  }

  Ok(())
}

fn load_workflow(workflow_file: &PathBuf) -> Result<Workflow> {
  let content = std::fs::read_to_string(workflow_file)
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let def: WorkflowDef = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  Ok(def.into())
}

fn validate(workflow_file: PathBuf) -> Result<()> {
  let workflow = load_workflow(&workflow_file)?;
  let errors = workflow.validate_dag();

  if errors.is_empty() {
    println!(
      "workflow '{}' is valid ({} stages)",
      workflow.workflow_id,
      workflow.stages().len()
    );
    return Ok(());
  }

  eprintln!("workflow '{}' failed validation:", workflow.workflow_id);
  for error in &errors {
    eprintln!("  - {error}");
  }
  anyhow::bail!("{} validation error(s)", errors.len());
}

fn order(workflow_file: PathBuf) -> Result<()> {
  let workflow = load_workflow(&workflow_file)?;

  let errors = workflow.validate_dag();
  if !errors.is_empty() {
    for error in &errors {
      eprintln!("  - {error}");
    }
    anyhow::bail!("workflow failed validation, no execution order");
  }

  let order = workflow
    .execution_order()
    .context("failed to compute execution order")?;

  for (index, stage_id) in order.iter().enumerate() {
    println!("{}. {}", index + 1, stage_id);
  }

  Ok(())
}

fn status(workflow_id: String, checkpoint_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { status_async(workflow_id, checkpoint_dir).await })
}

async fn status_async(workflow_id: String, checkpoint_dir: PathBuf) -> Result<()> {
  let store = FsCheckpointStore::new(checkpoint_dir);
  let state = store
    .load(&workflow_id)
    .await
    .with_context(|| format!("failed to load checkpoint for workflow '{workflow_id}'"))?;

  println!("workflow:     {}", state.workflow_id);
  println!("conversation: {}", state.conversation_id);
  println!("request:      {}", state.user_request);
  println!("started:      {}", state.start_time.to_rfc3339());
  match &state.end_time {
    Some(end) => println!("ended:        {}", end.to_rfc3339()),
    None => println!("ended:        (still running)"),
  }

  println!("stages:");
  let mut stage_ids: Vec<&String> = state.stage_statuses.keys().collect();
  stage_ids.sort();
  for stage_id in stage_ids {
    println!("  {:<24} {}", stage_id, state.status(stage_id));
  }

  Ok(())
}
