//! Tests for DAG validation and deterministic execution ordering.

use cadence_config::{StageDef, WorkflowDef};
use cadence_workflow::{Workflow, WorkflowError};

fn linear_workflow() -> Workflow {
  WorkflowDef::new("wf-linear", "Linear")
    .stage(StageDef::new("stage1"))
    .stage(StageDef::new("stage2").depends_on("stage1"))
    .stage(StageDef::new("stage3").depends_on("stage2"))
    .into()
}

fn diamond_workflow() -> Workflow {
  WorkflowDef::new("wf-diamond", "Diamond")
    .stage(StageDef::new("stage1"))
    .stage(StageDef::new("stage2").depends_on("stage1"))
    .stage(StageDef::new("stage3").depends_on("stage1"))
    .stage(
      StageDef::new("stage4")
        .depends_on("stage2")
        .depends_on("stage3"),
    )
    .into()
}

#[test]
fn valid_dag_has_no_errors() {
  assert!(linear_workflow().validate_dag().is_empty());
  assert!(diamond_workflow().validate_dag().is_empty());
}

#[test]
fn execution_order_contains_every_stage_once() {
  let workflow = diamond_workflow();
  let order = workflow.execution_order().unwrap();

  assert_eq!(order.len(), 4);
  for stage in workflow.stages() {
    assert_eq!(order.iter().filter(|id| **id == stage.id).count(), 1);
  }
}

#[test]
fn dependencies_appear_strictly_earlier() {
  let workflow = diamond_workflow();
  let order = workflow.execution_order().unwrap();

  let position =
    |id: &str| order.iter().position(|s| s == id).expect("stage missing from order");

  for stage in workflow.stages() {
    for dep in &stage.depends_on {
      assert!(
        position(dep) < position(&stage.id),
        "dependency '{}' must come before '{}'",
        dep,
        stage.id
      );
    }
  }
}

#[test]
fn diamond_order_is_deterministic() {
  let workflow = diamond_workflow();
  let first = workflow.execution_order().unwrap().to_vec();

  assert_eq!(first.first().map(String::as_str), Some("stage1"));
  assert_eq!(first.last().map(String::as_str), Some("stage4"));

  // Repeated computations on the same definition never reorder.
  for _ in 0..10 {
    assert_eq!(workflow.execution_order().unwrap(), first.as_slice());
  }

  // A freshly built workflow from the same definition agrees too.
  let again = diamond_workflow();
  assert_eq!(again.execution_order().unwrap(), first.as_slice());
}

#[test]
fn ties_break_by_declaration_order() {
  let workflow: Workflow = WorkflowDef::new("wf-parallel", "Parallel branches")
    .stage(StageDef::new("b"))
    .stage(StageDef::new("a"))
    .stage(StageDef::new("c"))
    .into();

  // All three are eligible immediately; declaration order wins, not lexicographic.
  assert_eq!(workflow.execution_order().unwrap(), ["b", "a", "c"]);
}

#[test]
fn cycle_is_reported_once() {
  let workflow: Workflow = WorkflowDef::new("wf-cycle", "Cycle")
    .stage(StageDef::new("stage1").depends_on("stage3"))
    .stage(StageDef::new("stage2").depends_on("stage1"))
    .stage(StageDef::new("stage3").depends_on("stage2"))
    .into();

  let errors = workflow.validate_dag();
  assert_eq!(errors, vec![WorkflowError::CycleDetected]);
  assert!(workflow.execution_order().is_err());
}

#[test]
fn self_dependency_is_a_cycle() {
  let workflow: Workflow = WorkflowDef::new("wf-self", "Self loop")
    .stage(StageDef::new("stage1").depends_on("stage1"))
    .into();

  assert_eq!(workflow.validate_dag(), vec![WorkflowError::CycleDetected]);
}

#[test]
fn missing_dependency_names_both_stages() {
  let workflow: Workflow = WorkflowDef::new("wf-missing", "Missing dep")
    .stage(StageDef::new("stage1"))
    .stage(StageDef::new("stage2").depends_on("ghost"))
    .into();

  let errors = workflow.validate_dag();
  assert_eq!(
    errors,
    vec![WorkflowError::MissingDependency {
      stage: "stage2".to_string(),
      dependency: "ghost".to_string(),
    }]
  );

  let message = errors[0].to_string();
  assert!(message.contains("stage2"));
  assert!(message.contains("ghost"));
}

#[test]
fn all_problems_are_reported_together() {
  let workflow: Workflow = WorkflowDef::new("wf-broken", "Everything wrong")
    .stage(StageDef::new("stage1").depends_on("ghost"))
    .stage(StageDef::new("stage1"))
    .stage(StageDef::new("stage2").depends_on("phantom"))
    .into();

  let errors = workflow.validate_dag();
  assert!(errors.contains(&WorkflowError::DuplicateStage("stage1".to_string())));
  assert!(errors.contains(&WorkflowError::MissingDependency {
    stage: "stage1".to_string(),
    dependency: "ghost".to_string(),
  }));
  assert!(errors.contains(&WorkflowError::MissingDependency {
    stage: "stage2".to_string(),
    dependency: "phantom".to_string(),
  }));
}
