//! Integration tests for the planning pipeline
//!
//! These tests exercise the public library surface end to end: task sets in,
//! plan documents out. Unit tests for individual stages live in the
//! respective module files.

use trackplan::{
    Complexity, PlanError, Planner, PlannerConfig, PlannerService, Priority, Task, TrackKind,
};

fn task(id: &str, complexity: Complexity, priority: Priority, effort: f64) -> Task {
    Task::new(id, complexity, priority, effort)
}

fn web_project_tasks() -> Vec<Task> {
    vec![
        task("schema", Complexity::Medium, Priority::High, 3.0),
        task("api", Complexity::High, Priority::High, 8.0).with_dependencies(&["schema"]),
        task("frontend", Complexity::High, Priority::Medium, 8.0).with_dependencies(&["api"]),
        task("docs", Complexity::Low, Priority::Low, 2.0),
        task("ci", Complexity::Low, Priority::Medium, 2.0),
    ]
}

#[test]
fn test_plan_document_shape() {
    let planner = Planner::new(PlannerConfig::default()).unwrap();
    let plan = planner.plan(web_project_tasks()).unwrap();

    assert_eq!(plan.metadata.task_count, 5);
    assert_eq!(plan.metadata.track_count, 3);
    assert_eq!(plan.tracks.len(), plan.execution_plan.len());
    assert_eq!(plan.tracks.len(), plan.resource_allocation.len());

    // Level 0 holds schema/docs/ci, then api, then frontend.
    assert_eq!(plan.tracks[0].kind, TrackKind::Parallel);
    assert_eq!(plan.tracks[0].tasks, vec!["schema", "docs", "ci"]);
    assert_eq!(plan.tracks[1].tasks, vec!["api"]);
    assert_eq!(plan.tracks[2].tasks, vec!["frontend"]);
}

#[test]
fn test_plan_respects_capacity_bounds() {
    let config = PlannerConfig {
        total_capacity: 320,
        team_size: 16,
        reserve: 64,
        time_per_point: 5.0,
    };
    let planner = Planner::new(config.clone()).unwrap();
    let plan = planner.plan(web_project_tasks()).unwrap();

    let total: u32 = plan
        .resource_allocation
        .values()
        .map(|allocation| allocation.processes)
        .sum();
    assert!(total <= config.available_capacity());

    for allocation in plan.resource_allocation.values() {
        assert!(allocation.teams >= 1);
        assert_eq!(allocation.processes, allocation.teams * config.team_size);
    }
}

#[test]
fn test_parallelism_score_matches_partition() {
    let planner = Planner::new(PlannerConfig::default()).unwrap();
    let plan = planner.plan(web_project_tasks()).unwrap();

    let analysis = &plan.analysis;
    let total = analysis.independent.len() + analysis.dependent.len();
    let expected = analysis.independent.len() as f64 / total as f64;
    assert!((analysis.parallelism_score - expected).abs() < 1e-9);
    assert!(analysis.parallelism_score >= 0.0 && analysis.parallelism_score <= 1.0);
}

#[test]
fn test_sequential_tracks_gate_later_work() {
    let planner = Planner::new(PlannerConfig::default()).unwrap();
    let plan = planner.plan(web_project_tasks()).unwrap();

    // track 1 (api) and track 2 (frontend) are both sequential; the second
    // starts when the first ends.
    let api = &plan.execution_plan[1];
    let frontend = &plan.execution_plan[2];
    assert_eq!(api.kind, TrackKind::Sequential);
    assert_eq!(frontend.kind, TrackKind::Sequential);
    assert!((frontend.start_time - (api.start_time + api.duration)).abs() < 1e-9);
}

#[test]
fn test_cyclic_document_fails_without_partial_output() {
    let planner = Planner::new(PlannerConfig::default()).unwrap();
    let result = planner.plan(vec![
        task("a", Complexity::Low, Priority::Low, 1.0).with_dependencies(&["b"]),
        task("b", Complexity::Low, Priority::Low, 1.0).with_dependencies(&["a"]),
    ]);

    match result {
        Err(PlanError::CycleDetected { ref involved }) => {
            assert_eq!(*involved, vec!["a".to_string(), "b".to_string()]);
        }
        ref other => panic!("expected CycleDetected, got {:?}", other),
    }
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("dependency cycle involving tasks: a, b")
    );
}

#[test]
fn test_plan_document_round_trips_through_json() {
    let planner = Planner::new(PlannerConfig::default()).unwrap();
    let plan = planner.plan(web_project_tasks()).unwrap();

    let json = plan.to_json_string_pretty().unwrap();
    let parsed: trackplan::Plan = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.metadata.plan_id, plan.metadata.plan_id);
    assert_eq!(parsed.analysis, plan.analysis);
    assert_eq!(parsed.tracks, plan.tracks);
    assert_eq!(parsed.execution_plan, plan.execution_plan);
    assert_eq!(parsed.suggestions, plan.suggestions);
}

#[tokio::test]
async fn test_service_round_trip_over_shared_pool() {
    let service = PlannerService::new(PlannerConfig {
        total_capacity: 128,
        team_size: 16,
        reserve: 0,
        time_per_point: 5.0,
    })
    .unwrap();

    let plan = service
        .plan_and_reserve(web_project_tasks())
        .await
        .unwrap();
    let reserved: u32 = plan.execution_plan.iter().map(|s| s.processes).sum();
    assert_eq!(service.available().await, 128 - reserved);

    service.release_plan(&plan).await;
    assert_eq!(service.available().await, 128);
}
