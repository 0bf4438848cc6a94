//! Execution plan assembly.
//!
//! This module provides the `Planner`, which runs the full pipeline (graph
//! validation, leveling, track grouping, resource allocation, duration
//! estimation, optimization advice) and assembles the result into a single
//! immutable `Plan` document.
//!
//! ## Architecture
//!
//! Planning is a deterministic, single-threaded offline computation: the
//! input task set is validated once, every stage is a pure function over the
//! stage before it, and nothing is mutated after the plan is assembled.
//! Re-running the planner on the same task set and configuration yields the
//! same levels, tracks, and critical path.

use crate::planner::advisor::{self, AdvisorThresholds};
use crate::planner::graph::{Analysis, DependencyGraph};
use crate::planner::tracks::{
    self, AllocationResult, Track, TrackAllocation, TrackKind,
};
use crate::planner::types::{PlanError, PlannerConfig, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// One step of the ordered execution plan
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlanStep {
    /// 1-based position in the plan.
    pub step: usize,
    pub track_id: String,
    pub kind: TrackKind,
    pub teams: u32,
    pub processes: u32,
    /// Offset in seconds from plan start; parallel tracks share the offset
    /// reached by the sequential tracks before them.
    pub start_time: f64,
    /// Estimated duration in seconds.
    pub duration: f64,
}

/// Identifying metadata attached to a finished plan
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlanMetadata {
    pub plan_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub task_count: usize,
    pub track_count: usize,
}

/// Complete output of a planning run.
///
/// The document is self-contained: analysis, tracks, allocations, the
/// ordered execution plan, the total duration estimate, and any
/// optimization suggestions.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Plan {
    pub metadata: PlanMetadata,
    pub analysis: Analysis,
    pub tracks: Vec<Track>,
    pub resource_allocation: HashMap<String, TrackAllocation>,
    pub execution_plan: Vec<PlanStep>,
    /// Estimated wall-clock duration of the whole plan in seconds.
    pub estimated_duration: f64,
    pub suggestions: Vec<String>,
}

/// Dependency-aware parallel work planner
#[derive(Clone, Debug)]
pub struct Planner {
    config: PlannerConfig,
    thresholds: AdvisorThresholds,
}

impl Plan {
    /// Check whether the plan schedules any work
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Short human-readable description of the plan's shape
    pub fn summary(&self) -> String {
        match (self.metadata.track_count, self.metadata.task_count) {
            (0, _) => "Empty plan".to_string(),
            (1, 1) => "1 track, 1 task".to_string(),
            (1, n) => format!("1 track, {} tasks", n),
            (t, 1) => format!("{} tracks, 1 task", t),
            (t, n) => format!("{} tracks, {} tasks", t, n),
        }
    }

    /// Serialize the plan document as compact JSON
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize the plan document as pretty-printed JSON
    pub fn to_json_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Planner {
    /// Create a planner, validating the configuration up front
    pub fn new(config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            config,
            thresholds: AdvisorThresholds::default(),
        })
    }

    /// Override the advisor thresholds
    pub fn with_thresholds(mut self, thresholds: AdvisorThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The capacity configuration this planner runs with
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a task set end to end.
    ///
    /// An empty task set is not an error and produces a trivial empty plan.
    /// Validation failures (unknown dependencies, duplicate ids, cycles)
    /// abort planning with no partial output.
    pub fn plan(&self, tasks: Vec<Task>) -> Result<Plan, PlanError> {
        let graph = DependencyGraph::build(tasks)?;
        let levels = graph.assign_levels()?;
        let analysis = graph.analyze()?;

        debug!(
            "Leveled {} tasks into {} levels, parallelism score {:.2}",
            graph.len(),
            levels.len(),
            analysis.parallelism_score
        );

        let grouped = tracks::group_into_tracks(&levels);
        let allocation = tracks::allocate(&grouped, &graph, &self.config);
        let execution_plan = build_steps(&grouped, &allocation.allocations, &graph, &self.config);
        let estimated_duration =
            tracks::total_duration(&grouped, &allocation.allocations, &graph, &self.config);

        let mut suggestions =
            advisor::generate_suggestions(&analysis, &self.config, &self.thresholds);
        suggestions.extend(allocation_notes(&allocation, &self.config));

        let resource_allocation = grouped
            .iter()
            .zip(&allocation.allocations)
            .map(|(track, alloc)| (track.id.clone(), alloc.clone()))
            .collect();

        let plan = Plan {
            metadata: PlanMetadata {
                plan_id: Uuid::new_v4(),
                created_at: Utc::now(),
                task_count: graph.len(),
                track_count: grouped.len(),
            },
            analysis,
            tracks: grouped,
            resource_allocation,
            execution_plan,
            estimated_duration,
            suggestions,
        };

        info!(
            "Planned {} ({}), estimated duration {:.1}s",
            plan.metadata.plan_id,
            plan.summary(),
            plan.estimated_duration
        );

        Ok(plan)
    }
}

/// Walk tracks in level order and assign start offsets.
///
/// Only sequential tracks advance the cumulative offset; parallel tracks
/// start at whatever point the sequential tracks before them have reached.
fn build_steps(
    tracks_in_order: &[Track],
    allocations: &[TrackAllocation],
    graph: &DependencyGraph,
    config: &PlannerConfig,
) -> Vec<PlanStep> {
    let mut steps = Vec::with_capacity(tracks_in_order.len());
    let mut current_time = 0.0;

    for (track, allocation) in tracks_in_order.iter().zip(allocations) {
        let duration = tracks::track_duration(track, allocation, graph, config);

        steps.push(PlanStep {
            step: steps.len() + 1,
            track_id: track.id.clone(),
            kind: track.kind,
            teams: allocation.teams,
            processes: allocation.processes,
            start_time: current_time,
            duration,
        });

        if track.kind == TrackKind::Sequential {
            current_time += duration;
        }
    }

    steps
}

/// Suggestions describing how the allocator reconciled the capacity pool.
fn allocation_notes(allocation: &AllocationResult, config: &PlannerConfig) -> Vec<String> {
    let mut notes = Vec::new();
    if allocation.overcommitted {
        notes.push(format!(
            "Minimum one-team allocations exceed the {} available processes. \
             Increase capacity or merge dependency levels.",
            config.available_capacity()
        ));
    } else if allocation.clamped {
        notes.push(format!(
            "Proportional allocations exceeded the {} available processes and were \
             clamped to fit.",
            config.available_capacity()
        ));
    }
    notes
}
