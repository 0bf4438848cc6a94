//! Track grouping, resource allocation, and duration estimation.
//!
//! Each topological level becomes an execution track. Tracks receive
//! whole-team quotas from the bounded capacity pool in proportion to their
//! weighted demand, and their durations follow from effort and team count.

use crate::planner::graph::DependencyGraph;
use crate::planner::types::{PlannerConfig, TaskId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Coordination overhead multiplier for tracks whose tasks run concurrently.
const PARALLEL_OVERHEAD: f64 = 1.10;

/// Execution strategy for a track
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// The track holds a single task and serializes against other
    /// sequential tracks.
    Sequential,
    /// The track's tasks run concurrently with each other.
    Parallel,
}

/// A group of tasks scheduled together at one dependency level
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Track {
    pub id: String,
    pub kind: TrackKind,
    pub level: usize,
    pub tasks: Vec<TaskId>,
}

/// Worker-team quota assigned to a track
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackAllocation {
    /// Complexity/priority weighted demand of the track's tasks.
    pub weighted_demand: f64,
    /// Whole teams assigned; always at least one.
    pub teams: u32,
    /// Worker processes assigned; always `teams * team_size`.
    pub processes: u32,
}

/// Result of allocating the capacity pool across tracks.
///
/// Allocations are positionally aligned with the track list they were
/// computed from.
#[derive(Clone, Debug)]
pub struct AllocationResult {
    pub allocations: Vec<TrackAllocation>,
    /// Proportional shares exceeded available capacity and were reduced.
    pub clamped: bool,
    /// One-team minimums alone exceed available capacity; the plan
    /// overcommits even after clamping.
    pub overcommitted: bool,
}

impl Track {
    /// Sum of effort points across the track's member tasks
    pub fn total_effort(&self, graph: &DependencyGraph) -> f64 {
        self.tasks
            .iter()
            .filter_map(|id| graph.task(id))
            .map(|task| task.effort)
            .sum()
    }

    /// Combined weighted demand of the track's member tasks
    pub fn weighted_demand(&self, graph: &DependencyGraph) -> f64 {
        self.tasks
            .iter()
            .filter_map(|id| graph.task(id))
            .map(|task| task.weighted_demand())
            .sum()
    }
}

/// Convert topological levels into execution tracks, one per level.
///
/// A level with a single task becomes a sequential track; a level with two
/// or more becomes a parallel track. Track ids encode kind and level.
pub fn group_into_tracks(levels: &[Vec<TaskId>]) -> Vec<Track> {
    levels
        .iter()
        .enumerate()
        .map(|(level, tasks)| {
            let kind = if tasks.len() == 1 {
                TrackKind::Sequential
            } else {
                TrackKind::Parallel
            };
            let id = match kind {
                TrackKind::Sequential => format!("track_seq_{}", level),
                TrackKind::Parallel => format!("track_par_{}", level),
            };
            Track {
                id,
                kind,
                level,
                tasks: tasks.clone(),
            }
        })
        .collect()
}

/// Distribute the available capacity pool across tracks.
///
/// Each track's share is proportional to its weighted demand, floored to a
/// whole number of teams, with a minimum of one team. If the minimums push
/// the total past available capacity, teams are stripped one at a time from
/// the largest allocation (ties resolved toward the later track) until the
/// total fits or every track is down to a single team.
pub fn allocate(tracks: &[Track], graph: &DependencyGraph, config: &PlannerConfig) -> AllocationResult {
    let demands: Vec<f64> = tracks
        .iter()
        .map(|track| track.weighted_demand(graph))
        .collect();
    let total_demand: f64 = demands.iter().sum();
    let available = config.available_capacity();

    let mut allocations: Vec<TrackAllocation> = tracks
        .iter()
        .zip(&demands)
        .map(|(_, &demand)| {
            let teams = if total_demand > 0.0 {
                let raw_share = (demand / total_demand) * available as f64;
                let whole_teams = (raw_share.floor() as u32) / config.team_size;
                whole_teams.max(1)
            } else {
                1
            };
            TrackAllocation {
                weighted_demand: demand,
                teams,
                processes: teams * config.team_size,
            }
        })
        .collect();

    let total = |allocations: &[TrackAllocation]| -> u32 {
        allocations.iter().map(|a| a.processes).sum()
    };

    let mut clamped = false;
    while total(&allocations) > available {
        // Largest allocation that can still shrink; later tracks win ties so
        // upstream levels keep their capacity.
        let mut candidate: Option<usize> = None;
        for (position, allocation) in allocations.iter().enumerate() {
            if allocation.teams > 1
                && candidate.is_none_or(|best| allocation.teams >= allocations[best].teams)
            {
                candidate = Some(position);
            }
        }

        let Some(position) = candidate else {
            break;
        };
        allocations[position].teams -= 1;
        allocations[position].processes = allocations[position].teams * config.team_size;
        clamped = true;
    }

    let overcommitted = total(&allocations) > available;
    if clamped {
        debug!(
            "Clamped track allocations to fit {} available processes",
            available
        );
    }
    if overcommitted {
        warn!(
            "Minimum one-team allocations exceed available capacity ({} tracks, {} available processes)",
            tracks.len(),
            available
        );
    }

    AllocationResult {
        allocations,
        clamped,
        overcommitted,
    }
}

/// Estimate how long a track takes with the teams it was given.
///
/// Parallel tracks pay a coordination overhead on top of the base time.
pub fn track_duration(
    track: &Track,
    allocation: &TrackAllocation,
    graph: &DependencyGraph,
    config: &PlannerConfig,
) -> f64 {
    let total_effort = track.total_effort(graph);
    let teams = allocation.teams.max(1) as f64;
    let base_time = (total_effort * config.time_per_point) / teams;

    let overhead = match track.kind {
        TrackKind::Parallel => PARALLEL_OVERHEAD,
        TrackKind::Sequential => 1.0,
    };

    base_time * overhead
}

/// Estimate the duration of the whole plan.
///
/// Sequential tracks serialize against each other; parallel tracks only
/// contribute the longest of their durations.
pub fn total_duration(
    tracks: &[Track],
    allocations: &[TrackAllocation],
    graph: &DependencyGraph,
    config: &PlannerConfig,
) -> f64 {
    let mut sequential_total = 0.0;
    let mut parallel_max: f64 = 0.0;

    for (track, allocation) in tracks.iter().zip(allocations) {
        let duration = track_duration(track, allocation, graph, config);
        match track.kind {
            TrackKind::Sequential => sequential_total += duration,
            TrackKind::Parallel => parallel_max = parallel_max.max(duration),
        }
    }

    sequential_total + parallel_max
}
