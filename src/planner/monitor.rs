//! Read-only health assessment of a plan under execution.
//!
//! The monitor consumes per-track completion feedback from whatever system
//! is actually running the work and reports bottlenecks, an overall health
//! score, and reallocation suggestions. It never mutates the plan.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Live progress feedback for one track
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TrackProgress {
    /// Fraction of the track's work completed, in [0, 1].
    pub completion_rate: f64,
    /// Seconds elapsed since the track started.
    pub elapsed_time: f64,
}

/// Snapshot of execution progress across a plan's tracks
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PlanStatus {
    pub tracks: HashMap<String, TrackProgress>,
}

/// A track that is falling behind
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Bottleneck {
    pub track_id: String,
    pub completion_rate: f64,
    pub suggestion: String,
}

/// Thresholds controlling bottleneck and health detection
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MonitorConfig {
    /// A track below this completion rate may be stalled.
    pub stalled_completion: f64,
    /// Seconds a track must have run before it can count as stalled.
    pub stalled_after: f64,
    /// Below this mean completion rate, suggest reallocating resources.
    pub low_health: f64,
}

/// Health report for a plan in flight
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MonitorReport {
    pub bottlenecks: Vec<Bottleneck>,
    /// Mean completion rate across tracks; 0 when no feedback is present.
    pub health_score: f64,
    pub reallocation_suggestions: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            stalled_completion: 0.5,
            stalled_after: 10.0,
            low_health: 0.7,
        }
    }
}

impl PlanStatus {
    /// Record progress feedback for a track
    pub fn record(&mut self, track_id: &str, completion_rate: f64, elapsed_time: f64) {
        self.tracks.insert(
            track_id.to_string(),
            TrackProgress {
                completion_rate,
                elapsed_time,
            },
        );
    }
}

/// Assess a progress snapshot against the monitor thresholds.
///
/// Bottlenecks are reported in track-id order so repeated assessments of the
/// same snapshot produce identical reports.
pub fn assess(status: &PlanStatus, config: &MonitorConfig) -> MonitorReport {
    let mut track_ids: Vec<&String> = status.tracks.keys().collect();
    track_ids.sort();

    let mut bottlenecks = Vec::new();
    for track_id in &track_ids {
        let progress = status.tracks[*track_id];
        if progress.completion_rate < config.stalled_completion
            && progress.elapsed_time > config.stalled_after
        {
            bottlenecks.push(Bottleneck {
                track_id: (*track_id).clone(),
                completion_rate: progress.completion_rate,
                suggestion: "Allocate more resources to this track".to_string(),
            });
        }
    }

    let health_score = if status.tracks.is_empty() {
        0.0
    } else {
        status
            .tracks
            .values()
            .map(|progress| progress.completion_rate)
            .sum::<f64>()
            / status.tracks.len() as f64
    };

    let mut reallocation_suggestions = Vec::new();
    if !status.tracks.is_empty() && health_score < config.low_health {
        warn!(
            "Plan health is low ({:.2}); {} bottleneck track(s)",
            health_score,
            bottlenecks.len()
        );
        reallocation_suggestions.push(format!(
            "Plan health is low ({:.2}). Consider reallocating idle resources \
             to bottleneck tracks.",
            health_score
        ));
    }

    MonitorReport {
        bottlenecks,
        health_score,
        reallocation_suggestions,
    }
}
