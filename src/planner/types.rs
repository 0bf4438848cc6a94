use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for tasks
pub type TaskId = String;

/// Complexity estimation for resource weighting
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Priority levels that scale a task's share of the capacity pool
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Core work item submitted to a planning run.
///
/// Tasks are immutable once handed to the planner; a changed task set
/// requires a fresh planning run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub complexity: Complexity,
    pub priority: Priority,
    /// Effort estimate in story-point-like units, must be positive.
    pub effort: f64,
    /// Ids of tasks that must complete before this one can start.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

/// Capacity configuration for a planning run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Total worker processes in the pool.
    pub total_capacity: u32,
    /// Worker processes per team; allocations are whole-team multiples.
    pub team_size: u32,
    /// Processes held back for coordination overhead.
    pub reserve: u32,
    /// Seconds of work per effort point for a single team.
    pub time_per_point: f64,
}

/// Errors produced while validating or planning a task set
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    #[error("dependency cycle involving tasks: {}", .involved.join(", "))]
    CycleDetected { involved: Vec<TaskId> },

    #[error("duplicate task id '{0}'")]
    DuplicateTask(TaskId),

    #[error("task '{task}' has non-positive effort {effort}")]
    InvalidEffort { task: TaskId, effort: f64 },

    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),
}

impl Complexity {
    /// Demand weight used for proportional capacity allocation
    pub fn weight(&self) -> f64 {
        match self {
            Complexity::Low => 1.0,
            Complexity::Medium => 2.0,
            Complexity::High => 3.0,
        }
    }
}

impl Priority {
    /// Multiplier applied on top of the complexity weight
    pub fn multiplier(&self) -> f64 {
        match self {
            Priority::Low => 0.8,
            Priority::Medium => 1.0,
            Priority::High => 1.5,
        }
    }
}

impl Task {
    /// Create a task with no dependencies; the id doubles as the name
    pub fn new(id: &str, complexity: Complexity, priority: Priority, effort: f64) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            complexity,
            priority,
            effort,
            dependencies: Vec::new(),
        }
    }

    /// Set the human-readable name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Declare the tasks this one depends on
    pub fn with_dependencies(mut self, dependencies: &[&str]) -> Self {
        self.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Check whether the task can start without waiting on anything
    pub fn is_independent(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Combined complexity/priority weight used for demand calculations
    pub fn weighted_demand(&self) -> f64 {
        self.complexity.weight() * self.priority.multiplier()
    }
}

impl PlannerConfig {
    /// Capacity left for allocation after the coordination reserve
    pub fn available_capacity(&self) -> u32 {
        self.total_capacity.saturating_sub(self.reserve)
    }

    /// Number of whole teams the pool can field
    pub fn max_teams(&self) -> u32 {
        if self.team_size == 0 {
            0
        } else {
            self.total_capacity / self.team_size
        }
    }

    /// Validate the configuration before any planning happens
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.team_size == 0 {
            return Err(PlanError::InvalidConfig(
                "team_size must be positive".to_string(),
            ));
        }
        if self.reserve >= self.total_capacity {
            return Err(PlanError::InvalidConfig(format!(
                "reserve ({}) must be smaller than total_capacity ({})",
                self.reserve, self.total_capacity
            )));
        }
        if self.time_per_point <= 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "time_per_point must be positive, got {}",
                self.time_per_point
            )));
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            total_capacity: 1000,
            team_size: 16,
            reserve: 100,
            time_per_point: 5.0,
        }
    }
}
