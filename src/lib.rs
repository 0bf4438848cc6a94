//! # Trackplan
//!
//! A dependency-aware parallel work scheduler. Trackplan takes a set of work
//! items with declared dependencies, complexity, priority, and effort
//! estimates, and computes an execution plan that respects dependency
//! ordering, maximizes parallel execution within a bounded worker-capacity
//! pool, identifies the critical path, and allocates whole-team worker
//! quotas with duration estimates.
//!
//! ## Architecture Overview
//!
//! The system consists of several key components organized into modules:
//!
//! - **[`planner`]**: The planning pipeline: dependency graph validation,
//!   topological leveling, track grouping, resource allocation, duration
//!   estimation, optimization advice, and plan health monitoring
//! - **[`cli`]**: Argument parsing, task document loading, and configuration
//!   discovery
//! - **[`env`]**: Path constants and utilities for configuration discovery
//!
//! ## Features
//!
//! ### 🗺️ Dependency-Aware Planning
//! - **Topological Leveling**: Tasks are grouped into levels so every task
//!   runs strictly after all of its dependencies
//! - **Cycle Detection**: Cyclic inputs are rejected with the full set of
//!   stuck tasks, never silently dropped from the plan
//! - **Critical Path**: The longest dependency chain is found in O(V + E)
//!   with memoized chain lengths
//!
//! ### ⚖️ Bounded Resource Allocation
//! - **Weighted Demand**: Complexity and priority weights drive each track's
//!   proportional share of the capacity pool
//! - **Whole-Team Quotas**: Allocations are quantized to team-size units
//!   with a guaranteed minimum of one team per track
//! - **Deterministic Clamping**: Allocations that overflow the pool are
//!   reduced deterministically and flagged in the plan's suggestions
//!
//! ### 🔒 Shared Capacity Pool
//! - **Explicit Pool Value**: No ambient global state; the pool is passed by
//!   handle and mutated only through reserve/release transactions
//! - **Serialized Admission**: Concurrent planning requests cannot jointly
//!   overcommit the pool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trackplan::{Complexity, Planner, PlannerConfig, Priority, Task};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = Planner::new(PlannerConfig::default())?;
//!
//!     let tasks = vec![
//!         Task::new("auth", Complexity::High, Priority::High, 8.0),
//!         Task::new("profile", Complexity::Medium, Priority::Medium, 5.0)
//!             .with_dependencies(&["auth"]),
//!     ];
//!
//!     let plan = planner.plan(tasks)?;
//!     println!("{}", plan.to_json_string_pretty()?);
//!     Ok(())
//! }
//! ```

/// The planning pipeline.
///
/// Validates task sets into dependency graphs, levels them topologically,
/// groups levels into execution tracks, allocates the worker-capacity pool,
/// estimates durations, and assembles the final plan document.
pub mod planner;

/// Environment constants and path utilities.
///
/// Centralizes the hardcoded paths and directory names used for
/// configuration discovery.
pub mod env;

// CLI module for command-line interface
pub mod cli;

// Re-export the main planner types
pub use planner::{
    AdvisorThresholds, Analysis, Complexity, DependencyGraph, MonitorConfig, MonitorReport, Plan,
    PlanError, PlanStatus, PlanStep, Planner, PlannerConfig, PlannerService, Priority,
    ResourcePool, ServiceError, Task, TaskId, Track, TrackAllocation, TrackKind,
};
