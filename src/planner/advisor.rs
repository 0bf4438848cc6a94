//! Optimization advice for planned task sets.
//!
//! The advisor inspects a plan's analysis against tunable thresholds and
//! produces human-readable suggestions, plus a structural task-split
//! transform for unlocking parallelism in dependency-free work.

use crate::planner::graph::{Analysis, DependencyGraph};
use crate::planner::types::{Complexity, PlanError, PlannerConfig, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Tunable thresholds that drive optimization suggestions
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AdvisorThresholds {
    /// Below this parallelism score, suggest decomposing dependent tasks.
    pub low_parallelism: f64,
    /// Beyond this critical path length, suggest reducing dependency depth.
    pub long_critical_path: usize,
    /// Below this parallelism score, the optimize pass splits eligible tasks.
    pub optimize_below: f64,
    /// Number of sub-tasks a split produces.
    pub split_parts: usize,
}

/// Outcome of the optimize pass over a task set
#[derive(Clone, Debug)]
pub struct Optimization {
    /// The (possibly rewritten) task set to plan with.
    pub tasks: Vec<Task>,
    /// Descriptions of the transformations applied; empty when the set was
    /// left untouched.
    pub improvements: Vec<String>,
}

impl Default for AdvisorThresholds {
    fn default() -> Self {
        Self {
            low_parallelism: 0.5,
            long_critical_path: 5,
            optimize_below: 0.7,
            split_parts: 4,
        }
    }
}

/// Produce optimization suggestions for an analyzed task set.
pub fn generate_suggestions(
    analysis: &Analysis,
    config: &PlannerConfig,
    thresholds: &AdvisorThresholds,
) -> Vec<String> {
    let mut suggestions = Vec::new();
    let total_tasks = analysis.independent.len() + analysis.dependent.len();
    if total_tasks == 0 {
        return suggestions;
    }

    if analysis.parallelism_score < thresholds.low_parallelism {
        suggestions.push(format!(
            "Low parallelism score ({:.2}). Consider breaking dependent tasks \
             down into smaller, independent ones.",
            analysis.parallelism_score
        ));
    }

    if analysis.critical_path.len() > thresholds.long_critical_path {
        suggestions.push(format!(
            "Long critical path ({} tasks). Consider restructuring to reduce \
             dependency depth.",
            analysis.critical_path.len()
        ));
    }

    if analysis.dependent.len() > analysis.independent.len() {
        suggestions.push(
            "More dependent tasks than independent ones. Prioritize the \
             independent tasks first to unblock the rest."
                .to_string(),
        );
    }

    if config.max_teams() as usize > analysis.independent.len() {
        suggestions.push(format!(
            "Capacity for {} teams but only {} independent tasks. Consider \
             splitting large tasks to use the spare capacity.",
            config.max_teams(),
            analysis.independent.len()
        ));
    }

    suggestions
}

/// Split a task into a fixed number of independent sub-tasks.
///
/// Effort is redistributed evenly, complexity drops to low, priority is
/// inherited, and no dependencies are carried over. Sub-task ids extend the
/// original id with a part index.
pub fn split_task(task: &Task, parts: usize) -> Vec<Task> {
    let parts = parts.max(1);
    let effort_per_part = task.effort / parts as f64;

    (0..parts)
        .map(|part| Task {
            id: format!("{}_{}", task.id, part),
            name: format!("{} (part {})", task.name, part + 1),
            complexity: Complexity::Low,
            priority: task.priority,
            effort: effort_per_part,
            dependencies: Vec::new(),
        })
        .collect()
}

/// Rewrite a task set for better parallelism when its score is low.
///
/// High-complexity tasks with no dependencies are split into sub-tasks; all
/// other tasks pass through unchanged. A task set already at or above the
/// optimize threshold is returned as-is.
pub fn optimize(tasks: Vec<Task>, thresholds: &AdvisorThresholds) -> Result<Optimization, PlanError> {
    let analysis = DependencyGraph::build(tasks.clone())?.analyze()?;

    if tasks.is_empty() || analysis.parallelism_score >= thresholds.optimize_below {
        return Ok(Optimization {
            tasks,
            improvements: Vec::new(),
        });
    }

    let mut optimized = Vec::with_capacity(tasks.len());
    let mut improvements = Vec::new();
    let mut split_parts: HashMap<String, Vec<String>> = HashMap::new();

    for task in tasks {
        if task.complexity == Complexity::High && task.is_independent() {
            let sub_tasks = split_task(&task, thresholds.split_parts);
            improvements.push(format!(
                "Split task '{}' into {} sub-tasks",
                task.name,
                sub_tasks.len()
            ));
            split_parts.insert(task.id.clone(), sub_tasks.iter().map(|t| t.id.clone()).collect());
            optimized.extend(sub_tasks);
        } else {
            optimized.push(task);
        }
    }

    // Anything that depended on a split task now depends on all of its parts.
    if !split_parts.is_empty() {
        for task in &mut optimized {
            task.dependencies = task
                .dependencies
                .iter()
                .flat_map(|dependency| match split_parts.get(dependency) {
                    Some(parts) => parts.clone(),
                    None => vec![dependency.clone()],
                })
                .collect();
        }
    }

    if !improvements.is_empty() {
        info!(
            "Optimize pass rewrote the task set: {} transformations",
            improvements.len()
        );
    }

    Ok(Optimization {
        tasks: optimized,
        improvements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::types::Priority;

    fn analysis_of(tasks: Vec<Task>) -> Analysis {
        DependencyGraph::build(tasks).unwrap().analyze().unwrap()
    }

    #[test]
    fn test_low_parallelism_suggestion() {
        let analysis = analysis_of(vec![
            Task::new("a", Complexity::Medium, Priority::Medium, 5.0),
            Task::new("b", Complexity::Medium, Priority::Medium, 5.0).with_dependencies(&["a"]),
            Task::new("c", Complexity::Medium, Priority::Medium, 5.0).with_dependencies(&["a"]),
        ]);

        let suggestions = generate_suggestions(
            &analysis,
            &PlannerConfig::default(),
            &AdvisorThresholds::default(),
        );
        assert!(
            suggestions
                .iter()
                .any(|s| s.contains("Low parallelism score (0.33)"))
        );
    }

    #[test]
    fn test_long_critical_path_suggestion() {
        let tasks: Vec<Task> = (0..7)
            .map(|i| {
                let task = Task::new(
                    &format!("t{}", i),
                    Complexity::Low,
                    Priority::Medium,
                    2.0,
                );
                if i == 0 {
                    task
                } else {
                    task.with_dependencies(&[&format!("t{}", i - 1)])
                }
            })
            .collect();

        let suggestions = generate_suggestions(
            &analysis_of(tasks),
            &PlannerConfig::default(),
            &AdvisorThresholds::default(),
        );
        assert!(
            suggestions
                .iter()
                .any(|s| s.contains("Long critical path (7 tasks)"))
        );
    }

    #[test]
    fn test_spare_capacity_suggestion() {
        let analysis = analysis_of(vec![Task::new(
            "only",
            Complexity::High,
            Priority::High,
            8.0,
        )]);

        let suggestions = generate_suggestions(
            &analysis,
            &PlannerConfig::default(),
            &AdvisorThresholds::default(),
        );
        // The default config fields 62 teams against one independent task.
        assert!(
            suggestions
                .iter()
                .any(|s| s.contains("Capacity for 62 teams but only 1 independent tasks"))
        );
    }

    #[test]
    fn test_no_suggestions_for_empty_set() {
        let analysis = analysis_of(Vec::new());
        let suggestions = generate_suggestions(
            &analysis,
            &PlannerConfig::default(),
            &AdvisorThresholds::default(),
        );
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_split_redistributes_effort_exactly() {
        let task = Task::new("big", Complexity::High, Priority::High, 10.0);
        let parts = split_task(&task, 4);

        assert_eq!(parts.len(), 4);
        let total: f64 = parts.iter().map(|t| t.effort).sum();
        assert!((total - 10.0).abs() < 1e-9);
        for (position, part) in parts.iter().enumerate() {
            assert_eq!(part.id, format!("big_{}", position));
            assert_eq!(part.complexity, Complexity::Low);
            assert_eq!(part.priority, Priority::High);
            assert!(part.dependencies.is_empty());
        }
    }

    #[test]
    fn test_optimize_splits_eligible_tasks() {
        let tasks = vec![
            Task::new("monolith", Complexity::High, Priority::High, 8.0),
            Task::new("follow", Complexity::Medium, Priority::Medium, 3.0)
                .with_dependencies(&["monolith"]),
        ];

        let outcome = optimize(tasks, &AdvisorThresholds::default()).unwrap();
        assert_eq!(outcome.improvements.len(), 1);
        // 4 sub-tasks plus the untouched dependent task.
        assert_eq!(outcome.tasks.len(), 5);

        // The dependent task now waits on every part of the split.
        let follow = outcome.tasks.iter().find(|t| t.id == "follow").unwrap();
        assert_eq!(
            follow.dependencies,
            vec!["monolith_0", "monolith_1", "monolith_2", "monolith_3"]
        );

        // The rewritten set still validates and plans.
        assert!(DependencyGraph::build(outcome.tasks).is_ok());
    }

    #[test]
    fn test_optimize_never_decreases_parallelism() {
        let tasks = vec![
            Task::new("big", Complexity::High, Priority::High, 8.0),
            Task::new("dep1", Complexity::Medium, Priority::Medium, 3.0)
                .with_dependencies(&["big"]),
            Task::new("dep2", Complexity::Medium, Priority::Medium, 3.0)
                .with_dependencies(&["big"]),
        ];
        let before = analysis_of(tasks.clone()).parallelism_score;

        let outcome = optimize(tasks, &AdvisorThresholds::default()).unwrap();
        let after = analysis_of(outcome.tasks).parallelism_score;
        assert!(after >= before);
    }

    #[test]
    fn test_optimize_leaves_high_scoring_sets_alone() {
        let tasks = vec![
            Task::new("a", Complexity::High, Priority::High, 8.0),
            Task::new("b", Complexity::High, Priority::High, 8.0),
        ];

        let outcome = optimize(tasks.clone(), &AdvisorThresholds::default()).unwrap();
        assert!(outcome.improvements.is_empty());
        assert_eq!(outcome.tasks, tasks);
    }
}
