//! Dependency graph construction and analysis.
//!
//! The graph is built once per planning run from the submitted task set and
//! is immutable afterwards. It provides the topological leveling, critical
//! path search, and parallelism analysis the rest of the planner consumes.

use crate::planner::types::{PlanError, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Structural analysis of a task set
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Analysis {
    /// Fraction of tasks with no dependencies, in [0, 1].
    pub parallelism_score: f64,
    /// Longest dependency chain, ordered from root to terminal task.
    pub critical_path: Vec<TaskId>,
    /// Tasks that can start immediately, in input order.
    pub independent: Vec<TaskId>,
    /// Tasks gated by at least one dependency, in input order.
    pub dependent: Vec<TaskId>,
}

/// Validated dependency graph over a single planning run's task set.
///
/// Tasks keep their input order, which makes every derived ordering
/// (levels, critical-path tie-breaks, cycle reports) deterministic.
#[derive(Clone, Debug)]
pub struct DependencyGraph {
    /// Tasks in submission order.
    tasks: Vec<Task>,
    /// Task id to position in `tasks`.
    index: HashMap<TaskId, usize>,
    /// Edges from a dependency to the tasks waiting on it.
    dependents: Vec<Vec<usize>>,
    /// Number of unresolved dependencies per task.
    dependency_count: Vec<usize>,
}

impl DependencyGraph {
    /// Build and validate the graph from a task set.
    ///
    /// Rejects duplicate ids, non-positive efforts, and references to task
    /// ids that are not part of the set. Cycles are not detected here; they
    /// surface during leveling, where the stuck tasks can be named.
    pub fn build(tasks: Vec<Task>) -> Result<Self, PlanError> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (position, task) in tasks.iter().enumerate() {
            if task.effort <= 0.0 {
                return Err(PlanError::InvalidEffort {
                    task: task.id.clone(),
                    effort: task.effort,
                });
            }
            if index.insert(task.id.clone(), position).is_some() {
                return Err(PlanError::DuplicateTask(task.id.clone()));
            }
        }

        let mut dependents = vec![Vec::new(); tasks.len()];
        let mut dependency_count = vec![0usize; tasks.len()];
        let mut edge_count = 0usize;

        for (position, task) in tasks.iter().enumerate() {
            for dependency in &task.dependencies {
                let dep_position =
                    *index
                        .get(dependency)
                        .ok_or_else(|| PlanError::UnknownDependency {
                            task: task.id.clone(),
                            dependency: dependency.clone(),
                        })?;
                dependents[dep_position].push(position);
                dependency_count[position] += 1;
                edge_count += 1;
            }
        }

        debug!(
            "Built dependency graph with {} tasks and {} edges",
            tasks.len(),
            edge_count
        );

        Ok(Self {
            tasks,
            index,
            dependents,
            dependency_count,
        })
    }

    /// Number of tasks in the graph
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check whether the graph holds no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in submission order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&position| &self.tasks[position])
    }

    /// Assign every task to a topological level.
    ///
    /// Level 0 holds the dependency-free tasks; each later level holds tasks
    /// whose dependencies all sit in earlier levels. Tasks within a level
    /// keep input order. Any task that never reaches zero unresolved
    /// dependencies is part of (or downstream of) a cycle, and the whole
    /// stuck set is reported.
    pub fn assign_levels(&self) -> Result<Vec<Vec<TaskId>>, PlanError> {
        Ok(self
            .level_indices()?
            .into_iter()
            .map(|level| {
                level
                    .into_iter()
                    .map(|position| self.tasks[position].id.clone())
                    .collect()
            })
            .collect())
    }

    /// Find the longest dependency chain by task count.
    ///
    /// Chain lengths are memoized per task and filled in level order, so the
    /// search is O(V + E). Ties go to the task appearing first in input
    /// order, both for the chain terminal and for each predecessor choice.
    pub fn critical_path(&self) -> Result<Vec<TaskId>, PlanError> {
        let levels = self.level_indices()?;
        if levels.is_empty() {
            return Ok(Vec::new());
        }

        let mut chain_len = vec![1usize; self.tasks.len()];
        let mut predecessor: Vec<Option<usize>> = vec![None; self.tasks.len()];

        for level in &levels {
            for &position in level {
                let mut dep_positions: Vec<usize> = self.tasks[position]
                    .dependencies
                    .iter()
                    .map(|id| self.index[id])
                    .collect();
                dep_positions.sort_unstable();

                for dep_position in dep_positions {
                    if chain_len[dep_position] + 1 > chain_len[position] {
                        chain_len[position] = chain_len[dep_position] + 1;
                        predecessor[position] = Some(dep_position);
                    }
                }
            }
        }

        let mut terminal = 0;
        for position in 1..self.tasks.len() {
            if chain_len[position] > chain_len[terminal] {
                terminal = position;
            }
        }

        let mut path = Vec::with_capacity(chain_len[terminal]);
        let mut cursor = Some(terminal);
        while let Some(position) = cursor {
            path.push(self.tasks[position].id.clone());
            cursor = predecessor[position];
        }
        path.reverse();
        Ok(path)
    }

    /// Compute the structural analysis for the task set.
    ///
    /// An empty task set yields a parallelism score of 0.
    pub fn analyze(&self) -> Result<Analysis, PlanError> {
        let critical_path = self.critical_path()?;

        let mut independent = Vec::new();
        let mut dependent = Vec::new();
        for task in &self.tasks {
            if task.is_independent() {
                independent.push(task.id.clone());
            } else {
                dependent.push(task.id.clone());
            }
        }

        let parallelism_score = if self.tasks.is_empty() {
            0.0
        } else {
            independent.len() as f64 / self.tasks.len() as f64
        };

        Ok(Analysis {
            parallelism_score,
            critical_path,
            independent,
            dependent,
        })
    }

    /// Kahn's algorithm over task positions, with cycle detection.
    fn level_indices(&self) -> Result<Vec<Vec<usize>>, PlanError> {
        if self.tasks.is_empty() {
            return Ok(Vec::new());
        }

        let mut remaining = self.dependency_count.clone();
        let mut frontier: VecDeque<usize> = (0..self.tasks.len())
            .filter(|&position| remaining[position] == 0)
            .collect();

        let mut levels = Vec::new();
        let mut assigned = 0usize;

        while !frontier.is_empty() {
            let level_size = frontier.len();
            let mut level = Vec::with_capacity(level_size);

            for _ in 0..level_size {
                let Some(position) = frontier.pop_front() else {
                    break;
                };
                level.push(position);

                for &dependent in &self.dependents[position] {
                    remaining[dependent] -= 1;
                    if remaining[dependent] == 0 {
                        frontier.push_back(dependent);
                    }
                }
            }

            level.sort_unstable();
            assigned += level.len();
            levels.push(level);
        }

        if assigned < self.tasks.len() {
            let involved: Vec<TaskId> = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(position, _)| remaining[*position] > 0)
                .map(|(_, task)| task.id.clone())
                .collect();
            return Err(PlanError::CycleDetected { involved });
        }

        Ok(levels)
    }
}
