//! Task document parsing and file handling
//!
//! This module loads the JSON task documents the planner consumes. Two
//! shapes are accepted:
//! - a bare array of tasks
//! - a document with a `tasks` array and an optional embedded `scheduler`
//!   configuration

use crate::planner::{PlannerConfig, Task};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("File '{path}' is not UTF-8 encoded: {hint}")]
    NotUtf8 { path: PathBuf, hint: String },

    #[error("File '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("IO error reading '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Task document error in '{path}': {reason}")]
    ParseError { path: PathBuf, reason: String },
}

/// Parsed task document: the task set plus any embedded scheduler config
#[derive(Debug, Clone)]
pub struct TaskFile {
    pub tasks: Vec<Task>,
    pub scheduler: Option<PlannerConfig>,
}

#[derive(Debug)]
struct Utf8File {
    path: PathBuf,
    content: String,
}

/// The two accepted document shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaskDocument {
    Document {
        tasks: Vec<Task>,
        #[serde(default)]
        scheduler: Option<PlannerConfig>,
    },
    List(Vec<Task>),
}

/// Loader responsible for reading and parsing task documents
pub struct TaskLoader;

impl TaskLoader {
    /// Load a UTF-8 file with proper error handling
    fn load_utf8_file<P: AsRef<Path>>(path: P) -> Result<Utf8File, InputError> {
        let path = path.as_ref().to_path_buf();

        debug!("Loading task document: {:?}", path);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Utf8File { path, content }),
            Err(e) => match e.kind() {
                std::io::ErrorKind::NotFound => Err(InputError::NotFound { path }),
                std::io::ErrorKind::InvalidData => Err(InputError::NotUtf8 {
                    path,
                    hint: "File appears to be binary. Only UTF-8 JSON documents are supported."
                        .to_string(),
                }),
                _ => Err(InputError::IoError { path, source: e }),
            },
        }
    }

    /// Load and parse a task document from a file
    pub fn load_task_file<P: AsRef<Path>>(path: P) -> Result<TaskFile, InputError> {
        let file = Self::load_utf8_file(path)?;

        let document: TaskDocument =
            serde_json::from_str(&file.content).map_err(|e| InputError::ParseError {
                path: file.path.clone(),
                reason: e.to_string(),
            })?;

        let task_file = match document {
            TaskDocument::Document { tasks, scheduler } => TaskFile { tasks, scheduler },
            TaskDocument::List(tasks) => TaskFile {
                tasks,
                scheduler: None,
            },
        };

        debug!(
            "Parsed {} tasks from {:?} (embedded scheduler config: {})",
            task_file.tasks.len(),
            file.path,
            task_file.scheduler.is_some()
        );

        Ok(task_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{Complexity, Priority};
    use tempfile::TempDir;

    fn write_document(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_load_bare_task_array() {
        let (_dir, path) = write_document(
            r#"[
                {"id": "auth", "name": "Authentication", "complexity": "high",
                 "priority": "high", "effort": 8.0, "dependencies": []},
                {"id": "profile", "name": "User Profile", "complexity": "medium",
                 "priority": "medium", "effort": 5.0, "dependencies": ["auth"]}
            ]"#,
        );

        let task_file = TaskLoader::load_task_file(&path).unwrap();
        assert_eq!(task_file.tasks.len(), 2);
        assert!(task_file.scheduler.is_none());
        assert_eq!(task_file.tasks[0].id, "auth");
        assert_eq!(task_file.tasks[0].complexity, Complexity::High);
        assert_eq!(task_file.tasks[1].dependencies, vec!["auth"]);
    }

    #[test]
    fn test_load_document_with_scheduler_config() {
        let (_dir, path) = write_document(
            r#"{
                "tasks": [
                    {"id": "seo", "name": "SEO Pages", "complexity": "low",
                     "priority": "medium", "effort": 2.0}
                ],
                "scheduler": {
                    "total_capacity": 200, "team_size": 8,
                    "reserve": 40, "time_per_point": 3.0
                }
            }"#,
        );

        let task_file = TaskLoader::load_task_file(&path).unwrap();
        assert_eq!(task_file.tasks.len(), 1);
        assert_eq!(task_file.tasks[0].priority, Priority::Medium);
        // Omitted dependencies default to an empty set.
        assert!(task_file.tasks[0].dependencies.is_empty());

        let scheduler = task_file.scheduler.unwrap();
        assert_eq!(scheduler.total_capacity, 200);
        assert_eq!(scheduler.team_size, 8);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let result = TaskLoader::load_task_file(temp_dir.path().join("absent.json"));
        assert!(matches!(result.unwrap_err(), InputError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let (_dir, path) = write_document(r#"{"tasks": [{"id": "a"}]}"#);
        let result = TaskLoader::load_task_file(&path);
        assert!(matches!(result.unwrap_err(), InputError::ParseError { .. }));
    }

    #[test]
    fn test_unknown_complexity_is_rejected() {
        let (_dir, path) = write_document(
            r#"[{"id": "a", "name": "A", "complexity": "enormous",
                 "priority": "high", "effort": 1.0}]"#,
        );
        let result = TaskLoader::load_task_file(&path);
        assert!(matches!(result.unwrap_err(), InputError::ParseError { .. }));
    }
}
