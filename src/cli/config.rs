//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./trackplan.toml or ./.trackplan/config.toml
//! 2. User config: ~/.trackplan/config.toml
//! 3. System config: /etc/trackplan/config.toml
//! 4. Built-in defaults

use crate::env;
use crate::planner::{AdvisorThresholds, MonitorConfig, PlannerConfig};
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persisted defaults for the planner, advisor, and monitor
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultPlannerConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub advisor: AdvisorThresholds,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl DefaultPlannerConfig {
    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Parse from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = self.to_toml_string()?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<DefaultPlannerConfig, Box<dyn std::error::Error>> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return DefaultPlannerConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(DefaultPlannerConfig::default())
    }

    /// Find the first configuration file in the discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = Self::get_config_candidates();

        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.exists() && candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get the list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        // 1. Current directory: ./trackplan.toml and ./.trackplan/config.toml
        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(env::workspace_config_file_path(&current_dir));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        // 2. User config: ~/.trackplan/config.toml
        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        // 3. System config (Unix-like systems)
        #[cfg(unix)]
        candidates.push(PathBuf::from(env::SYSTEM_CONFIG_FILE));

        // Windows system config: C:\ProgramData\trackplan\config.toml
        #[cfg(windows)]
        if let Ok(program_data) = std_env::var("PROGRAMDATA") {
            candidates.push(
                PathBuf::from(program_data)
                    .join("trackplan")
                    .join(env::CONFIG_FILE_NAME),
            );
        }

        candidates
    }

    /// Get the home directory path
    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Create a default config file in the user's home directory
    pub fn create_default_user_config() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home_dir = Self::get_home_dir().ok_or("Could not determine home directory")?;

        let config_dir = env::user_config_dir_path(&home_dir);
        let config_path = env::user_config_file_path(&home_dir);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        if !config_path.exists() {
            DefaultPlannerConfig::default().to_toml_file(&config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        } else {
            warn!("Configuration file already exists: {:?}", config_path);
        }

        Ok(config_path)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        let candidates = Self::get_config_candidates();
        for (i, candidate) in candidates.iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "EXISTS"
                } else {
                    "NOT A FILE"
                }
            } else {
                "NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = DefaultPlannerConfig::default();
        let toml_str = config.to_toml_string().unwrap();

        assert!(toml_str.contains("total_capacity"));
        assert!(toml_str.contains("team_size"));

        let parsed = DefaultPlannerConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("trackplan.toml");

        let mut config = DefaultPlannerConfig::default();
        config.planner.total_capacity = 256;
        config.planner.team_size = 8;
        config.to_toml_file(&path).unwrap();

        let loaded = DefaultPlannerConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded.planner.total_capacity, 256);
        assert_eq!(loaded.planner.team_size, 8);
        assert_eq!(loaded.monitor, MonitorConfig::default());
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let parsed = DefaultPlannerConfig::from_toml_str(
            "[planner]\ntotal_capacity = 128\nteam_size = 4\nreserve = 16\ntime_per_point = 2.5\n",
        )
        .unwrap();

        assert_eq!(parsed.planner.total_capacity, 128);
        assert_eq!(parsed.advisor, AdvisorThresholds::default());
        assert_eq!(parsed.monitor, MonitorConfig::default());
    }

    #[test]
    fn test_candidate_hierarchy_prefers_workspace_files() {
        let candidates = ConfigDiscovery::get_config_candidates();
        assert!(candidates.len() >= 2);
        assert!(candidates[0].ends_with("trackplan.toml"));
        assert!(candidates[1].ends_with(".trackplan/config.toml"));
    }
}
