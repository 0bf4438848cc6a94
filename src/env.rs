//! Environment constants and path utilities for trackplan.
//!
//! This module centralizes the hardcoded paths and directory names used for
//! configuration discovery, making them easier to maintain and modify.

use std::path::{Path, PathBuf};

/// Main application directory name (hidden directory like .git, .vscode)
pub const TRACKPLAN_DIR_NAME: &str = ".trackplan";

/// Configuration file name inside a trackplan directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Project-local configuration file name at the workspace root
pub const LOCAL_CONFIG_FILE_NAME: &str = "trackplan.toml";

/// System-wide configuration file path on Unix-like systems
#[cfg(unix)]
pub const SYSTEM_CONFIG_FILE: &str = "/etc/trackplan/config.toml";

/// Build the config directory path in the user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(TRACKPLAN_DIR_NAME)
}

/// Build the config file path in the user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build the hidden-directory config file path in the current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(TRACKPLAN_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Build the workspace-root config file path in the current directory
pub fn workspace_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(LOCAL_CONFIG_FILE_NAME)
}
