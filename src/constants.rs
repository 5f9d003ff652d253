// src/constants.rs

//! File names, defaults and environment variable names.

/// The default name of the backing task file, relative to the working directory.
pub const TASKS_FILENAME: &str = "tasks.json";

/// The name of the project-local configuration file, looked up in the working directory.
pub const PROJECT_CONFIG_FILENAME: &str = "tasktrack.toml";

/// The name of the directory holding the user configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "tasktrack";

/// The name of the user configuration file (inside `CONFIG_DIR_NAME`).
pub const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

/// How often the background refresher reloads the task file, in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;

/// Overrides the backing task file path.
pub const ENV_TASKS_FILE: &str = "TASKTRACK_FILE";

/// Overrides the refresh interval, in seconds.
pub const ENV_REFRESH_SECS: &str = "TASKTRACK_REFRESH_SECS";
