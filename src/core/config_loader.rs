//! # Config Loader
//!
//! Resolves the effective `TaskTrackConfig` from its layers, lowest priority first:
//! built-in defaults, a TOML file (`./tasktrack.toml`, else the user config dir),
//! environment variables and finally command-line flags (applied by the CLI).
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    constants::{ENV_REFRESH_SECS, ENV_TASKS_FILE, PROJECT_CONFIG_FILENAME},
    core::paths::{self, PathError},
    models::TaskTrackConfig,
};

/// Errors from loading or validating the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but cannot be read.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for `TaskTrackConfig`.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlParse {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },
    /// An override variable holds an unusable value.
    #[error("Environment variable {name} has an invalid value '{value}'.")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
    /// `interval_secs` is 0.
    #[error("The refresh interval must be at least one second.")]
    ZeroInterval,
    /// `tasks_file` is blank.
    #[error("The tasks file path must not be empty.")]
    EmptyTasksFile,
    /// The tasks file path could not be expanded.
    #[error(transparent)]
    Path(#[from] PathError),
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Finds the config file that applies to `cwd`, if any.
///
/// A `tasktrack.toml` in `cwd` wins over the user-level `config.toml`.
pub fn find_config_file(cwd: &Path) -> Option<PathBuf> {
    let local = cwd.join(PROJECT_CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }
    match paths::get_global_config_path() {
        Ok(global) if global.is_file() => Some(global),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Skipping user config: {}", e);
            None
        }
    }
}

/// Parses one config file. Keys that are absent keep their defaults.
pub fn load_config_file(path: &Path) -> ConfigResult<TaskTrackConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the file layer on top of the defaults.
pub fn load_config(cwd: &Path) -> ConfigResult<TaskTrackConfig> {
    match find_config_file(cwd) {
        Some(path) => {
            log::debug!("Loading config from '{}'", path.display());
            load_config_file(&path)
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(TaskTrackConfig::default())
        }
    }
}

/// Applies the environment layer. `lookup` is usually `|name| std::env::var(name).ok()`.
pub fn apply_env<F>(config: &mut TaskTrackConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(file) = lookup(ENV_TASKS_FILE) {
        log::debug!("{} overrides tasks file with '{}'", ENV_TASKS_FILE, file);
        config.tasks_file = file;
    }
    if let Some(raw) = lookup(ENV_REFRESH_SECS) {
        config.refresh.interval_secs =
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    name: ENV_REFRESH_SECS,
                    value: raw.clone(),
                })?;
    }
    Ok(())
}

/// Rejects settings the rest of the program cannot run with.
pub fn validate(config: &TaskTrackConfig) -> ConfigResult<()> {
    if config.refresh.interval_secs == 0 {
        return Err(ConfigError::ZeroInterval);
    }
    if config.tasks_file.trim().is_empty() {
        return Err(ConfigError::EmptyTasksFile);
    }
    Ok(())
}

/// The expanded path of the backing task file.
pub fn tasks_path(config: &TaskTrackConfig) -> ConfigResult<PathBuf> {
    Ok(paths::expand_path(config.tasks_file.trim())?)
}
