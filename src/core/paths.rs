// src/core/paths.rs

//! Config directory lookup and path expansion.

use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{CONFIG_DIR_NAME, GLOBAL_CONFIG_FILENAME};

/// Errors from locating or expanding paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// `~` or a `$VAR` in the template could not be expanded.
    #[error("Failed to expand path template '{template}': {message}")]
    Expansion {
        /// The path as written.
        template: String,
        /// Why expansion failed.
        message: String,
    },
}

/// Returns the tasktrack configuration directory (e.g. `~/.config/tasktrack`).
/// Unlike the task file, this directory is never created implicitly.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Returns the path of the user-level `config.toml`.
pub fn get_global_config_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path template.
pub fn expand_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
