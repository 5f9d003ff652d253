// src/models.rs

//! Tasks, statuses and the `tasktrack.toml` configuration model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{DEFAULT_REFRESH_INTERVAL_SECS, TASKS_FILENAME};

// --- TASK MODELS ---

/// Lifecycle state of a task. Persisted as the integer codes 0, 1 and 2.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub enum TaskStatus {
    /// Code 0.
    #[default]
    NotStarted,
    /// Code 1.
    InProgress,
    /// Code 2.
    Done,
}

/// An integer that does not map to any `TaskStatus`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("an incorrect task status was passed: {0} (expected 0, 1 or 2)")]
pub struct InvalidStatusCode(pub i64);

impl TaskStatus {
    /// All statuses, in code order.
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Done];

    /// The integer code stored in the task file.
    pub fn code(self) -> i64 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// The human-readable label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => t!("status.not_started"),
            Self::InProgress => t!("status.in_progress"),
            Self::Done => t!("status.done"),
        }
    }
}

impl TryFrom<i64> for TaskStatus {
    type Error = InvalidStatusCode;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NotStarted),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Done),
            other => Err(InvalidStatusCode(other)),
        }
    }
}

impl From<TaskStatus> for i64 {
    fn from(status: TaskStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single tracked task. Field order here is the field order on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Positive and unique within a collection.
    pub index: u64,
    /// Non-empty, with surrounding quotes already stripped.
    pub name: String,
    /// Current lifecycle state.
    pub status: TaskStatus,
}

impl Task {
    /// Creates a task in the `NotStarted` state.
    pub fn new(index: u64, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            status: TaskStatus::NotStarted,
        }
    }
}

// --- SESSION MODELS ---

/// The two ways a session can be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// A long-lived read-eval-print loop.
    Interactive,
    /// A single command given through flags.
    OneShot,
}

// --- `tasktrack.toml` MODELS ---

/// Settings for the background refresher.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between two reloads of the task file. Must be positive.
    pub interval_secs: u64,
    /// Whether interactive sessions start the refresher.
    pub interactive: bool,
    /// Whether one-shot sessions start the refresher.
    pub oneshot: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            interactive: true,
            oneshot: false,
        }
    }
}

impl RefreshConfig {
    /// The reload interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Whether a session of the given mode should run the refresher.
    pub fn enabled_for(&self, mode: SessionMode) -> bool {
        match mode {
            SessionMode::Interactive => self.interactive,
            SessionMode::OneShot => self.oneshot,
        }
    }
}

/// Represents the deserialized structure of a `tasktrack.toml` file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TaskTrackConfig {
    /// Path of the backing task file. `~` and environment variables are expanded.
    pub tasks_file: String,
    /// Background refresher settings.
    pub refresh: RefreshConfig,
}

impl Default for TaskTrackConfig {
    fn default() -> Self {
        Self {
            tasks_file: TASKS_FILENAME.to_string(),
            refresh: RefreshConfig::default(),
        }
    }
}
