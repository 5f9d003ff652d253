// src/core/operations.rs

//! The command operations: every mutation validates its raw string arguments,
//! changes the collection in place and then writes the whole collection back to disk.
//!
//! When the write fails the in-memory change is kept; the caller sees the
//! `StoreError` and knows memory and disk now disagree.

use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

use crate::{
    core::{
        collection::{MAX_INDEX, TaskCollection},
        store::{StoreError, TaskFile},
    },
    models::{InvalidStatusCode, Task, TaskStatus},
};

// --- Error Handling ---

/// The user-supplied argument an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// The task index.
    Index,
    /// The task name.
    Name,
    /// The task status code.
    Status,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Index => "index",
            Self::Name => "name",
            Self::Status => "status",
        })
    }
}

/// Coarse error classification, for callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument was empty.
    MissingArgument,
    /// An argument was not a valid integer.
    Parse,
    /// A status code outside 0..=2.
    InvalidStatus,
    /// Every addressable index is taken.
    IndexExhausted,
    /// The task file could not be read or written.
    Io,
    /// The collection could not be encoded.
    Serialization,
    /// The task file is not a valid task list.
    Deserialization,
}

/// Represents errors returned by the command operations.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A required argument was empty.
    #[error("{0} is missing from the passed arguments")]
    MissingArgument(Argument),
    /// An argument that must be an integer was not one.
    #[error("an invalid number was passed as {argument}: '{value}'")]
    Parse {
        /// Which argument failed to parse.
        argument: Argument,
        /// The raw text.
        value: String,
        #[source]
        source: ParseIntError,
    },
    /// A status integer outside 0..=2.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusCode),
    /// The collection already holds the largest addressable index.
    #[error("no task index is left after {}", MAX_INDEX)]
    IndexExhausted,
    /// Loading or saving the task file failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    /// The coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument(_) => ErrorKind::MissingArgument,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidStatus(_) => ErrorKind::InvalidStatus,
            Self::IndexExhausted => ErrorKind::IndexExhausted,
            Self::Store(StoreError::Io { .. }) => ErrorKind::Io,
            Self::Store(StoreError::Serialize(_)) => ErrorKind::Serialization,
            Self::Store(
                StoreError::Deserialize { .. }
                | StoreError::DuplicateIndex { .. }
                | StoreError::IndexOutOfRange { .. },
            ) => ErrorKind::Deserialization,
        }
    }
}

/// Result alias for the command operations.
pub type TaskResult<T> = Result<T, TaskError>;

// --- Outcomes ---

/// The normal result of a command operation. `NotFound` is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The task that was appended.
    Added(Task),
    /// The task as it reads after the change.
    Updated(Task),
    /// The task that was removed.
    Deleted(Task),
    /// No task carries the requested index.
    NotFound(i64),
}

impl Outcome {
    /// Whether no task matched the requested index.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The short confirmation shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Added(_) => t!("add.success"),
            Self::Updated(_) => t!("update.success"),
            Self::Deleted(_) => t!("delete.success"),
            Self::NotFound(_) => t!("common.not_found"),
        }
    }
}

// --- Argument Validation ---

/// Strips surrounding whitespace and single/double quote characters from a task name.
pub fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

fn require<'a>(raw: &'a str, argument: Argument) -> TaskResult<&'a str> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TaskError::MissingArgument(argument));
    }
    Ok(value)
}

fn parse_integer(raw: &str, argument: Argument) -> TaskResult<i64> {
    let value = require(raw, argument)?;
    value.parse::<i64>().map_err(|source| TaskError::Parse {
        argument,
        value: value.to_string(),
        source,
    })
}

/// Parses a status argument: missing, non-integer and out-of-range are distinct errors.
pub fn parse_status(raw: &str) -> TaskResult<TaskStatus> {
    let code = parse_integer(raw, Argument::Status)?;
    Ok(TaskStatus::try_from(code)?)
}

fn parse_name(raw: &str) -> TaskResult<String> {
    let name = clean_name(raw);
    if name.is_empty() {
        return Err(TaskError::MissingArgument(Argument::Name));
    }
    Ok(name)
}

/// Maps a user index to a stored index. Negative numbers cannot match any task.
fn lookup_key(index: i64) -> Option<u64> {
    u64::try_from(index).ok()
}

// --- Mutating Operations ---

/// Appends a new `NotStarted` task named `name` and persists.
pub fn add(tasks: &mut TaskCollection, file: &TaskFile, name: &str) -> TaskResult<Outcome> {
    let name = parse_name(name)?;
    let task = tasks.push_new(name).ok_or(TaskError::IndexExhausted)?;
    log::debug!("Added task {} '{}'", task.index, task.name);

    file.save(tasks)?;
    Ok(Outcome::Added(task))
}

/// Overwrites the name and status of the task with the given index, then persists.
///
/// All arguments are validated before the lookup, so an invalid status is rejected
/// even when the index does not exist.
pub fn update(
    tasks: &mut TaskCollection,
    file: &TaskFile,
    index: &str,
    name: &str,
    status: &str,
) -> TaskResult<Outcome> {
    let index = parse_integer(index, Argument::Index)?;
    let status = parse_status(status)?;
    let name = parse_name(name)?;

    let Some(task) = lookup_key(index).and_then(|key| tasks.get_mut(key)) else {
        log::debug!("Update: no task with index {}", index);
        return Ok(Outcome::NotFound(index));
    };
    task.name = name;
    task.status = status;
    let updated = task.clone();

    file.save(tasks)?;
    Ok(Outcome::Updated(updated))
}

/// Removes the task with the given index, then persists.
pub fn delete(tasks: &mut TaskCollection, file: &TaskFile, index: &str) -> TaskResult<Outcome> {
    let index = parse_integer(index, Argument::Index)?;

    let Some(removed) = lookup_key(index).and_then(|key| tasks.remove(key)) else {
        log::debug!("Delete: no task with index {}", index);
        return Ok(Outcome::NotFound(index));
    };

    file.save(tasks)?;
    Ok(Outcome::Deleted(removed))
}

/// Changes only the status of the task with the given index, then persists.
pub fn update_status(
    tasks: &mut TaskCollection,
    file: &TaskFile,
    index: &str,
    status: &str,
) -> TaskResult<Outcome> {
    let index = parse_integer(index, Argument::Index)?;
    let status = parse_status(status)?;

    let Some(task) = lookup_key(index).and_then(|key| tasks.get_mut(key)) else {
        log::debug!("UpdateStatus: no task with index {}", index);
        return Ok(Outcome::NotFound(index));
    };
    task.status = status;
    let updated = task.clone();

    file.save(tasks)?;
    Ok(Outcome::Updated(updated))
}

// --- Read-only Operations ---

/// Every task, in collection order. Never touches the file.
pub fn list_all(tasks: &TaskCollection) -> impl Iterator<Item = &Task> + Clone + '_ {
    tasks.iter()
}

/// Tasks with the given status, in collection order. Never touches the file.
pub fn list_by_status(
    tasks: &TaskCollection,
    status: TaskStatus,
) -> impl Iterator<Item = &Task> + Clone + '_ {
    tasks.by_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // --- Helper: a collection backed by a fresh file in a temp dir ---
    fn setup() -> (TempDir, TaskFile, TaskCollection) {
        let dir = TempDir::new().unwrap();
        let file = TaskFile::new(dir.path().join("tasks.json"));
        file.ensure_exists().unwrap();
        (dir, file, TaskCollection::new())
    }

    fn names(tasks: &TaskCollection) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_add_to_empty_collection() {
        let (_dir, file, mut tasks) = setup();

        let outcome = add(&mut tasks, &file, "Buy milk").unwrap();

        let expected = Task::new(1, "Buy milk");
        assert_eq!(outcome, Outcome::Added(expected.clone()));
        assert_eq!(tasks.iter().cloned().collect::<Vec<_>>(), vec![expected]);
        assert_eq!(file.load().unwrap(), tasks);
    }

    #[test]
    fn test_add_strips_surrounding_quotes() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "\"Buy milk\"").unwrap();
        add(&mut tasks, &file, "'It's fine'").unwrap();
        assert_eq!(names(&tasks), vec!["Buy milk", "It's fine"]);
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let (_dir, file, mut tasks) = setup();
        for raw in ["", "   ", "\"\"", "''"] {
            let err = add(&mut tasks, &file, raw).unwrap_err();
            assert!(matches!(err, TaskError::MissingArgument(Argument::Name)));
        }
        assert!(tasks.is_empty());
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_add_add_delete_keeps_second_task() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "A").unwrap();
        add(&mut tasks, &file, "B").unwrap();

        let outcome = delete(&mut tasks, &file, "1").unwrap();

        assert_eq!(outcome, Outcome::Deleted(Task::new(1, "A")));
        let remaining: Vec<Task> = tasks.iter().cloned().collect();
        assert_eq!(remaining, vec![Task::new(2, "B")]);
        assert_eq!(file.load().unwrap(), tasks);
    }

    #[test]
    fn test_update_status_then_list_done() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "A").unwrap();
        add(&mut tasks, &file, "B").unwrap();

        let outcome = update_status(&mut tasks, &file, "1", "2").unwrap();

        let mut expected = Task::new(1, "A");
        expected.status = TaskStatus::Done;
        assert_eq!(outcome, Outcome::Updated(expected.clone()));
        let done: Vec<&Task> = list_by_status(&tasks, TaskStatus::Done).collect();
        assert_eq!(done, vec![&expected]);
        assert_eq!(file.load().unwrap(), tasks);
    }

    #[test]
    fn test_update_overwrites_name_and_status() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "A").unwrap();

        let outcome = update(&mut tasks, &file, "1", "'Renamed'", "1").unwrap();

        let task = tasks.get(1).unwrap();
        assert_eq!(task.name, "Renamed");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(outcome, Outcome::Updated(task.clone()));
        assert_eq!(file.load().unwrap(), tasks);
    }

    #[test]
    fn test_update_status_leaves_name_untouched() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "Keep me").unwrap();
        update_status(&mut tasks, &file, "1", "1").unwrap();
        assert_eq!(tasks.get(1).unwrap().name, "Keep me");
    }

    #[test]
    fn test_not_found_is_a_normal_outcome() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "A").unwrap();
        let before = tasks.clone();
        let on_disk = fs::read_to_string(file.path()).unwrap();

        let updated = update(&mut tasks, &file, "99", "X", "1");
        let deleted = delete(&mut tasks, &file, "99");
        let status = update_status(&mut tasks, &file, "-4", "2");

        assert_eq!(updated.unwrap(), Outcome::NotFound(99));
        assert_eq!(deleted.unwrap(), Outcome::NotFound(99));
        assert!(status.unwrap().is_not_found());
        assert_eq!(tasks, before);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), on_disk);
    }

    #[test]
    fn test_invalid_status_leaves_collection_and_file_unchanged() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "A").unwrap();
        let before = tasks.clone();
        let on_disk = fs::read_to_string(file.path()).unwrap();

        let err = update_status(&mut tasks, &file, "1", "5").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidStatus);
        assert!(matches!(err, TaskError::InvalidStatus(InvalidStatusCode(5))));
        assert_eq!(tasks, before);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), on_disk);
    }

    #[test]
    fn test_argument_validation_kinds() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "A").unwrap();

        let missing_index = update(&mut tasks, &file, "", "X", "1").unwrap_err();
        let missing_status = update(&mut tasks, &file, "1", "X", " ").unwrap_err();
        let missing_name = update(&mut tasks, &file, "1", "", "1").unwrap_err();
        let bad_index = delete(&mut tasks, &file, "one").unwrap_err();
        let bad_status = update_status(&mut tasks, &file, "1", "done").unwrap_err();

        assert!(matches!(missing_index, TaskError::MissingArgument(Argument::Index)));
        assert!(matches!(missing_status, TaskError::MissingArgument(Argument::Status)));
        assert!(matches!(missing_name, TaskError::MissingArgument(Argument::Name)));
        assert!(matches!(
            bad_index,
            TaskError::Parse { argument: Argument::Index, .. }
        ));
        assert_eq!(bad_status.kind(), ErrorKind::Parse);
        assert_eq!(tasks.get(1).unwrap(), &Task::new(1, "A"));
    }

    #[test]
    fn test_add_after_largest_index_is_an_error() {
        let (_dir, file, _) = setup();
        let mut tasks: TaskCollection =
            vec![Task::new(MAX_INDEX, "last")].into();
        let before = tasks.clone();

        let err = add(&mut tasks, &file, "B").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::IndexExhausted);
        assert_eq!(tasks, before);
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_largest_index_is_addressable() {
        let (_dir, file, _) = setup();
        let mut tasks: TaskCollection =
            vec![Task::new(MAX_INDEX, "last")].into();

        let outcome = update_status(&mut tasks, &file, "9223372036854775807", "2").unwrap();

        assert!(!outcome.is_not_found());
        assert_eq!(file.load().unwrap(), tasks);
    }

    #[test]
    fn test_failed_save_keeps_in_memory_change() {
        let dir = TempDir::new().unwrap();
        let file = TaskFile::new(dir.path().join("missing").join("tasks.json"));
        let mut tasks = TaskCollection::new();

        let err = add(&mut tasks, &file, "A").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(tasks.len(), 1);
        assert!(!file.path().exists());
    }

    #[test]
    fn test_listing_does_not_touch_collection_or_file() {
        let (_dir, file, mut tasks) = setup();
        add(&mut tasks, &file, "A").unwrap();
        update_status(&mut tasks, &file, "1", "1").unwrap();
        add(&mut tasks, &file, "B").unwrap();
        let before = tasks.clone();
        let on_disk = fs::read_to_string(file.path()).unwrap();

        assert_eq!(list_all(&tasks).count(), 2);
        let in_progress: Vec<u64> = list_by_status(&tasks, TaskStatus::InProgress)
            .map(|t| t.index)
            .collect();
        let not_started: Vec<u64> = list_by_status(&tasks, TaskStatus::NotStarted)
            .map(|t| t.index)
            .collect();

        assert_eq!(in_progress, vec![1]);
        assert_eq!(not_started, vec![2]);
        assert_eq!(tasks, before);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), on_disk);
    }
}
