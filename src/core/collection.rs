// src/core/collection.rs

//! The in-memory task collection.

use serde::{Deserialize, Serialize};
use std::slice;

use crate::models::{Task, TaskStatus};

/// The largest index a task may carry. Command arguments are parsed as `i64`, so
/// anything above `i64::MAX` could be stored but never addressed.
pub const MAX_INDEX: u64 = i64::MAX.unsigned_abs();

/// The ordered, in-memory working set of tasks for one session.
///
/// Insertion order is preserved; removals keep the relative order of the remaining
/// tasks. Serializes as a plain JSON array.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether there are no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The index the next added task receives: one past the current maximum,
    /// or 1 for an empty collection. `None` once the maximum is `MAX_INDEX`.
    pub fn next_index(&self) -> Option<u64> {
        self.tasks
            .iter()
            .map(|task| task.index)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .filter(|index| *index <= MAX_INDEX)
    }

    /// Appends a new `NotStarted` task under `next_index()` and returns a copy of it.
    /// Returns `None`, leaving the collection untouched, when no index is left.
    pub fn push_new(&mut self, name: String) -> Option<Task> {
        let task = Task::new(self.next_index()?, name);
        self.tasks.push(task.clone());
        Some(task)
    }

    /// The task with the given index.
    pub fn get(&self, index: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.index == index)
    }

    /// The task with the given index, for in-place edits.
    pub fn get_mut(&mut self, index: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.index == index)
    }

    /// Removes the task with the given index, preserving the order of the rest.
    pub fn remove(&mut self, index: u64) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.index == index)?;
        Some(self.tasks.remove(position))
    }

    /// Iterates over every task in collection order.
    pub fn iter(&self) -> slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// A lazy, restartable view of the tasks with the given status, in collection order.
    pub fn by_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> + Clone + '_ {
        self.tasks.iter().filter(move |task| task.status == status)
    }

    /// Returns the first index above `MAX_INDEX`, if any.
    pub fn find_out_of_range_index(&self) -> Option<u64> {
        self.tasks
            .iter()
            .map(|task| task.index)
            .find(|index| *index > MAX_INDEX)
    }

    /// Returns the first index that appears more than once, if any.
    pub fn find_duplicate_index(&self) -> Option<u64> {
        let mut seen = std::collections::HashSet::with_capacity(self.tasks.len());
        self.tasks
            .iter()
            .map(|task| task.index)
            .find(|index| !seen.insert(*index))
    }
}

impl From<Vec<Task>> for TaskCollection {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl FromIterator<Task> for TaskCollection {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
