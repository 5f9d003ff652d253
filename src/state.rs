// src/state.rs

//! The lock-guarded task store shared by the session and the refresher.

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::{
    collection::TaskCollection,
    operations::{self, Outcome, TaskResult},
    store::{StoreResult, TaskFile},
};

/// The session's task collection together with its backing file.
///
/// One mutex guards the collection. Command operations hold it across
/// validate, mutate and persist; `reload` holds it across load and swap. A refresh
/// therefore lands entirely before or entirely after a command, never between a
/// command's mutation and its write.
///
/// Cloning is cheap and yields a handle on the same collection.
#[derive(Debug, Clone)]
pub struct TaskStore {
    file: TaskFile,
    tasks: Arc<Mutex<TaskCollection>>,
}

impl TaskStore {
    /// Loads the collection from `file` and wraps it.
    pub fn open(file: TaskFile) -> StoreResult<Self> {
        let tasks = file.load()?;
        log::debug!(
            "Opened task store '{}' with {} task(s)",
            file.path().display(),
            tasks.len()
        );
        Ok(Self {
            file,
            tasks: Arc::new(Mutex::new(tasks)),
        })
    }

    /// The backing task file.
    pub fn file(&self) -> &TaskFile {
        &self.file
    }

    /// Locks the collection for a sequence of reads or one mutation.
    pub fn lock(&self) -> StoreGuard<'_> {
        // A panic while holding the lock cannot leave the collection half-edited:
        // each operation mutates a single task or a single `Vec` slot.
        let guard = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        StoreGuard {
            guard,
            file: &self.file,
        }
    }

    /// A copy of the current collection.
    pub fn snapshot(&self) -> TaskCollection {
        (*self.lock()).clone()
    }

    /// Re-reads the file and swaps it in as the new collection.
    ///
    /// On failure the previous collection is kept. Returns the number of tasks loaded.
    pub fn reload(&self) -> StoreResult<usize> {
        let mut guard = self.lock();
        let fresh = self.file.load()?;
        let count = fresh.len();
        *guard.guard = fresh;
        Ok(count)
    }
}

/// Exclusive access to the collection. Reads go through `Deref`; writes go through
/// the operation methods, which always persist.
#[derive(Debug)]
pub struct StoreGuard<'a> {
    guard: MutexGuard<'a, TaskCollection>,
    file: &'a TaskFile,
}

impl Deref for StoreGuard<'_> {
    type Target = TaskCollection;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl StoreGuard<'_> {
    /// Adds a task and persists. See `operations::add`.
    pub fn add(&mut self, name: &str) -> TaskResult<Outcome> {
        operations::add(&mut self.guard, self.file, name)
    }

    /// Renames and re-statuses a task and persists. See `operations::update`.
    pub fn update(&mut self, index: &str, name: &str, status: &str) -> TaskResult<Outcome> {
        operations::update(&mut self.guard, self.file, index, name, status)
    }

    /// Removes a task and persists. See `operations::delete`.
    pub fn delete(&mut self, index: &str) -> TaskResult<Outcome> {
        operations::delete(&mut self.guard, self.file, index)
    }

    /// Changes a task's status and persists. See `operations::update_status`.
    pub fn update_status(&mut self, index: &str, status: &str) -> TaskResult<Outcome> {
        operations::update_status(&mut self.guard, self.file, index, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskStatus};
    use std::thread;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> TaskStore {
        let file = TaskFile::new(dir.path().join("tasks.json"));
        file.ensure_exists().unwrap();
        TaskStore::open(file).unwrap()
    }

    #[test]
    fn test_guard_operations_write_through() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.lock().add("A").unwrap();
        store.lock().update_status("1", "2").unwrap();

        let mut expected = Task::new(1, "A");
        expected.status = TaskStatus::Done;
        assert_eq!(store.file().load().unwrap().iter().next(), Some(&expected));
        assert_eq!(store.snapshot().get(1), Some(&expected));
    }

    #[test]
    fn test_reload_picks_up_external_edit() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.lock().add("A").unwrap();

        // Another process rewrites the file.
        let external: TaskCollection = vec![Task::new(5, "From elsewhere")].into();
        TaskFile::new(store.file().path()).save(&external).unwrap();

        assert_eq!(store.reload().unwrap(), 1);
        assert_eq!(store.snapshot(), external);
    }

    #[test]
    fn test_failed_reload_keeps_previous_collection() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.lock().add("A").unwrap();
        std::fs::write(store.file().path(), "not json").unwrap();

        assert!(store.reload().is_err());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_clones_share_one_collection() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let other = store.clone();

        let writer = thread::spawn(move || {
            for i in 0..10 {
                other.lock().add(&format!("task {i}")).unwrap();
            }
        });
        for _ in 0..10 {
            store.reload().unwrap();
        }
        writer.join().unwrap();

        let tasks = store.snapshot();
        assert_eq!(tasks.len(), 10);
        assert_eq!(tasks.find_duplicate_index(), None);
        assert_eq!(store.file().load().unwrap(), tasks);
    }
}
