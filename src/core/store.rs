// src/core/store.rs

//! Reading and atomically rewriting the JSON task file.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::core::collection::{MAX_INDEX, TaskCollection};

/// Represents errors that can occur while reading or writing the task file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The task file could not be read, created or replaced.
    #[error("Filesystem error on '{path}': {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The collection could not be encoded as JSON.
    #[error("Failed to serialize tasks to JSON: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The file contents are not a JSON array of tasks.
    #[error("Tasks file '{path}' is not a valid task list: {source}")]
    Deserialize {
        /// The file being decoded.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The file decodes, but a task carries an index commands cannot address.
    #[error("Tasks file '{path}' contains index {index}, above the maximum of {max}.")]
    IndexOutOfRange {
        /// The file being decoded.
        path: PathBuf,
        /// The offending index.
        index: u64,
        /// The largest accepted index.
        max: u64,
    },
    /// The file decodes, but two tasks share an index.
    #[error("Tasks file '{path}' contains index {index} more than once.")]
    DuplicateIndex {
        /// The file being decoded.
        path: PathBuf,
        /// The repeated index.
        index: u64,
    },
}

/// Result alias for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A stateless handle on the JSON file that backs a task collection.
///
/// There is no inter-process locking: two processes writing the same file race,
/// and the last `save` wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    /// A handle on the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured path, as given.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty task file if none exists. Never truncates an existing file.
    ///
    /// Returns `true` when the file was created by this call.
    pub fn ensure_exists(&self) -> StoreResult<bool> {
        let created = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path);

        match created {
            Ok(_) => {
                log::info!("Created empty tasks file at '{}'", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("Tasks file '{}' already exists", self.path.display());
                Ok(false)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Reads the whole collection from disk.
    ///
    /// A missing, empty or whitespace-only file is an empty collection.
    ///
    /// # Errors
    /// `StoreError::Io` if the file exists but cannot be read,
    /// `StoreError::Deserialize` if it is not a JSON array of tasks, and
    /// `StoreError::DuplicateIndex` if two tasks share an index.
    pub fn load(&self) -> StoreResult<TaskCollection> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "Tasks file '{}' not found, starting empty",
                    self.path.display()
                );
                return Ok(TaskCollection::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(TaskCollection::new());
        }

        let tasks: TaskCollection =
            serde_json::from_str(&content).map_err(|source| StoreError::Deserialize {
                path: self.path.clone(),
                source,
            })?;

        if let Some(index) = tasks.find_out_of_range_index() {
            return Err(StoreError::IndexOutOfRange {
                path: self.path.clone(),
                index,
                max: MAX_INDEX,
            });
        }
        if let Some(index) = tasks.find_duplicate_index() {
            return Err(StoreError::DuplicateIndex {
                path: self.path.clone(),
                index,
            });
        }

        log::trace!(
            "Loaded {} task(s) from '{}'",
            tasks.len(),
            self.path.display()
        );
        Ok(tasks)
    }

    /// Replaces the file with the serialized collection.
    ///
    /// The JSON is tab-indented with fields in declaration order. It is written to a
    /// temporary file next to the real file and then renamed over it, so a reader
    /// never observes a half-written file. A symlinked path keeps its link, and an
    /// existing file keeps its permissions.
    pub fn save(&self, tasks: &TaskCollection) -> StoreResult<()> {
        let bytes = encode(tasks)?;

        let target = self.resolve_target();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        match fs::metadata(&target) {
            Ok(meta) => temp
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| self.io_error(e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_error(e)),
        }
        temp.write_all(&bytes).map_err(|e| self.io_error(e))?;
        temp.flush().map_err(|e| self.io_error(e))?;
        temp.persist(&target)
            .map_err(|e| self.io_error(e.error))?;

        log::debug!("Saved {} task(s) to '{}'", tasks.len(), self.path.display());
        Ok(())
    }

    /// The file a save actually replaces: the end of a symlink chain, or the path
    /// itself when it does not exist yet.
    fn resolve_target(&self) -> PathBuf {
        dunce::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Encodes a collection the way it is stored on disk.
pub fn encode(tasks: &TaskCollection) -> StoreResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    tasks
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskStatus};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn sample() -> TaskCollection {
        let mut done = Task::new(2, "Write report");
        done.status = TaskStatus::Done;
        vec![Task::new(1, "Buy milk"), done].into()
    }

    #[test]
    fn test_load_empty_file_is_empty_collection() {
        let file = NamedTempFile::new().unwrap();
        let store = TaskFile::new(file.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_whitespace_only_file_is_empty_collection() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  \n\t").unwrap();
        let store = TaskFile::new(file.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = TaskFile::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = TaskFile::new(dir.path().join("tasks.json"));
        let tasks = sample();

        store.save(&tasks).unwrap();
        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn test_save_writes_tab_indented_array() {
        let dir = TempDir::new().unwrap();
        let store = TaskFile::new(dir.path().join("tasks.json"));
        store
            .save(&vec![Task::new(1, "Buy milk")].into())
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "[\n\t{\n\t\t\"index\": 1,\n\t\t\"name\": \"Buy milk\",\n\t\t\"status\": 0\n\t}\n]"
        );
    }

    #[test]
    fn test_save_overwrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let store = TaskFile::new(dir.path().join("tasks.json"));
        store.save(&sample()).unwrap();
        store.save(&TaskCollection::new()).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_non_array_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"index": 1}}"#).unwrap();
        let err = TaskFile::new(file.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Deserialize { .. }));
    }

    #[test]
    fn test_load_rejects_unknown_status_code() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"index": 1, "name": "x", "status": 9}}]"#).unwrap();
        let err = TaskFile::new(file.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Deserialize { .. }));
    }

    #[test]
    fn test_load_rejects_duplicate_indices() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"index": 1, "name": "a", "status": 0}}, {{"index": 1, "name": "b", "status": 2}}]"#
        )
        .unwrap();
        let err = TaskFile::new(file.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIndex { index: 1, .. }));
    }

    #[test]
    fn test_load_rejects_index_commands_cannot_address() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"index": 18446744073709551615, "name": "huge", "status": 0}}]"#
        )
        .unwrap();
        let err = TaskFile::new(file.path()).load().unwrap_err();
        assert!(matches!(
            err,
            StoreError::IndexOutOfRange { index: u64::MAX, max: MAX_INDEX, .. }
        ));
    }

    #[test]
    fn test_load_accepts_largest_addressable_index() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"index": 9223372036854775807, "name": "last", "status": 0}}]"#
        )
        .unwrap();
        let tasks = TaskFile::new(file.path()).load().unwrap();
        assert_eq!(tasks.get(MAX_INDEX).map(|t| t.name.as_str()), Some("last"));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = TaskFile::new(dir.path().join("tasks.json"));
        store.ensure_exists().unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&sample()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_keeps_the_link() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.json");
        let link = dir.path().join("tasks.json");
        fs::write(&real, "").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = TaskFile::new(&link);
        store.save(&sample()).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(TaskFile::new(&real).load().unwrap(), sample());
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = TaskFile::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_ensure_exists_creates_once_and_never_truncates() {
        let dir = TempDir::new().unwrap();
        let store = TaskFile::new(dir.path().join("tasks.json"));

        assert!(store.ensure_exists().unwrap());
        store.save(&sample()).unwrap();
        assert!(!store.ensure_exists().unwrap());
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_save_into_missing_directory_fails_and_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("tasks.json");
        let err = TaskFile::new(&path).save(&sample()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!path.exists());
    }
}
