//! Persistence of the task collection and the mechanic roster.
//!
//! Both collections live as JSON text under fixed keys of a [`KvStore`].
//! Reads never fail: absent or unreadable content degrades to an empty task
//! list or the default roster. Writes report success as a `bool` and raise a
//! user-facing alert when the store is out of space. Only import propagates
//! an error, so the caller can show why a backup was rejected.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use shoptrack_common::{Result, Snapshot, SnapshotImport, Task, DEFAULT_MECHANICS};
use shoptrack_db::KvStore;

use crate::prompt::Prompt;

/// Key holding the task collection.
pub const TASKS_KEY: &str = "mechanic_tasks";

/// Key holding the mechanic roster.
pub const MECHANICS_KEY: &str = "mechanic_list";

/// Alert shown when a write is rejected by the storage quota.
pub const QUOTA_WARNING: &str =
    "Storage is full. Please export your data and delete some old work orders.";

/// Result of applying a backup.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Task collection now stored, if the backup carried one.
    pub tasks: Option<Vec<Task>>,
    /// Roster now stored, if the backup carried one.
    pub mechanics: Option<Vec<String>>,
    /// Whether every write succeeded.
    pub persisted: bool,
}

/// Handle on the persisted collections.
#[derive(Clone)]
pub struct Store {
    kv: Arc<dyn KvStore>,
    prompt: Arc<dyn Prompt>,
}

impl Store {
    pub fn new(kv: Arc<dyn KvStore>, prompt: Arc<dyn Prompt>) -> Self {
        Self { kv, prompt }
    }

    /// Load every task, newest first as stored.
    pub fn load_tasks(&self) -> Vec<Task> {
        let tasks: Vec<Task> = self.read_json(TASKS_KEY).unwrap_or_default();
        tracing::debug!("Loaded {} tasks", tasks.len());
        tasks
    }

    /// Replace the stored task collection.
    pub fn save_tasks(&self, tasks: &[Task]) -> bool {
        let saved = self.write_json(TASKS_KEY, tasks);
        if saved {
            tracing::debug!("Saved {} tasks", tasks.len());
        }
        saved
    }

    /// Load the roster, falling back to the default names.
    pub fn load_mechanics(&self) -> Vec<String> {
        self.read_json(MECHANICS_KEY)
            .unwrap_or_else(|| DEFAULT_MECHANICS.iter().map(|m| m.to_string()).collect())
    }

    /// Replace the stored roster.
    pub fn save_mechanics(&self, names: &[String]) -> bool {
        self.write_json(MECHANICS_KEY, names)
    }

    /// Append `name` unless it is already on the roster (exact match).
    ///
    /// Returns whether the name was added and saved.
    pub fn add_mechanic(&self, name: &str) -> bool {
        let mut mechanics = self.load_mechanics();
        if mechanics.iter().any(|m| m == name) {
            return false;
        }
        mechanics.push(name.to_string());
        self.save_mechanics(&mechanics)
    }

    /// Remove every exact match of `name`.
    ///
    /// Tasks already assigned to the name keep it. Returns whether anything
    /// was removed.
    pub fn remove_mechanic(&self, name: &str) -> bool {
        let mut mechanics = self.load_mechanics();
        let before = mechanics.len();
        mechanics.retain(|m| m != name);
        if mechanics.len() == before {
            return false;
        }
        self.save_mechanics(&mechanics)
    }

    /// Bundle both collections into an export document.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.load_tasks(), self.load_mechanics())
    }

    /// Write a backup file into `dir` and return its path.
    pub fn export_snapshot(&self, dir: &Path) -> Result<PathBuf> {
        let snapshot = self.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;

        std::fs::create_dir_all(dir)?;
        let path = dir.join(snapshot.file_name());
        std::fs::write(&path, json)?;

        tracing::info!(
            "Exported {} tasks and {} mechanics to {}",
            snapshot.tasks.len(),
            snapshot.mechanics.len(),
            path.display()
        );
        Ok(path)
    }

    /// Apply a backup document.
    ///
    /// Each collection present in the document replaces the stored one
    /// wholesale; absent collections are left untouched. Malformed documents
    /// are rejected before anything is written.
    pub fn import_snapshot(&self, contents: &str) -> Result<ImportOutcome> {
        let import = SnapshotImport::parse(contents)?;
        let mut persisted = true;

        if let Some(tasks) = &import.tasks {
            persisted &= self.save_tasks(tasks);
        }
        if let Some(mechanics) = &import.mechanics {
            persisted &= self.save_mechanics(mechanics);
        }

        tracing::info!(
            tasks = import.tasks.as_ref().map(Vec::len),
            mechanics = import.mechanics.as_ref().map(Vec::len),
            persisted,
            "Imported backup"
        );

        Ok(ImportOutcome {
            tasks: import.tasks,
            mechanics: import.mechanics,
            persisted,
        })
    }

    /// Delete both collections. Asking first is the caller's job.
    pub fn clear_all(&self) -> bool {
        let mut cleared = true;
        for key in [TASKS_KEY, MECHANICS_KEY] {
            if let Err(e) = self.kv.remove(key) {
                tracing::error!("Failed to clear {}: {}", key, e);
                cleared = false;
            }
        }
        cleared
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Discarding unreadable {} content: {}", key, e);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize {}: {}", key, e);
                return false;
            }
        };

        match self.kv.set(key, &json) {
            Ok(()) => true,
            Err(e) if e.is_quota_exceeded() => {
                tracing::error!("Failed to save {}: {}", key, e);
                self.prompt.alert(QUOTA_WARNING);
                false
            }
            Err(e) => {
                tracing::error!("Failed to save {}: {}", key, e);
                false
            }
        }
    }
}
