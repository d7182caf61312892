//! Work-order lifecycle on top of the [`Store`].
//!
//! The tracker owns the rules the entry forms enforce: required fields, roster
//! membership for new tasks, identifier and timestamp assignment, and asking
//! before anything is destroyed.

mod filter;

pub use filter::{mechanics_in_use, TaskFilter, TaskStats};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use shoptrack_common::{Error, Result, Task, TaskDraft, TaskId};

use crate::images::{ImageFile, ImageNormalizer};
use crate::prompt::Prompt;
use crate::store::{ImportOutcome, Store};

/// Question asked before deleting a task.
pub const CONFIRM_DELETE_TASK: &str = "Delete this work order?";

/// Question asked before wiping all data.
pub const CONFIRM_CLEAR_ALL: &str =
    "Delete ALL work orders and mechanics? This cannot be undone.";

pub struct Tracker {
    store: Store,
    prompt: Arc<dyn Prompt>,
    images: ImageNormalizer,
}

impl Tracker {
    pub fn new(store: Store, prompt: Arc<dyn Prompt>, images: ImageNormalizer) -> Self {
        Self {
            store,
            prompt,
            images,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn images(&self) -> &ImageNormalizer {
        &self.images
    }

    /// All tasks, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        self.store.load_tasks()
    }

    pub fn get_task(&self, id: &TaskId) -> Result<Task> {
        self.tasks()
            .into_iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| Error::not_found(format!("task {id}")))
    }

    /// Validate a draft and insert it at the front of the collection.
    pub fn create_task(&self, draft: TaskDraft) -> Result<Task> {
        let draft = self.prepare_new(draft)?;
        self.insert_new(draft)
    }

    /// Like [`Tracker::create_task`], but normalizes `files` first and stores
    /// them on the new task. Nothing is saved if the draft or any photo is
    /// rejected.
    pub async fn create_task_with_photos(
        &self,
        draft: TaskDraft,
        files: &[ImageFile],
    ) -> Result<Task> {
        let mut draft = self.prepare_new(draft)?;
        let photos = self.images.process_many(files).await?;
        draft.photos.extend(photos);
        self.insert_new(draft)
    }

    fn prepare_new(&self, draft: TaskDraft) -> Result<TaskDraft> {
        let draft = normalize_draft(draft)?;

        let roster = self.store.load_mechanics();
        if !roster.contains(&draft.mechanic) {
            return Err(Error::invalid_input(format!(
                "mechanic '{}' is not on the roster",
                draft.mechanic
            )));
        }
        Ok(draft)
    }

    fn insert_new(&self, draft: TaskDraft) -> Result<Task> {
        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            title: draft.title,
            checklist: draft.checklist,
            mechanic: draft.mechanic,
            status: draft.status,
            vehicle_info: draft.vehicle_info,
            estimated_hours: draft.estimated_hours,
            photos: draft.photos,
            created_at: now,
            updated_at: now,
        };

        let mut tasks = self.tasks();
        tasks.insert(0, task.clone());
        self.persist(&tasks)?;

        tracing::info!(id = %task.id, mechanic = %task.mechanic, "Created task '{}'", task.title);
        Ok(task)
    }

    /// Replace every editable field of an existing task.
    ///
    /// The mechanic is not re-checked against the roster, so tasks assigned to
    /// a since-removed mechanic stay editable.
    pub fn update_task(&self, id: &TaskId, draft: TaskDraft) -> Result<Task> {
        let draft = normalize_draft(draft)?;

        let mut tasks = self.tasks();
        let slot = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Error::not_found(format!("task {id}")))?;

        let updated = Task {
            id: slot.id.clone(),
            title: draft.title,
            checklist: draft.checklist,
            mechanic: draft.mechanic,
            status: draft.status,
            vehicle_info: draft.vehicle_info,
            estimated_hours: draft.estimated_hours,
            photos: draft.photos,
            created_at: slot.created_at,
            updated_at: Utc::now().max(slot.updated_at),
        };
        *slot = updated.clone();
        self.persist(&tasks)?;

        tracing::info!(id = %updated.id, status = %updated.status, "Updated task");
        Ok(updated)
    }

    /// Remove a task after confirmation. Returns `false` if the user declined.
    pub fn delete_task(&self, id: &TaskId) -> Result<bool> {
        let mut tasks = self.tasks();
        if !tasks.iter().any(|t| &t.id == id) {
            return Err(Error::not_found(format!("task {id}")));
        }

        if !self.prompt.confirm(CONFIRM_DELETE_TASK) {
            tracing::debug!(id = %id, "Delete declined");
            return Ok(false);
        }

        tasks.retain(|t| &t.id != id);
        self.persist(&tasks)?;

        tracing::info!(id = %id, "Deleted task");
        Ok(true)
    }

    /// Normalize photos and append them to a task.
    ///
    /// Nothing is attached if any file fails validation or decoding.
    pub async fn attach_photos(&self, id: &TaskId, files: &[ImageFile]) -> Result<Task> {
        // Fail on an unknown id before doing any image work
        self.get_task(id)?;

        let photos = self.images.process_many(files).await?;

        let mut tasks = self.tasks();
        let slot = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Error::not_found(format!("task {id}")))?;
        slot.photos.extend(photos);
        slot.updated_at = Utc::now().max(slot.updated_at);
        let updated = slot.clone();
        self.persist(&tasks)?;

        tracing::info!(id = %id, added = files.len(), total = updated.photos.len(), "Attached photos");
        Ok(updated)
    }

    /// Remove the photo at `index` (zero-based) from a task.
    pub fn remove_photo(&self, id: &TaskId, index: usize) -> Result<Task> {
        let mut tasks = self.tasks();
        let slot = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Error::not_found(format!("task {id}")))?;

        if index >= slot.photos.len() {
            return Err(Error::invalid_input(format!(
                "task {id} has {} photos, no photo at index {index}",
                slot.photos.len()
            )));
        }
        slot.photos.remove(index);
        slot.updated_at = Utc::now().max(slot.updated_at);
        let updated = slot.clone();
        self.persist(&tasks)?;

        tracing::info!(id = %id, index, remaining = updated.photos.len(), "Removed photo");
        Ok(updated)
    }

    pub fn mechanics(&self) -> Vec<String> {
        self.store.load_mechanics()
    }

    /// Add a trimmed name to the roster. `Ok(false)` if it was already there
    /// or could not be saved.
    pub fn add_mechanic(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("mechanic name cannot be empty"));
        }
        Ok(self.store.add_mechanic(name))
    }

    /// Remove a name from the roster after confirmation.
    pub fn remove_mechanic(&self, name: &str) -> bool {
        let question = format!("Remove {name} from the mechanic list?");
        if !self.prompt.confirm(&question) {
            return false;
        }
        self.store.remove_mechanic(name)
    }

    /// Wipe both collections after confirmation.
    pub fn clear_all(&self) -> bool {
        if !self.prompt.confirm(CONFIRM_CLEAR_ALL) {
            return false;
        }
        let cleared = self.store.clear_all();
        if cleared {
            tracing::info!("Cleared all stored data");
        }
        cleared
    }

    pub fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        self.tasks()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks())
    }

    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        self.store.export_snapshot(dir)
    }

    pub fn import(&self, contents: &str) -> Result<ImportOutcome> {
        self.store.import_snapshot(contents)
    }

    fn persist(&self, tasks: &[Task]) -> Result<()> {
        if self.store.save_tasks(tasks) {
            Ok(())
        } else {
            Err(Error::storage("failed to save work orders"))
        }
    }
}

/// Trim text fields and reject drafts the entry form would not submit.
fn normalize_draft(mut draft: TaskDraft) -> Result<TaskDraft> {
    draft.title = draft.title.trim().to_string();
    if draft.title.is_empty() {
        return Err(Error::invalid_input("title cannot be empty"));
    }

    draft.mechanic = draft.mechanic.trim().to_string();
    if draft.mechanic.is_empty() {
        return Err(Error::invalid_input("a mechanic must be selected"));
    }

    if let Some(hours) = draft.estimated_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(Error::invalid_input(format!(
                "estimated hours must be a non-negative number, got {hours}"
            )));
        }
    }

    draft.checklist = draft
        .checklist
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    draft.vehicle_info = draft
        .vehicle_info
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Ok(draft)
}
