//! Task list filtering, search, and counters.

use serde::Serialize;
use shoptrack_common::{Task, TaskStatus};

/// Which tasks to show. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub mechanic: Option<String>,
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring over title, checklist items and mechanic.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let mechanic_ok = self
            .mechanic
            .as_deref()
            .map_or(true, |mechanic| task.mechanic == mechanic);
        let status_ok = self.status.map_or(true, |status| task.status == status);

        mechanic_ok && status_ok && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        let query = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };

        task.title.to_lowercase().contains(&query)
            || task.mechanic.to_lowercase().contains(&query)
            || task
                .checklist
                .iter()
                .any(|item| item.to_lowercase().contains(&query))
    }

    /// Tasks matching the filter, in their original order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// Per-status counts over a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            stats
        })
    }
}

/// Distinct mechanic names across `tasks`, in first-seen order.
///
/// Includes names that have since been removed from the roster.
pub fn mechanics_in_use(tasks: &[Task]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for task in tasks {
        if !names.contains(&task.mechanic) {
            names.push(task.mechanic.clone());
        }
    }
    names
}
