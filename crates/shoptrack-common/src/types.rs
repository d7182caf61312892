//! Core type definitions for work orders.
//!
//! [`Task`] is the persisted work-order record. Its JSON shape uses camelCase
//! field names so backups from older versions of the tracker stay readable.
//! Deserialization goes through a lenient wire record that accepts the legacy
//! single `description` field and the loosely typed values the old entry form
//! produced; serialization always writes the current shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::ids::TaskId;

/// Progress state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// A mechanic is working on it.
    InProgress,
    /// Work is done.
    Completed,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(Error::invalid_input(format!("unknown task status: {other}"))),
        }
    }
}

/// A unit of repair work assigned to a mechanic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,

    /// Ordered checklist of sub-tasks.
    #[serde(rename = "tasks")]
    pub checklist: Vec<String>,

    /// Name of the assigned mechanic. Not kept in sync with the roster.
    pub mechanic: String,
    pub status: TaskStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_info: Option<String>,

    /// Must be finite to be stored; JSON has no encoding for NaN or infinity.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "finite_hours")]
    pub estimated_hours: Option<f64>,

    /// Inline `data:` URIs.
    pub photos: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied task fields, used for both create and full-replace edits.
///
/// IDs and timestamps are never part of a draft; they are assigned by the
/// tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub checklist: Vec<String>,
    pub mechanic: String,
    pub status: TaskStatus,
    pub vehicle_info: Option<String>,
    pub estimated_hours: Option<f64>,
    pub photos: Vec<String>,
}

impl From<Task> for TaskDraft {
    fn from(task: Task) -> Self {
        Self {
            title: task.title,
            checklist: task.checklist,
            mechanic: task.mechanic,
            status: task.status,
            vehicle_info: task.vehicle_info,
            estimated_hours: task.estimated_hours,
            photos: task.photos,
        }
    }
}

/// Sub-task list as it may appear in stored data.
///
/// Older records carry a single free-text `description` instead of a `tasks`
/// array. The array wins when both are present.
#[derive(Debug, Clone, PartialEq)]
enum StoredChecklist {
    Items(Vec<String>),
    Description(String),
    Absent,
}

impl StoredChecklist {
    fn from_fields(tasks: Option<Vec<String>>, description: Option<String>) -> Self {
        match (tasks, description) {
            (Some(items), _) => Self::Items(items),
            (None, Some(text)) => Self::Description(text),
            (None, None) => Self::Absent,
        }
    }

    fn normalize(self) -> Vec<String> {
        match self {
            Self::Items(items) => items,
            Self::Description(text) if !text.trim().is_empty() => vec![text],
            Self::Description(_) | Self::Absent => Vec::new(),
        }
    }
}

/// Lenient on-disk representation of a task.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    tasks: Option<Vec<String>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mechanic: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    vehicle_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_hours")]
    estimated_hours: Option<f64>,
    #[serde(default)]
    photos: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        let checklist = StoredChecklist::from_fields(record.tasks, record.description).normalize();
        Self {
            id: record.id,
            title: record.title.unwrap_or_default(),
            checklist,
            mechanic: record.mechanic.unwrap_or_default(),
            status: record.status.unwrap_or_default(),
            vehicle_info: record.vehicle_info,
            estimated_hours: record.estimated_hours,
            photos: record.photos.unwrap_or_default(),
            created_at: record.created_at,
            updated_at: record.updated_at.unwrap_or(record.created_at),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HoursRepr {
    Number(f64),
    Text(String),
}

/// The old entry form stored hours as whatever the input box held: a number,
/// a numeric string, or `""`. Text that does not parse as a finite number
/// reads as absent; numbers are kept as written.
fn lenient_hours<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let hours = match Option::<HoursRepr>::deserialize(deserializer)? {
        Some(HoursRepr::Number(n)) => Some(n),
        Some(HoursRepr::Text(s)) => s.trim().parse::<f64>().ok().filter(|h| h.is_finite()),
        None => None,
    };
    Ok(hours)
}

fn finite_hours<S>(hours: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match hours {
        Some(h) if !h.is_finite() => Err(serde::ser::Error::custom(format!(
            "estimated hours must be a finite number, got {h}"
        ))),
        _ => hours.serialize(serializer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_task() -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::from("t-1"),
            title: "Oil change".to_string(),
            checklist: vec!["Drain oil".to_string(), "Replace filter".to_string()],
            mechanic: "Ana".to_string(),
            status: TaskStatus::InProgress,
            vehicle_info: Some("Toyota Corolla 2015".to_string()),
            estimated_hours: Some(1.5),
            photos: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TaskStatus::Completed);
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("Pending".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert!("cancelled".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_serializes_current_shape() {
        let task = sample_task();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["tasks"], json!(["Drain oil", "Replace filter"]));
        assert_eq!(value["vehicleInfo"], json!("Toyota Corolla 2015"));
        assert_eq!(value["estimatedHours"], json!(1.5));
        assert_eq!(value["status"], json!("in-progress"));
        assert!(value.get("description").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_task_round_trip() {
        let task = sample_task();
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let mut task = sample_task();
        task.vehicle_info = None;
        task.estimated_hours = None;
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("vehicleInfo").is_none());
        assert!(value.get("estimatedHours").is_none());
    }

    #[test]
    fn test_legacy_description_becomes_checklist() {
        let task: Task = serde_json::from_value(json!({
            "id": "1700000000000",
            "title": "Brakes",
            "description": "Replace front pads",
            "mechanic": "Juan Pérez",
            "status": "pending",
            "photos": [],
            "createdAt": "2024-01-15T10:00:00.000Z",
            "updatedAt": "2024-01-15T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(task.checklist, vec!["Replace front pads".to_string()]);
    }

    #[test]
    fn test_blank_legacy_description_is_empty_checklist() {
        let task: Task = serde_json::from_value(json!({
            "id": "1",
            "title": "Brakes",
            "description": "   ",
            "mechanic": "Juan Pérez",
            "status": "pending",
            "createdAt": "2024-01-15T10:00:00Z"
        }))
        .unwrap();
        assert!(task.checklist.is_empty());
        assert!(task.photos.is_empty());
        assert_eq!(task.updated_at, task.created_at);
    }

    #[test]
    fn test_checklist_array_wins_over_description() {
        let checklist =
            StoredChecklist::from_fields(Some(vec!["a".to_string()]), Some("b".to_string()));
        assert_eq!(checklist.normalize(), vec!["a".to_string()]);
        assert!(StoredChecklist::Absent.normalize().is_empty());
    }

    #[test]
    fn test_lenient_form_values() {
        let task: Task = serde_json::from_value(json!({
            "id": "2",
            "title": "Tune-up",
            "tasks": [],
            "mechanic": "Carlos Gómez",
            "status": "completed",
            "vehicleInfo": "",
            "estimatedHours": "2.5",
            "photos": [],
            "createdAt": "2024-01-15T10:00:00Z",
            "updatedAt": "2024-01-16T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(task.vehicle_info, Some(String::new()));
        assert_eq!(task.estimated_hours, Some(2.5));

        let task: Task = serde_json::from_value(json!({
            "id": "3",
            "title": "Tune-up",
            "mechanic": "Carlos Gómez",
            "status": "completed",
            "estimatedHours": "",
            "createdAt": "2024-01-15T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(task.estimated_hours, None);

        let task: Task = serde_json::from_value(json!({
            "id": "4",
            "title": "Tune-up",
            "mechanic": "Carlos Gómez",
            "estimatedHours": 3,
            "createdAt": "2024-01-15T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(task.estimated_hours, Some(3.0));
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn test_edge_values_survive_round_trip() {
        let mut task = sample_task();
        task.vehicle_info = Some("   ".to_string());
        task.estimated_hours = Some(-2.0);

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_non_finite_hours_refuse_to_serialize() {
        let mut task = sample_task();
        task.estimated_hours = Some(f64::NAN);
        assert!(serde_json::to_string(&task).is_err());

        task.estimated_hours = Some(f64::INFINITY);
        assert!(serde_json::to_string(&task).is_err());

        let text: Task = serde_json::from_value(json!({
            "id": "5",
            "title": "Tune-up",
            "mechanic": "Carlos Gómez",
            "estimatedHours": "NaN",
            "createdAt": "2024-01-15T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(text.estimated_hours, None);
    }

    #[test]
    fn test_draft_from_task_drops_identity() {
        let task = sample_task();
        let draft = TaskDraft::from(task.clone());
        assert_eq!(draft.title, task.title);
        assert_eq!(draft.checklist, task.checklist);
        assert_eq!(draft.status, task.status);
    }
}
