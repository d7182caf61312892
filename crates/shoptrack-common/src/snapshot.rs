//! Backup document bundling both collections.
//!
//! Exports always carry every field. Imports accept any JSON object and only
//! apply the collections that are actually present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::Task;

/// Format version written into every export.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Prefix of exported backup file names.
pub const SNAPSHOT_FILE_PREFIX: &str = "mechanic-tracker-backup-";

/// Full export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub mechanics: Vec<String>,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

impl Snapshot {
    /// Build a snapshot stamped with the current time.
    pub fn new(tasks: Vec<Task>, mechanics: Vec<String>) -> Self {
        Self {
            tasks,
            mechanics,
            exported_at: Utc::now(),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// File name for this export, `mechanic-tracker-backup-<epoch-millis>.json`.
    pub fn file_name(&self) -> String {
        format!(
            "{}{}.json",
            SNAPSHOT_FILE_PREFIX,
            self.exported_at.timestamp_millis()
        )
    }
}

/// Collections found in an import document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotImport {
    /// Replacement task collection, if the document had one.
    pub tasks: Option<Vec<Task>>,
    /// Replacement roster, if the document had one.
    pub mechanics: Option<Vec<String>>,
}

impl SnapshotImport {
    /// Parse the text of a backup file.
    ///
    /// The document must be a JSON object. A `tasks` value that is not an
    /// array is coerced to an empty collection; a `tasks` array whose entries
    /// are not task records, or a `mechanics` value that is not an array of
    /// strings, is a parse error. Falsy fields (`null`, `false`, `0`, `""`)
    /// count as absent.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut doc: Map<String, Value> = serde_json::from_str(contents)?;

        let tasks = match doc.remove("tasks").filter(is_present) {
            None => None,
            Some(value @ Value::Array(_)) => Some(serde_json::from_value::<Vec<Task>>(value)?),
            Some(_) => Some(Vec::new()),
        };

        let mechanics = match doc.remove("mechanics").filter(is_present) {
            None => None,
            Some(value) => Some(serde_json::from_value::<Vec<String>>(value)?),
        };

        Ok(Self { tasks, mechanics })
    }
}

/// Older backups were applied only when a field was truthy: `null`, `false`,
/// `0` and `""` mean the collection was not exported.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
