//! Integration tests for persistence, backups and quota handling.

mod common;

use common::{draft, TestHarness};
use shoptrack::store::{MECHANICS_KEY, QUOTA_WARNING, TASKS_KEY};
use shoptrack_common::{Snapshot, TaskStatus, DEFAULT_MECHANICS};
use shoptrack_db::{KvStore, SqliteKv};

// ---------------------------------------------------------------------------
// Mechanics
// ---------------------------------------------------------------------------

#[test]
fn fresh_store_has_default_roster() {
    let h = TestHarness::new();
    assert_eq!(h.store.load_mechanics(), DEFAULT_MECHANICS.to_vec());
}

#[test]
fn add_mechanic_appends_once() {
    let h = TestHarness::new();

    assert!(h.store.add_mechanic("Ana"));
    assert_eq!(
        h.store.load_mechanics(),
        vec!["Juan Pérez", "Carlos Gómez", "María López", "Ana"]
    );

    assert!(!h.store.add_mechanic("Ana"));
    assert_eq!(h.store.load_mechanics().len(), 4);
}

#[test]
fn removing_mechanic_keeps_their_tasks() {
    let h = TestHarness::new();
    let task = h.tracker.create_task(draft("Clutch")).unwrap();

    assert!(h.store.remove_mechanic("Carlos Gómez"));
    assert!(!h.store.load_mechanics().contains(&"Carlos Gómez".to_string()));
    assert_eq!(h.tracker.get_task(&task.id).unwrap().mechanic, "Carlos Gómez");
}

// ---------------------------------------------------------------------------
// Stored data
// ---------------------------------------------------------------------------

#[test]
fn tasks_are_stored_as_camel_case_json() {
    let h = TestHarness::new();
    h.tracker.create_task(draft("Oil change")).unwrap();

    let raw = h.kv.get(TASKS_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["title"], "Oil change");
    assert_eq!(first["tasks"][0], "Inspect");
    assert_eq!(first["status"], "pending");
    assert!(first["createdAt"].is_string());
    assert!(first["updatedAt"].is_string());
    assert!(first.get("description").is_none());
}

#[test]
fn legacy_description_becomes_checklist() {
    let h = TestHarness::new();
    h.kv.set(
        TASKS_KEY,
        r#"[{
            "id": "1700000000000",
            "title": "Brakes",
            "description": "Replace front pads",
            "mechanic": "Juan Pérez",
            "status": "in-progress",
            "estimatedHours": "",
            "createdAt": "2023-11-14T22:13:20Z"
        }]"#,
    )
    .unwrap();

    let tasks = h.store.load_tasks();
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.checklist, vec!["Replace front pads".to_string()]);
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.estimated_hours, None);
    assert!(task.photos.is_empty());
    assert_eq!(task.updated_at, task.created_at);

    // Saving rewrites the record in the current shape
    assert!(h.store.save_tasks(&tasks));
    let raw = h.kv.get(TASKS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"tasks\":[\"Replace front pads\"]"));
    assert!(!raw.contains("description"));
}

#[test]
fn corrupt_collections_degrade() {
    let h = TestHarness::new();
    h.kv.set(TASKS_KEY, "[{\"broken\": ").unwrap();
    h.kv.set(MECHANICS_KEY, "42").unwrap();

    assert!(h.store.load_tasks().is_empty());
    assert_eq!(h.store.load_mechanics(), DEFAULT_MECHANICS.to_vec());
}

#[test]
fn quota_exceeded_alerts_and_reports_failure() {
    let h = TestHarness::with_quota(200);

    let err = h.tracker.create_task(draft(&"x".repeat(500))).unwrap_err();
    assert!(err.to_string().contains("failed to save"));
    assert_eq!(h.prompt.alerts(), vec![QUOTA_WARNING.to_string()]);
    assert!(h.store.load_tasks().is_empty());
}

// ---------------------------------------------------------------------------
// Backups
// ---------------------------------------------------------------------------

#[test]
fn export_then_import_restores_everything() {
    let source = TestHarness::new();
    source.tracker.create_task(draft("Oil change")).unwrap();
    source.tracker.create_task(draft("Tyres")).unwrap();
    source.store.add_mechanic("Ana");

    let dir = tempfile::tempdir().unwrap();
    let path = source.store.export_snapshot(dir.path()).unwrap();
    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("mechanic-tracker-backup-"));
    assert!(file_name.ends_with(".json"));

    let contents = std::fs::read_to_string(&path).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&contents).unwrap();
    assert_eq!(snapshot.version, "1.0.0");
    assert_eq!(snapshot.tasks.len(), 2);

    let target = TestHarness::new();
    let outcome = target.store.import_snapshot(&contents).unwrap();
    assert!(outcome.persisted);
    assert_eq!(target.store.load_tasks(), source.store.load_tasks());
    assert_eq!(target.store.load_mechanics(), source.store.load_mechanics());
}

#[test]
fn import_with_only_tasks_leaves_roster() {
    let h = TestHarness::new();
    h.store.add_mechanic("Ana");

    let outcome = h.store.import_snapshot(r#"{"tasks": []}"#).unwrap();
    assert_eq!(outcome.tasks, Some(vec![]));
    assert_eq!(outcome.mechanics, None);
    assert_eq!(h.store.load_mechanics().len(), 4);
}

#[test]
fn import_replaces_instead_of_merging() {
    let h = TestHarness::new();
    h.tracker.create_task(draft("Old job")).unwrap();

    h.store
        .import_snapshot(r#"{"mechanics": ["Ana"], "tasks": []}"#)
        .unwrap();
    assert!(h.store.load_tasks().is_empty());
    assert_eq!(h.store.load_mechanics(), vec!["Ana".to_string()]);
}

#[test]
fn import_coerces_non_array_tasks() {
    let h = TestHarness::new();
    h.tracker.create_task(draft("Old job")).unwrap();

    let outcome = h.store.import_snapshot(r#"{"tasks": "nope"}"#).unwrap();
    assert_eq!(outcome.tasks, Some(vec![]));
    assert!(h.store.load_tasks().is_empty());
}

#[test]
fn import_rejects_malformed_documents() {
    let h = TestHarness::new();
    h.tracker.create_task(draft("Keep me")).unwrap();

    for bad in ["not json", "[1, 2]", r#"{"mechanics": "Ana"}"#] {
        assert!(h.store.import_snapshot(bad).is_err(), "accepted {bad}");
    }
    assert_eq!(h.store.load_tasks().len(), 1);
}

#[test]
fn clear_all_resets_to_defaults() {
    let h = TestHarness::new();
    h.tracker.create_task(draft("Oil change")).unwrap();
    h.store.add_mechanic("Ana");

    assert!(h.store.clear_all());
    assert!(h.store.load_tasks().is_empty());
    assert_eq!(h.store.load_mechanics(), DEFAULT_MECHANICS.to_vec());
}

// ---------------------------------------------------------------------------
// SQLite backend
// ---------------------------------------------------------------------------

#[test]
fn sqlite_store_survives_reopen() {
    use shoptrack::prompt::ScriptedPrompt;
    use shoptrack::store::Store;
    use std::sync::Arc;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");
    let path = path.to_str().unwrap();

    {
        let kv = Arc::new(SqliteKv::open(path, None).unwrap());
        let store = Store::new(kv, Arc::new(ScriptedPrompt::new(true)));
        assert!(store.add_mechanic("Ana"));
    }

    let kv = Arc::new(SqliteKv::open(path, None).unwrap());
    let store = Store::new(kv, Arc::new(ScriptedPrompt::new(true)));
    assert!(store.load_mechanics().contains(&"Ana".to_string()));
}
