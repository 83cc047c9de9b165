use optrack::store::backend::Store;
use optrack::store::models::{NewResource, Status};
use optrack::store::sqlite::SqliteStore;
use tempfile::TempDir;

fn new_medic(name: &str) -> NewResource {
    NewResource {
        name: name.to_string(),
        kind: "Medic".to_string(),
        ..Default::default()
    }
}

async fn create_test_store() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("optrack.db");
    let store = SqliteStore::open(db_path.to_str().unwrap()).unwrap();
    store.initialize().await.unwrap();
    (dir, store)
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let (_dir, store) = create_test_store().await;
    // Should not error on second init
    store.initialize().await.unwrap();
}

#[tokio::test]
async fn insert_assigns_id_and_defaults() {
    let (_dir, store) = create_test_store().await;

    let created = store.insert_resource(&new_medic("Alpha Team")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.status, Status::Available);
    assert_eq!(created.assigned_area, "");
    assert_eq!(created.cause, "");

    let fetched = store.get_resource(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Alpha Team");
    assert_eq!(fetched.kind, "Medic");
    assert_eq!(fetched.status, Status::Available);
}

#[tokio::test]
async fn get_missing_resource_is_none() {
    let (_dir, store) = create_test_store().await;
    assert!(store.get_resource(999).await.unwrap().is_none());
}

#[tokio::test]
async fn get_on_uninitialized_database_is_an_error_not_none() {
    // No initialize(): the resources table does not exist. That is a storage
    // failure, not a missing row.
    let store = SqliteStore::open_memory().unwrap();
    assert!(store.get_resource(1).await.is_err());
}

#[tokio::test]
async fn list_returns_all_resources() {
    let (_dir, store) = create_test_store().await;

    store.insert_resource(&new_medic("Alpha")).await.unwrap();
    store.insert_resource(&new_medic("Bravo")).await.unwrap();
    store.insert_resource(&new_medic("Charlie")).await.unwrap();

    let all = store.list_resources().await.unwrap();
    assert_eq!(all.len(), 3);
    let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"Alpha"));
    assert!(names.contains(&"Bravo"));
    assert!(names.contains(&"Charlie"));
}

#[tokio::test]
async fn update_writes_full_row_and_reports_changes() {
    let (_dir, store) = create_test_store().await;

    let mut res = store.insert_resource(&new_medic("Alpha")).await.unwrap();
    res.status = Status::Assigned;
    res.assigned_area = "North Sector".into();
    res.team_leader = "Dr. Cruz".into();

    let changes = store.update_resource(&res).await.unwrap();
    assert_eq!(changes, 1);

    let fetched = store.get_resource(res.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, Status::Assigned);
    assert_eq!(fetched.assigned_area, "North Sector");
    assert_eq!(fetched.team_leader, "Dr. Cruz");

    // Update against a deleted row reports zero changes
    store.delete_resource(res.id).await.unwrap();
    let changes = store.update_resource(&res).await.unwrap();
    assert_eq!(changes, 0);
}

#[tokio::test]
async fn legacy_logs_are_newest_first() {
    let (_dir, store) = create_test_store().await;

    store
        .append_legacy_log("Added", "Alpha", Some("Medic"))
        .await
        .unwrap();
    store
        .append_legacy_log("Assigned", "Alpha", Some("Medic"))
        .await
        .unwrap();
    store.append_legacy_log("Deleted", "Medic ID 1", None).await.unwrap();

    let logs = store.list_legacy_logs().await.unwrap();
    assert_eq!(logs.len(), 3);
    assert!(logs.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(logs[0].action, "Deleted");
    assert_eq!(logs[0].kind, None);
    assert_eq!(logs[2].action, "Added");
    assert_eq!(logs[2].kind.as_deref(), Some("Medic"));
}

#[tokio::test]
async fn resource_logs_are_oldest_first_and_filtered_by_id() {
    let (_dir, store) = create_test_store().await;

    let a = store.insert_resource(&new_medic("Alpha")).await.unwrap();
    let b = store.insert_resource(&new_medic("Bravo")).await.unwrap();

    store
        .append_resource_log(a.id, "Created in staging area", "", Some("2026-01-01T08:00:00Z"))
        .await
        .unwrap();
    store
        .append_resource_log(b.id, "Created in staging area", "", Some("2026-01-01T08:30:00Z"))
        .await
        .unwrap();
    store
        .append_resource_log(a.id, "Assigned", "Assigned to North Sector", Some("2026-01-02T09:00:00Z"))
        .await
        .unwrap();

    let logs = store.list_resource_logs(a.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|e| e.resource_id == a.id));
    assert!(logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(logs[0].action, "Created in staging area");
    assert_eq!(logs[1].action, "Assigned");
}

#[tokio::test]
async fn append_resource_log_defaults_timestamp() {
    let (_dir, store) = create_test_store().await;

    let a = store.insert_resource(&new_medic("Alpha")).await.unwrap();
    store
        .append_resource_log(a.id, "Radio check", "", None)
        .await
        .unwrap();

    let logs = store.list_resource_logs(a.id).await.unwrap();
    assert!(!logs[0].timestamp.is_empty());
}

#[tokio::test]
async fn purge_removes_only_orphaned_entries() {
    let (_dir, store) = create_test_store().await;

    let kept = store.insert_resource(&new_medic("Alpha")).await.unwrap();
    let doomed = store.insert_resource(&new_medic("Bravo")).await.unwrap();

    store
        .append_resource_log(kept.id, "Created in staging area", "", None)
        .await
        .unwrap();
    store
        .append_resource_log(doomed.id, "Created in staging area", "", None)
        .await
        .unwrap();
    store
        .append_resource_log(doomed.id, "Assigned", "Assigned to East Ridge", None)
        .await
        .unwrap();

    store.delete_resource(doomed.id).await.unwrap();

    // Entries survive deletion until an explicit purge
    assert_eq!(store.list_resource_logs(doomed.id).await.unwrap().len(), 2);

    let purged = store.purge_orphaned_logs().await.unwrap();
    assert_eq!(purged, 2);
    assert!(store.list_resource_logs(doomed.id).await.unwrap().is_empty());
    assert_eq!(store.list_resource_logs(kept.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn migrates_v1_database_to_v2() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("optrack.db");

    // Hand-build a v1 database: resources + legacy logs, no resource_logs.
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (
                 version INTEGER PRIMARY KEY,
                 applied_at TEXT NOT NULL,
                 description TEXT
             );
             CREATE TABLE resources (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT NOT NULL,
                 kind TEXT NOT NULL DEFAULT '',
                 status TEXT NOT NULL DEFAULT 'Available',
                 team_leader TEXT NOT NULL DEFAULT '',
                 contact_number TEXT NOT NULL DEFAULT '',
                 members TEXT NOT NULL DEFAULT '',
                 assigned_area TEXT NOT NULL DEFAULT '',
                 cause TEXT NOT NULL DEFAULT '',
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             );
             CREATE TABLE logs (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 action TEXT NOT NULL,
                 medic_name TEXT NOT NULL,
                 timestamp TEXT NOT NULL,
                 kind TEXT
             );
             INSERT INTO schema_version (version, applied_at, description)
                 VALUES (1, '2025-06-01T00:00:00Z', 'Resources and legacy log');
             INSERT INTO resources (name, kind, created_at, updated_at)
                 VALUES ('Alpha', 'Medic', '2025-06-01T00:00:00Z', '2025-06-01T00:00:00Z');
             INSERT INTO logs (action, medic_name, timestamp, kind)
                 VALUES ('Added', 'Alpha', '2025-06-01T00:00:00Z', 'Medic');",
        )
        .unwrap();
    }

    let store = SqliteStore::open(db_path.to_str().unwrap()).unwrap();
    store.initialize().await.unwrap();

    // Pre-migration data is intact
    let all = store.list_resources().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(store.list_legacy_logs().await.unwrap().len(), 1);

    // The structured log introduced in v2 is usable
    let id = all[0].id;
    store
        .append_resource_log(id, "Assigned", "Assigned to North Sector", None)
        .await
        .unwrap();
    assert_eq!(store.list_resource_logs(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn query_raw_returns_json_rows() {
    let (_dir, store) = create_test_store().await;

    store.insert_resource(&new_medic("Alpha")).await.unwrap();
    let rows = store
        .query_raw("SELECT name, status FROM resources")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Alpha");
    assert_eq!(rows[0]["status"], "Available");
}
