use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use super::backend::Store;
use super::migration;
use super::models::{LegacyLogEntry, NewResource, Resource, ResourceLogEntry, Status};

/// SQLite-backed store. Single connection behind a mutex; the office runs a
/// single logical writer, so no pooling is needed.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database file.
    pub fn open(db_path: &str) -> Result<Self> {
        if let Some(dir) = Path::new(db_path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        migration::check_and_migrate(&conn)
    }

    // ─── Resources ──────────────────────────────────────────────────────────

    async fn insert_resource(&self, new: &NewResource) -> Result<Resource> {
        let now = Self::now();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO resources
                (name, kind, status, team_leader, contact_number, members,
                 assigned_area, cause, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, '', '', ?7, ?7)",
            params![
                new.name,
                new.kind,
                Status::Available.as_str(),
                new.team_leader,
                new.contact_number,
                new.members,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Resource {
            id,
            name: new.name.clone(),
            kind: new.kind.clone(),
            status: Status::Available,
            team_leader: new.team_leader.clone(),
            contact_number: new.contact_number.clone(),
            members: new.members.clone(),
            assigned_area: String::new(),
            cause: String::new(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn get_resource(&self, id: i64) -> Result<Option<Resource>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, kind, status, team_leader, contact_number, members,
                    assigned_area, cause, created_at, updated_at
             FROM resources WHERE id = ?1",
        )?;
        // .optional() keeps no-rows as None while letting real SQL errors
        // propagate instead of masquerading as a missing resource
        let result = stmt
            .query_row(params![id], |row| Ok(resource_from_row(row)))
            .optional()?;
        Ok(result)
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, kind, status, team_leader, contact_number, members,
                    assigned_area, cause, created_at, updated_at
             FROM resources",
        )?;
        let rows = stmt
            .query_map([], |row| Ok(resource_from_row(row)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn update_resource(&self, resource: &Resource) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let changes = conn.execute(
            "UPDATE resources
             SET name = ?1, kind = ?2, status = ?3, team_leader = ?4,
                 contact_number = ?5, members = ?6, assigned_area = ?7,
                 cause = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                resource.name,
                resource.kind,
                resource.status.as_str(),
                resource.team_leader,
                resource.contact_number,
                resource.members,
                resource.assigned_area,
                resource.cause,
                Self::now(),
                resource.id
            ],
        )?;
        Ok(changes)
    }

    async fn delete_resource(&self, id: i64) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let changes = conn.execute("DELETE FROM resources WHERE id = ?1", params![id])?;
        Ok(changes)
    }

    // ─── Legacy flat log ────────────────────────────────────────────────────

    async fn append_legacy_log(
        &self,
        action: &str,
        medic_name: &str,
        kind: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO logs (action, medic_name, timestamp, kind) VALUES (?1, ?2, ?3, ?4)",
            params![action, medic_name, Self::now(), kind],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn list_legacy_logs(&self) -> Result<Vec<LegacyLogEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, action, medic_name, timestamp, kind FROM logs ORDER BY id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(LegacyLogEntry {
                    id: row.get(0)?,
                    action: row.get(1)?,
                    medic_name: row.get(2)?,
                    timestamp: row.get(3)?,
                    kind: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ─── Structured per-resource log ────────────────────────────────────────

    async fn append_resource_log(
        &self,
        resource_id: i64,
        action: &str,
        note: &str,
        timestamp: Option<&str>,
    ) -> Result<i64> {
        let ts = match timestamp {
            Some(t) => t.to_string(),
            None => Self::now(),
        };
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO resource_logs (resource_id, action, note, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![resource_id, action, note, ts],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn list_resource_logs(&self, resource_id: i64) -> Result<Vec<ResourceLogEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, resource_id, action, note, timestamp
             FROM resource_logs WHERE resource_id = ?1 ORDER BY timestamp ASC",
        )?;
        let rows = stmt
            .query_map(params![resource_id], |row| {
                Ok(ResourceLogEntry {
                    id: row.get(0)?,
                    resource_id: row.get(1)?,
                    action: row.get(2)?,
                    note: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn purge_orphaned_logs(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let changes = conn.execute(
            "DELETE FROM resource_logs
             WHERE resource_id NOT IN (SELECT id FROM resources)",
            [],
        )?;
        Ok(changes)
    }

    // ─── Raw queries ────────────────────────────────────────────────────────

    async fn query_raw(&self, sql: &str) -> Result<Vec<serde_json::Value>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt.query_map([], |row| {
            let mut map = serde_json::Map::new();
            for (i, col_name) in column_names.iter().enumerate() {
                let value = match row.get_ref(i)? {
                    rusqlite::types::ValueRef::Null => serde_json::Value::Null,
                    rusqlite::types::ValueRef::Integer(n) => serde_json::json!(n),
                    rusqlite::types::ValueRef::Real(f) => serde_json::json!(f),
                    rusqlite::types::ValueRef::Text(t) => {
                        serde_json::Value::String(String::from_utf8_lossy(t).into_owned())
                    }
                    rusqlite::types::ValueRef::Blob(_) => serde_json::Value::Null,
                };
                map.insert(col_name.clone(), value);
            }
            Ok(serde_json::Value::Object(map))
        })?;

        let result: Vec<serde_json::Value> = rows.filter_map(|r| r.ok()).collect();
        Ok(result)
    }
}

// ─── Helper functions ───────────────────────────────────────────────────────

fn resource_from_row(row: &rusqlite::Row<'_>) -> Resource {
    let status: String = row.get(3).unwrap_or_default();
    Resource {
        id: row.get(0).unwrap_or_default(),
        name: row.get(1).unwrap_or_default(),
        kind: row.get(2).unwrap_or_default(),
        status: Status::parse(&status),
        team_leader: row.get(4).unwrap_or_default(),
        contact_number: row.get(5).unwrap_or_default(),
        members: row.get(6).unwrap_or_default(),
        assigned_area: row.get(7).unwrap_or_default(),
        cause: row.get(8).unwrap_or_default(),
        created_at: row.get(9).unwrap_or_default(),
        updated_at: row.get(10).unwrap_or_default(),
    }
}
