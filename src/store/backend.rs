use anyhow::Result;
use async_trait::async_trait;

use super::models::{LegacyLogEntry, NewResource, Resource, ResourceLogEntry};

/// Pluggable persistence seam. The resource service receives a handle at
/// construction time instead of reaching for a process-wide connection.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create tables and run pending migrations.
    async fn initialize(&self) -> Result<()>;

    // ─── Resources ──────────────────────────────────────────────────────────

    /// Insert a new resource in `Available` state. Returns the stored row
    /// with its assigned id.
    async fn insert_resource(&self, new: &NewResource) -> Result<Resource>;

    /// Get a resource by id.
    async fn get_resource(&self, id: i64) -> Result<Option<Resource>>;

    /// List all resources in store order.
    async fn list_resources(&self) -> Result<Vec<Resource>>;

    /// Write a full row back. Returns the number of rows changed.
    async fn update_resource(&self, resource: &Resource) -> Result<usize>;

    /// Delete a resource row. Returns the number of rows changed. Structured
    /// log entries for the id are left in place.
    async fn delete_resource(&self, id: i64) -> Result<usize>;

    // ─── Legacy flat log ────────────────────────────────────────────────────

    /// Append a legacy log entry. Timestamp is assigned at insert.
    async fn append_legacy_log(
        &self,
        action: &str,
        medic_name: &str,
        kind: Option<&str>,
    ) -> Result<i64>;

    /// All legacy entries, newest first (id descending).
    async fn list_legacy_logs(&self) -> Result<Vec<LegacyLogEntry>>;

    // ─── Structured per-resource log ────────────────────────────────────────

    /// Append a structured entry for a resource. Timestamp defaults to the
    /// server clock when not supplied.
    async fn append_resource_log(
        &self,
        resource_id: i64,
        action: &str,
        note: &str,
        timestamp: Option<&str>,
    ) -> Result<i64>;

    /// Entries for one resource, oldest first (timestamp ascending).
    async fn list_resource_logs(&self, resource_id: i64) -> Result<Vec<ResourceLogEntry>>;

    /// Delete structured entries whose resource no longer exists. Returns the
    /// number of entries removed.
    async fn purge_orphaned_logs(&self) -> Result<usize>;

    // ─── Raw queries ────────────────────────────────────────────────────────

    /// Run a raw SQL query, returning rows as JSON objects. Used by the
    /// operator CLI; callers are expected to pass SELECT statements only.
    async fn query_raw(&self, sql: &str) -> Result<Vec<serde_json::Value>>;
}
