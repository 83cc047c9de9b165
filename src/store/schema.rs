/// SQL DDL for the optrack database.
///
/// Two audit tables coexist: `logs` is the legacy flat trail from schema v1,
/// `resource_logs` is the structured per-resource trail added in v2. Both are
/// append-only; `resource_logs.resource_id` references `resources.id` without
/// a cascade so history survives resource deletion.
pub const SCHEMA_VERSION: i32 = 2;

pub const CREATE_TABLES_SQL: &str = "
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL,
    description TEXT
);

-- Tracked resources
CREATE TABLE IF NOT EXISTS resources (
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

-- Legacy flat audit log (schema v1)
CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    action TEXT NOT NULL,
    medic_name TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    kind TEXT
);
";

/// Incremental DDL introduced by schema v2.
pub const CREATE_RESOURCE_LOGS_SQL: &str = "
-- Structured per-resource audit log (schema v2)
CREATE TABLE IF NOT EXISTS resource_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    resource_id INTEGER NOT NULL,
    action TEXT NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    timestamp TEXT NOT NULL
);
";

pub const CREATE_INDEXES_SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_resources_status ON resources(status);
CREATE INDEX IF NOT EXISTS idx_resource_logs_resource ON resource_logs(resource_id);
CREATE INDEX IF NOT EXISTS idx_resource_logs_timestamp ON resource_logs(timestamp);
";
