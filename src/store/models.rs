use serde::{Deserialize, Serialize};

// ─── Status ─────────────────────────────────────────────────────────────────

/// Operational status of a tracked resource.
///
/// Serialized with the display strings the dashboard and the database use
/// (`"Out of Service"` contains spaces; it is not an identifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Available,
    Assigned,
    #[serde(rename = "Out of Service")]
    OutOfService,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Assigned => "Assigned",
            Status::OutOfService => "Out of Service",
        }
    }

    /// Parse the stored display string. Unknown strings map to `Available`
    /// rather than failing a whole row read.
    pub fn parse(s: &str) -> Self {
        match s {
            "Assigned" => Status::Assigned,
            "Out of Service" => Status::OutOfService,
            _ => Status::Available,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Resource ───────────────────────────────────────────────────────────────

/// A trackable unit (team, vehicle, equipment) as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub status: Status,
    pub team_leader: String,
    pub contact_number: String,
    pub members: String,
    pub assigned_area: String,
    pub cause: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields accepted when creating a resource. A new resource always starts
/// `Available` with empty `assigned_area` and `cause`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewResource {
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub team_leader: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub members: String,
}

/// Partial update. An absent field leaves the stored value unchanged;
/// a present field overwrites it ("coalesce with existing").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcePatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub status: Option<Status>,
    pub team_leader: Option<String>,
    pub contact_number: Option<String>,
    pub members: Option<String>,
    pub assigned_area: Option<String>,
    pub cause: Option<String>,
}

// ─── Audit log entries ──────────────────────────────────────────────────────

/// Entry in the legacy flat audit log (`logs` table, schema v1).
///
/// `medic_name` is the resource's display name at event time, denormalized so
/// the entry survives renames and deletion. `kind` is `None` for delete
/// events, which carry no kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyLogEntry {
    pub id: i64,
    pub action: String,
    pub medic_name: String,
    pub timestamp: String,
    pub kind: Option<String>,
}

/// Entry in the structured per-resource audit log (`resource_logs` table,
/// added in schema v2). `resource_id` references `resources.id` without a
/// cascade; entries outlive their resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLogEntry {
    pub id: i64,
    pub resource_id: i64,
    pub action: String,
    pub note: String,
    pub timestamp: String,
}
