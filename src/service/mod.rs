//! The resource status state machine.
//!
//! `ResourceService` owns the store handle and the audit writer, validates
//! transitions, and decides what each transition journals. Planning is pure
//! (see [`transition`]); this module does the I/O around it.

pub mod audit;
pub mod transition;

use std::sync::Arc;

use crate::error::ServiceError;
use crate::store::backend::Store;
use crate::store::models::{
    LegacyLogEntry, NewResource, Resource, ResourceLogEntry, ResourcePatch, Status,
};

use audit::{AuditEvent, AuditWriter, StructuredPart};
use transition::TransitionPolicy;

pub struct ResourceService {
    store: Arc<dyn Store>,
    audit: AuditWriter,
    policy: TransitionPolicy,
}

impl ResourceService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_policy(store, TransitionPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn Store>, policy: TransitionPolicy) -> Self {
        let audit = AuditWriter::with_default_sinks(Arc::clone(&store));
        Self {
            store,
            audit,
            policy,
        }
    }

    // ─── Lifecycle ──────────────────────────────────────────────────────────

    /// Create a resource in the staging area (`Available`, empty
    /// `assigned_area` and `cause`).
    pub async fn create(&self, new: NewResource) -> Result<Resource, ServiceError> {
        if new.name.trim().is_empty() {
            return Err(ServiceError::Validation("name is required".into()));
        }

        let resource = self.store.insert_resource(&new).await?;
        self.audit
            .record(&AuditEvent {
                legacy_action: "Added".into(),
                resource_name: resource.name.clone(),
                kind: Some(resource.kind.clone()),
                structured: Some(StructuredPart {
                    resource_id: resource.id,
                    action: "Created in staging area".into(),
                    note: String::new(),
                }),
            })
            .await;
        Ok(resource)
    }

    /// Delete a resource row. Its structured log entries are retained as
    /// history; only the legacy log records the deletion itself.
    pub async fn delete(&self, id: i64) -> Result<usize, ServiceError> {
        if self.store.get_resource(id).await?.is_none() {
            return Err(ServiceError::not_found(id));
        }
        let changes = self.store.delete_resource(id).await?;
        self.audit
            .record(&AuditEvent {
                legacy_action: "Deleted".into(),
                resource_name: format!("Medic ID {}", id),
                kind: None,
                structured: None,
            })
            .await;
        Ok(changes)
    }

    // ─── Transitions ────────────────────────────────────────────────────────

    /// Dispatch a resource to an area. Journals "Assigned", or "Reassigned"
    /// when the resource was already out on assignment.
    pub async fn assign(
        &self,
        id: i64,
        area: &str,
        note: Option<&str>,
    ) -> Result<Resource, ServiceError> {
        let patch = ResourcePatch {
            status: Some(Status::Assigned),
            assigned_area: Some(area.to_string()),
            ..Default::default()
        };
        let (resource, _) = self.apply(id, patch, note).await?;
        Ok(resource)
    }

    /// Take a resource out of service with a cause.
    pub async fn set_out_of_service(
        &self,
        id: i64,
        cause: &str,
    ) -> Result<Resource, ServiceError> {
        let patch = ResourcePatch {
            status: Some(Status::OutOfService),
            cause: Some(cause.to_string()),
            ..Default::default()
        };
        let (resource, _) = self.apply(id, patch, None).await?;
        Ok(resource)
    }

    /// Return a resource to the staging area, clearing `assigned_area` and
    /// `cause` regardless of what the caller supplied.
    pub async fn return_to_available(
        &self,
        id: i64,
        note: Option<&str>,
    ) -> Result<Resource, ServiceError> {
        let patch = ResourcePatch {
            status: Some(Status::Available),
            ..Default::default()
        };
        let (resource, _) = self.apply(id, patch, note).await?;
        Ok(resource)
    }

    /// General-purpose partial update: the primitive beneath the named
    /// transitions. Returns the merged resource and the store's row-change
    /// count.
    pub async fn update(
        &self,
        id: i64,
        patch: ResourcePatch,
    ) -> Result<(Resource, usize), ServiceError> {
        self.apply(id, patch, None).await
    }

    /// Read-modify-write core: fetch, plan against the status *before* the
    /// merge, persist, then journal. Audit runs after the primary write and
    /// cannot fail the operation.
    async fn apply(
        &self,
        id: i64,
        patch: ResourcePatch,
        note: Option<&str>,
    ) -> Result<(Resource, usize), ServiceError> {
        let old = self
            .store
            .get_resource(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;

        let plan = transition::plan(&old, &patch, note, &self.policy);
        let merged = transition::merge(&old, &patch, &plan);
        let changes = self.store.update_resource(&merged).await?;

        self.audit
            .record(&AuditEvent {
                legacy_action: plan.legacy_action,
                resource_name: merged.name.clone(),
                kind: Some(merged.kind.clone()),
                structured: plan.structured.map(|s| StructuredPart {
                    resource_id: id,
                    action: s.action,
                    note: s.note,
                }),
            })
            .await;

        Ok((merged, changes))
    }

    // ─── Reads ──────────────────────────────────────────────────────────────

    pub async fn list_resources(&self) -> Result<Vec<Resource>, ServiceError> {
        Ok(self.store.list_resources().await?)
    }

    pub async fn get_resource(&self, id: i64) -> Result<Resource, ServiceError> {
        self.store
            .get_resource(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))
    }

    /// Legacy flat log, newest first.
    pub async fn list_legacy_logs(&self) -> Result<Vec<LegacyLogEntry>, ServiceError> {
        Ok(self.store.list_legacy_logs().await?)
    }

    /// Structured log for one resource, oldest first. No existence check:
    /// history remains readable after the resource is deleted.
    pub async fn list_resource_logs(
        &self,
        id: i64,
    ) -> Result<Vec<ResourceLogEntry>, ServiceError> {
        Ok(self.store.list_resource_logs(id).await?)
    }

    // ─── Direct log access ──────────────────────────────────────────────────

    /// Append a structured entry without going through the state machine.
    /// The resource must exist; this is a mutation against its history.
    pub async fn add_resource_log(
        &self,
        id: i64,
        action: &str,
        note: &str,
    ) -> Result<i64, ServiceError> {
        if action.trim().is_empty() {
            return Err(ServiceError::Validation("action is required".into()));
        }
        if self.store.get_resource(id).await?.is_none() {
            return Err(ServiceError::not_found(id));
        }
        Ok(self.store.append_resource_log(id, action, note, None).await?)
    }

    /// Delete structured entries whose resource is gone. Invoked explicitly
    /// from the CLI; nothing purges implicitly.
    pub async fn purge_orphaned_logs(&self) -> Result<usize, ServiceError> {
        Ok(self.store.purge_orphaned_logs().await?)
    }
}
