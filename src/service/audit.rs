//! Dual audit trail.
//!
//! The service records transitions through a single [`AuditWriter`] without
//! knowing which sinks are active. Two sinks exist: the legacy flat log
//! (written for every event) and the structured per-resource log (written only
//! when the event carries a structured part). A sink failure is reported via
//! `tracing` and never fails the operation that produced the event — the
//! primary row write has already succeeded by the time sinks run.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::store::backend::Store;

/// Superset carrier for one auditable event.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Action string for the legacy log: the new status, or a synthetic verb
    /// such as "Added" / "Deleted".
    pub legacy_action: String,
    /// Display name at event time, denormalized into the legacy log.
    pub resource_name: String,
    /// Resource kind at event time; `None` for delete events.
    pub kind: Option<String>,
    /// Structured part, present only for recognized transitions and creates.
    pub structured: Option<StructuredPart>,
}

#[derive(Debug, Clone)]
pub struct StructuredPart {
    pub resource_id: i64,
    pub action: String,
    pub note: String,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    fn name(&self) -> &'static str;
    async fn record(&self, event: &AuditEvent) -> Result<()>;
}

/// Writes every event to the legacy flat `logs` table.
pub struct LegacySink {
    store: Arc<dyn Store>,
}

#[async_trait]
impl AuditSink for LegacySink {
    fn name(&self) -> &'static str {
        "legacy"
    }

    async fn record(&self, event: &AuditEvent) -> Result<()> {
        self.store
            .append_legacy_log(
                &event.legacy_action,
                &event.resource_name,
                event.kind.as_deref(),
            )
            .await?;
        Ok(())
    }
}

/// Writes the structured part, when present, to `resource_logs`.
pub struct StructuredSink {
    store: Arc<dyn Store>,
}

#[async_trait]
impl AuditSink for StructuredSink {
    fn name(&self) -> &'static str {
        "structured"
    }

    async fn record(&self, event: &AuditEvent) -> Result<()> {
        if let Some(part) = &event.structured {
            self.store
                .append_resource_log(part.resource_id, &part.action, &part.note, None)
                .await?;
        }
        Ok(())
    }
}

/// Fans one event out to all active sinks.
pub struct AuditWriter {
    sinks: Vec<Box<dyn AuditSink>>,
}

impl AuditWriter {
    /// Both historical sinks against the same store.
    pub fn with_default_sinks(store: Arc<dyn Store>) -> Self {
        Self {
            sinks: vec![
                Box::new(LegacySink {
                    store: Arc::clone(&store),
                }),
                Box::new(StructuredSink { store }),
            ],
        }
    }

    pub fn with_sinks(sinks: Vec<Box<dyn AuditSink>>) -> Self {
        Self { sinks }
    }

    /// Record an event on every sink. Sink failures are logged and swallowed;
    /// the transition that produced the event has already been applied.
    pub async fn record(&self, event: &AuditEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.record(event).await {
                tracing::warn!(
                    sink = sink.name(),
                    action = %event.legacy_action,
                    error = %e,
                    "audit write failed; operation result unaffected"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn record(&self, _event: &AuditEvent) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    struct CountingSink(Arc<AtomicUsize>);

    #[async_trait]
    impl AuditSink for CountingSink {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn record(&self, _event: &AuditEvent) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn event() -> AuditEvent {
        AuditEvent {
            legacy_action: "Assigned".into(),
            resource_name: "Alpha Team".into(),
            kind: Some("Medic".into()),
            structured: None,
        }
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_later_sinks() {
        let count = Arc::new(AtomicUsize::new(0));
        let writer = AuditWriter::with_sinks(vec![
            Box::new(FailingSink),
            Box::new(CountingSink(Arc::clone(&count))),
        ]);

        // Must complete despite the first sink failing
        writer.record(&event()).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
