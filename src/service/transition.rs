//! Pure transition planning.
//!
//! Given the stored resource *before* the merge and the requested patch, decide
//! what the transition means: which legacy-log action to record, whether a
//! structured log entry is due and with what action/note, and which
//! state-tied fields must be cleared. No I/O happens here, which keeps the
//! log-decision rules testable in isolation.

use crate::store::models::{Resource, ResourcePatch, Status};

/// Knobs for behavior the source system left inconsistent across revisions.
#[derive(Debug, Clone, Default)]
pub struct TransitionPolicy {
    /// Clear a stale `cause` left over from an Out of Service period when the
    /// resource is assigned again. Off by default: operator-entered data is
    /// preserved until an explicit clear.
    pub clear_stale_on_assign: bool,
}

/// A structured log entry the transition calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredEntry {
    pub action: String,
    pub note: String,
}

/// What a single update operation must journal and reset.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    /// Action string for the legacy flat log. Always present: every update
    /// writes a legacy entry, even when the status did not change.
    pub legacy_action: String,
    /// Structured entry, emitted only for recognized transitions.
    pub structured: Option<StructuredEntry>,
    pub clear_assigned_area: bool,
    pub clear_cause: bool,
}

/// Compute the plan for applying `patch` to `old`. `note` is operator-supplied
/// context from the named transition operations; the plain update path passes
/// `None` and gets the transition defaults.
pub fn plan(
    old: &Resource,
    patch: &ResourcePatch,
    note: Option<&str>,
    policy: &TransitionPolicy,
) -> TransitionPlan {
    let effective = patch.status.unwrap_or(old.status);
    let mut plan = TransitionPlan {
        legacy_action: effective.as_str().to_string(),
        structured: None,
        clear_assigned_area: false,
        clear_cause: false,
    };

    let Some(requested) = patch.status else {
        return plan;
    };

    match requested {
        // Assigning is recognized even when already Assigned: moving a team
        // to a different area is journaled as a reassignment.
        Status::Assigned => {
            let action = if old.status == Status::Assigned {
                "Reassigned"
            } else {
                "Assigned"
            };
            let area = patch
                .assigned_area
                .as_deref()
                .unwrap_or(old.assigned_area.as_str());
            let note = note
                .map(str::to_string)
                .unwrap_or_else(|| format!("Assigned to {}", area));
            plan.structured = Some(StructuredEntry {
                action: action.to_string(),
                note,
            });
            plan.clear_cause = policy.clear_stale_on_assign && patch.cause.is_none();
        }
        Status::OutOfService => {
            if old.status != Status::OutOfService {
                let cause = patch.cause.as_deref().unwrap_or(old.cause.as_str());
                plan.structured = Some(StructuredEntry {
                    action: "Set out of service".to_string(),
                    note: cause.to_string(),
                });
            }
        }
        Status::Available => {
            if old.status != Status::Available {
                plan.structured = Some(StructuredEntry {
                    action: "Returned to staging area".to_string(),
                    note: note.unwrap_or("").to_string(),
                });
            }
            // Returning to staging always resets the state-tied fields,
            // whatever the caller sent and whatever the prior status was.
            // A resource sitting in Available can carry a stale area from a
            // partial update; requesting Available clears it too.
            plan.clear_assigned_area = true;
            plan.clear_cause = true;
        }
    }

    plan
}

/// Merge a patch into a stored resource, then apply the plan's clears.
/// Absent patch fields retain the stored value.
pub fn merge(old: &Resource, patch: &ResourcePatch, plan: &TransitionPlan) -> Resource {
    let mut merged = Resource {
        id: old.id,
        name: patch.name.clone().unwrap_or_else(|| old.name.clone()),
        kind: patch.kind.clone().unwrap_or_else(|| old.kind.clone()),
        status: patch.status.unwrap_or(old.status),
        team_leader: patch
            .team_leader
            .clone()
            .unwrap_or_else(|| old.team_leader.clone()),
        contact_number: patch
            .contact_number
            .clone()
            .unwrap_or_else(|| old.contact_number.clone()),
        members: patch.members.clone().unwrap_or_else(|| old.members.clone()),
        assigned_area: patch
            .assigned_area
            .clone()
            .unwrap_or_else(|| old.assigned_area.clone()),
        cause: patch.cause.clone().unwrap_or_else(|| old.cause.clone()),
        created_at: old.created_at.clone(),
        updated_at: old.updated_at.clone(),
    };
    if plan.clear_assigned_area {
        merged.assigned_area.clear();
    }
    if plan.clear_cause {
        merged.cause.clear();
    }
    merged
}
