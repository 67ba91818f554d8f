//! Lifecycle Engine
//!
//! Ties the pieces together for a status change: validate the proposed
//! status, record the history entry, reconcile assignment and checkout, and
//! hand the resulting patch to a repository as one write.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::context::TransitionContext;
use crate::error::{LifecycleError, Result};
use crate::history::StatusHistoryRecorder;
use crate::policy::LifecyclePolicy;
use crate::prop::{Assignment, CheckedOutDetails, Prop, StatusUpdate};
use crate::reconcile::AssignmentReconciler;
use crate::repository::PropRepository;
use crate::status::LifecycleStatus;
use crate::validator::{Accepted, TransitionValidator, ValidationResult};

/// Who is making the change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub display_name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    pub fn system() -> Self {
        Self::new("system", "System")
    }
}

/// The combined write produced by an accepted transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    #[serde(skip)]
    pub prop_id: Uuid,
    /// History length the patch was planned against
    #[serde(skip)]
    pub base_history_len: usize,
    pub status: LifecycleStatus,
    pub status_notes: Option<String>,
    /// Entry to append to `statusHistory`
    pub history_entry: StatusUpdate,
    pub assignment: Option<Assignment>,
    pub checked_out_details: Option<CheckedOutDetails>,
    pub updated_at: DateTime<Utc>,
}

impl StatusPatch {
    /// Apply to an in-memory prop document
    pub fn apply_to(&self, prop: &mut Prop) {
        prop.status = self.status;
        prop.status_notes = self.status_notes.clone();
        prop.assignment = self.assignment.clone();
        prop.checked_out_details = self.checked_out_details.clone();
        prop.status_history.push(self.history_entry.clone());
        prop.updated_at = self.updated_at;
    }
}

/// Plans and applies prop status changes under a policy
#[derive(Debug, Clone, Default)]
pub struct LifecycleEngine {
    validator: TransitionValidator,
}

impl LifecycleEngine {
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self {
            validator: TransitionValidator::new(policy),
        }
    }

    pub fn validator(&self) -> &TransitionValidator {
        &self.validator
    }

    /// Statuses a prop may move to under the active policy
    pub fn available_targets(&self, prop: &Prop) -> Vec<LifecycleStatus> {
        self.validator.policy().targets_from(prop.status)
    }

    /// Validate a status change and build the patch, without writing
    pub fn plan_transition(
        &self,
        prop: &Prop,
        proposed: LifecycleStatus,
        context: &TransitionContext,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<StatusPatch> {
        let accepted = match self.validator.validate(prop.status, proposed, context) {
            ValidationResult::Accepted(accepted) => accepted,
            ValidationResult::Rejected(rejection) => {
                warn!(
                    prop_id = %prop.id,
                    from = %prop.status,
                    to = %proposed,
                    kind = ?rejection.kind,
                    "Status change rejected"
                );
                return Err(LifecycleError::Rejected(rejection));
            }
        };

        let history_entry =
            StatusHistoryRecorder::record(prop, &accepted, &actor.id, &actor.display_name, at);

        let reconciled = AssignmentReconciler::reconcile(
            accepted.new_status,
            prop.assignment.as_ref(),
            prop.checked_out_details.as_ref(),
        );
        let (assignment, checked_out_details) = Self::fill_from_context(
            &accepted,
            reconciled.assignment,
            reconciled.checked_out_details,
            at,
        );

        debug!(
            prop_id = %prop.id,
            from = %prop.status,
            to = %accepted.new_status,
            by = %actor.id,
            "Status change planned"
        );

        Ok(StatusPatch {
            prop_id: prop.id,
            base_history_len: prop.status_history.len(),
            status: accepted.new_status,
            status_notes: accepted.normalized_context.notes.clone(),
            history_entry,
            assignment,
            checked_out_details,
            updated_at: at,
        })
    }

    /// Load, plan and apply a status change through a repository
    pub async fn transition<R>(
        &self,
        repo: &R,
        prop_id: Uuid,
        proposed: LifecycleStatus,
        context: &TransitionContext,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<Prop>
    where
        R: PropRepository + ?Sized,
    {
        let prop = repo.load(prop_id).await?;
        let patch = self.plan_transition(&prop, proposed, context, actor, at)?;
        repo.apply_patch(&patch).await
    }

    /// Check-in assigns the destination; checkout records the recipient
    fn fill_from_context(
        accepted: &Accepted,
        assignment: Option<Assignment>,
        checked_out_details: Option<CheckedOutDetails>,
        at: DateTime<Utc>,
    ) -> (Option<Assignment>, Option<CheckedOutDetails>) {
        let ctx = &accepted.normalized_context;

        match accepted.new_status {
            LifecycleStatus::AvailableInStorage => {
                let assignment = ctx
                    .destination
                    .as_ref()
                    .map(|d| Assignment {
                        kind: d.kind,
                        id: d.id.clone(),
                        name: d.name.clone(),
                        assigned_at: at,
                    })
                    .or(assignment);
                (assignment, checked_out_details)
            }
            LifecycleStatus::CheckedOut => {
                let checkout = ctx
                    .to
                    .as_ref()
                    .map(|to| CheckedOutDetails {
                        to: to.clone(),
                        notes: ctx.notes.clone(),
                        checked_out_at: at,
                    })
                    .or(checked_out_details);
                (assignment, checkout)
            }
            _ => (assignment, checked_out_details),
        }
    }
}
