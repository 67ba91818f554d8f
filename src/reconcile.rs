//! Assignment Reconciliation
//!
//! A prop is never both checked out to a person and assigned to a storage
//! location or box. Given the new status, decide which of the two fields
//! survive the transition.

use crate::prop::{Assignment, CheckedOutDetails};
use crate::status::LifecycleStatus;

/// Assignment and checkout fields after a transition
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub assignment: Option<Assignment>,
    pub checked_out_details: Option<CheckedOutDetails>,
}

pub struct AssignmentReconciler;

impl AssignmentReconciler {
    /// - `available_in_storage` clears the checkout; the caller sets the
    ///   assignment from the check-in destination
    /// - `checked_out` clears the assignment
    /// - `missing`, `cut`, `ready_for_disposal` clear both
    /// - anything else leaves both untouched
    pub fn reconcile(
        new_status: LifecycleStatus,
        assignment: Option<&Assignment>,
        checked_out_details: Option<&CheckedOutDetails>,
    ) -> Reconciled {
        let (keep_assignment, keep_checkout) = match new_status {
            LifecycleStatus::AvailableInStorage => (true, false),
            LifecycleStatus::CheckedOut => (false, true),
            s if s.is_out_of_circulation() => (false, false),
            _ => (true, true),
        };

        Reconciled {
            assignment: assignment.filter(|_| keep_assignment).cloned(),
            checked_out_details: checked_out_details.filter(|_| keep_checkout).cloned(),
        }
    }
}
