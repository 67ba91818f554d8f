//! Status History Recording
//!
//! Builds the immutable `StatusUpdate` entry for an accepted transition.
//! Recording is pure: the prop is not touched, the caller persists the new
//! status and the appended entry together.

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

use crate::prop::{Prop, StatusUpdate};
use crate::validator::Accepted;

pub struct StatusHistoryRecorder;

impl StatusHistoryRecorder {
    /// Build the history entry for an accepted transition of `prop`
    pub fn record(
        prop: &Prop,
        accepted: &Accepted,
        actor_id: &str,
        actor_display_name: &str,
        timestamp: DateTime<Utc>,
    ) -> StatusUpdate {
        StatusUpdate {
            id: Self::entry_id(timestamp),
            date: timestamp,
            previous_status: prop.status,
            new_status: accepted.new_status,
            updated_by: actor_id.to_string(),
            updated_by_name: actor_display_name.to_string(),
            notes: accepted.normalized_context.notes.clone(),
            created_at: timestamp,
        }
    }

    /// UUIDv7: millisecond timestamp prefix plus random bits
    fn entry_id(timestamp: DateTime<Utc>) -> Uuid {
        let secs = timestamp.timestamp().max(0) as u64;
        let ts = Timestamp::from_unix(NoContext, secs, timestamp.timestamp_subsec_nanos());
        Uuid::new_v7(ts)
    }

    /// Check that a history is gap-free: each entry starts where the previous
    /// one ended and the last one matches the current status
    pub fn is_contiguous(prop: &Prop) -> bool {
        let chained = prop
            .status_history
            .windows(2)
            .all(|pair| pair[0].new_status == pair[1].previous_status);

        let current = prop
            .status_history
            .last()
            .map(|last| last.new_status == prop.status)
            .unwrap_or(true);

        chained && current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TransitionContext;
    use crate::status::LifecycleStatus;
    use crate::validator::TransitionValidator;
    use std::collections::HashSet;

    fn accepted(status: LifecycleStatus, ctx: TransitionContext) -> Accepted {
        Accepted {
            new_status: status,
            normalized_context: ctx.normalized(),
        }
    }

    #[test]
    fn test_record_check_in() {
        let prop = Prop::new("Candelabra").with_status(LifecycleStatus::CheckedOut);
        let at = Utc::now();

        let entry = StatusHistoryRecorder::record(
            &prop,
            &accepted(LifecycleStatus::AvailableInStorage, TransitionContext::new()),
            "user1",
            "Jane",
            at,
        );

        assert_eq!(entry.previous_status, LifecycleStatus::CheckedOut);
        assert_eq!(entry.new_status, LifecycleStatus::AvailableInStorage);
        assert_eq!(entry.updated_by, "user1");
        assert_eq!(entry.updated_by_name, "Jane");
        assert_eq!(entry.date, at);
        assert_eq!(entry.notes, None);
        // Pure: prop untouched
        assert_eq!(prop.status, LifecycleStatus::CheckedOut);
        assert!(prop.status_history.is_empty());
    }

    #[test]
    fn test_record_carries_notes_from_validated_context() {
        let prop = Prop::new("Sword");
        let result = TransitionValidator::permissive().validate(
            prop.status,
            LifecycleStatus::UnderReview,
            &TransitionContext::new().notes("  hilt loose  "),
        );

        let accepted = result.accepted().unwrap();
        let entry = StatusHistoryRecorder::record(&prop, accepted, "u2", "Sam", Utc::now());
        assert_eq!(entry.notes.as_deref(), Some("hilt loose"));
        assert_eq!(entry.previous_status, prop.status);
    }

    #[test]
    fn test_ids_unique_for_same_instant() {
        let prop = Prop::new("Fan");
        let at = Utc::now();
        let acc = accepted(LifecycleStatus::Missing, TransitionContext::new());

        let ids: HashSet<Uuid> = (0..500)
            .map(|_| StatusHistoryRecorder::record(&prop, &acc, "u", "U", at).id)
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_contiguity_check() {
        let mut prop = Prop::new("Crown");
        let at = Utc::now();
        assert!(StatusHistoryRecorder::is_contiguous(&prop));

        let missing = accepted(LifecycleStatus::Missing, TransitionContext::new());
        let first = StatusHistoryRecorder::record(&prop, &missing, "u", "U", at);
        prop.status = first.new_status;
        prop.status_history.push(first);
        assert!(StatusHistoryRecorder::is_contiguous(&prop));

        prop.status = LifecycleStatus::Cut;
        assert!(!StatusHistoryRecorder::is_contiguous(&prop));
    }
}
