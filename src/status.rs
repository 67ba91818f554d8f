//! Status Catalog
//!
//! The closed set of lifecycle statuses a prop can hold, with their display
//! labels and operational priority. Wire form is the snake_case name used by
//! the document store (e.g. `available_in_storage`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LifecycleError, Result};

/// Where a prop currently stands in its operational life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    // ─────────────────────────────────────────────────────────────────────────────
    // In circulation
    // ─────────────────────────────────────────────────────────────────────────────
    AvailableInStorage,
    CheckedOut,
    InUseOnSet,
    OnDelivery,
    WithProps,
    WithMaker,
    Backup,
    Confirmed,
    Consumable,

    // ─────────────────────────────────────────────────────────────────────────────
    // Needs attention
    // ─────────────────────────────────────────────────────────────────────────────
    Missing,
    DamagedAwaitingRepair,
    DamagedAwaitingReplacement,
    UnderReview,

    // ─────────────────────────────────────────────────────────────────────────────
    // Out of the show
    // ─────────────────────────────────────────────────────────────────────────────
    Cut,
    ReadyForDisposal,
}

/// Display order used by status pickers and reports
const ALL_STATUSES: [LifecycleStatus; 15] = [
    LifecycleStatus::AvailableInStorage,
    LifecycleStatus::CheckedOut,
    LifecycleStatus::InUseOnSet,
    LifecycleStatus::OnDelivery,
    LifecycleStatus::WithProps,
    LifecycleStatus::WithMaker,
    LifecycleStatus::Confirmed,
    LifecycleStatus::Consumable,
    LifecycleStatus::Backup,
    LifecycleStatus::UnderReview,
    LifecycleStatus::Missing,
    LifecycleStatus::DamagedAwaitingRepair,
    LifecycleStatus::DamagedAwaitingReplacement,
    LifecycleStatus::Cut,
    LifecycleStatus::ReadyForDisposal,
];

impl LifecycleStatus {
    /// Snake_case name as stored in prop documents
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::AvailableInStorage => "available_in_storage",
            LifecycleStatus::CheckedOut => "checked_out",
            LifecycleStatus::InUseOnSet => "in_use_on_set",
            LifecycleStatus::OnDelivery => "on_delivery",
            LifecycleStatus::WithProps => "with_props",
            LifecycleStatus::WithMaker => "with_maker",
            LifecycleStatus::Backup => "backup",
            LifecycleStatus::Confirmed => "confirmed",
            LifecycleStatus::Consumable => "consumable",
            LifecycleStatus::Missing => "missing",
            LifecycleStatus::DamagedAwaitingRepair => "damaged_awaiting_repair",
            LifecycleStatus::DamagedAwaitingReplacement => "damaged_awaiting_replacement",
            LifecycleStatus::UnderReview => "under_review",
            LifecycleStatus::Cut => "cut",
            LifecycleStatus::ReadyForDisposal => "ready_for_disposal",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            LifecycleStatus::AvailableInStorage => "Available in Storage",
            LifecycleStatus::CheckedOut => "Checked Out",
            LifecycleStatus::InUseOnSet => "In Use on Set",
            LifecycleStatus::OnDelivery => "On Delivery",
            LifecycleStatus::WithProps => "With Props Department",
            LifecycleStatus::WithMaker => "With Maker",
            LifecycleStatus::Backup => "Backup",
            LifecycleStatus::Confirmed => "Confirmed",
            LifecycleStatus::Consumable => "Consumable",
            LifecycleStatus::Missing => "Missing",
            LifecycleStatus::DamagedAwaitingRepair => "Damaged - Awaiting Repair",
            LifecycleStatus::DamagedAwaitingReplacement => "Damaged - Awaiting Replacement",
            LifecycleStatus::UnderReview => "Under Review",
            LifecycleStatus::Cut => "Cut",
            LifecycleStatus::ReadyForDisposal => "Ready for Disposal",
        }
    }

    /// Operational urgency; lower values need attention first
    pub fn priority(&self) -> u8 {
        match self {
            LifecycleStatus::Missing => 0,
            LifecycleStatus::DamagedAwaitingRepair => 1,
            LifecycleStatus::DamagedAwaitingReplacement => 1,
            LifecycleStatus::UnderReview => 2,
            LifecycleStatus::OnDelivery => 3,
            LifecycleStatus::CheckedOut => 4,
            LifecycleStatus::WithProps => 4,
            LifecycleStatus::WithMaker => 4,
            LifecycleStatus::InUseOnSet => 5,
            LifecycleStatus::Backup => 6,
            LifecycleStatus::Confirmed => 7,
            LifecycleStatus::Consumable => 7,
            LifecycleStatus::AvailableInStorage => 8,
            LifecycleStatus::ReadyForDisposal => 9,
            LifecycleStatus::Cut => 9,
        }
    }

    pub fn is_damaged(&self) -> bool {
        matches!(
            self,
            LifecycleStatus::DamagedAwaitingRepair | LifecycleStatus::DamagedAwaitingReplacement
        )
    }

    /// Statuses after which the prop holds neither a storage slot nor a borrower
    pub fn is_out_of_circulation(&self) -> bool {
        matches!(
            self,
            LifecycleStatus::Missing | LifecycleStatus::Cut | LifecycleStatus::ReadyForDisposal
        )
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self> {
        ALL_STATUSES
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| LifecycleError::UnknownStatus(s.to_string()))
    }
}

/// Catalog lookups, including the string-facing variants used at the
/// document boundary
pub struct StatusCatalog;

impl StatusCatalog {
    pub fn label_for(status: LifecycleStatus) -> &'static str {
        status.label()
    }

    pub fn priority_of(status: LifecycleStatus) -> u8 {
        status.priority()
    }

    /// All statuses in stable display order
    pub fn all_statuses() -> &'static [LifecycleStatus] {
        &ALL_STATUSES
    }

    /// Label for a raw status string; fails with `UnknownStatus`
    pub fn label_for_str(raw: &str) -> Result<&'static str> {
        raw.parse::<LifecycleStatus>().map(|s| s.label())
    }

    /// Priority for a raw status string; fails with `UnknownStatus`
    pub fn priority_of_str(raw: &str) -> Result<u8> {
        raw.parse::<LifecycleStatus>().map(|s| s.priority())
    }

    /// Statuses sorted most urgent first, ties in display order
    pub fn by_priority() -> Vec<LifecycleStatus> {
        let mut statuses = ALL_STATUSES.to_vec();
        statuses.sort_by_key(|s| s.priority());
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_status_has_label_and_priority() {
        for status in StatusCatalog::all_statuses() {
            assert!(!StatusCatalog::label_for(*status).is_empty());
            assert!(StatusCatalog::priority_of(*status) <= 9);
        }
    }

    #[test]
    fn test_catalog_is_complete_and_unique() {
        let unique: HashSet<_> = StatusCatalog::all_statuses().iter().collect();
        assert_eq!(unique.len(), 15);
    }

    #[test]
    fn test_wire_names_round_trip_through_parse() {
        for status in StatusCatalog::all_statuses() {
            assert_eq!(status.as_str().parse::<LifecycleStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn test_serde_matches_wire_name() {
        let json = serde_json::to_string(&LifecycleStatus::DamagedAwaitingRepair).unwrap();
        assert_eq!(json, "\"damaged_awaiting_repair\"");
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(matches!(
            StatusCatalog::label_for_str("lost_at_sea"),
            Err(LifecycleError::UnknownStatus(s)) if s == "lost_at_sea"
        ));
        assert!(StatusCatalog::priority_of_str("Checked Out").is_err());
        assert!(serde_json::from_str::<LifecycleStatus>("\"borrowed\"").is_err());
    }

    #[test]
    fn test_urgent_statuses_outrank_storage() {
        let storage = LifecycleStatus::AvailableInStorage.priority();
        assert!(LifecycleStatus::Missing.priority() < storage);
        assert!(LifecycleStatus::DamagedAwaitingRepair.priority() < storage);
        assert_eq!(StatusCatalog::by_priority()[0], LifecycleStatus::Missing);
    }
}
