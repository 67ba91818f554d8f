//! Prop Document Types
//!
//! The subset of a prop document that the lifecycle model reads and writes.
//! Field names follow the camelCase shape of the stored JSON documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::LifecycleStatus;

/// A prop tracked by the props department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prop {
    /// Unique prop ID
    pub id: Uuid,
    /// Display name (e.g. "Yorick's skull")
    pub name: String,
    /// Current lifecycle status
    pub status: LifecycleStatus,
    /// Storage location or packing box, when not checked out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
    /// Who holds the prop, when checked out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_out_details: Option<CheckedOutDetails>,
    /// Notes attached to the current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_notes: Option<String>,
    /// Append-only audit log of status transitions
    #[serde(default)]
    pub status_history: Vec<StatusUpdate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prop {
    /// Create a new prop, initially available in storage
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: LifecycleStatus::AvailableInStorage,
            assignment: None,
            checked_out_details: None,
            status_notes: None,
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: LifecycleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = Some(assignment);
        self
    }

    pub fn with_checkout(mut self, details: CheckedOutDetails) -> Self {
        self.checked_out_details = Some(details);
        self
    }

    /// Most recent history entry, if any
    pub fn last_update(&self) -> Option<&StatusUpdate> {
        self.status_history.last()
    }
}

/// What a prop is assigned to while in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    Location,
    Box,
}

/// Association of a prop with a storage location or packing box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    pub fn location(id: impl Into<String>, name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            kind: AssignmentKind::Location,
            id: id.into(),
            name: name.into(),
            assigned_at: at,
        }
    }

    pub fn packing_box(id: impl Into<String>, name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            kind: AssignmentKind::Box,
            id: id.into(),
            name: name.into(),
            assigned_at: at,
        }
    }
}

/// Record of who currently holds a prop outside of storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedOutDetails {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub checked_out_at: DateTime<Utc>,
}

/// Immutable record of one accepted status transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Time-ordered unique ID
    pub id: Uuid,
    /// When the transition took effect
    pub date: DateTime<Utc>,
    /// Status held immediately before this update
    pub previous_status: LifecycleStatus,
    /// Status after this update
    pub new_status: LifecycleStatus,
    /// Actor ID (user ID or "system")
    pub updated_by: String,
    /// Actor display name at the time of the update
    #[serde(default)]
    pub updated_by_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
