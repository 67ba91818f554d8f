//! Error handling for the props lifecycle model
//!
//! Validation failures are not errors: they come back as
//! [`ValidationResult::Rejected`](crate::validator::ValidationResult) values.
//! `LifecycleError` covers everything else - unknown statuses at the parse
//! boundary, repository failures, label decoding and configuration loading.

use thiserror::Error;
use uuid::Uuid;

use crate::status::LifecycleStatus;
use crate::validator::Rejection;

/// Main error type for the lifecycle crate
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),

    #[error("Transition rejected: {0}")]
    Rejected(Rejection),

    #[error("Prop {0} not found")]
    PropNotFound(Uuid),

    #[error("Prop {prop_id} is now '{actual}', patch was planned from '{expected}'")]
    StaleStatus {
        prop_id: Uuid,
        expected: LifecycleStatus,
        actual: LifecycleStatus,
    },

    #[error("Prop {prop_id} now has {actual} history entries, patch was planned from {expected}")]
    StaleHistory {
        prop_id: Uuid,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid label payload: {0}")]
    InvalidLabel(String),

    #[error("Prop {prop_id} is not packed in box '{box_id}'")]
    PropNotInBox { prop_id: Uuid, box_id: String },

    #[error("Cannot remove {requested} of prop {prop_id}, only {packed} packed")]
    InsufficientQuantity {
        prop_id: Uuid,
        requested: u64,
        packed: u64,
    },

    #[error("Packed quantity of prop {prop_id} would overflow")]
    QuantityOverflow { prop_id: Uuid },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Rejection> for LifecycleError {
    fn from(rejection: Rejection) -> Self {
        LifecycleError::Rejected(rejection)
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
