//! Lifecycle Policy and YAML Loading
//!
//! A policy selects how strictly status changes are checked. The default is
//! permissive: any status may move to any other, only the per-status context
//! requirements apply. A strict policy additionally restricts which edges
//! exist, mirroring the actions a department offers for each status.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::context::ContextField;
use crate::error::Result;
use crate::status::LifecycleStatus;

/// Environment variable naming the policy file
pub const POLICY_PATH_ENV: &str = "PROPS_POLICY_PATH";

/// How the current status constrains the proposed one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Any status may move to any other
    #[default]
    Permissive,
    /// Only edges listed in `transitions` are allowed
    Strict,
}

/// A complete lifecycle policy, usually loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    #[serde(default)]
    pub mode: TransitionMode,

    /// Allowed edges, consulted only in strict mode
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,

    /// Per-status context fields required on top of the built-in rules
    #[serde(default)]
    pub requirements: HashMap<LifecycleStatus, Vec<ContextField>>,
}

/// Allowed targets from one source status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from: LifecycleStatus,
    pub to: Vec<LifecycleStatus>,
}

impl LifecyclePolicy {
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Strict policy whose edges follow the actions offered per status:
    /// checkout only from storage, check-in from anywhere a prop can be
    /// returned from, and damage/missing/review reachable from everywhere.
    pub fn recommended_strict() -> Self {
        use LifecycleStatus::*;

        let always = [Missing, DamagedAwaitingRepair, DamagedAwaitingReplacement, UnderReview];

        let transitions = crate::status::StatusCatalog::all_statuses()
            .iter()
            .map(|&from| {
                let specific: &[LifecycleStatus] = match from {
                    AvailableInStorage => &[
                        CheckedOut,
                        InUseOnSet,
                        OnDelivery,
                        WithProps,
                        WithMaker,
                        Backup,
                        Confirmed,
                        Consumable,
                        Cut,
                        ReadyForDisposal,
                    ],
                    CheckedOut | InUseOnSet | OnDelivery | WithProps | WithMaker | Backup
                    | Confirmed | Consumable => &[AvailableInStorage, InUseOnSet, Cut],
                    Missing => &[AvailableInStorage, Cut],
                    DamagedAwaitingRepair | DamagedAwaitingReplacement => &[
                        AvailableInStorage,
                        WithMaker,
                        ReadyForDisposal,
                        DamagedAwaitingRepair,
                        DamagedAwaitingReplacement,
                    ],
                    UnderReview => &[AvailableInStorage, Cut, ReadyForDisposal],
                    Cut => &[AvailableInStorage, ReadyForDisposal],
                    ReadyForDisposal => &[AvailableInStorage],
                };

                let mut to: Vec<LifecycleStatus> = Vec::new();
                for status in specific.iter().chain(always.iter()) {
                    if *status != from && !to.contains(status) {
                        to.push(*status);
                    }
                }
                TransitionDef { from, to }
            })
            .collect();

        Self {
            mode: TransitionMode::Strict,
            transitions,
            requirements: HashMap::new(),
        }
    }

    /// Check whether an edge exists under this policy
    pub fn is_allowed(&self, from: LifecycleStatus, to: LifecycleStatus) -> bool {
        match self.mode {
            TransitionMode::Permissive => true,
            TransitionMode::Strict => self
                .transitions
                .iter()
                .filter(|t| t.from == from)
                .any(|t| t.to.contains(&to)),
        }
    }

    /// Targets reachable from a status, in catalog order
    pub fn targets_from(&self, from: LifecycleStatus) -> Vec<LifecycleStatus> {
        crate::status::StatusCatalog::all_statuses()
            .iter()
            .copied()
            .filter(|&to| to != from && self.is_allowed(from, to))
            .collect()
    }

    /// Fields this policy adds for a status; empty when none are configured
    pub fn extra_requirements(&self, status: LifecycleStatus) -> &[ContextField] {
        self.requirements
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Loader for lifecycle policies
pub struct PolicyLoader;

impl PolicyLoader {
    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<LifecyclePolicy> {
        let policy: LifecyclePolicy = serde_yaml::from_str(yaml)?;
        Ok(policy)
    }

    /// Load a policy from a file
    pub fn load_from_file(path: &Path) -> Result<LifecyclePolicy> {
        info!("Loading lifecycle policy from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let policy = Self::load_from_str(&content)?;
        info!(
            mode = ?policy.mode,
            edges = policy.transitions.len(),
            requirements = policy.requirements.len(),
            "Loaded lifecycle policy"
        );
        Ok(policy)
    }

    /// Load the file named by `PROPS_POLICY_PATH`, or the permissive default
    pub fn from_env() -> Result<LifecyclePolicy> {
        match std::env::var(POLICY_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_file(&PathBuf::from(path)),
            _ => {
                debug!("{} not set, using permissive policy", POLICY_PATH_ENV);
                Ok(LifecyclePolicy::permissive())
            }
        }
    }
}
