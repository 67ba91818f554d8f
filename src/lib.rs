//! Props Lifecycle - status model for a theatrical props inventory
//!
//! Tracks where each prop stands in its operational life (in storage,
//! checked out, on set, damaged, missing, cut ...) and what a status change
//! must carry:
//! - `StatusCatalog` - the closed set of statuses, labels and priorities
//! - `TransitionValidator` - per-status required context, optional strict edges
//! - `StatusHistoryRecorder` - immutable history entries
//! - `AssignmentReconciler` - storage assignment vs checkout mutual exclusion
//! - `LifecycleEngine` - validate, record and reconcile into one `StatusPatch`
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use props_lifecycle::{Actor, LifecycleEngine, LifecycleStatus, Prop, TransitionContext};
//!
//! let engine = LifecycleEngine::default();
//! let prop = Prop::new("Yorick's skull");
//!
//! let patch = engine
//!     .plan_transition(
//!         &prop,
//!         LifecycleStatus::CheckedOut,
//!         &TransitionContext::new().to("Jane Doe"),
//!         &Actor::new("user1", "Jane"),
//!         Utc::now(),
//!     )
//!     .unwrap();
//! assert_eq!(patch.history_entry.previous_status, LifecycleStatus::AvailableInStorage);
//! ```

// Core error handling
pub mod error;

// Status model
pub mod context;
pub mod prop;
pub mod status;

// Transition rules and their configuration
pub mod policy;
pub mod validator;

// Side effects of an accepted transition
pub mod history;
pub mod reconcile;

// Orchestration and persistence seam
pub mod engine;
pub mod repository;

// Labels and box contents
pub mod label;
pub mod packing;

pub use context::{ContextField, Destination, TransitionContext};
pub use engine::{Actor, LifecycleEngine, StatusPatch};
pub use error::{LifecycleError, Result};
pub use history::StatusHistoryRecorder;
pub use policy::{LifecyclePolicy, PolicyLoader, TransitionMode};
pub use prop::{Assignment, AssignmentKind, CheckedOutDetails, Prop, StatusUpdate};
pub use reconcile::{AssignmentReconciler, Reconciled};
pub use repository::{InMemoryPropRepository, PropRepository};
pub use status::{LifecycleStatus, StatusCatalog};
pub use validator::{Accepted, Rejection, RejectionKind, TransitionValidator, ValidationResult};
